use anyhow::anyhow;
use axum::{
    Json,
    extract::{FromRequest, Request, rejection::JsonRejection},
};
use serde::de::DeserializeOwned;
use validator::{Validate, ValidationErrors};

use crate::utils::errors::AppError;

/// JSON extractor that runs `validator` rules and turns both
/// deserialization and validation failures into readable error responses.
#[derive(Debug, Clone, Copy, Default)]
pub struct ValidatedJson<T>(pub T);

impl<T, S> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(rejection_to_error)?;

        value
            .validate()
            .map_err(|errors| AppError::unprocessable(anyhow!("{}", flatten_errors(&errors))))?;

        Ok(ValidatedJson(value))
    }
}

fn rejection_to_error(rejection: JsonRejection) -> AppError {
    if matches!(rejection, JsonRejection::MissingJsonContentType(_)) {
        return AppError::bad_request(anyhow!(
            "Missing 'Content-Type: application/json' header"
        ));
    }

    let body_text = rejection.body_text();

    // serde's "missing field `x`" is the one deserialization error worth
    // surfacing with the field name intact.
    if let Some(rest) = body_text.split("missing field `").nth(1)
        && let Some(field) = rest.split('`').next()
    {
        return AppError::bad_request(anyhow!("{field} is required"));
    }

    if body_text.contains("invalid type") {
        return AppError::bad_request(anyhow!("Invalid field type in request"));
    }

    AppError::bad_request(anyhow!("Invalid request body"))
}

fn flatten_errors(errors: &ValidationErrors) -> String {
    let mut messages: Vec<String> = errors
        .field_errors()
        .iter()
        .flat_map(|(field, field_errors)| {
            field_errors.iter().map(move |error| match &error.message {
                Some(msg) => msg.to_string(),
                None => format!("{field} is invalid"),
            })
        })
        .collect();
    messages.sort();
    messages.join(", ")
}
