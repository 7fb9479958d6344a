use anyhow::Error;
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;

/// Application error carrying an HTTP status and the underlying cause.
///
/// Services return `AppError` for everything they cannot recover from;
/// record-not-found is recovered into `Ok(None)` at the service boundary
/// and only turned into a 404 by the controller.
#[derive(Debug)]
pub struct AppError {
    pub status: StatusCode,
    pub error: Error,
}

impl AppError {
    pub fn new<E>(status: StatusCode, err: E) -> Self
    where
        E: Into<Error>,
    {
        Self {
            status,
            error: err.into(),
        }
    }

    pub fn internal<E>(err: E) -> Self
    where
        E: Into<Error>,
    {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, err)
    }

    pub fn not_found<E>(err: E) -> Self
    where
        E: Into<Error>,
    {
        Self::new(StatusCode::NOT_FOUND, err)
    }

    pub fn bad_request<E>(err: E) -> Self
    where
        E: Into<Error>,
    {
        Self::new(StatusCode::BAD_REQUEST, err)
    }

    pub fn unprocessable<E>(err: E) -> Self
    where
        E: Into<Error>,
    {
        Self::new(StatusCode::UNPROCESSABLE_ENTITY, err)
    }

    pub fn unauthorized(msg: impl Into<String>) -> Self {
        Self::new(StatusCode::UNAUTHORIZED, anyhow::anyhow!("{}", msg.into()))
    }

    pub fn forbidden(msg: impl Into<String>) -> Self {
        Self::new(StatusCode::FORBIDDEN, anyhow::anyhow!("{}", msg.into()))
    }

    pub fn database<E>(err: E) -> Self
    where
        E: Into<Error>,
    {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, err)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let body = Json(json!({
            "error": self.error.to_string()
        }));

        (self.status, body).into_response()
    }
}

impl<E> From<E> for AppError
where
    E: Into<Error>,
{
    fn from(err: E) -> Self {
        AppError::internal(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_helper_status_codes() {
        assert_eq!(
            AppError::not_found(anyhow::anyhow!("missing")).status,
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            AppError::bad_request(anyhow::anyhow!("bad")).status,
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AppError::unauthorized("no token").status,
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            AppError::forbidden("wrong role").status,
            StatusCode::FORBIDDEN
        );
    }

    #[test]
    fn test_from_sqlx_error_is_internal() {
        let err: AppError = sqlx::Error::RowNotFound.into();
        assert_eq!(err.status, StatusCode::INTERNAL_SERVER_ERROR);
    }
}
