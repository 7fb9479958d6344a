use axum::{
    extract::FromRequestParts,
    http::{header, request::Parts},
};

use crate::modules::auth::model::Claims;
use crate::modules::users::model::UserRole;
use crate::state::AppState;
use crate::utils::errors::AppError;
use crate::utils::jwt::verify_token;

/// Extractor that validates the JWT from the `Authorization` header and
/// provides the authenticated user's claims.
#[derive(Debug, Clone)]
pub struct AuthUser(pub Claims);

impl AuthUser {
    /// Get the user ID from the token subject.
    pub fn user_id(&self) -> Result<i32, AppError> {
        self.0
            .sub
            .parse::<i32>()
            .map_err(|_| AppError::unauthorized("Invalid user ID in token"))
    }

    pub fn username(&self) -> &str {
        &self.0.username
    }

    pub fn role(&self) -> UserRole {
        self.0.role
    }

    pub fn is_controller(&self) -> bool {
        self.0.role == UserRole::Controller
    }
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let auth_header = parts
            .headers
            .get(header::AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .ok_or_else(|| AppError::unauthorized("Missing authorization header"))?;

        let token = auth_header
            .strip_prefix("Bearer ")
            .ok_or_else(|| AppError::unauthorized("Invalid authorization header format"))?;

        let claims = verify_token(token, &state.jwt_config)?;

        Ok(AuthUser(claims))
    }
}
