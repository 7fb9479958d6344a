//! Role-based authorization for the two application roles.
//!
//! Controllers administer semester data and user accounts; teachers only
//! see their own records. Two mechanisms are provided, matching how routes
//! are organized:
//!
//! 1. Layer middleware (`require_controller`) for subtrees that are
//!    controller-only as a whole.
//! 2. The `RequireController` extractor for individual handlers inside
//!    mixed-access routers.

use axum::{
    extract::{FromRequestParts, Request, State},
    http::request::Parts,
    middleware::Next,
    response::{IntoResponse, Response},
};

use crate::middleware::auth::AuthUser;
use crate::modules::users::model::UserRole;
use crate::state::AppState;
use crate::utils::errors::AppError;

pub async fn require_roles(
    State(state): State<AppState>,
    req: Request,
    next: Next,
    allowed_roles: Vec<UserRole>,
) -> Result<Response, AppError> {
    let (mut parts, body) = req.into_parts();

    let auth_user = AuthUser::from_request_parts(&mut parts, &state).await?;

    if !allowed_roles.contains(&auth_user.role()) {
        return Err(AppError::forbidden(format!(
            "Access denied. Required roles: {:?}, but user has role: {:?}",
            allowed_roles,
            auth_user.role()
        )));
    }

    let req = Request::from_parts(parts, body);
    Ok(next.run(req).await)
}

/// Layer middleware for controller-only subtrees.
pub async fn require_controller(
    State(state): State<AppState>,
    req: Request,
    next: Next,
) -> Response {
    match require_roles(State(state), req, next, vec![UserRole::Controller]).await {
        Ok(response) => response,
        Err(err) => err.into_response(),
    }
}

/// Extractor for controller-only handlers inside mixed-access routers.
#[derive(Debug, Clone)]
pub struct RequireController(pub AuthUser);

impl FromRequestParts<AppState> for RequireController {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let auth_user = AuthUser::from_request_parts(parts, state).await?;

        if !auth_user.is_controller() {
            return Err(AppError::forbidden(
                "Access denied. Controller privileges required.",
            ));
        }

        Ok(RequireController(auth_user))
    }
}

/// Extractor for handlers that only make sense for teacher accounts,
/// e.g. the personal balance view.
#[derive(Debug, Clone)]
pub struct RequireTeacher(pub AuthUser);

impl FromRequestParts<AppState> for RequireTeacher {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let auth_user = AuthUser::from_request_parts(parts, state).await?;

        if auth_user.role() != UserRole::Teacher {
            return Err(AppError::forbidden(
                "Access denied. Teacher account required.",
            ));
        }

        Ok(RequireTeacher(auth_user))
    }
}
