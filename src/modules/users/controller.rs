use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use tracing::instrument;

use crate::middleware::auth::AuthUser;
use crate::middleware::role::RequireController;
use crate::modules::auth::controller::ErrorResponse;
use crate::modules::users::model::{CreateUserDto, UpdateUserDto, User, UserWithRelations};
use crate::modules::users::service::UserService;
use crate::state::AppState;
use crate::utils::errors::AppError;
use crate::validator::ValidatedJson;

/// Create a new user account with its role sub-record
#[utoipa::path(
    post,
    path = "/api/users",
    request_body = CreateUserDto,
    responses(
        (status = 201, description = "User created", body = UserWithRelations),
        (status = 400, description = "Bad request - validation error or username taken", body = ErrorResponse),
        (status = 403, description = "Forbidden - controller role required", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Users"
)]
#[instrument(skip(state, dto))]
pub async fn create_user(
    _controller: RequireController,
    State(state): State<AppState>,
    ValidatedJson(dto): ValidatedJson<CreateUserDto>,
) -> Result<(StatusCode, Json<UserWithRelations>), AppError> {
    let user = UserService::create_user(&state.db, dto).await?;
    Ok((StatusCode::CREATED, Json(user)))
}

/// List all user accounts
#[utoipa::path(
    get,
    path = "/api/users",
    responses(
        (status = 200, description = "List of users", body = Vec<User>),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Forbidden - controller role required", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Users"
)]
#[instrument(skip(state))]
pub async fn get_users(
    _controller: RequireController,
    State(state): State<AppState>,
) -> Result<Json<Vec<User>>, AppError> {
    let users = UserService::get_users(&state.db).await?;
    Ok(Json(users))
}

/// Get the authenticated user's own record with its relation
#[utoipa::path(
    get,
    path = "/api/users/profile",
    responses(
        (status = 200, description = "Own user record", body = UserWithRelations),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Users"
)]
#[instrument(skip(state))]
pub async fn get_profile(
    auth_user: AuthUser,
    State(state): State<AppState>,
) -> Result<Json<UserWithRelations>, AppError> {
    let user_id = auth_user.user_id()?;
    let user = UserService::get_user(&state.db, user_id)
        .await?
        .ok_or_else(|| AppError::not_found(anyhow::anyhow!("User not found")))?;
    Ok(Json(user))
}

/// Find a user by username
#[utoipa::path(
    get,
    path = "/api/users/by-username/{username}",
    params(("username" = String, Path, description = "Username to look up")),
    responses(
        (status = 200, description = "User found", body = User),
        (status = 404, description = "User not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Users"
)]
#[instrument(skip(state))]
pub async fn get_user_by_username(
    _controller: RequireController,
    State(state): State<AppState>,
    Path(username): Path<String>,
) -> Result<Json<User>, AppError> {
    let user = UserService::get_user_by_username(&state.db, &username)
        .await?
        .ok_or_else(|| AppError::not_found(anyhow::anyhow!("User not found")))?;
    Ok(Json(user))
}

/// Find a user by ID, including the role-matching relation
#[utoipa::path(
    get,
    path = "/api/users/{id}",
    params(("id" = i32, Path, description = "User ID")),
    responses(
        (status = 200, description = "User found", body = UserWithRelations),
        (status = 404, description = "User not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Users"
)]
#[instrument(skip(state))]
pub async fn get_user(
    _controller: RequireController,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<UserWithRelations>, AppError> {
    let user = UserService::get_user(&state.db, id)
        .await?
        .ok_or_else(|| AppError::not_found(anyhow::anyhow!("User not found")))?;
    Ok(Json(user))
}

/// Update a user account
#[utoipa::path(
    put,
    path = "/api/users/{id}",
    params(("id" = i32, Path, description = "User ID")),
    request_body = UpdateUserDto,
    responses(
        (status = 200, description = "Updated user", body = User),
        (status = 404, description = "User not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Users"
)]
#[instrument(skip(state, dto))]
pub async fn update_user(
    _controller: RequireController,
    State(state): State<AppState>,
    Path(id): Path<i32>,
    ValidatedJson(dto): ValidatedJson<UpdateUserDto>,
) -> Result<Json<User>, AppError> {
    let user = UserService::update_user(&state.db, id, dto)
        .await?
        .ok_or_else(|| AppError::not_found(anyhow::anyhow!("User not found")))?;
    Ok(Json(user))
}
