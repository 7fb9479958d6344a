use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use tracing::instrument;

use crate::middleware::auth::AuthUser;
use crate::middleware::role::RequireController;
use crate::modules::auth::controller::ErrorResponse;
use crate::modules::semesters::model::{CreateSemesterDto, Semester, UpdateSemesterDto};
use crate::modules::semesters::service::SemesterService;
use crate::state::AppState;
use crate::utils::errors::AppError;
use crate::validator::ValidatedJson;

/// Create a semester
#[utoipa::path(
    post,
    path = "/api/semesters",
    request_body = CreateSemesterDto,
    responses(
        (status = 201, description = "Semester created", body = Semester),
        (status = 400, description = "Bad request", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Semesters"
)]
#[instrument(skip(state, dto))]
pub async fn create_semester(
    _controller: RequireController,
    State(state): State<AppState>,
    ValidatedJson(dto): ValidatedJson<CreateSemesterDto>,
) -> Result<(StatusCode, Json<Semester>), AppError> {
    let semester = SemesterService::create_semester(&state.db, dto).await?;
    Ok((StatusCode::CREATED, Json(semester)))
}

/// List all semesters
#[utoipa::path(
    get,
    path = "/api/semesters",
    responses((status = 200, description = "List of semesters", body = Vec<Semester>)),
    security(("bearer_auth" = [])),
    tag = "Semesters"
)]
#[instrument(skip(state))]
pub async fn get_semesters(
    _auth_user: AuthUser,
    State(state): State<AppState>,
) -> Result<Json<Vec<Semester>>, AppError> {
    let semesters = SemesterService::get_semesters(&state.db).await?;
    Ok(Json(semesters))
}

/// Get the currently active semester
#[utoipa::path(
    get,
    path = "/api/semesters/active",
    responses(
        (status = 200, description = "Active semester", body = Semester),
        (status = 404, description = "No active semester", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Semesters"
)]
#[instrument(skip(state))]
pub async fn get_active_semester(
    _auth_user: AuthUser,
    State(state): State<AppState>,
) -> Result<Json<Semester>, AppError> {
    let semester = SemesterService::get_active_semester(&state.db)
        .await?
        .ok_or_else(|| AppError::not_found(anyhow::anyhow!("No active semester")))?;
    Ok(Json(semester))
}

/// Get a semester by ID
#[utoipa::path(
    get,
    path = "/api/semesters/{id}",
    params(("id" = i32, Path, description = "Semester ID")),
    responses(
        (status = 200, description = "Semester found", body = Semester),
        (status = 404, description = "Semester not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Semesters"
)]
#[instrument(skip(state))]
pub async fn get_semester(
    _auth_user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<Semester>, AppError> {
    let semester = SemesterService::get_semester(&state.db, id)
        .await?
        .ok_or_else(|| AppError::not_found(anyhow::anyhow!("Semester not found")))?;
    Ok(Json(semester))
}

/// Update a semester
#[utoipa::path(
    put,
    path = "/api/semesters/{id}",
    params(("id" = i32, Path, description = "Semester ID")),
    request_body = UpdateSemesterDto,
    responses(
        (status = 200, description = "Updated semester", body = Semester),
        (status = 404, description = "Semester not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Semesters"
)]
#[instrument(skip(state, dto))]
pub async fn update_semester(
    _controller: RequireController,
    State(state): State<AppState>,
    Path(id): Path<i32>,
    ValidatedJson(dto): ValidatedJson<UpdateSemesterDto>,
) -> Result<Json<Semester>, AppError> {
    let semester = SemesterService::update_semester(&state.db, id, dto)
        .await?
        .ok_or_else(|| AppError::not_found(anyhow::anyhow!("Semester not found")))?;
    Ok(Json(semester))
}

/// Delete a semester and its dependent records
#[utoipa::path(
    delete,
    path = "/api/semesters/{id}",
    params(("id" = i32, Path, description = "Semester ID")),
    responses(
        (status = 204, description = "Semester deleted"),
        (status = 404, description = "Semester not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Semesters"
)]
#[instrument(skip(state))]
pub async fn delete_semester(
    _controller: RequireController,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<StatusCode, AppError> {
    SemesterService::delete_semester(&state.db, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Activate a semester, deactivating the previously active one
#[utoipa::path(
    post,
    path = "/api/semesters/{id}/activate",
    params(("id" = i32, Path, description = "Semester ID")),
    responses(
        (status = 200, description = "Activated semester", body = Semester),
        (status = 404, description = "Semester not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Semesters"
)]
#[instrument(skip(state))]
pub async fn activate_semester(
    _controller: RequireController,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<Semester>, AppError> {
    let semester = SemesterService::activate_semester(&state.db, id).await?;
    Ok(Json(semester))
}
