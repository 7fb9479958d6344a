use axum::{
    Json,
    extract::{Path, State},
};
use tracing::instrument;

use crate::middleware::role::RequireController;
use crate::modules::auth::controller::ErrorResponse;
use crate::modules::teachers::model::{Teacher, TeacherWithInfo, UpdateTeacherDto};
use crate::modules::teachers::service::TeacherService;
use crate::state::AppState;
use crate::utils::errors::AppError;
use crate::validator::ValidatedJson;

/// List all teachers with account and group info
#[utoipa::path(
    get,
    path = "/api/teachers",
    responses((status = 200, description = "List of teachers", body = Vec<TeacherWithInfo>)),
    security(("bearer_auth" = [])),
    tag = "Teachers"
)]
#[instrument(skip(state))]
pub async fn get_teachers(
    _controller: RequireController,
    State(state): State<AppState>,
) -> Result<Json<Vec<TeacherWithInfo>>, AppError> {
    let teachers = TeacherService::get_teachers(&state.db).await?;
    Ok(Json(teachers))
}

/// Get a teacher by ID
#[utoipa::path(
    get,
    path = "/api/teachers/{id}",
    params(("id" = i32, Path, description = "Teacher ID")),
    responses(
        (status = 200, description = "Teacher found", body = TeacherWithInfo),
        (status = 404, description = "Teacher not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Teachers"
)]
#[instrument(skip(state))]
pub async fn get_teacher(
    _controller: RequireController,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<TeacherWithInfo>, AppError> {
    let teacher = TeacherService::get_teacher(&state.db, id)
        .await?
        .ok_or_else(|| AppError::not_found(anyhow::anyhow!("Teacher not found")))?;
    Ok(Json(teacher))
}

/// Update a teacher's duty target, retirement date or group
#[utoipa::path(
    put,
    path = "/api/teachers/{id}",
    params(("id" = i32, Path, description = "Teacher ID")),
    request_body = UpdateTeacherDto,
    responses(
        (status = 200, description = "Updated teacher", body = Teacher),
        (status = 404, description = "Teacher not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Teachers"
)]
#[instrument(skip(state, dto))]
pub async fn update_teacher(
    _controller: RequireController,
    State(state): State<AppState>,
    Path(id): Path<i32>,
    ValidatedJson(dto): ValidatedJson<UpdateTeacherDto>,
) -> Result<Json<Teacher>, AppError> {
    let teacher = TeacherService::update_teacher(&state.db, id, dto)
        .await?
        .ok_or_else(|| AppError::not_found(anyhow::anyhow!("Teacher not found")))?;
    Ok(Json(teacher))
}
