use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use tracing::instrument;

use crate::modules::auth::controller::ErrorResponse;
use crate::modules::teachers::model::Teacher;
use crate::modules::teaching_groups::model::{
    CreateTeachingGroupDto, TeachingGroup, UpdateTeachingGroupDto,
};
use crate::modules::teaching_groups::service::TeachingGroupService;
use crate::state::AppState;
use crate::utils::errors::AppError;
use crate::validator::ValidatedJson;

// Routes are controller-only via the router layer, so no per-handler
// role extractors here.

/// Create a teaching group
#[utoipa::path(
    post,
    path = "/api/teaching-groups",
    request_body = CreateTeachingGroupDto,
    responses(
        (status = 201, description = "Group created", body = TeachingGroup),
        (status = 400, description = "Bad request", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Teaching groups"
)]
#[instrument(skip(state, dto))]
pub async fn create_group(
    State(state): State<AppState>,
    ValidatedJson(dto): ValidatedJson<CreateTeachingGroupDto>,
) -> Result<(StatusCode, Json<TeachingGroup>), AppError> {
    let group = TeachingGroupService::create_group(&state.db, dto).await?;
    Ok((StatusCode::CREATED, Json(group)))
}

/// List all teaching groups
#[utoipa::path(
    get,
    path = "/api/teaching-groups",
    responses((status = 200, description = "List of groups", body = Vec<TeachingGroup>)),
    security(("bearer_auth" = [])),
    tag = "Teaching groups"
)]
#[instrument(skip(state))]
pub async fn get_groups(
    State(state): State<AppState>,
) -> Result<Json<Vec<TeachingGroup>>, AppError> {
    let groups = TeachingGroupService::get_groups(&state.db).await?;
    Ok(Json(groups))
}

/// Get a teaching group by ID
#[utoipa::path(
    get,
    path = "/api/teaching-groups/{id}",
    params(("id" = i32, Path, description = "Group ID")),
    responses(
        (status = 200, description = "Group found", body = TeachingGroup),
        (status = 404, description = "Group not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Teaching groups"
)]
#[instrument(skip(state))]
pub async fn get_group(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<TeachingGroup>, AppError> {
    let group = TeachingGroupService::get_group(&state.db, id)
        .await?
        .ok_or_else(|| AppError::not_found(anyhow::anyhow!("Teaching group not found")))?;
    Ok(Json(group))
}

/// List teachers assigned to a group
#[utoipa::path(
    get,
    path = "/api/teaching-groups/{id}/members",
    params(("id" = i32, Path, description = "Group ID")),
    responses(
        (status = 200, description = "Group members", body = Vec<Teacher>),
        (status = 404, description = "Group not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Teaching groups"
)]
#[instrument(skip(state))]
pub async fn get_group_members(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<Vec<Teacher>>, AppError> {
    let members = TeachingGroupService::get_members(&state.db, id).await?;
    Ok(Json(members))
}

/// Update a teaching group
#[utoipa::path(
    put,
    path = "/api/teaching-groups/{id}",
    params(("id" = i32, Path, description = "Group ID")),
    request_body = UpdateTeachingGroupDto,
    responses(
        (status = 200, description = "Updated group", body = TeachingGroup),
        (status = 404, description = "Group not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Teaching groups"
)]
#[instrument(skip(state, dto))]
pub async fn update_group(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    ValidatedJson(dto): ValidatedJson<UpdateTeachingGroupDto>,
) -> Result<Json<TeachingGroup>, AppError> {
    let group = TeachingGroupService::update_group(&state.db, id, dto)
        .await?
        .ok_or_else(|| AppError::not_found(anyhow::anyhow!("Teaching group not found")))?;
    Ok(Json(group))
}

/// Delete a teaching group
#[utoipa::path(
    delete,
    path = "/api/teaching-groups/{id}",
    params(("id" = i32, Path, description = "Group ID")),
    responses(
        (status = 204, description = "Group deleted"),
        (status = 404, description = "Group not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Teaching groups"
)]
#[instrument(skip(state))]
pub async fn delete_group(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<StatusCode, AppError> {
    TeachingGroupService::delete_group(&state.db, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
