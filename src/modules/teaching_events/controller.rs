use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use tracing::instrument;

use crate::middleware::auth::AuthUser;
use crate::modules::auth::controller::ErrorResponse;
use crate::modules::teachers::service::TeacherService;
use crate::modules::teaching_events::model::{
    CreateTeachingEventDto, PaginatedTeachingEventsResponse, TeachingEvent,
    TeachingEventFilterParams, UpdateTeachingEventDto,
};
use crate::modules::teaching_events::service::TeachingEventService;
use crate::state::AppState;
use crate::utils::errors::AppError;
use crate::validator::ValidatedJson;

/// For teacher-role callers, resolve their own teacher record and reject
/// access to anyone else's data. Controllers pass through unrestricted.
async fn enforce_teacher_scope(
    state: &AppState,
    auth_user: &AuthUser,
    teacher_id: i32,
) -> Result<(), AppError> {
    if auth_user.is_controller() {
        return Ok(());
    }

    let own = TeacherService::get_teacher_by_user_id(&state.db, auth_user.user_id()?)
        .await?
        .ok_or_else(|| AppError::forbidden("No teacher record for this account"))?;

    if own.id != teacher_id {
        return Err(AppError::forbidden(
            "Teachers can only manage their own teaching events",
        ));
    }

    Ok(())
}

/// Create a teaching event; teachers may only report for themselves
#[utoipa::path(
    post,
    path = "/api/teaching-events",
    request_body = CreateTeachingEventDto,
    responses(
        (status = 201, description = "Event created", body = TeachingEvent),
        (status = 400, description = "Bad request", body = ErrorResponse),
        (status = 403, description = "Forbidden", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Teaching events"
)]
#[instrument(skip(state, dto))]
pub async fn create_event(
    auth_user: AuthUser,
    State(state): State<AppState>,
    ValidatedJson(dto): ValidatedJson<CreateTeachingEventDto>,
) -> Result<(StatusCode, Json<TeachingEvent>), AppError> {
    enforce_teacher_scope(&state, &auth_user, dto.teacher_id).await?;
    let event = TeachingEventService::create_event(&state.db, dto).await?;
    Ok((StatusCode::CREATED, Json(event)))
}

/// List teaching events with optional teacher/semester filters
#[utoipa::path(
    get,
    path = "/api/teaching-events",
    params(
        ("teacher_id" = Option<i32>, Query, description = "Filter by teacher"),
        ("semester_id" = Option<i32>, Query, description = "Filter by semester"),
        ("limit" = Option<String>, Query, description = "Page size"),
        ("offset" = Option<String>, Query, description = "Page offset")
    ),
    responses((status = 200, description = "Paginated events", body = PaginatedTeachingEventsResponse)),
    security(("bearer_auth" = [])),
    tag = "Teaching events"
)]
#[instrument(skip(state))]
pub async fn get_events(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Query(mut filters): Query<TeachingEventFilterParams>,
) -> Result<Json<PaginatedTeachingEventsResponse>, AppError> {
    if !auth_user.is_controller() {
        let own = TeacherService::get_teacher_by_user_id(&state.db, auth_user.user_id()?)
            .await?
            .ok_or_else(|| AppError::forbidden("No teacher record for this account"))?;
        filters.teacher_id = Some(own.id);
    }

    let events = TeachingEventService::get_events(&state.db, filters).await?;
    Ok(Json(events))
}

/// Get a teaching event by ID
#[utoipa::path(
    get,
    path = "/api/teaching-events/{id}",
    params(("id" = i32, Path, description = "Event ID")),
    responses(
        (status = 200, description = "Event found", body = TeachingEvent),
        (status = 404, description = "Event not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Teaching events"
)]
#[instrument(skip(state))]
pub async fn get_event(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<TeachingEvent>, AppError> {
    let event = TeachingEventService::get_event(&state.db, id)
        .await?
        .ok_or_else(|| AppError::not_found(anyhow::anyhow!("Teaching event not found")))?;
    enforce_teacher_scope(&state, &auth_user, event.teacher_id).await?;
    Ok(Json(event))
}

/// Update a teaching event
#[utoipa::path(
    put,
    path = "/api/teaching-events/{id}",
    params(("id" = i32, Path, description = "Event ID")),
    request_body = UpdateTeachingEventDto,
    responses(
        (status = 200, description = "Updated event", body = TeachingEvent),
        (status = 404, description = "Event not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Teaching events"
)]
#[instrument(skip(state, dto))]
pub async fn update_event(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<i32>,
    ValidatedJson(dto): ValidatedJson<UpdateTeachingEventDto>,
) -> Result<Json<TeachingEvent>, AppError> {
    let existing = TeachingEventService::get_event(&state.db, id)
        .await?
        .ok_or_else(|| AppError::not_found(anyhow::anyhow!("Teaching event not found")))?;
    enforce_teacher_scope(&state, &auth_user, existing.teacher_id).await?;

    let event = TeachingEventService::update_event(&state.db, id, dto)
        .await?
        .ok_or_else(|| AppError::not_found(anyhow::anyhow!("Teaching event not found")))?;
    Ok(Json(event))
}

/// Delete a teaching event
#[utoipa::path(
    delete,
    path = "/api/teaching-events/{id}",
    params(("id" = i32, Path, description = "Event ID")),
    responses(
        (status = 204, description = "Event deleted"),
        (status = 404, description = "Event not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Teaching events"
)]
#[instrument(skip(state))]
pub async fn delete_event(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<StatusCode, AppError> {
    let existing = TeachingEventService::get_event(&state.db, id)
        .await?
        .ok_or_else(|| AppError::not_found(anyhow::anyhow!("Teaching event not found")))?;
    enforce_teacher_scope(&state, &auth_user, existing.teacher_id).await?;

    TeachingEventService::delete_event(&state.db, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
