use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use tracing::instrument;

use crate::middleware::auth::AuthUser;
use crate::middleware::role::RequireController;
use crate::modules::auth::controller::ErrorResponse;
use crate::modules::supervision::model::{
    CreateSupervisionDto, CreateSupervisionTypeDto, Supervision, SupervisionFilterParams,
    SupervisionType, UpdateSupervisionDto, UpdateSupervisionTypeDto,
};
use crate::modules::supervision::service::{SupervisionService, SupervisionTypeService};
use crate::modules::teachers::service::TeacherService;
use crate::state::AppState;
use crate::utils::errors::AppError;
use crate::validator::ValidatedJson;

/// Create a supervision type
#[utoipa::path(
    post,
    path = "/api/supervision-types",
    request_body = CreateSupervisionTypeDto,
    responses(
        (status = 201, description = "Type created", body = SupervisionType),
        (status = 400, description = "Bad request", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Supervision"
)]
#[instrument(skip(state, dto))]
pub async fn create_supervision_type(
    RequireController(_claims): RequireController,
    State(state): State<AppState>,
    ValidatedJson(dto): ValidatedJson<CreateSupervisionTypeDto>,
) -> Result<(StatusCode, Json<SupervisionType>), AppError> {
    let supervision_type = SupervisionTypeService::create_type(&state.db, dto).await?;
    Ok((StatusCode::CREATED, Json(supervision_type)))
}

/// List all supervision types
#[utoipa::path(
    get,
    path = "/api/supervision-types",
    responses((status = 200, description = "All types", body = [SupervisionType])),
    security(("bearer_auth" = [])),
    tag = "Supervision"
)]
#[instrument(skip(state))]
pub async fn get_supervision_types(
    _auth_user: AuthUser,
    State(state): State<AppState>,
) -> Result<Json<Vec<SupervisionType>>, AppError> {
    let types = SupervisionTypeService::get_types(&state.db).await?;
    Ok(Json(types))
}

/// Update a supervision type
#[utoipa::path(
    put,
    path = "/api/supervision-types/{id}",
    params(("id" = i32, Path, description = "Type ID")),
    request_body = UpdateSupervisionTypeDto,
    responses(
        (status = 200, description = "Updated type", body = SupervisionType),
        (status = 404, description = "Type not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Supervision"
)]
#[instrument(skip(state, dto))]
pub async fn update_supervision_type(
    RequireController(_claims): RequireController,
    State(state): State<AppState>,
    Path(id): Path<i32>,
    ValidatedJson(dto): ValidatedJson<UpdateSupervisionTypeDto>,
) -> Result<Json<SupervisionType>, AppError> {
    let supervision_type = SupervisionTypeService::update_type(&state.db, id, dto)
        .await?
        .ok_or_else(|| AppError::not_found(anyhow::anyhow!("Supervision type not found")))?;
    Ok(Json(supervision_type))
}

/// Delete a supervision type; refused while supervisions still reference it
#[utoipa::path(
    delete,
    path = "/api/supervision-types/{id}",
    params(("id" = i32, Path, description = "Type ID")),
    responses(
        (status = 204, description = "Type deleted"),
        (status = 400, description = "Type still in use", body = ErrorResponse),
        (status = 404, description = "Type not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Supervision"
)]
#[instrument(skip(state))]
pub async fn delete_supervision_type(
    RequireController(_claims): RequireController,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<StatusCode, AppError> {
    SupervisionTypeService::delete_type(&state.db, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Record a supervision for a teacher in a semester
#[utoipa::path(
    post,
    path = "/api/supervisions",
    request_body = CreateSupervisionDto,
    responses(
        (status = 201, description = "Supervision created", body = Supervision),
        (status = 400, description = "Bad request", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Supervision"
)]
#[instrument(skip(state, dto))]
pub async fn create_supervision(
    RequireController(_claims): RequireController,
    State(state): State<AppState>,
    ValidatedJson(dto): ValidatedJson<CreateSupervisionDto>,
) -> Result<(StatusCode, Json<Supervision>), AppError> {
    let supervision = SupervisionService::create_supervision(&state.db, dto).await?;
    Ok((StatusCode::CREATED, Json(supervision)))
}

/// List supervisions; teachers only ever see their own
#[utoipa::path(
    get,
    path = "/api/supervisions",
    params(
        ("teacher_id" = Option<i32>, Query, description = "Filter by teacher"),
        ("semester_id" = Option<i32>, Query, description = "Filter by semester")
    ),
    responses((status = 200, description = "Supervisions", body = [Supervision])),
    security(("bearer_auth" = [])),
    tag = "Supervision"
)]
#[instrument(skip(state))]
pub async fn get_supervisions(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Query(mut filters): Query<SupervisionFilterParams>,
) -> Result<Json<Vec<Supervision>>, AppError> {
    if !auth_user.is_controller() {
        let own = TeacherService::get_teacher_by_user_id(&state.db, auth_user.user_id()?)
            .await?
            .ok_or_else(|| AppError::forbidden("No teacher record for this account"))?;
        filters.teacher_id = Some(own.id);
    }

    let supervisions = SupervisionService::get_supervisions(&state.db, filters).await?;
    Ok(Json(supervisions))
}

/// Get a supervision by ID
#[utoipa::path(
    get,
    path = "/api/supervisions/{id}",
    params(("id" = i32, Path, description = "Supervision ID")),
    responses(
        (status = 200, description = "Supervision found", body = Supervision),
        (status = 404, description = "Supervision not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Supervision"
)]
#[instrument(skip(state))]
pub async fn get_supervision(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<Supervision>, AppError> {
    let supervision = SupervisionService::get_supervision(&state.db, id)
        .await?
        .ok_or_else(|| AppError::not_found(anyhow::anyhow!("Supervision not found")))?;

    if !auth_user.is_controller() {
        let own = TeacherService::get_teacher_by_user_id(&state.db, auth_user.user_id()?)
            .await?
            .ok_or_else(|| AppError::forbidden("No teacher record for this account"))?;
        if own.id != supervision.teacher_id {
            return Err(AppError::forbidden(
                "Teachers can only view their own supervisions",
            ));
        }
    }

    Ok(Json(supervision))
}

/// Update a supervision
#[utoipa::path(
    put,
    path = "/api/supervisions/{id}",
    params(("id" = i32, Path, description = "Supervision ID")),
    request_body = UpdateSupervisionDto,
    responses(
        (status = 200, description = "Updated supervision", body = Supervision),
        (status = 404, description = "Supervision not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Supervision"
)]
#[instrument(skip(state, dto))]
pub async fn update_supervision(
    RequireController(_claims): RequireController,
    State(state): State<AppState>,
    Path(id): Path<i32>,
    ValidatedJson(dto): ValidatedJson<UpdateSupervisionDto>,
) -> Result<Json<Supervision>, AppError> {
    let supervision = SupervisionService::update_supervision(&state.db, id, dto)
        .await?
        .ok_or_else(|| AppError::not_found(anyhow::anyhow!("Supervision not found")))?;
    Ok(Json(supervision))
}

/// Delete a supervision
#[utoipa::path(
    delete,
    path = "/api/supervisions/{id}",
    params(("id" = i32, Path, description = "Supervision ID")),
    responses(
        (status = 204, description = "Supervision deleted"),
        (status = 404, description = "Supervision not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Supervision"
)]
#[instrument(skip(state))]
pub async fn delete_supervision(
    RequireController(_claims): RequireController,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<StatusCode, AppError> {
    SupervisionService::delete_supervision(&state.db, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
