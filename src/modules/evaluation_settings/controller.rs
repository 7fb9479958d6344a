use axum::{
    Json,
    extract::{Query, State},
};
use tracing::instrument;

use crate::middleware::auth::AuthUser;
use crate::middleware::role::RequireController;
use crate::modules::auth::controller::ErrorResponse;
use crate::modules::evaluation_settings::model::{
    EffectiveSettings, EvaluationSettings, SettingsQueryParams, UpsertEvaluationSettingsDto,
};
use crate::modules::evaluation_settings::service::EvaluationSettingsService;
use crate::state::AppState;
use crate::utils::errors::AppError;
use crate::validator::ValidatedJson;

/// Get the caps in effect, optionally for a specific semester
#[utoipa::path(
    get,
    path = "/api/evaluation-settings",
    params(("semester_id" = Option<i32>, Query, description = "Semester to resolve caps for")),
    responses((status = 200, description = "Effective caps", body = EffectiveSettings)),
    security(("bearer_auth" = [])),
    tag = "Evaluation settings"
)]
#[instrument(skip(state))]
pub async fn get_settings(
    _auth_user: AuthUser,
    State(state): State<AppState>,
    Query(params): Query<SettingsQueryParams>,
) -> Result<Json<EffectiveSettings>, AppError> {
    let settings =
        EvaluationSettingsService::get_effective_settings(&state.db, params.semester_id).await?;
    Ok(Json(settings))
}

/// Create or replace the caps for a semester (or the global defaults)
#[utoipa::path(
    put,
    path = "/api/evaluation-settings",
    request_body = UpsertEvaluationSettingsDto,
    responses(
        (status = 200, description = "Stored settings", body = EvaluationSettings),
        (status = 400, description = "Bad request", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Evaluation settings"
)]
#[instrument(skip(state, dto))]
pub async fn upsert_settings(
    RequireController(_claims): RequireController,
    State(state): State<AppState>,
    ValidatedJson(dto): ValidatedJson<UpsertEvaluationSettingsDto>,
) -> Result<Json<EvaluationSettings>, AppError> {
    let settings = EvaluationSettingsService::upsert_settings(&state.db, dto).await?;
    Ok(Json(settings))
}
