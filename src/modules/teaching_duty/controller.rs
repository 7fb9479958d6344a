use axum::{
    Json,
    extract::{Path, Query, State},
};
use tracing::instrument;

use crate::middleware::role::{RequireController, RequireTeacher};
use crate::modules::auth::controller::ErrorResponse;
use crate::modules::teachers::service::TeacherService;
use crate::modules::teaching_duty::model::{
    BalanceQueryParams, GroupBalance, TeacherBalanceReport, TeacherOverviewRow,
};
use crate::modules::teaching_duty::service::TeachingDutyService;
use crate::state::AppState;
use crate::utils::errors::AppError;

/// Get the caller's own teaching balance ("Lehrsaldo")
#[utoipa::path(
    get,
    path = "/api/teaching-duty/balance",
    params(("semester_id" = Option<i32>, Query, description = "Restrict to one semester")),
    responses(
        (status = 200, description = "Balance report", body = TeacherBalanceReport),
        (status = 403, description = "Forbidden", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Teaching duty"
)]
#[instrument(skip(state))]
pub async fn get_own_balance(
    RequireTeacher(auth_user): RequireTeacher,
    State(state): State<AppState>,
    Query(params): Query<BalanceQueryParams>,
) -> Result<Json<TeacherBalanceReport>, AppError> {
    let teacher = TeacherService::get_teacher_by_user_id(&state.db, auth_user.user_id()?)
        .await?
        .ok_or_else(|| AppError::forbidden("No teacher record for this account"))?;

    let report = TeachingDutyService::teacher_report(&state.db, teacher.id, params.semester_id)
        .await?
        .ok_or_else(|| AppError::not_found(anyhow::anyhow!("Teacher not found")))?;

    Ok(Json(report))
}

/// Get any teacher's balance report
#[utoipa::path(
    get,
    path = "/api/teaching-duty/teachers/{id}",
    params(
        ("id" = i32, Path, description = "Teacher ID"),
        ("semester_id" = Option<i32>, Query, description = "Restrict to one semester")
    ),
    responses(
        (status = 200, description = "Balance report", body = TeacherBalanceReport),
        (status = 404, description = "Teacher not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Teaching duty"
)]
#[instrument(skip(state))]
pub async fn get_teacher_balance(
    RequireController(_auth_user): RequireController,
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Query(params): Query<BalanceQueryParams>,
) -> Result<Json<TeacherBalanceReport>, AppError> {
    let report = TeachingDutyService::teacher_report(&state.db, id, params.semester_id)
        .await?
        .ok_or_else(|| AppError::not_found(anyhow::anyhow!("Teacher not found")))?;

    Ok(Json(report))
}

/// All teachers' balances, for the controlling overview
#[utoipa::path(
    get,
    path = "/api/teaching-duty/overview",
    params(("semester_id" = Option<i32>, Query, description = "Restrict to one semester")),
    responses((status = 200, description = "Balances per teacher", body = [TeacherOverviewRow])),
    security(("bearer_auth" = [])),
    tag = "Teaching duty"
)]
#[instrument(skip(state))]
pub async fn get_overview(
    RequireController(_auth_user): RequireController,
    State(state): State<AppState>,
    Query(params): Query<BalanceQueryParams>,
) -> Result<Json<Vec<TeacherOverviewRow>>, AppError> {
    let rows = TeachingDutyService::overview(&state.db, params.semester_id).await?;
    Ok(Json(rows))
}

/// Balances aggregated per teaching group
#[utoipa::path(
    get,
    path = "/api/teaching-duty/groups",
    params(("semester_id" = Option<i32>, Query, description = "Restrict to one semester")),
    responses((status = 200, description = "Balances per group", body = [GroupBalance])),
    security(("bearer_auth" = [])),
    tag = "Teaching duty"
)]
#[instrument(skip(state))]
pub async fn get_group_overview(
    RequireController(_auth_user): RequireController,
    State(state): State<AppState>,
    Query(params): Query<BalanceQueryParams>,
) -> Result<Json<Vec<GroupBalance>>, AppError> {
    let groups = TeachingDutyService::group_overview(&state.db, params.semester_id).await?;
    Ok(Json(groups))
}
