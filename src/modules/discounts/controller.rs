use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use tracing::instrument;

use crate::middleware::auth::AuthUser;
use crate::middleware::role::RequireController;
use crate::modules::auth::controller::ErrorResponse;
use crate::modules::discounts::model::{
    CreateDiscountDto, CreateDiscountTypeDto, Discount, DiscountFilterParams, DiscountType,
    UpdateDiscountDto, UpdateDiscountTypeDto,
};
use crate::modules::discounts::service::{DiscountService, DiscountTypeService};
use crate::modules::teachers::service::TeacherService;
use crate::state::AppState;
use crate::utils::errors::AppError;
use crate::validator::ValidatedJson;

/// Create a discount type
#[utoipa::path(
    post,
    path = "/api/discount-types",
    request_body = CreateDiscountTypeDto,
    responses(
        (status = 201, description = "Type created", body = DiscountType),
        (status = 400, description = "Bad request", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Discounts"
)]
#[instrument(skip(state, dto))]
pub async fn create_discount_type(
    RequireController(_claims): RequireController,
    State(state): State<AppState>,
    ValidatedJson(dto): ValidatedJson<CreateDiscountTypeDto>,
) -> Result<(StatusCode, Json<DiscountType>), AppError> {
    let discount_type = DiscountTypeService::create_type(&state.db, dto).await?;
    Ok((StatusCode::CREATED, Json(discount_type)))
}

/// List all discount types
#[utoipa::path(
    get,
    path = "/api/discount-types",
    responses((status = 200, description = "All types", body = [DiscountType])),
    security(("bearer_auth" = [])),
    tag = "Discounts"
)]
#[instrument(skip(state))]
pub async fn get_discount_types(
    _auth_user: AuthUser,
    State(state): State<AppState>,
) -> Result<Json<Vec<DiscountType>>, AppError> {
    let types = DiscountTypeService::get_types(&state.db).await?;
    Ok(Json(types))
}

/// Update a discount type
#[utoipa::path(
    put,
    path = "/api/discount-types/{id}",
    params(("id" = i32, Path, description = "Type ID")),
    request_body = UpdateDiscountTypeDto,
    responses(
        (status = 200, description = "Updated type", body = DiscountType),
        (status = 404, description = "Type not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Discounts"
)]
#[instrument(skip(state, dto))]
pub async fn update_discount_type(
    RequireController(_claims): RequireController,
    State(state): State<AppState>,
    Path(id): Path<i32>,
    ValidatedJson(dto): ValidatedJson<UpdateDiscountTypeDto>,
) -> Result<Json<DiscountType>, AppError> {
    let discount_type = DiscountTypeService::update_type(&state.db, id, dto)
        .await?
        .ok_or_else(|| AppError::not_found(anyhow::anyhow!("Discount type not found")))?;
    Ok(Json(discount_type))
}

/// Delete a discount type; refused while discounts still reference it
#[utoipa::path(
    delete,
    path = "/api/discount-types/{id}",
    params(("id" = i32, Path, description = "Type ID")),
    responses(
        (status = 204, description = "Type deleted"),
        (status = 400, description = "Type still in use", body = ErrorResponse),
        (status = 404, description = "Type not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Discounts"
)]
#[instrument(skip(state))]
pub async fn delete_discount_type(
    RequireController(_claims): RequireController,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<StatusCode, AppError> {
    DiscountTypeService::delete_type(&state.db, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Record a discount for a teacher in a semester
#[utoipa::path(
    post,
    path = "/api/discounts",
    request_body = CreateDiscountDto,
    responses(
        (status = 201, description = "Discount created", body = Discount),
        (status = 400, description = "Bad request", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Discounts"
)]
#[instrument(skip(state, dto))]
pub async fn create_discount(
    RequireController(_claims): RequireController,
    State(state): State<AppState>,
    ValidatedJson(dto): ValidatedJson<CreateDiscountDto>,
) -> Result<(StatusCode, Json<Discount>), AppError> {
    let discount = DiscountService::create_discount(&state.db, dto).await?;
    Ok((StatusCode::CREATED, Json(discount)))
}

/// List discounts; teachers only ever see their own
#[utoipa::path(
    get,
    path = "/api/discounts",
    params(
        ("teacher_id" = Option<i32>, Query, description = "Filter by teacher"),
        ("semester_id" = Option<i32>, Query, description = "Filter by semester"),
        ("approved" = Option<bool>, Query, description = "Filter by approval state")
    ),
    responses((status = 200, description = "Discounts", body = [Discount])),
    security(("bearer_auth" = [])),
    tag = "Discounts"
)]
#[instrument(skip(state))]
pub async fn get_discounts(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Query(mut filters): Query<DiscountFilterParams>,
) -> Result<Json<Vec<Discount>>, AppError> {
    if !auth_user.is_controller() {
        let own = TeacherService::get_teacher_by_user_id(&state.db, auth_user.user_id()?)
            .await?
            .ok_or_else(|| AppError::forbidden("No teacher record for this account"))?;
        filters.teacher_id = Some(own.id);
    }

    let discounts = DiscountService::get_discounts(&state.db, filters).await?;
    Ok(Json(discounts))
}

/// Get a discount by ID
#[utoipa::path(
    get,
    path = "/api/discounts/{id}",
    params(("id" = i32, Path, description = "Discount ID")),
    responses(
        (status = 200, description = "Discount found", body = Discount),
        (status = 404, description = "Discount not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Discounts"
)]
#[instrument(skip(state))]
pub async fn get_discount(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<Discount>, AppError> {
    let discount = DiscountService::get_discount(&state.db, id)
        .await?
        .ok_or_else(|| AppError::not_found(anyhow::anyhow!("Discount not found")))?;

    if !auth_user.is_controller() {
        let own = TeacherService::get_teacher_by_user_id(&state.db, auth_user.user_id()?)
            .await?
            .ok_or_else(|| AppError::forbidden("No teacher record for this account"))?;
        if own.id != discount.teacher_id {
            return Err(AppError::forbidden(
                "Teachers can only view their own discounts",
            ));
        }
    }

    Ok(Json(discount))
}

/// Update a discount, including its approval state
#[utoipa::path(
    put,
    path = "/api/discounts/{id}",
    params(("id" = i32, Path, description = "Discount ID")),
    request_body = UpdateDiscountDto,
    responses(
        (status = 200, description = "Updated discount", body = Discount),
        (status = 404, description = "Discount not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Discounts"
)]
#[instrument(skip(state, dto))]
pub async fn update_discount(
    RequireController(_claims): RequireController,
    State(state): State<AppState>,
    Path(id): Path<i32>,
    ValidatedJson(dto): ValidatedJson<UpdateDiscountDto>,
) -> Result<Json<Discount>, AppError> {
    let discount = DiscountService::update_discount(&state.db, id, dto)
        .await?
        .ok_or_else(|| AppError::not_found(anyhow::anyhow!("Discount not found")))?;
    Ok(Json(discount))
}

/// Delete a discount
#[utoipa::path(
    delete,
    path = "/api/discounts/{id}",
    params(("id" = i32, Path, description = "Discount ID")),
    responses(
        (status = 204, description = "Discount deleted"),
        (status = 404, description = "Discount not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Discounts"
)]
#[instrument(skip(state))]
pub async fn delete_discount(
    RequireController(_claims): RequireController,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<StatusCode, AppError> {
    DiscountService::delete_discount(&state.db, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
