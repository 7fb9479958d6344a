use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

/// Caps applied when crediting supervisions and discounts toward the
/// balance. A row with a NULL semester_id holds the global defaults.
#[derive(Serialize, Deserialize, FromRow, Debug, Clone, PartialEq, ToSchema)]
pub struct EvaluationSettings {
    pub id: i32,
    pub semester_id: Option<i32>,
    pub supervision_hours_cap: Option<f64>,
    pub discount_hours_cap: Option<f64>,
}

/// The caps actually in effect for a semester after the
/// semester row, the global row and the built-in defaults are consulted.
#[derive(Serialize, Debug, Clone, PartialEq, ToSchema)]
pub struct EffectiveSettings {
    pub semester_id: Option<i32>,
    pub supervision_hours_cap: Option<f64>,
    pub discount_hours_cap: Option<f64>,
}

#[derive(Deserialize, Debug, Clone, Validate, ToSchema)]
pub struct UpsertEvaluationSettingsDto {
    /// NULL targets the global defaults row.
    pub semester_id: Option<i32>,
    #[validate(range(min = 0.0, message = "supervision_hours_cap must not be negative"))]
    pub supervision_hours_cap: Option<f64>,
    #[validate(range(min = 0.0, message = "discount_hours_cap must not be negative"))]
    pub discount_hours_cap: Option<f64>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct SettingsQueryParams {
    pub semester_id: Option<i32>,
}
