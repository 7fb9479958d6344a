use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

/// Catalog entry for a kind of student supervision (thesis, doctorate).
/// The calculation factor weights the recorded hours in the balance.
#[derive(Serialize, Deserialize, FromRow, Debug, Clone, PartialEq, ToSchema)]
pub struct SupervisionType {
    pub id: i32,
    pub name: String,
    pub calculation_factor: f64,
}

#[derive(Deserialize, Debug, Clone, Validate, ToSchema)]
pub struct CreateSupervisionTypeDto {
    #[validate(length(min = 1, message = "name must not be empty"))]
    pub name: String,
    #[validate(range(min = 0.0, message = "calculation_factor must not be negative"))]
    pub calculation_factor: f64,
}

#[derive(Deserialize, Debug, Clone, Validate, ToSchema)]
pub struct UpdateSupervisionTypeDto {
    #[validate(length(min = 1, message = "name must not be empty"))]
    pub name: Option<String>,
    #[validate(range(min = 0.0, message = "calculation_factor must not be negative"))]
    pub calculation_factor: Option<f64>,
}

/// A supervision entry joined with its type, including the weighted hours
/// that feed into the teaching balance.
#[derive(Serialize, Deserialize, FromRow, Debug, Clone, PartialEq, ToSchema)]
pub struct Supervision {
    pub id: i32,
    pub teacher_id: i32,
    pub semester_id: i32,
    pub supervision_type_id: i32,
    pub type_name: String,
    pub calculation_factor: f64,
    pub description: Option<String>,
    pub hours: f64,
    pub weighted_hours: f64,
    pub created_at: DateTime<Utc>,
}

#[derive(Deserialize, Debug, Clone, Validate, ToSchema)]
pub struct CreateSupervisionDto {
    pub teacher_id: i32,
    pub semester_id: i32,
    pub supervision_type_id: i32,
    pub description: Option<String>,
    #[validate(range(min = 0.0, message = "hours must not be negative"))]
    pub hours: f64,
}

#[derive(Deserialize, Debug, Clone, Validate, ToSchema)]
pub struct UpdateSupervisionDto {
    pub supervision_type_id: Option<i32>,
    /// Set to null to clear the description.
    #[serde(default, deserialize_with = "crate::utils::serde::double_option")]
    pub description: Option<Option<String>>,
    #[validate(range(min = 0.0, message = "hours must not be negative"))]
    pub hours: Option<f64>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct SupervisionFilterParams {
    pub teacher_id: Option<i32>,
    pub semester_id: Option<i32>,
}
