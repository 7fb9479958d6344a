use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

/// Catalog entry for a reason a teacher's duty can be reduced.
#[derive(Serialize, Deserialize, FromRow, Debug, Clone, PartialEq, ToSchema)]
pub struct DiscountType {
    pub id: i32,
    pub name: String,
    pub description: Option<String>,
}

#[derive(Deserialize, Debug, Clone, Validate, ToSchema)]
pub struct CreateDiscountTypeDto {
    #[validate(length(min = 1, message = "name must not be empty"))]
    pub name: String,
    pub description: Option<String>,
}

#[derive(Deserialize, Debug, Clone, Validate, ToSchema)]
pub struct UpdateDiscountTypeDto {
    #[validate(length(min = 1, message = "name must not be empty"))]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "crate::utils::serde::double_option")]
    pub description: Option<Option<String>>,
}

/// A duty reduction for a teacher in a semester. Only approved discounts
/// count toward the teaching balance.
#[derive(Serialize, Deserialize, FromRow, Debug, Clone, PartialEq, ToSchema)]
pub struct Discount {
    pub id: i32,
    pub teacher_id: i32,
    pub semester_id: i32,
    pub discount_type_id: i32,
    pub type_name: String,
    pub description: Option<String>,
    pub hours: f64,
    pub approved: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Deserialize, Debug, Clone, Validate, ToSchema)]
pub struct CreateDiscountDto {
    pub teacher_id: i32,
    pub semester_id: i32,
    pub discount_type_id: i32,
    pub description: Option<String>,
    #[validate(range(min = 0.0, message = "hours must not be negative"))]
    pub hours: f64,
    #[serde(default)]
    pub approved: bool,
}

#[derive(Deserialize, Debug, Clone, Validate, ToSchema)]
pub struct UpdateDiscountDto {
    pub discount_type_id: Option<i32>,
    /// Set to null to clear the description.
    #[serde(default, deserialize_with = "crate::utils::serde::double_option")]
    pub description: Option<Option<String>>,
    #[validate(range(min = 0.0, message = "hours must not be negative"))]
    pub hours: Option<f64>,
    pub approved: Option<bool>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct DiscountFilterParams {
    pub teacher_id: Option<i32>,
    pub semester_id: Option<i32>,
    pub approved: Option<bool>,
}
