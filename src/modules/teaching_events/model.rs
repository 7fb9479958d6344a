use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

use crate::utils::pagination::{PaginationMeta, PaginationParams};

/// A course (lecture, seminar, lab) credited to a teacher in a semester.
#[derive(Serialize, Deserialize, FromRow, Debug, Clone, PartialEq, ToSchema)]
pub struct TeachingEvent {
    pub id: i32,
    pub teacher_id: i32,
    pub semester_id: i32,
    pub name: String,
    pub hours: f64,
    pub event_date: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Deserialize, Debug, Clone, Validate, ToSchema)]
pub struct CreateTeachingEventDto {
    pub teacher_id: i32,
    pub semester_id: i32,
    #[validate(length(min = 1, message = "name must not be empty"))]
    pub name: String,
    #[validate(range(min = 0.0, message = "hours must not be negative"))]
    pub hours: f64,
    pub event_date: Option<NaiveDate>,
}

#[derive(Deserialize, Debug, Clone, Validate, ToSchema)]
pub struct UpdateTeachingEventDto {
    #[validate(length(min = 1, message = "name must not be empty"))]
    pub name: Option<String>,
    #[validate(range(min = 0.0, message = "hours must not be negative"))]
    pub hours: Option<f64>,
    /// Set to null to clear the date.
    #[serde(default, deserialize_with = "crate::utils::serde::double_option")]
    pub event_date: Option<Option<NaiveDate>>,
}

/// Query parameters for filtering teaching events.
#[derive(Debug, Deserialize, ToSchema)]
pub struct TeachingEventFilterParams {
    pub teacher_id: Option<i32>,
    pub semester_id: Option<i32>,
    #[serde(flatten)]
    pub pagination: PaginationParams,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct PaginatedTeachingEventsResponse {
    pub data: Vec<TeachingEvent>,
    pub meta: PaginationMeta,
}
