use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

/// Teacher sub-record, present for exactly the users with role TEACHER.
///
/// `total_teaching_duty` is the per-semester duty target in weekly hours
/// against which the balance is computed.
#[derive(Serialize, Deserialize, FromRow, Debug, Clone, PartialEq, ToSchema)]
pub struct Teacher {
    pub id: i32,
    pub user_id: i32,
    pub first_name: String,
    pub last_name: String,
    pub retirement_date: Option<NaiveDate>,
    pub total_teaching_duty: f64,
    pub teaching_group_id: Option<i32>,
}

/// Teacher with account and group details, used by the controlling views.
#[derive(Serialize, Deserialize, FromRow, Debug, Clone, PartialEq, ToSchema)]
pub struct TeacherWithInfo {
    pub id: i32,
    pub user_id: i32,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub retirement_date: Option<NaiveDate>,
    pub total_teaching_duty: f64,
    pub teaching_group_id: Option<i32>,
    pub teaching_group_name: Option<String>,
}

#[derive(Deserialize, Debug, Clone, Validate, ToSchema)]
pub struct UpdateTeacherDto {
    #[validate(length(min = 1, message = "first_name must not be empty"))]
    pub first_name: Option<String>,
    #[validate(length(min = 1, message = "last_name must not be empty"))]
    pub last_name: Option<String>,
    /// Set to null to clear a previously recorded retirement date.
    #[serde(default, deserialize_with = "crate::utils::serde::double_option")]
    pub retirement_date: Option<Option<NaiveDate>>,
    #[validate(range(min = 0.0, message = "total_teaching_duty must not be negative"))]
    pub total_teaching_duty: Option<f64>,
    /// Set to null to remove the teacher from their group.
    #[serde(default, deserialize_with = "crate::utils::serde::double_option")]
    pub teaching_group_id: Option<Option<i32>>,
}
