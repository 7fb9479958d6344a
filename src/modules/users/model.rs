//! User data models and DTOs.
//!
//! A user account carries a role and exactly one role-specific sub-record:
//! a [`ControllerRecord`] for controllers, a teacher record
//! (see [`crate::modules::teachers::model::Teacher`]) for teachers.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

use crate::modules::teachers::model::Teacher;

/// The two application roles.
///
/// Controllers administer semesters, courses, discounts and user accounts;
/// teachers report their own data and review their teaching balance.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema, Default,
)]
#[sqlx(type_name = "user_role", rename_all = "UPPERCASE")]
#[serde(rename_all = "UPPERCASE")]
pub enum UserRole {
    Controller,
    #[default]
    Teacher,
}

/// A user account. The password hash is never selected into this struct.
#[derive(Serialize, Deserialize, FromRow, Debug, Clone, PartialEq, Eq, ToSchema)]
pub struct User {
    pub id: i32,
    pub username: String,
    pub role: UserRole,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Controller sub-record, present for exactly the users with role CONTROLLER.
#[derive(Serialize, Deserialize, FromRow, Debug, Clone, PartialEq, Eq, ToSchema)]
pub struct ControllerRecord {
    pub id: i32,
    pub user_id: i32,
    pub first_name: String,
    pub last_name: String,
}

/// A user together with its role-specific relation.
///
/// Exactly one of `teacher` / `controller` is populated, matching the role.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct UserWithRelations {
    pub user: User,
    pub teacher: Option<Teacher>,
    pub controller: Option<ControllerRecord>,
}

/// DTO for creating a new user account.
///
/// The teacher-specific fields are ignored for role CONTROLLER.
#[derive(Deserialize, Debug, Clone, Validate, ToSchema)]
pub struct CreateUserDto {
    #[validate(length(min = 3, message = "username must be at least 3 characters"))]
    pub username: String,
    #[validate(length(min = 8, message = "password must be at least 8 characters"))]
    pub password: String,
    #[serde(default)]
    pub role: UserRole,
    #[validate(length(min = 1, message = "first_name must not be empty"))]
    pub first_name: String,
    #[validate(length(min = 1, message = "last_name must not be empty"))]
    pub last_name: String,
    /// Only meaningful for role TEACHER.
    pub retirement_date: Option<NaiveDate>,
    /// Per-semester teaching duty target in hours. Only meaningful for
    /// role TEACHER; defaults to 0.
    pub total_teaching_duty: Option<f64>,
}

/// DTO for updating an existing user account. The role is fixed at
/// creation, because changing it would orphan the role sub-record.
#[derive(Deserialize, Debug, Clone, Validate, ToSchema)]
pub struct UpdateUserDto {
    #[validate(length(min = 3, message = "username must be at least 3 characters"))]
    pub username: Option<String>,
    #[validate(length(min = 8, message = "password must be at least 8 characters"))]
    pub password: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_serializes_uppercase() {
        assert_eq!(
            serde_json::to_string(&UserRole::Controller).unwrap(),
            r#""CONTROLLER""#
        );
        assert_eq!(
            serde_json::to_string(&UserRole::Teacher).unwrap(),
            r#""TEACHER""#
        );
    }

    #[test]
    fn test_create_user_dto_default_role_is_teacher() {
        let json = r#"{"username":"jdoe","password":"password123","first_name":"Jane","last_name":"Doe"}"#;
        let dto: CreateUserDto = serde_json::from_str(json).unwrap();
        assert_eq!(dto.role, UserRole::Teacher);
        assert!(dto.validate().is_ok());
    }

    #[test]
    fn test_create_user_dto_validation() {
        let dto = CreateUserDto {
            username: "jd".to_string(),
            password: "short".to_string(),
            role: UserRole::Teacher,
            first_name: "Jane".to_string(),
            last_name: "Doe".to_string(),
            retirement_date: None,
            total_teaching_duty: None,
        };
        assert!(dto.validate().is_err());
    }

    #[test]
    fn test_update_user_dto_partial() {
        let dto: UpdateUserDto = serde_json::from_str(r#"{"username":"renamed"}"#).unwrap();
        assert_eq!(dto.username.as_deref(), Some("renamed"));
        assert!(dto.password.is_none());
        assert!(dto.validate().is_ok());
    }
}
