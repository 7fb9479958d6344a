use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

/// A note attached to a teacher's record for a given semester, e.g. an
/// explanation for an unusual balance.
#[derive(Serialize, Deserialize, FromRow, Debug, Clone, PartialEq, ToSchema)]
pub struct Comment {
    pub id: i32,
    pub teacher_id: i32,
    pub semester_id: i32,
    pub author_user_id: i32,
    pub author_username: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Deserialize, Debug, Clone, Validate, ToSchema)]
pub struct CreateCommentDto {
    pub teacher_id: i32,
    pub semester_id: i32,
    #[validate(length(min = 1, message = "content must not be empty"))]
    pub content: String,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct CommentFilterParams {
    pub teacher_id: Option<i32>,
    pub semester_id: Option<i32>,
}
