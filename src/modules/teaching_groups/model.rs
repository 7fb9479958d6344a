use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

/// A teaching group (institute, chair or working group) used for the
/// controlling group analysis.
#[derive(Serialize, Deserialize, FromRow, Debug, Clone, PartialEq, Eq, ToSchema)]
pub struct TeachingGroup {
    pub id: i32,
    pub name: String,
    pub description: Option<String>,
}

#[derive(Deserialize, Debug, Clone, Validate, ToSchema)]
pub struct CreateTeachingGroupDto {
    #[validate(length(min = 1, message = "name must not be empty"))]
    pub name: String,
    pub description: Option<String>,
}

#[derive(Deserialize, Debug, Clone, Validate, ToSchema)]
pub struct UpdateTeachingGroupDto {
    #[validate(length(min = 1, message = "name must not be empty"))]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "crate::utils::serde::double_option")]
    pub description: Option<Option<String>>,
}
