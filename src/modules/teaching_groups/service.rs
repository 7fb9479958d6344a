use sqlx::PgPool;
use tracing::instrument;

use crate::modules::teachers::model::Teacher;
use crate::modules::teaching_groups::model::{
    CreateTeachingGroupDto, TeachingGroup, UpdateTeachingGroupDto,
};
use crate::utils::errors::AppError;

pub struct TeachingGroupService;

impl TeachingGroupService {
    #[instrument(skip(db))]
    pub async fn create_group(
        db: &PgPool,
        dto: CreateTeachingGroupDto,
    ) -> Result<TeachingGroup, AppError> {
        let group = sqlx::query_as::<_, TeachingGroup>(
            "INSERT INTO teaching_groups (name, description)
             VALUES ($1, $2)
             RETURNING id, name, description",
        )
        .bind(&dto.name)
        .bind(&dto.description)
        .fetch_one(db)
        .await
        .map_err(Self::map_name_conflict)?;

        Ok(group)
    }

    #[instrument(skip(db))]
    pub async fn get_groups(db: &PgPool) -> Result<Vec<TeachingGroup>, AppError> {
        let groups = sqlx::query_as::<_, TeachingGroup>(
            "SELECT id, name, description FROM teaching_groups ORDER BY name",
        )
        .fetch_all(db)
        .await?;

        Ok(groups)
    }

    #[instrument(skip(db))]
    pub async fn get_group(db: &PgPool, id: i32) -> Result<Option<TeachingGroup>, AppError> {
        let group = sqlx::query_as::<_, TeachingGroup>(
            "SELECT id, name, description FROM teaching_groups WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(db)
        .await?;

        Ok(group)
    }

    /// Teachers assigned to the group.
    #[instrument(skip(db))]
    pub async fn get_members(db: &PgPool, id: i32) -> Result<Vec<Teacher>, AppError> {
        let exists = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM teaching_groups WHERE id = $1)",
        )
        .bind(id)
        .fetch_one(db)
        .await?;

        if !exists {
            return Err(AppError::not_found(anyhow::anyhow!(
                "Teaching group not found"
            )));
        }

        let members = sqlx::query_as::<_, Teacher>(
            "SELECT id, user_id, first_name, last_name, retirement_date, total_teaching_duty, teaching_group_id
             FROM teachers WHERE teaching_group_id = $1
             ORDER BY last_name, first_name",
        )
        .bind(id)
        .fetch_all(db)
        .await?;

        Ok(members)
    }

    #[instrument(skip(db))]
    pub async fn update_group(
        db: &PgPool,
        id: i32,
        dto: UpdateTeachingGroupDto,
    ) -> Result<Option<TeachingGroup>, AppError> {
        let Some(existing) = Self::get_group(db, id).await? else {
            return Ok(None);
        };

        let name = dto.name.unwrap_or(existing.name);
        let description = match dto.description {
            Some(text) => text,
            None => existing.description,
        };

        let group = sqlx::query_as::<_, TeachingGroup>(
            "UPDATE teaching_groups SET name = $1, description = $2
             WHERE id = $3
             RETURNING id, name, description",
        )
        .bind(&name)
        .bind(&description)
        .bind(id)
        .fetch_one(db)
        .await
        .map_err(Self::map_name_conflict)?;

        Ok(Some(group))
    }

    /// Delete a group. Members are kept and detached via the FK's
    /// ON DELETE SET NULL.
    #[instrument(skip(db))]
    pub async fn delete_group(db: &PgPool, id: i32) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM teaching_groups WHERE id = $1")
            .bind(id)
            .execute(db)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found(anyhow::anyhow!(
                "Teaching group not found"
            )));
        }

        Ok(())
    }

    fn map_name_conflict(e: sqlx::Error) -> AppError {
        if let sqlx::Error::Database(db_err) = &e
            && db_err.is_unique_violation()
            && db_err.message().contains("teaching_groups_name_unique")
        {
            return AppError::bad_request(anyhow::anyhow!(
                "A teaching group with this name already exists"
            ));
        }
        AppError::from(e)
    }
}
