use sqlx::PgPool;
use tracing::instrument;

use crate::modules::teachers::model::{Teacher, TeacherWithInfo, UpdateTeacherDto};
use crate::utils::errors::AppError;

const TEACHER_COLUMNS: &str =
    "id, user_id, first_name, last_name, retirement_date, total_teaching_duty, teaching_group_id";

const TEACHER_INFO_QUERY: &str = "SELECT
        t.id,
        t.user_id,
        u.username,
        t.first_name,
        t.last_name,
        t.retirement_date,
        t.total_teaching_duty,
        t.teaching_group_id,
        g.name AS teaching_group_name
     FROM teachers t
     JOIN users u ON u.id = t.user_id
     LEFT JOIN teaching_groups g ON g.id = t.teaching_group_id";

pub struct TeacherService;

impl TeacherService {
    #[instrument(skip(db))]
    pub async fn get_teachers(db: &PgPool) -> Result<Vec<TeacherWithInfo>, AppError> {
        let teachers = sqlx::query_as::<_, TeacherWithInfo>(&format!(
            "{TEACHER_INFO_QUERY} ORDER BY t.last_name, t.first_name"
        ))
        .fetch_all(db)
        .await?;

        Ok(teachers)
    }

    #[instrument(skip(db))]
    pub async fn get_teacher(db: &PgPool, id: i32) -> Result<Option<TeacherWithInfo>, AppError> {
        let teacher = sqlx::query_as::<_, TeacherWithInfo>(&format!(
            "{TEACHER_INFO_QUERY} WHERE t.id = $1"
        ))
        .bind(id)
        .fetch_optional(db)
        .await?;

        Ok(teacher)
    }

    /// The teacher record belonging to a user account. Used to scope
    /// teacher-role requests to their own data.
    #[instrument(skip(db))]
    pub async fn get_teacher_by_user_id(
        db: &PgPool,
        user_id: i32,
    ) -> Result<Option<Teacher>, AppError> {
        let teacher = sqlx::query_as::<_, Teacher>(&format!(
            "SELECT {TEACHER_COLUMNS} FROM teachers WHERE user_id = $1"
        ))
        .bind(user_id)
        .fetch_optional(db)
        .await?;

        Ok(teacher)
    }

    #[instrument(skip(db, dto))]
    pub async fn update_teacher(
        db: &PgPool,
        id: i32,
        dto: UpdateTeacherDto,
    ) -> Result<Option<Teacher>, AppError> {
        let existing = sqlx::query_as::<_, Teacher>(&format!(
            "SELECT {TEACHER_COLUMNS} FROM teachers WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(db)
        .await?;

        let Some(existing) = existing else {
            return Ok(None);
        };

        let first_name = dto.first_name.unwrap_or(existing.first_name);
        let last_name = dto.last_name.unwrap_or(existing.last_name);
        let retirement_date = match dto.retirement_date {
            Some(date) => date,
            None => existing.retirement_date,
        };
        let total_teaching_duty = dto.total_teaching_duty.unwrap_or(existing.total_teaching_duty);
        // Outer None = field absent, inner None = explicit null (leave group).
        let teaching_group_id = match dto.teaching_group_id {
            Some(group) => group,
            None => existing.teaching_group_id,
        };

        if let Some(group_id) = teaching_group_id {
            let group_exists = sqlx::query_scalar::<_, bool>(
                "SELECT EXISTS(SELECT 1 FROM teaching_groups WHERE id = $1)",
            )
            .bind(group_id)
            .fetch_one(db)
            .await?;

            if !group_exists {
                return Err(AppError::bad_request(anyhow::anyhow!(
                    "Teaching group not found"
                )));
            }
        }

        let teacher = sqlx::query_as::<_, Teacher>(&format!(
            "UPDATE teachers
             SET first_name = $1, last_name = $2, retirement_date = $3,
                 total_teaching_duty = $4, teaching_group_id = $5
             WHERE id = $6
             RETURNING {TEACHER_COLUMNS}"
        ))
        .bind(&first_name)
        .bind(&last_name)
        .bind(retirement_date)
        .bind(total_teaching_duty)
        .bind(teaching_group_id)
        .bind(id)
        .fetch_one(db)
        .await?;

        Ok(Some(teacher))
    }
}
