use sqlx::PgPool;
use tracing::instrument;

use crate::modules::comments::model::{Comment, CommentFilterParams, CreateCommentDto};
use crate::utils::errors::AppError;

const COMMENT_QUERY: &str = "SELECT c.id, c.teacher_id, c.semester_id,
        c.author_user_id, u.username AS author_username, c.content, c.created_at
     FROM comments c
     JOIN users u ON u.id = c.author_user_id";

pub struct CommentService;

impl CommentService {
    #[instrument(skip(db, dto))]
    pub async fn create_comment(
        db: &PgPool,
        author_user_id: i32,
        dto: CreateCommentDto,
    ) -> Result<Comment, AppError> {
        let teacher_exists =
            sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM teachers WHERE id = $1)")
                .bind(dto.teacher_id)
                .fetch_one(db)
                .await?;
        if !teacher_exists {
            return Err(AppError::bad_request(anyhow::anyhow!("Teacher not found")));
        }

        let semester_exists =
            sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM semesters WHERE id = $1)")
                .bind(dto.semester_id)
                .fetch_one(db)
                .await?;
        if !semester_exists {
            return Err(AppError::bad_request(anyhow::anyhow!("Semester not found")));
        }

        let id = sqlx::query_scalar::<_, i32>(
            "INSERT INTO comments (teacher_id, semester_id, author_user_id, content)
             VALUES ($1, $2, $3, $4)
             RETURNING id",
        )
        .bind(dto.teacher_id)
        .bind(dto.semester_id)
        .bind(author_user_id)
        .bind(&dto.content)
        .fetch_one(db)
        .await?;

        let comment = Self::get_comment(db, id)
            .await?
            .ok_or_else(|| AppError::internal(anyhow::anyhow!("Inserted comment vanished")))?;

        Ok(comment)
    }

    #[instrument(skip(db))]
    pub async fn get_comments(
        db: &PgPool,
        filters: CommentFilterParams,
    ) -> Result<Vec<Comment>, AppError> {
        let mut where_clause = String::from(" WHERE TRUE");
        if let Some(teacher_id) = filters.teacher_id {
            where_clause.push_str(&format!(" AND c.teacher_id = {}", teacher_id));
        }
        if let Some(semester_id) = filters.semester_id {
            where_clause.push_str(&format!(" AND c.semester_id = {}", semester_id));
        }

        let comments = sqlx::query_as::<_, Comment>(&format!(
            "{COMMENT_QUERY}{where_clause} ORDER BY c.created_at DESC"
        ))
        .fetch_all(db)
        .await?;

        Ok(comments)
    }

    #[instrument(skip(db))]
    pub async fn get_comment(db: &PgPool, id: i32) -> Result<Option<Comment>, AppError> {
        let comment = sqlx::query_as::<_, Comment>(&format!("{COMMENT_QUERY} WHERE c.id = $1"))
            .bind(id)
            .fetch_optional(db)
            .await?;

        Ok(comment)
    }

    #[instrument(skip(db))]
    pub async fn delete_comment(db: &PgPool, id: i32) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM comments WHERE id = $1")
            .bind(id)
            .execute(db)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found(anyhow::anyhow!("Comment not found")));
        }

        Ok(())
    }
}
