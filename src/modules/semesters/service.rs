use chrono::NaiveDate;
use sqlx::PgPool;
use tracing::instrument;

use crate::modules::semesters::model::{CreateSemesterDto, Semester, UpdateSemesterDto};
use crate::utils::errors::AppError;

const SEMESTER_COLUMNS: &str = "id, name, start_date, end_date, is_active, created_at, updated_at";

pub struct SemesterService;

impl SemesterService {
    fn validate_dates(start_date: NaiveDate, end_date: NaiveDate) -> Result<(), AppError> {
        if start_date >= end_date {
            return Err(AppError::bad_request(anyhow::anyhow!(
                "Start date must be before end date"
            )));
        }
        Ok(())
    }

    #[instrument(skip(db))]
    pub async fn create_semester(
        db: &PgPool,
        dto: CreateSemesterDto,
    ) -> Result<Semester, AppError> {
        Self::validate_dates(dto.start_date, dto.end_date)?;

        let semester = sqlx::query_as::<_, Semester>(&format!(
            "INSERT INTO semesters (name, start_date, end_date)
             VALUES ($1, $2, $3)
             RETURNING {SEMESTER_COLUMNS}"
        ))
        .bind(&dto.name)
        .bind(dto.start_date)
        .bind(dto.end_date)
        .fetch_one(db)
        .await
        .map_err(Self::map_name_conflict)?;

        Ok(semester)
    }

    #[instrument(skip(db))]
    pub async fn get_semesters(db: &PgPool) -> Result<Vec<Semester>, AppError> {
        let semesters = sqlx::query_as::<_, Semester>(&format!(
            "SELECT {SEMESTER_COLUMNS} FROM semesters ORDER BY start_date DESC"
        ))
        .fetch_all(db)
        .await?;

        Ok(semesters)
    }

    #[instrument(skip(db))]
    pub async fn get_semester(db: &PgPool, id: i32) -> Result<Option<Semester>, AppError> {
        let semester = sqlx::query_as::<_, Semester>(&format!(
            "SELECT {SEMESTER_COLUMNS} FROM semesters WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(db)
        .await?;

        Ok(semester)
    }

    /// The currently active semester, if any.
    #[instrument(skip(db))]
    pub async fn get_active_semester(db: &PgPool) -> Result<Option<Semester>, AppError> {
        let semester = sqlx::query_as::<_, Semester>(&format!(
            "SELECT {SEMESTER_COLUMNS} FROM semesters WHERE is_active = TRUE"
        ))
        .fetch_optional(db)
        .await?;

        Ok(semester)
    }

    #[instrument(skip(db))]
    pub async fn update_semester(
        db: &PgPool,
        id: i32,
        dto: UpdateSemesterDto,
    ) -> Result<Option<Semester>, AppError> {
        let Some(existing) = Self::get_semester(db, id).await? else {
            return Ok(None);
        };

        let name = dto.name.unwrap_or(existing.name);
        let start_date = dto.start_date.unwrap_or(existing.start_date);
        let end_date = dto.end_date.unwrap_or(existing.end_date);

        Self::validate_dates(start_date, end_date)?;

        let semester = sqlx::query_as::<_, Semester>(&format!(
            "UPDATE semesters
             SET name = $1, start_date = $2, end_date = $3, updated_at = NOW()
             WHERE id = $4
             RETURNING {SEMESTER_COLUMNS}"
        ))
        .bind(&name)
        .bind(start_date)
        .bind(end_date)
        .bind(id)
        .fetch_one(db)
        .await
        .map_err(Self::map_name_conflict)?;

        Ok(Some(semester))
    }

    #[instrument(skip(db))]
    pub async fn delete_semester(db: &PgPool, id: i32) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM semesters WHERE id = $1")
            .bind(id)
            .execute(db)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found(anyhow::anyhow!("Semester not found")));
        }

        Ok(())
    }

    /// Mark a semester as active, deactivating any other active semester.
    #[instrument(skip(db))]
    pub async fn activate_semester(db: &PgPool, id: i32) -> Result<Semester, AppError> {
        let exists =
            sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM semesters WHERE id = $1)")
                .bind(id)
                .fetch_one(db)
                .await?;

        if !exists {
            return Err(AppError::not_found(anyhow::anyhow!("Semester not found")));
        }

        let mut tx = db.begin().await?;

        sqlx::query("UPDATE semesters SET is_active = FALSE, updated_at = NOW() WHERE is_active = TRUE")
            .execute(&mut *tx)
            .await?;

        let semester = sqlx::query_as::<_, Semester>(&format!(
            "UPDATE semesters SET is_active = TRUE, updated_at = NOW()
             WHERE id = $1
             RETURNING {SEMESTER_COLUMNS}"
        ))
        .bind(id)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(semester)
    }

    fn map_name_conflict(e: sqlx::Error) -> AppError {
        if let sqlx::Error::Database(db_err) = &e
            && db_err.is_unique_violation()
            && db_err.message().contains("semesters_name_unique")
        {
            return AppError::bad_request(anyhow::anyhow!(
                "A semester with this name already exists"
            ));
        }
        AppError::from(e)
    }
}
