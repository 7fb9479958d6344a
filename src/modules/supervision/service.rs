use sqlx::PgPool;
use tracing::instrument;

use crate::modules::supervision::model::{
    CreateSupervisionDto, CreateSupervisionTypeDto, Supervision, SupervisionFilterParams,
    SupervisionType, UpdateSupervisionDto, UpdateSupervisionTypeDto,
};
use crate::utils::errors::AppError;

// Supervision rows are always served joined with their type so clients see
// the weighted hours the balance uses.
const SUPERVISION_QUERY: &str = "SELECT s.id, s.teacher_id, s.semester_id,
        s.supervision_type_id, st.name AS type_name,
        st.calculation_factor, s.description, s.hours,
        s.hours * st.calculation_factor AS weighted_hours, s.created_at
     FROM supervisions s
     JOIN supervision_types st ON st.id = s.supervision_type_id";

pub struct SupervisionTypeService;

impl SupervisionTypeService {
    #[instrument(skip(db))]
    pub async fn create_type(
        db: &PgPool,
        dto: CreateSupervisionTypeDto,
    ) -> Result<SupervisionType, AppError> {
        let supervision_type = sqlx::query_as::<_, SupervisionType>(
            "INSERT INTO supervision_types (name, calculation_factor)
             VALUES ($1, $2)
             RETURNING id, name, calculation_factor",
        )
        .bind(&dto.name)
        .bind(dto.calculation_factor)
        .fetch_one(db)
        .await
        .map_err(Self::map_name_conflict)?;

        Ok(supervision_type)
    }

    #[instrument(skip(db))]
    pub async fn get_types(db: &PgPool) -> Result<Vec<SupervisionType>, AppError> {
        let types = sqlx::query_as::<_, SupervisionType>(
            "SELECT id, name, calculation_factor FROM supervision_types ORDER BY name",
        )
        .fetch_all(db)
        .await?;

        Ok(types)
    }

    #[instrument(skip(db))]
    pub async fn get_type(db: &PgPool, id: i32) -> Result<Option<SupervisionType>, AppError> {
        let supervision_type = sqlx::query_as::<_, SupervisionType>(
            "SELECT id, name, calculation_factor FROM supervision_types WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(db)
        .await?;

        Ok(supervision_type)
    }

    #[instrument(skip(db))]
    pub async fn update_type(
        db: &PgPool,
        id: i32,
        dto: UpdateSupervisionTypeDto,
    ) -> Result<Option<SupervisionType>, AppError> {
        let Some(existing) = Self::get_type(db, id).await? else {
            return Ok(None);
        };

        let name = dto.name.unwrap_or(existing.name);
        let calculation_factor = dto.calculation_factor.unwrap_or(existing.calculation_factor);

        let supervision_type = sqlx::query_as::<_, SupervisionType>(
            "UPDATE supervision_types
             SET name = $1, calculation_factor = $2
             WHERE id = $3
             RETURNING id, name, calculation_factor",
        )
        .bind(&name)
        .bind(calculation_factor)
        .bind(id)
        .fetch_one(db)
        .await
        .map_err(Self::map_name_conflict)?;

        Ok(Some(supervision_type))
    }

    /// Deleting a type that supervisions still reference is refused.
    #[instrument(skip(db))]
    pub async fn delete_type(db: &PgPool, id: i32) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM supervision_types WHERE id = $1")
            .bind(id)
            .execute(db)
            .await
            .map_err(|e| {
                if let sqlx::Error::Database(db_err) = &e
                    && db_err.is_foreign_key_violation()
                {
                    return AppError::bad_request(anyhow::anyhow!(
                        "Supervision type is still in use"
                    ));
                }
                AppError::from(e)
            })?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found(anyhow::anyhow!(
                "Supervision type not found"
            )));
        }

        Ok(())
    }

    fn map_name_conflict(e: sqlx::Error) -> AppError {
        if let sqlx::Error::Database(db_err) = &e
            && db_err.is_unique_violation()
            && db_err.message().contains("supervision_types_name_unique")
        {
            return AppError::bad_request(anyhow::anyhow!(
                "A supervision type with this name already exists"
            ));
        }
        AppError::from(e)
    }
}

pub struct SupervisionService;

impl SupervisionService {
    async fn check_references(db: &PgPool, dto: &CreateSupervisionDto) -> Result<(), AppError> {
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

        let type_exists = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM supervision_types WHERE id = $1)",
        )
        .bind(dto.supervision_type_id)
        .fetch_one(db)
        .await?;
        if !type_exists {
            return Err(AppError::bad_request(anyhow::anyhow!(
                "Supervision type not found"
            )));
        }

        Ok(())
    }

    #[instrument(skip(db))]
    pub async fn create_supervision(
        db: &PgPool,
        dto: CreateSupervisionDto,
    ) -> Result<Supervision, AppError> {
        Self::check_references(db, &dto).await?;

        let id = sqlx::query_scalar::<_, i32>(
            "INSERT INTO supervisions (teacher_id, semester_id, supervision_type_id, description, hours)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING id",
        )
        .bind(dto.teacher_id)
        .bind(dto.semester_id)
        .bind(dto.supervision_type_id)
        .bind(&dto.description)
        .bind(dto.hours)
        .fetch_one(db)
        .await?;

        let supervision = Self::get_supervision(db, id)
            .await?
            .ok_or_else(|| AppError::internal(anyhow::anyhow!("Inserted supervision vanished")))?;

        Ok(supervision)
    }

    #[instrument(skip(db))]
    pub async fn get_supervisions(
        db: &PgPool,
        filters: SupervisionFilterParams,
    ) -> Result<Vec<Supervision>, AppError> {
        let mut where_clause = String::from(" WHERE TRUE");
        if let Some(teacher_id) = filters.teacher_id {
            where_clause.push_str(&format!(" AND s.teacher_id = {}", teacher_id));
        }
        if let Some(semester_id) = filters.semester_id {
            where_clause.push_str(&format!(" AND s.semester_id = {}", semester_id));
        }

        let supervisions = sqlx::query_as::<_, Supervision>(&format!(
            "{SUPERVISION_QUERY}{where_clause} ORDER BY s.created_at DESC"
        ))
        .fetch_all(db)
        .await?;

        Ok(supervisions)
    }

    #[instrument(skip(db))]
    pub async fn get_supervision(db: &PgPool, id: i32) -> Result<Option<Supervision>, AppError> {
        let supervision =
            sqlx::query_as::<_, Supervision>(&format!("{SUPERVISION_QUERY} WHERE s.id = $1"))
                .bind(id)
                .fetch_optional(db)
                .await?;

        Ok(supervision)
    }

    #[instrument(skip(db))]
    pub async fn update_supervision(
        db: &PgPool,
        id: i32,
        dto: UpdateSupervisionDto,
    ) -> Result<Option<Supervision>, AppError> {
        let Some(existing) = Self::get_supervision(db, id).await? else {
            return Ok(None);
        };

        let supervision_type_id = dto
            .supervision_type_id
            .unwrap_or(existing.supervision_type_id);
        let description = match dto.description {
            Some(text) => text,
            None => existing.description,
        };
        let hours = dto.hours.unwrap_or(existing.hours);

        if supervision_type_id != existing.supervision_type_id {
            let type_exists = sqlx::query_scalar::<_, bool>(
                "SELECT EXISTS(SELECT 1 FROM supervision_types WHERE id = $1)",
            )
            .bind(supervision_type_id)
            .fetch_one(db)
            .await?;
            if !type_exists {
                return Err(AppError::bad_request(anyhow::anyhow!(
                    "Supervision type not found"
                )));
            }
        }

        sqlx::query(
            "UPDATE supervisions
             SET supervision_type_id = $1, description = $2, hours = $3
             WHERE id = $4",
        )
        .bind(supervision_type_id)
        .bind(&description)
        .bind(hours)
        .bind(id)
        .execute(db)
        .await?;

        Self::get_supervision(db, id).await
    }

    #[instrument(skip(db))]
    pub async fn delete_supervision(db: &PgPool, id: i32) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM supervisions WHERE id = $1")
            .bind(id)
            .execute(db)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found(anyhow::anyhow!(
                "Supervision not found"
            )));
        }

        Ok(())
    }
}
