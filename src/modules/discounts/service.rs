use sqlx::PgPool;
use tracing::instrument;

use crate::modules::discounts::model::{
    CreateDiscountDto, CreateDiscountTypeDto, Discount, DiscountFilterParams, DiscountType,
    UpdateDiscountDto, UpdateDiscountTypeDto,
};
use crate::utils::errors::AppError;

const DISCOUNT_QUERY: &str = "SELECT d.id, d.teacher_id, d.semester_id,
        d.discount_type_id, dt.name AS type_name, d.description,
        d.hours, d.approved, d.created_at
     FROM discounts d
     JOIN discount_types dt ON dt.id = d.discount_type_id";

pub struct DiscountTypeService;

impl DiscountTypeService {
    #[instrument(skip(db))]
    pub async fn create_type(
        db: &PgPool,
        dto: CreateDiscountTypeDto,
    ) -> Result<DiscountType, AppError> {
        let discount_type = sqlx::query_as::<_, DiscountType>(
            "INSERT INTO discount_types (name, description)
             VALUES ($1, $2)
             RETURNING id, name, description",
        )
        .bind(&dto.name)
        .bind(&dto.description)
        .fetch_one(db)
        .await
        .map_err(Self::map_name_conflict)?;

        Ok(discount_type)
    }

    #[instrument(skip(db))]
    pub async fn get_types(db: &PgPool) -> Result<Vec<DiscountType>, AppError> {
        let types = sqlx::query_as::<_, DiscountType>(
            "SELECT id, name, description FROM discount_types ORDER BY name",
        )
        .fetch_all(db)
        .await?;

        Ok(types)
    }

    #[instrument(skip(db))]
    pub async fn get_type(db: &PgPool, id: i32) -> Result<Option<DiscountType>, AppError> {
        let discount_type = sqlx::query_as::<_, DiscountType>(
            "SELECT id, name, description FROM discount_types WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(db)
        .await?;

        Ok(discount_type)
    }

    #[instrument(skip(db))]
    pub async fn update_type(
        db: &PgPool,
        id: i32,
        dto: UpdateDiscountTypeDto,
    ) -> Result<Option<DiscountType>, AppError> {
        let Some(existing) = Self::get_type(db, id).await? else {
            return Ok(None);
        };

        let name = dto.name.unwrap_or(existing.name);
        let description = match dto.description {
            Some(text) => text,
            None => existing.description,
        };

        let discount_type = sqlx::query_as::<_, DiscountType>(
            "UPDATE discount_types
             SET name = $1, description = $2
             WHERE id = $3
             RETURNING id, name, description",
        )
        .bind(&name)
        .bind(&description)
        .bind(id)
        .fetch_one(db)
        .await
        .map_err(Self::map_name_conflict)?;

        Ok(Some(discount_type))
    }

    #[instrument(skip(db))]
    pub async fn delete_type(db: &PgPool, id: i32) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM discount_types WHERE id = $1")
            .bind(id)
            .execute(db)
            .await
            .map_err(|e| {
                if let sqlx::Error::Database(db_err) = &e
                    && db_err.is_foreign_key_violation()
                {
                    return AppError::bad_request(anyhow::anyhow!("Discount type is still in use"));
                }
                AppError::from(e)
            })?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found(anyhow::anyhow!(
                "Discount type not found"
            )));
        }

        Ok(())
    }

    fn map_name_conflict(e: sqlx::Error) -> AppError {
        if let sqlx::Error::Database(db_err) = &e
            && db_err.is_unique_violation()
            && db_err.message().contains("discount_types_name_unique")
        {
            return AppError::bad_request(anyhow::anyhow!(
                "A discount type with this name already exists"
            ));
        }
        AppError::from(e)
    }
}

pub struct DiscountService;

impl DiscountService {
    async fn check_references(db: &PgPool, dto: &CreateDiscountDto) -> Result<(), AppError> {
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
            "SELECT EXISTS(SELECT 1 FROM discount_types WHERE id = $1)",
        )
        .bind(dto.discount_type_id)
        .fetch_one(db)
        .await?;
        if !type_exists {
            return Err(AppError::bad_request(anyhow::anyhow!(
                "Discount type not found"
            )));
        }

        Ok(())
    }

    #[instrument(skip(db))]
    pub async fn create_discount(db: &PgPool, dto: CreateDiscountDto) -> Result<Discount, AppError> {
        Self::check_references(db, &dto).await?;

        let id = sqlx::query_scalar::<_, i32>(
            "INSERT INTO discounts (teacher_id, semester_id, discount_type_id, description, hours, approved)
             VALUES ($1, $2, $3, $4, $5, $6)
             RETURNING id",
        )
        .bind(dto.teacher_id)
        .bind(dto.semester_id)
        .bind(dto.discount_type_id)
        .bind(&dto.description)
        .bind(dto.hours)
        .bind(dto.approved)
        .fetch_one(db)
        .await?;

        let discount = Self::get_discount(db, id)
            .await?
            .ok_or_else(|| AppError::internal(anyhow::anyhow!("Inserted discount vanished")))?;

        Ok(discount)
    }

    #[instrument(skip(db))]
    pub async fn get_discounts(
        db: &PgPool,
        filters: DiscountFilterParams,
    ) -> Result<Vec<Discount>, AppError> {
        let mut where_clause = String::from(" WHERE TRUE");
        if let Some(teacher_id) = filters.teacher_id {
            where_clause.push_str(&format!(" AND d.teacher_id = {}", teacher_id));
        }
        if let Some(semester_id) = filters.semester_id {
            where_clause.push_str(&format!(" AND d.semester_id = {}", semester_id));
        }
        if let Some(approved) = filters.approved {
            where_clause.push_str(&format!(" AND d.approved = {}", approved));
        }

        let discounts = sqlx::query_as::<_, Discount>(&format!(
            "{DISCOUNT_QUERY}{where_clause} ORDER BY d.created_at DESC"
        ))
        .fetch_all(db)
        .await?;

        Ok(discounts)
    }

    #[instrument(skip(db))]
    pub async fn get_discount(db: &PgPool, id: i32) -> Result<Option<Discount>, AppError> {
        let discount = sqlx::query_as::<_, Discount>(&format!("{DISCOUNT_QUERY} WHERE d.id = $1"))
            .bind(id)
            .fetch_optional(db)
            .await?;

        Ok(discount)
    }

    #[instrument(skip(db))]
    pub async fn update_discount(
        db: &PgPool,
        id: i32,
        dto: UpdateDiscountDto,
    ) -> Result<Option<Discount>, AppError> {
        let Some(existing) = Self::get_discount(db, id).await? else {
            return Ok(None);
        };

        let discount_type_id = dto.discount_type_id.unwrap_or(existing.discount_type_id);
        let description = match dto.description {
            Some(text) => text,
            None => existing.description,
        };
        let hours = dto.hours.unwrap_or(existing.hours);
        let approved = dto.approved.unwrap_or(existing.approved);

        if discount_type_id != existing.discount_type_id {
            let type_exists = sqlx::query_scalar::<_, bool>(
                "SELECT EXISTS(SELECT 1 FROM discount_types WHERE id = $1)",
            )
            .bind(discount_type_id)
            .fetch_one(db)
            .await?;
            if !type_exists {
                return Err(AppError::bad_request(anyhow::anyhow!(
                    "Discount type not found"
                )));
            }
        }

        sqlx::query(
            "UPDATE discounts
             SET discount_type_id = $1, description = $2, hours = $3, approved = $4
             WHERE id = $5",
        )
        .bind(discount_type_id)
        .bind(&description)
        .bind(hours)
        .bind(approved)
        .bind(id)
        .execute(db)
        .await?;

        Self::get_discount(db, id).await
    }

    #[instrument(skip(db))]
    pub async fn delete_discount(db: &PgPool, id: i32) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM discounts WHERE id = $1")
            .bind(id)
            .execute(db)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found(anyhow::anyhow!("Discount not found")));
        }

        Ok(())
    }
}
