use sqlx::PgPool;
use tracing::instrument;

use crate::modules::teachers::model::Teacher;
use crate::modules::users::model::{
    ControllerRecord, CreateUserDto, UpdateUserDto, User, UserRole, UserWithRelations,
};
use crate::utils::errors::AppError;
use crate::utils::password::hash_password;

const USER_COLUMNS: &str = "id, username, role, created_at, updated_at";

pub struct UserService;

impl UserService {
    /// Create a user account together with its role-specific sub-record.
    ///
    /// Role CONTROLLER creates exactly a controller record, role TEACHER
    /// exactly a teacher record. Both inserts run in one transaction so a
    /// user can never exist without its relation.
    #[instrument(skip(db, dto))]
    pub async fn create_user(db: &PgPool, dto: CreateUserDto) -> Result<UserWithRelations, AppError> {
        let hashed_password = hash_password(&dto.password)?;

        let mut tx = db.begin().await?;

        let user = sqlx::query_as::<_, User>(&format!(
            "INSERT INTO users (username, password, role)
             VALUES ($1, $2, $3)
             RETURNING {USER_COLUMNS}"
        ))
        .bind(&dto.username)
        .bind(&hashed_password)
        .bind(dto.role)
        .fetch_one(&mut *tx)
        .await
        .map_err(Self::map_username_conflict)?;

        let mut teacher = None;
        let mut controller = None;

        match dto.role {
            UserRole::Controller => {
                let record = sqlx::query_as::<_, ControllerRecord>(
                    "INSERT INTO controllers (user_id, first_name, last_name)
                     VALUES ($1, $2, $3)
                     RETURNING id, user_id, first_name, last_name",
                )
                .bind(user.id)
                .bind(&dto.first_name)
                .bind(&dto.last_name)
                .fetch_one(&mut *tx)
                .await?;
                controller = Some(record);
            }
            UserRole::Teacher => {
                let record = sqlx::query_as::<_, Teacher>(
                    "INSERT INTO teachers (user_id, first_name, last_name, retirement_date, total_teaching_duty)
                     VALUES ($1, $2, $3, $4, $5)
                     RETURNING id, user_id, first_name, last_name, retirement_date, total_teaching_duty, teaching_group_id",
                )
                .bind(user.id)
                .bind(&dto.first_name)
                .bind(&dto.last_name)
                .bind(dto.retirement_date)
                .bind(dto.total_teaching_duty.unwrap_or(0.0))
                .fetch_one(&mut *tx)
                .await?;
                teacher = Some(record);
            }
        }

        tx.commit().await?;

        Ok(UserWithRelations {
            user,
            teacher,
            controller,
        })
    }

    /// Find a user by ID, including the role-matching relation.
    ///
    /// A missing user is not an error; it yields `Ok(None)`.
    #[instrument(skip(db))]
    pub async fn get_user(db: &PgPool, id: i32) -> Result<Option<UserWithRelations>, AppError> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(db)
        .await?;

        let Some(user) = user else {
            return Ok(None);
        };

        Ok(Some(Self::attach_relation(db, user).await?))
    }

    /// Find a user by username, without the relation.
    #[instrument(skip(db))]
    pub async fn get_user_by_username(
        db: &PgPool,
        username: &str,
    ) -> Result<Option<User>, AppError> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE username = $1"
        ))
        .bind(username)
        .fetch_optional(db)
        .await?;

        Ok(user)
    }

    #[instrument(skip(db))]
    pub async fn get_users(db: &PgPool) -> Result<Vec<User>, AppError> {
        let users = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users ORDER BY username"
        ))
        .fetch_all(db)
        .await?;

        Ok(users)
    }

    /// Update account fields. Returns `Ok(None)` when the user does not
    /// exist. Role-specific fields are updated through the teachers module.
    #[instrument(skip(db, dto))]
    pub async fn update_user(
        db: &PgPool,
        id: i32,
        dto: UpdateUserDto,
    ) -> Result<Option<User>, AppError> {
        let existing = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(db)
        .await?;

        let Some(existing) = existing else {
            return Ok(None);
        };

        let username = dto.username.unwrap_or(existing.username);
        let password = match dto.password {
            Some(password) => Some(hash_password(&password)?),
            None => None,
        };

        let user = sqlx::query_as::<_, User>(&format!(
            "UPDATE users
             SET username = $1, password = COALESCE($2, password), updated_at = NOW()
             WHERE id = $3
             RETURNING {USER_COLUMNS}"
        ))
        .bind(&username)
        .bind(password)
        .bind(id)
        .fetch_one(db)
        .await
        .map_err(Self::map_username_conflict)?;

        Ok(Some(user))
    }

    async fn attach_relation(db: &PgPool, user: User) -> Result<UserWithRelations, AppError> {
        let mut teacher = None;
        let mut controller = None;

        match user.role {
            UserRole::Teacher => {
                teacher = sqlx::query_as::<_, Teacher>(
                    "SELECT id, user_id, first_name, last_name, retirement_date, total_teaching_duty, teaching_group_id
                     FROM teachers WHERE user_id = $1",
                )
                .bind(user.id)
                .fetch_optional(db)
                .await?;
            }
            UserRole::Controller => {
                controller = sqlx::query_as::<_, ControllerRecord>(
                    "SELECT id, user_id, first_name, last_name FROM controllers WHERE user_id = $1",
                )
                .bind(user.id)
                .fetch_optional(db)
                .await?;
            }
        }

        Ok(UserWithRelations {
            user,
            teacher,
            controller,
        })
    }

    fn map_username_conflict(e: sqlx::Error) -> AppError {
        if let sqlx::Error::Database(db_err) = &e
            && db_err.is_unique_violation()
            && db_err.message().contains("users_username_unique")
        {
            return AppError::bad_request(anyhow::anyhow!("Username already exists"));
        }
        AppError::from(e)
    }
}
