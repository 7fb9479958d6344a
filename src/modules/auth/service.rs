use chrono::{DateTime, Utc};
use sqlx::PgPool;
use tracing::instrument;

use crate::config::jwt::JwtConfig;
use crate::modules::users::model::{User, UserRole};
use crate::utils::errors::AppError;
use crate::utils::jwt::create_access_token;
use crate::utils::password::verify_password;

use super::model::{LoginRequest, LoginResponse};

pub struct AuthService;

impl AuthService {
    /// Verify credentials and issue an access token.
    ///
    /// The same 401 is returned for unknown usernames and wrong passwords.
    #[instrument(skip(db, dto, jwt_config))]
    pub async fn login_user(
        db: &PgPool,
        dto: LoginRequest,
        jwt_config: &JwtConfig,
    ) -> Result<LoginResponse, AppError> {
        #[derive(sqlx::FromRow)]
        struct UserWithPassword {
            id: i32,
            username: String,
            password: String,
            role: UserRole,
            created_at: DateTime<Utc>,
            updated_at: DateTime<Utc>,
        }

        let user_with_password = sqlx::query_as::<_, UserWithPassword>(
            "SELECT id, username, password, role, created_at, updated_at
             FROM users WHERE username = $1",
        )
        .bind(&dto.username)
        .fetch_optional(db)
        .await?
        .ok_or_else(|| AppError::unauthorized("Invalid username or password"))?;

        let is_valid = verify_password(&dto.password, &user_with_password.password)?;

        if !is_valid {
            return Err(AppError::unauthorized("Invalid username or password"));
        }

        let access_token = create_access_token(
            user_with_password.id,
            &user_with_password.username,
            user_with_password.role,
            jwt_config,
        )?;

        let user = User {
            id: user_with_password.id,
            username: user_with_password.username,
            role: user_with_password.role,
            created_at: user_with_password.created_at,
            updated_at: user_with_password.updated_at,
        };

        Ok(LoginResponse { access_token, user })
    }
}
