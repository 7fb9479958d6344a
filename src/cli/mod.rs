//! CLI and startup helpers for provisioning the first controller account.

use sqlx::PgPool;
use tracing::info;

use crate::modules::users::model::{CreateUserDto, UserRole};
use crate::modules::users::service::UserService;

/// Create a controller account with its controller sub-record. Fails when
/// the username is already taken.
pub async fn create_controller(
    db: &PgPool,
    first_name: &str,
    last_name: &str,
    username: &str,
    password: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    UserService::create_user(
        db,
        CreateUserDto {
            username: username.to_string(),
            password: password.to_string(),
            role: UserRole::Controller,
            first_name: first_name.to_string(),
            last_name: last_name.to_string(),
            retirement_date: None,
            total_teaching_duty: None,
        },
    )
    .await
    .map_err(|e| format!("Failed to create controller: {}", e.error))?;

    Ok(())
}

/// On startup, make sure a controller account exists when the
/// `INIT_CONTROLLER_USERNAME` / `INIT_CONTROLLER_PASSWORD` variables are
/// set. An already existing user is left untouched.
pub async fn ensure_initial_controller(db: &PgPool) -> Result<(), Box<dyn std::error::Error>> {
    let (Ok(username), Ok(password)) = (
        std::env::var("INIT_CONTROLLER_USERNAME"),
        std::env::var("INIT_CONTROLLER_PASSWORD"),
    ) else {
        return Ok(());
    };

    let existing = UserService::get_user_by_username(db, &username)
        .await
        .map_err(|e| e.error)?;
    if existing.is_some() {
        return Ok(());
    }

    create_controller(db, "Initial", "Controller", &username, &password).await?;
    info!(username, "created initial controller account");

    Ok(())
}
