use sqlx::PgPool;
use std::env;

/// Initializes the PostgreSQL connection pool from `DATABASE_URL`.
///
/// The pool is cheaply cloneable and shared through [`crate::state::AppState`].
///
/// # Panics
///
/// Panics if `DATABASE_URL` is unset or the connection fails; there is no
/// useful way to run without a database.
pub async fn init_db_pool() -> PgPool {
    let database_url = env::var("DATABASE_URL").expect("DATABASE_URL must be set");

    PgPool::connect(&database_url)
        .await
        .expect("Failed to connect to database")
}
