use lehrsaldo::config::cors::CorsConfig;
use lehrsaldo::config::jwt::JwtConfig;
use lehrsaldo::router::init_router;
use lehrsaldo::state::AppState;
use lehrsaldo::utils::password::hash_password;
use sqlx::PgPool;
use uuid::Uuid;

#[allow(dead_code)]
pub struct TestUser {
    pub user_id: i32,
    pub username: String,
    pub password: String,
    /// Teacher record ID, set for teacher-role users.
    pub teacher_id: Option<i32>,
}

/// Insert a user plus the role sub-record directly, bypassing the API.
pub async fn create_test_user(pool: &PgPool, username: &str, password: &str, role: &str) -> TestUser {
    let hashed = hash_password(password).unwrap();

    let user_id = sqlx::query_scalar::<_, i32>(
        "INSERT INTO users (username, password, role)
         VALUES ($1, $2, $3::user_role)
         RETURNING id",
    )
    .bind(username)
    .bind(&hashed)
    .bind(role.to_uppercase())
    .fetch_one(pool)
    .await
    .unwrap();

    let teacher_id = match role.to_uppercase().as_str() {
        "TEACHER" => {
            let id = sqlx::query_scalar::<_, i32>(
                "INSERT INTO teachers (user_id, first_name, last_name, total_teaching_duty)
                 VALUES ($1, 'Test', 'Teacher', 18)
                 RETURNING id",
            )
            .bind(user_id)
            .fetch_one(pool)
            .await
            .unwrap();
            Some(id)
        }
        "CONTROLLER" => {
            sqlx::query(
                "INSERT INTO controllers (user_id, first_name, last_name)
                 VALUES ($1, 'Test', 'Controller')",
            )
            .bind(user_id)
            .execute(pool)
            .await
            .unwrap();
            None
        }
        other => panic!("Invalid role: {}", other),
    };

    TestUser {
        user_id,
        username: username.to_string(),
        password: password.to_string(),
        teacher_id,
    }
}

#[allow(dead_code)]
pub async fn create_test_semester(pool: &PgPool, name: &str) -> i32 {
    sqlx::query_scalar::<_, i32>(
        "INSERT INTO semesters (name, start_date, end_date)
         VALUES ($1, '2025-10-01', '2026-03-31')
         RETURNING id",
    )
    .bind(name)
    .fetch_one(pool)
    .await
    .unwrap()
}

pub fn generate_unique_username() -> String {
    format!("test-{}", Uuid::new_v4())
}

#[allow(dead_code)]
pub fn generate_unique_semester_name() -> String {
    format!("Semester {}", Uuid::new_v4())
}

pub async fn setup_test_app(pool: PgPool) -> axum::Router {
    dotenvy::dotenv().ok();
    let state = AppState {
        db: pool.clone(),
        jwt_config: JwtConfig::from_env(),
        cors_config: CorsConfig::from_env(),
    };
    init_router(state)
}
