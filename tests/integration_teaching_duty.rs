mod common;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use common::{
    create_test_semester, create_test_user, generate_unique_semester_name,
    generate_unique_username, setup_test_app,
};
use http_body_util::BodyExt;
use serde_json::json;
use sqlx::PgPool;
use tower::ServiceExt;

async fn get_auth_token(pool: &PgPool, username: &str, password: &str) -> String {
    let app = setup_test_app(pool.clone()).await;
    let request = Request::builder()
        .method("POST")
        .uri("/api/auth/login")
        .header("content-type", "application/json")
        .body(Body::from(
            serde_json::to_string(&json!({
                "username": username,
                "password": password
            }))
            .unwrap(),
        ))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    let body = response.into_body().collect().await.unwrap().to_bytes();
    let body: serde_json::Value = serde_json::from_slice(&body).unwrap();
    body["access_token"].as_str().unwrap().to_string()
}

async fn add_event(pool: &PgPool, teacher_id: i32, semester_id: i32, hours: f64) {
    sqlx::query(
        "INSERT INTO teaching_events (teacher_id, semester_id, name, hours)
         VALUES ($1, $2, 'Lecture', $3)",
    )
    .bind(teacher_id)
    .bind(semester_id)
    .bind(hours)
    .execute(pool)
    .await
    .unwrap();
}

#[sqlx::test(migrations = "./migrations")]
async fn test_teacher_sees_own_balance(pool: PgPool) {
    let username = generate_unique_username();
    let teacher = create_test_user(&pool, &username, "testpass123", "teacher").await;
    let semester_id = create_test_semester(&pool, &generate_unique_semester_name()).await;

    // 20 event hours against the default duty of 18.
    add_event(&pool, teacher.teacher_id.unwrap(), semester_id, 20.0).await;

    let token = get_auth_token(&pool, &username, "testpass123").await;
    let app = setup_test_app(pool.clone()).await;

    let request = Request::builder()
        .method("GET")
        .uri("/api/teaching-duty/balance")
        .header("authorization", format!("Bearer {}", token))
        .body(Body::empty())
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = response.into_body().collect().await.unwrap().to_bytes();
    let body: serde_json::Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(body["semesters"].as_array().unwrap().len(), 1);
    assert_eq!(body["accumulated_balance"], 2.0);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_teacher_cannot_access_overview(pool: PgPool) {
    let username = generate_unique_username();
    create_test_user(&pool, &username, "testpass123", "teacher").await;

    let token = get_auth_token(&pool, &username, "testpass123").await;
    let app = setup_test_app(pool.clone()).await;

    let request = Request::builder()
        .method("GET")
        .uri("/api/teaching-duty/overview")
        .header("authorization", format!("Bearer {}", token))
        .body(Body::empty())
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_controller_overview_lists_all_teachers(pool: PgPool) {
    let controller_name = generate_unique_username();
    create_test_user(&pool, &controller_name, "testpass123", "controller").await;

    let first = create_test_user(&pool, &generate_unique_username(), "pw123456", "teacher").await;
    let second = create_test_user(&pool, &generate_unique_username(), "pw123456", "teacher").await;
    let semester_id = create_test_semester(&pool, &generate_unique_semester_name()).await;

    add_event(&pool, first.teacher_id.unwrap(), semester_id, 18.0).await;
    add_event(&pool, second.teacher_id.unwrap(), semester_id, 12.0).await;

    let token = get_auth_token(&pool, &controller_name, "testpass123").await;
    let app = setup_test_app(pool.clone()).await;

    let request = Request::builder()
        .method("GET")
        .uri(format!("/api/teaching-duty/overview?semester_id={}", semester_id))
        .header("authorization", format!("Bearer {}", token))
        .body(Body::empty())
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = response.into_body().collect().await.unwrap().to_bytes();
    let rows: Vec<serde_json::Value> = serde_json::from_slice(&body).unwrap();
    assert_eq!(rows.len(), 2);

    let balances: Vec<f64> = rows
        .iter()
        .map(|r| r["balance"].as_f64().unwrap())
        .collect();
    // Duty is 18, so 18 event hours break even and 12 leave a deficit.
    assert!(balances.contains(&0.0));
    assert!(balances.contains(&-6.0));
}

#[sqlx::test(migrations = "./migrations")]
async fn test_teacher_events_are_scoped_to_self(pool: PgPool) {
    let first_name = generate_unique_username();
    let first = create_test_user(&pool, &first_name, "testpass123", "teacher").await;
    let second = create_test_user(&pool, &generate_unique_username(), "pw123456", "teacher").await;
    let semester_id = create_test_semester(&pool, &generate_unique_semester_name()).await;

    let token = get_auth_token(&pool, &first_name, "testpass123").await;

    // Reporting hours for another teacher is rejected.
    let app = setup_test_app(pool.clone()).await;
    let request = Request::builder()
        .method("POST")
        .uri("/api/teaching-events")
        .header("content-type", "application/json")
        .header("authorization", format!("Bearer {}", token))
        .body(Body::from(
            serde_json::to_string(&json!({
                "teacher_id": second.teacher_id.unwrap(),
                "semester_id": semester_id,
                "name": "Someone else's lecture",
                "hours": 4.0
            }))
            .unwrap(),
        ))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    // Reporting own hours works.
    let app = setup_test_app(pool.clone()).await;
    let request = Request::builder()
        .method("POST")
        .uri("/api/teaching-events")
        .header("content-type", "application/json")
        .header("authorization", format!("Bearer {}", token))
        .body(Body::from(
            serde_json::to_string(&json!({
                "teacher_id": first.teacher_id.unwrap(),
                "semester_id": semester_id,
                "name": "Own lecture",
                "hours": 4.0
            }))
            .unwrap(),
        ))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
}
