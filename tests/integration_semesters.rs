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

async fn controller_token(pool: &PgPool) -> String {
    let username = generate_unique_username();
    create_test_user(pool, &username, "testpass123", "controller").await;

    let app = setup_test_app(pool.clone()).await;
    let request = Request::builder()
        .method("POST")
        .uri("/api/auth/login")
        .header("content-type", "application/json")
        .body(Body::from(
            serde_json::to_string(&json!({
                "username": username,
                "password": "testpass123"
            }))
            .unwrap(),
        ))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    let body = response.into_body().collect().await.unwrap().to_bytes();
    let body: serde_json::Value = serde_json::from_slice(&body).unwrap();
    body["access_token"].as_str().unwrap().to_string()
}

#[sqlx::test(migrations = "./migrations")]
async fn test_create_semester_rejects_bad_dates(pool: PgPool) {
    let token = controller_token(&pool).await;
    let app = setup_test_app(pool.clone()).await;

    let request = Request::builder()
        .method("POST")
        .uri("/api/semesters")
        .header("content-type", "application/json")
        .header("authorization", format!("Bearer {}", token))
        .body(Body::from(
            serde_json::to_string(&json!({
                "name": generate_unique_semester_name(),
                "start_date": "2026-03-31",
                "end_date": "2025-10-01"
            }))
            .unwrap(),
        ))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_activate_semester_deactivates_previous(pool: PgPool) {
    let token = controller_token(&pool).await;

    let first = create_test_semester(&pool, &generate_unique_semester_name()).await;
    let second = create_test_semester(&pool, &generate_unique_semester_name()).await;

    for id in [first, second] {
        let app = setup_test_app(pool.clone()).await;
        let request = Request::builder()
            .method("POST")
            .uri(format!("/api/semesters/{}/activate", id))
            .header("authorization", format!("Bearer {}", token))
            .body(Body::empty())
            .unwrap();
        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    let app = setup_test_app(pool.clone()).await;
    let request = Request::builder()
        .method("GET")
        .uri("/api/semesters/active")
        .header("authorization", format!("Bearer {}", token))
        .body(Body::empty())
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = response.into_body().collect().await.unwrap().to_bytes();
    let body: serde_json::Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(body["id"], second);

    let active_count =
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM semesters WHERE is_active")
            .fetch_one(&pool)
            .await
            .unwrap();
    assert_eq!(active_count, 1);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_teacher_cannot_create_semester(pool: PgPool) {
    let username = generate_unique_username();
    create_test_user(&pool, &username, "testpass123", "teacher").await;

    let app = setup_test_app(pool.clone()).await;
    let request = Request::builder()
        .method("POST")
        .uri("/api/auth/login")
        .header("content-type", "application/json")
        .body(Body::from(
            serde_json::to_string(&json!({
                "username": username,
                "password": "testpass123"
            }))
            .unwrap(),
        ))
        .unwrap();
    let response = app.oneshot(request).await.unwrap();
    let body = response.into_body().collect().await.unwrap().to_bytes();
    let body: serde_json::Value = serde_json::from_slice(&body).unwrap();
    let token = body["access_token"].as_str().unwrap().to_string();

    let app = setup_test_app(pool.clone()).await;
    let request = Request::builder()
        .method("POST")
        .uri("/api/semesters")
        .header("content-type", "application/json")
        .header("authorization", format!("Bearer {}", token))
        .body(Body::from(
            serde_json::to_string(&json!({
                "name": generate_unique_semester_name(),
                "start_date": "2025-10-01",
                "end_date": "2026-03-31"
            }))
            .unwrap(),
        ))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}
