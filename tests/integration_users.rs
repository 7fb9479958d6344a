mod common;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use common::{create_test_user, generate_unique_username, setup_test_app};
use http_body_util::BodyExt;
use serde_json::json;
use sqlx::PgPool;
use tower::ServiceExt;

async fn get_auth_token(app: axum::Router, username: &str, password: &str) -> String {
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

async fn controller_token(pool: &PgPool) -> String {
    let username = generate_unique_username();
    create_test_user(pool, &username, "testpass123", "controller").await;
    get_auth_token(setup_test_app(pool.clone()).await, &username, "testpass123").await
}

#[sqlx::test(migrations = "./migrations")]
async fn test_create_teacher_user_creates_sub_record(pool: PgPool) {
    let token = controller_token(&pool).await;
    let app = setup_test_app(pool.clone()).await;

    let username = generate_unique_username();
    let request = Request::builder()
        .method("POST")
        .uri("/api/users")
        .header("content-type", "application/json")
        .header("authorization", format!("Bearer {}", token))
        .body(Body::from(
            serde_json::to_string(&json!({
                "username": username,
                "password": "testpass123",
                "role": "TEACHER",
                "first_name": "Greta",
                "last_name": "Geo",
                "total_teaching_duty": 16.0
            }))
            .unwrap(),
        ))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    let body = response.into_body().collect().await.unwrap().to_bytes();
    let body: serde_json::Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(body["user"]["role"], "TEACHER");
    assert!(body["teacher"]["id"].is_number());
    assert!(body["controller"].is_null());
    assert_eq!(body["teacher"]["total_teaching_duty"], 16.0);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_create_controller_user_creates_sub_record(pool: PgPool) {
    let token = controller_token(&pool).await;
    let app = setup_test_app(pool.clone()).await;

    let username = generate_unique_username();
    let request = Request::builder()
        .method("POST")
        .uri("/api/users")
        .header("content-type", "application/json")
        .header("authorization", format!("Bearer {}", token))
        .body(Body::from(
            serde_json::to_string(&json!({
                "username": username,
                "password": "testpass123",
                "role": "CONTROLLER",
                "first_name": "Carl",
                "last_name": "Count"
            }))
            .unwrap(),
        ))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    let body = response.into_body().collect().await.unwrap().to_bytes();
    let body: serde_json::Value = serde_json::from_slice(&body).unwrap();
    assert!(body["controller"]["id"].is_number());
    assert!(body["teacher"].is_null());
}

#[sqlx::test(migrations = "./migrations")]
async fn test_get_missing_user_returns_404(pool: PgPool) {
    let token = controller_token(&pool).await;
    let app = setup_test_app(pool.clone()).await;

    let request = Request::builder()
        .method("GET")
        .uri("/api/users/999999")
        .header("authorization", format!("Bearer {}", token))
        .body(Body::empty())
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_teacher_cannot_list_users(pool: PgPool) {
    let username = generate_unique_username();
    create_test_user(&pool, &username, "testpass123", "teacher").await;
    let token =
        get_auth_token(setup_test_app(pool.clone()).await, &username, "testpass123").await;

    let app = setup_test_app(pool.clone()).await;
    let request = Request::builder()
        .method("GET")
        .uri("/api/users")
        .header("authorization", format!("Bearer {}", token))
        .body(Body::empty())
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_get_profile_includes_relation(pool: PgPool) {
    let username = generate_unique_username();
    create_test_user(&pool, &username, "testpass123", "teacher").await;
    let token =
        get_auth_token(setup_test_app(pool.clone()).await, &username, "testpass123").await;

    let app = setup_test_app(pool.clone()).await;
    let request = Request::builder()
        .method("GET")
        .uri("/api/users/profile")
        .header("authorization", format!("Bearer {}", token))
        .body(Body::empty())
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = response.into_body().collect().await.unwrap().to_bytes();
    let body: serde_json::Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(body["user"]["username"], username);
    assert!(body["teacher"]["id"].is_number());
}

#[sqlx::test(migrations = "./migrations")]
async fn test_update_user_persists(pool: PgPool) {
    let token = controller_token(&pool).await;

    let username = generate_unique_username();
    let user = create_test_user(&pool, &username, "testpass123", "teacher").await;

    let new_username = generate_unique_username();
    let app = setup_test_app(pool.clone()).await;
    let request = Request::builder()
        .method("PUT")
        .uri(format!("/api/users/{}", user.user_id))
        .header("content-type", "application/json")
        .header("authorization", format!("Bearer {}", token))
        .body(Body::from(
            serde_json::to_string(&json!({ "username": new_username })).unwrap(),
        ))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let app = setup_test_app(pool.clone()).await;
    let request = Request::builder()
        .method("GET")
        .uri(format!("/api/users/{}", user.user_id))
        .header("authorization", format!("Bearer {}", token))
        .body(Body::empty())
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    let body = response.into_body().collect().await.unwrap().to_bytes();
    let body: serde_json::Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(body["user"]["username"], new_username);
}
