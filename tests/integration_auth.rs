mod common;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use common::{create_test_user, generate_unique_username, setup_test_app};
use http_body_util::BodyExt;
use serde_json::json;
use sqlx::PgPool;
use tower::ServiceExt;

fn login_request(username: &str, password: &str) -> Request<Body> {
    Request::builder()
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
        .unwrap()
}

#[sqlx::test(migrations = "./migrations")]
async fn test_login_success(pool: PgPool) {
    let username = generate_unique_username();
    create_test_user(&pool, &username, "testpass123", "teacher").await;

    let app = setup_test_app(pool).await;
    let response = app.oneshot(login_request(&username, "testpass123")).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let body = response.into_body().collect().await.unwrap().to_bytes();
    let body: serde_json::Value = serde_json::from_slice(&body).unwrap();
    assert!(body["access_token"].is_string());
    assert_eq!(body["user"]["username"], username);
    assert_eq!(body["user"]["role"], "TEACHER");
    assert!(body["user"].get("password").is_none());
}

#[sqlx::test(migrations = "./migrations")]
async fn test_login_wrong_password(pool: PgPool) {
    let username = generate_unique_username();
    create_test_user(&pool, &username, "testpass123", "teacher").await;

    let app = setup_test_app(pool).await;
    let response = app.oneshot(login_request(&username, "wrong")).await.unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_login_unknown_user(pool: PgPool) {
    let app = setup_test_app(pool).await;
    let response = app
        .oneshot(login_request("no-such-user", "testpass123"))
        .await
        .unwrap();

    // Unknown user and wrong password are indistinguishable.
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_protected_route_requires_token(pool: PgPool) {
    let app = setup_test_app(pool).await;

    let request = Request::builder()
        .method("GET")
        .uri("/api/users/profile")
        .body(Body::empty())
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}
