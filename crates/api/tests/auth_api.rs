mod common;

use axum::http::StatusCode;
use common::{body_json, build_test_app, create_user, get, get_auth, post_json, TEST_PASSWORD};
use protolab_api::auth::seed::ensure_admin;
use protolab_api::config::AdminSeed;
use protolab_db::repositories::UserRepo;
use serde_json::json;
use sqlx::PgPool;

fn registration(email: &str) -> serde_json::Value {
    json!({
        "name": "Asha Rao",
        "email": email,
        "password": "correct-horse-battery",
    })
}

#[sqlx::test(migrations = "../db/migrations")]
async fn register_returns_token_and_user(pool: PgPool) {
    let app = build_test_app(pool);
    let response = post_json(app, "/api/v1/auth/register", registration("asha@example.com")).await;

    assert_eq!(response.status(), StatusCode::CREATED);
    let json = body_json(response).await;
    assert!(json["data"]["access_token"].is_string());
    assert_eq!(json["data"]["token_type"], "Bearer");
    assert_eq!(json["data"]["user"]["email"], "asha@example.com");
    assert_eq!(json["data"]["user"]["role"], "user");
    assert!(json["data"]["user"].get("password_hash").is_none());
}

#[sqlx::test(migrations = "../db/migrations")]
async fn register_duplicate_email_is_409(pool: PgPool) {
    let app = build_test_app(pool.clone());
    let first = post_json(app, "/api/v1/auth/register", registration("dup@example.com")).await;
    assert_eq!(first.status(), StatusCode::CREATED);

    let app = build_test_app(pool);
    let second = post_json(app, "/api/v1/auth/register", registration("dup@example.com")).await;
    assert_eq!(second.status(), StatusCode::CONFLICT);
    let json = body_json(second).await;
    assert_eq!(json["code"], "CONFLICT");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn register_rejects_short_password(pool: PgPool) {
    let app = build_test_app(pool);
    let body = json!({ "name": "Asha", "email": "asha@example.com", "password": "short" });
    let response = post_json(app, "/api/v1/auth/register", body).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["code"], "VALIDATION_ERROR");
    assert!(json["details"]["password"].is_array());
}

#[sqlx::test(migrations = "../db/migrations")]
async fn login_succeeds_and_token_opens_me(pool: PgPool) {
    create_user(&pool, "login@example.com", "user").await;

    let app = build_test_app(pool.clone());
    let response = post_json(
        app,
        "/api/v1/auth/login",
        json!({ "email": "login@example.com", "password": TEST_PASSWORD }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    let token = json["data"]["access_token"].as_str().unwrap().to_string();

    let app = build_test_app(pool.clone());
    let me = get_auth(app, "/api/v1/auth/me", &token).await;
    assert_eq!(me.status(), StatusCode::OK);
    let json = body_json(me).await;
    assert_eq!(json["data"]["email"], "login@example.com");

    let user = UserRepo::find_by_email(&pool, "login@example.com").await.unwrap().unwrap();
    assert!(user.last_login_at.is_some());
}

#[sqlx::test(migrations = "../db/migrations")]
async fn login_with_wrong_password_is_401(pool: PgPool) {
    create_user(&pool, "login@example.com", "user").await;

    let app = build_test_app(pool);
    let response = post_json(
        app,
        "/api/v1/auth/login",
        json!({ "email": "login@example.com", "password": "not-the-password" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let json = body_json(response).await;
    assert_eq!(json["error"], "Invalid email or password");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn login_for_unknown_email_is_401(pool: PgPool) {
    let app = build_test_app(pool);
    let response = post_json(
        app,
        "/api/v1/auth/login",
        json!({ "email": "ghost@example.com", "password": TEST_PASSWORD }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn me_requires_a_token(pool: PgPool) {
    let app = build_test_app(pool.clone());
    let response = get(app, "/api/v1/auth/me").await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let app = build_test_app(pool);
    let response = get_auth(app, "/api/v1/auth/me", "not-a-jwt").await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn admin_seed_runs_once(pool: PgPool) {
    let seed = AdminSeed {
        email: "root@protolab.test".into(),
        password: "seed-password-123".into(),
    };

    assert!(ensure_admin(&pool, &seed).await.unwrap());
    assert!(!ensure_admin(&pool, &seed).await.unwrap());

    let admin = UserRepo::find_by_email(&pool, "root@protolab.test").await.unwrap().unwrap();
    assert_eq!(admin.role, "admin");
}
