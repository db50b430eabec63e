//! Shared harness for the HTTP integration tests.
//!
//! Requests go straight into the router via `tower::ServiceExt::oneshot`,
//! without a TCP listener, through the same middleware stack as production.

#![allow(dead_code)]

use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::header::{AUTHORIZATION, CONTENT_TYPE};
use axum::http::{Method, Request};
use axum::response::Response;
use axum::Router;
use http_body_util::BodyExt;
use sqlx::PgPool;
use tower::ServiceExt;

use protolab_api::auth::jwt::{generate_access_token, JwtConfig};
use protolab_api::auth::password::hash_password;
use protolab_api::config::ServerConfig;
use protolab_api::router::build_app_router;
use protolab_api::state::AppState;
use protolab_api::uploads::{UploadConfig, UploadStore};
use protolab_assistant::{AssistantConfig, ChatClient, Provider};
use protolab_core::attachment::MAX_FILE_BYTES;
use protolab_db::models::user::{CreateUser, User};
use protolab_db::repositories::UserRepo;
use protolab_notify::{EmailMessage, LogNotifier, Notifier, NotifyError};

pub const TEST_JWT_SECRET: &str = "integration-test-secret-long-enough";
pub const ADMIN_NOTIFY_EMAIL: &str = "ops@protolab.test";
pub const TEST_PASSWORD: &str = "test_password_123!";

// ---------------------------------------------------------------------------
// Notifier doubles
// ---------------------------------------------------------------------------

/// Records every message it is asked to send.
#[derive(Default)]
pub struct RecordingNotifier {
    pub sent: Mutex<Vec<EmailMessage>>,
}

impl RecordingNotifier {
    pub fn recipients(&self) -> Vec<String> {
        self.sent.lock().unwrap().iter().map(|m| m.to.clone()).collect()
    }
}

#[async_trait]
impl Notifier for RecordingNotifier {
    async fn send(&self, message: &EmailMessage) -> Result<(), NotifyError> {
        self.sent.lock().unwrap().push(message.clone());
        Ok(())
    }
}

/// Fails every send, as an unreachable SMTP relay would.
pub struct FailingNotifier;

#[async_trait]
impl Notifier for FailingNotifier {
    async fn send(&self, _message: &EmailMessage) -> Result<(), NotifyError> {
        Err(NotifyError::Build("relay unavailable".into()))
    }
}

// ---------------------------------------------------------------------------
// App construction
// ---------------------------------------------------------------------------

/// Knobs for [`build_test_app_with`].
pub struct TestOptions {
    pub notifier: Arc<dyn Notifier>,
    pub assistant: AssistantConfig,
    pub upload_dir: PathBuf,
    pub max_file_bytes: usize,
}

impl Default for TestOptions {
    fn default() -> Self {
        Self {
            notifier: Arc::new(LogNotifier),
            // Nothing listens on the discard port, so calls fail fast.
            assistant: assistant_config("http://127.0.0.1:9"),
            upload_dir: fresh_upload_dir(),
            max_file_bytes: MAX_FILE_BYTES,
        }
    }
}

/// A unique, not-yet-created upload directory under the system temp dir.
pub fn fresh_upload_dir() -> PathBuf {
    std::env::temp_dir().join(format!("protolab-test-uploads-{}", uuid::Uuid::new_v4()))
}

/// OpenAI-style assistant settings pointing at `base_url`.
pub fn assistant_config(base_url: &str) -> AssistantConfig {
    AssistantConfig {
        provider: Provider::OpenAi,
        base_url: base_url.to_string(),
        api_key: Some("test-key".into()),
        model: "test-model".into(),
        timeout: Duration::from_secs(5),
    }
}

pub fn jwt_config() -> JwtConfig {
    JwtConfig {
        secret: TEST_JWT_SECRET.to_string(),
        access_token_expiry_mins: 60,
    }
}

pub fn test_config(upload_dir: PathBuf, max_file_bytes: usize) -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        jwt: jwt_config(),
        uploads: UploadConfig {
            dir: upload_dir,
            public_prefix: "/uploads".into(),
            max_file_bytes,
        },
        admin_notify_email: Some(ADMIN_NOTIFY_EMAIL.to_string()),
        admin_seed: None,
    }
}

/// Build the full application router with default test options.
pub fn build_test_app(pool: PgPool) -> Router {
    build_test_app_with(pool, TestOptions::default())
}

pub fn build_test_app_with(pool: PgPool, options: TestOptions) -> Router {
    let config = test_config(options.upload_dir, options.max_file_bytes);
    let state = AppState {
        pool,
        config: Arc::new(config.clone()),
        notifier: options.notifier,
        uploads: Arc::new(UploadStore::new(config.uploads.clone())),
        assistant: Arc::new(ChatClient::new(options.assistant).unwrap()),
    };
    build_app_router(state, &config)
}

// ---------------------------------------------------------------------------
// Users and tokens
// ---------------------------------------------------------------------------

pub async fn create_user(pool: &PgPool, email: &str, role: &str) -> User {
    UserRepo::create(
        pool,
        &CreateUser {
            name: "Test User".to_string(),
            email: email.to_string(),
            password_hash: hash_password(TEST_PASSWORD).unwrap(),
            role: role.to_string(),
        },
    )
    .await
    .unwrap()
}

pub fn token_for(user: &User) -> String {
    generate_access_token(user.id, &user.role, &jwt_config()).unwrap()
}

pub async fn admin_token(pool: &PgPool) -> String {
    token_for(&create_user(pool, "admin@protolab.test", "admin").await)
}

pub async fn user_token(pool: &PgPool, email: &str) -> (User, String) {
    let user = create_user(pool, email, "user").await;
    let token = token_for(&user);
    (user, token)
}

// ---------------------------------------------------------------------------
// Requests
// ---------------------------------------------------------------------------

async fn send(
    app: Router,
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Option<serde_json::Value>,
) -> Response {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(AUTHORIZATION, format!("Bearer {token}"));
    }
    let body = match body {
        Some(json) => {
            builder = builder.header(CONTENT_TYPE, "application/json");
            Body::from(json.to_string())
        }
        None => Body::empty(),
    };
    app.oneshot(builder.body(body).unwrap()).await.unwrap()
}

pub async fn get(app: Router, uri: &str) -> Response {
    send(app, Method::GET, uri, None, None).await
}

pub async fn get_auth(app: Router, uri: &str, token: &str) -> Response {
    send(app, Method::GET, uri, Some(token), None).await
}

pub async fn post_json(app: Router, uri: &str, body: serde_json::Value) -> Response {
    send(app, Method::POST, uri, None, Some(body)).await
}

pub async fn post_json_auth(app: Router, uri: &str, body: serde_json::Value, token: &str) -> Response {
    send(app, Method::POST, uri, Some(token), Some(body)).await
}

/// POST an arbitrary body, for malformed-input tests.
pub async fn post_raw(app: Router, uri: &str, content_type: &str, body: &str) -> Response {
    let request = Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header(CONTENT_TYPE, content_type)
        .body(Body::from(body.to_string()))
        .unwrap();
    app.oneshot(request).await.unwrap()
}

pub async fn put_json_auth(app: Router, uri: &str, body: serde_json::Value, token: &str) -> Response {
    send(app, Method::PUT, uri, Some(token), Some(body)).await
}

pub async fn delete_auth(app: Router, uri: &str, token: &str) -> Response {
    send(app, Method::DELETE, uri, Some(token), None).await
}

pub async fn body_json(response: Response) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

pub async fn body_bytes(response: Response) -> Vec<u8> {
    response.into_body().collect().await.unwrap().to_bytes().to_vec()
}

// ---------------------------------------------------------------------------
// Multipart
// ---------------------------------------------------------------------------

const BOUNDARY: &str = "protolab-test-boundary";

/// One part of a hand-built `multipart/form-data` body.
pub enum Part<'a> {
    Text {
        name: &'a str,
        value: String,
    },
    File {
        name: &'a str,
        file_name: &'a str,
        content_type: &'a str,
        bytes: &'a [u8],
    },
}

pub fn multipart_body(parts: &[Part<'_>]) -> Vec<u8> {
    let mut body = Vec::new();
    for part in parts {
        body.extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());
        match part {
            Part::Text { name, value } => {
                body.extend_from_slice(
                    format!("Content-Disposition: form-data; name=\"{name}\"\r\n\r\n").as_bytes(),
                );
                body.extend_from_slice(value.as_bytes());
            }
            Part::File {
                name,
                file_name,
                content_type,
                bytes,
            } => {
                body.extend_from_slice(
                    format!(
                        "Content-Disposition: form-data; name=\"{name}\"; filename=\"{file_name}\"\r\n\
                         Content-Type: {content_type}\r\n\r\n"
                    )
                    .as_bytes(),
                );
                body.extend_from_slice(bytes);
            }
        }
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
    body
}

pub async fn post_multipart(app: Router, uri: &str, parts: &[Part<'_>]) -> Response {
    let request = Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header(CONTENT_TYPE, format!("multipart/form-data; boundary={BOUNDARY}"))
        .body(Body::from(multipart_body(parts)))
        .unwrap();
    app.oneshot(request).await.unwrap()
}
