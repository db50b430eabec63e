use std::path::PathBuf;

use protolab_core::attachment::MAX_FILE_BYTES;

use crate::auth::jwt::JwtConfig;
use crate::uploads::UploadConfig;

/// Credentials for the admin account created at startup.
#[derive(Debug, Clone)]
pub struct AdminSeed {
    pub email: String,
    pub password: String,
}

/// Server configuration loaded from environment variables.
///
/// All fields except the JWT secret have defaults suitable for local
/// development. In production, override via environment variables.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS` env var.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// JWT token configuration (secret, expiry).
    pub jwt: JwtConfig,
    /// Where uploaded files are written and how their URLs are built.
    pub uploads: UploadConfig,
    /// Recipient of admin alerts (new contact messages, new orders).
    /// Alerts are skipped when unset.
    pub admin_notify_email: Option<String>,
    /// Admin account to create at startup, if both variables are set.
    pub admin_seed: Option<AdminSeed>,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                 | Default                    |
    /// |-------------------------|----------------------------|
    /// | `HOST`                  | `0.0.0.0`                  |
    /// | `PORT`                  | `3000`                     |
    /// | `CORS_ORIGINS`          | `http://localhost:5173`    |
    /// | `REQUEST_TIMEOUT_SECS`  | `30`                       |
    /// | `UPLOAD_DIR`            | `uploads`                  |
    /// | `UPLOAD_PUBLIC_PREFIX`  | `/uploads`                 |
    /// | `UPLOAD_MAX_FILE_BYTES` | `52428800` (50 MiB)        |
    /// | `ADMIN_NOTIFY_EMAIL`    | none                       |
    /// | `ADMIN_EMAIL`           | none                       |
    /// | `ADMIN_PASSWORD`        | none                       |
    ///
    /// # Panics
    ///
    /// Panics on malformed numeric values so misconfiguration fails at startup.
    /// `UPLOAD_MAX_FILE_BYTES` can only lower the per-file ceiling; larger
    /// values are clamped to 50 MiB, which the request body limit is sized for.
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());

        let port: u16 = std::env::var("PORT")
            .unwrap_or_else(|_| "3000".into())
            .parse()
            .expect("PORT must be a valid u16");

        let cors_origins: Vec<String> = std::env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:5173".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let request_timeout_secs: u64 = std::env::var("REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("REQUEST_TIMEOUT_SECS must be a valid u64");

        let uploads = UploadConfig {
            dir: PathBuf::from(std::env::var("UPLOAD_DIR").unwrap_or_else(|_| "uploads".into())),
            public_prefix: normalize_prefix(
                &std::env::var("UPLOAD_PUBLIC_PREFIX").unwrap_or_else(|_| "/uploads".into()),
            ),
            max_file_bytes: non_empty_var("UPLOAD_MAX_FILE_BYTES")
                .map(|v| {
                    v.parse::<usize>()
                        .expect("UPLOAD_MAX_FILE_BYTES must be a valid usize")
                })
                .map_or(MAX_FILE_BYTES, |limit| limit.min(MAX_FILE_BYTES)),
        };

        let admin_notify_email = non_empty_var("ADMIN_NOTIFY_EMAIL");

        let admin_seed = match (non_empty_var("ADMIN_EMAIL"), non_empty_var("ADMIN_PASSWORD")) {
            (Some(email), Some(password)) => Some(AdminSeed { email, password }),
            _ => None,
        };

        Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            jwt: JwtConfig::from_env(),
            uploads,
            admin_notify_email,
            admin_seed,
        }
    }
}

fn non_empty_var(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// `uploads/` -> `/uploads`. An empty or root prefix falls back to `/uploads`
/// because files cannot be served at the site root.
fn normalize_prefix(raw: &str) -> String {
    let trimmed = raw.trim().trim_matches('/');
    if trimmed.is_empty() {
        "/uploads".to_string()
    } else {
        format!("/{trimmed}")
    }
}
