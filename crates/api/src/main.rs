use std::net::SocketAddr;
use std::sync::Arc;

use protolab_api::config::ServerConfig;
use protolab_api::router::build_app_router;
use protolab_api::state::AppState;
use protolab_api::uploads::UploadStore;
use protolab_assistant::{AssistantConfig, ChatClient};
use protolab_notify::{EmailConfig, LogNotifier, Notifier, SmtpNotifier};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    // --- Tracing ---
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "protolab_api=debug,tower_http=debug".into());
    let json_logs = std::env::var("LOG_FORMAT").is_ok_and(|v| v.eq_ignore_ascii_case("json"));
    if json_logs {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer())
            .init();
    }

    // --- Configuration ---
    let config = ServerConfig::from_env();
    tracing::info!(host = %config.host, port = %config.port, "Loaded server configuration");

    // --- Database ---
    let database_url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");

    let pool = protolab_db::create_pool(&database_url)
        .await
        .expect("Failed to connect to database");
    tracing::info!("Database connection pool created");

    protolab_db::health_check(&pool)
        .await
        .expect("Database health check failed");
    tracing::info!("Database health check passed");

    protolab_db::run_migrations(&pool)
        .await
        .expect("Failed to run database migrations");

    if let Some(seed) = &config.admin_seed {
        protolab_api::auth::seed::ensure_admin(&pool, seed)
            .await
            .expect("Failed to seed admin account");
    }

    // --- Uploads ---
    let uploads = UploadStore::new(config.uploads.clone());
    uploads
        .ensure_dir()
        .await
        .expect("Failed to create upload directory");
    tracing::info!(dir = %uploads.dir().display(), "Upload directory ready");

    // --- Email ---
    let notifier: Arc<dyn Notifier> = match EmailConfig::from_env() {
        Some(email_config) => {
            tracing::info!(smtp_host = %email_config.smtp_host, "SMTP email delivery enabled");
            Arc::new(SmtpNotifier::new(email_config).expect("Invalid SMTP configuration"))
        }
        None => {
            tracing::info!("SMTP_HOST not set, emails will only be logged");
            Arc::new(LogNotifier)
        }
    };

    // --- Assistant ---
    let assistant_config = AssistantConfig::from_env().expect("Invalid assistant configuration");
    tracing::info!(
        provider = assistant_config.provider.as_str(),
        model = %assistant_config.model,
        "Assistant relay configured",
    );
    let assistant = ChatClient::new(assistant_config).expect("Failed to build assistant client");

    // --- App state ---
    let state = AppState {
        pool: pool.clone(),
        config: Arc::new(config.clone()),
        notifier,
        uploads: Arc::new(uploads),
        assistant: Arc::new(assistant),
    };

    let app = build_app_router(state, &config);

    // --- Start server ---
    let addr = SocketAddr::new(
        config.host.parse().expect("Invalid HOST address"),
        config.port,
    );
    tracing::info!(%addr, "Starting server");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind to address");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("Server error");

    pool.close().await;
    tracing::info!("Graceful shutdown complete");
}

/// Wait for SIGINT (Ctrl-C) or, on Unix, SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl-C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            tracing::info!("Received SIGINT (Ctrl-C), starting graceful shutdown");
        }
        () = terminate => {
            tracing::info!("Received SIGTERM, starting graceful shutdown");
        }
    }
}
