use std::sync::Arc;

use protolab_assistant::ChatClient;
use protolab_notify::Notifier;

use crate::config::ServerConfig;
use crate::uploads::UploadStore;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc` or is already `Clone`).
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: protolab_db::DbPool,
    /// Server configuration (JWT settings, admin alert address).
    pub config: Arc<ServerConfig>,
    /// Outbound email. `LogNotifier` when SMTP is not configured.
    pub notifier: Arc<dyn Notifier>,
    /// On-disk storage for uploaded attachments.
    pub uploads: Arc<UploadStore>,
    /// Chat-completion relay for the site assistant.
    pub assistant: Arc<ChatClient>,
}
