//! Route definitions for the `/assistant` resource.

use axum::routing::post;
use axum::Router;

use crate::handlers::assistant;
use crate::state::AppState;

/// Routes mounted at `/assistant`.
///
/// ```text
/// POST /chat -> chat (public)
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route("/chat", post(assistant::chat))
}
