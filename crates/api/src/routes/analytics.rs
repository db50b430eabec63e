//! Route definitions for the `/analytics` resource.

use axum::routing::get;
use axum::Router;

use crate::handlers::analytics;
use crate::state::AppState;

/// Routes mounted at `/analytics`.
///
/// ```text
/// POST /events    -> record (public)
/// GET  /events    -> list_events
/// GET  /summary   -> summary
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/events", get(analytics::list_events).post(analytics::record))
        .route("/summary", get(analytics::summary))
}
