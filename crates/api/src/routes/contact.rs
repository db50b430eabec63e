//! Route definitions for the `/contact` resource.

use axum::routing::{delete, get, put};
use axum::Router;

use crate::handlers::contact;
use crate::state::AppState;

/// Routes mounted at `/contact`.
///
/// ```text
/// POST   /              -> create (public)
/// GET    /              -> list
/// PUT    /{id}/status   -> update_status
/// DELETE /{id}          -> delete
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(contact::list).post(contact::create))
        .route("/{id}/status", put(contact::update_status))
        .route("/{id}", delete(contact::delete))
}
