//! Route definitions for the `/service-requests` resource.

use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post, put};
use axum::Router;
use protolab_core::attachment::MAX_SUBMISSION_BODY_BYTES;

use crate::handlers::service_request as sr;
use crate::state::AppState;

/// Routes mounted at `/service-requests`.
///
/// ```text
/// POST   /               -> submit (JSON or multipart, optional auth)
/// GET    /               -> list
/// GET    /mine           -> list_mine (auth)
/// GET    /stats          -> stats
/// GET    /{id}           -> get_by_id (admin or owner)
/// PUT    /{id}           -> update
/// DELETE /{id}           -> delete
/// PUT    /{id}/status    -> set_status
/// POST   /{id}/notes     -> add_note
/// PUT    /{id}/pricing   -> update_pricing
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(sr::list).post(sr::submit).layer(DefaultBodyLimit::max(MAX_SUBMISSION_BODY_BYTES)),
        )
        .route("/mine", get(sr::list_mine))
        .route("/stats", get(sr::stats))
        .route("/{id}", get(sr::get_by_id).put(sr::update).delete(sr::delete))
        .route("/{id}/status", put(sr::set_status))
        .route("/{id}/notes", post(sr::add_note))
        .route("/{id}/pricing", put(sr::update_pricing))
}
