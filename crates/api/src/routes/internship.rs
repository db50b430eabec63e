//! Route definitions for the `/internships` resource.

use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post, put};
use axum::Router;
use protolab_core::attachment::MAX_SUBMISSION_BODY_BYTES;

use crate::handlers::internship;
use crate::state::AppState;

/// Routes mounted at `/internships`.
///
/// ```text
/// POST   /apply                        -> apply (JSON or multipart, public)
/// GET    /                             -> list
/// GET    /stats                        -> stats
/// GET    /{id}                         -> get_by_id
/// DELETE /{id}                         -> delete
/// PUT    /{id}/status                  -> set_status
/// POST   /{id}/notes                   -> add_note
/// PUT    /{id}/scores                  -> update_scores
/// PUT    /{id}/assignment              -> set_assignment
/// POST   /{id}/assignment/submission   -> submit_assignment (public)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(internship::list))
        .route(
            "/apply",
            post(internship::apply).layer(DefaultBodyLimit::max(MAX_SUBMISSION_BODY_BYTES)),
        )
        .route("/stats", get(internship::stats))
        .route("/{id}", get(internship::get_by_id).delete(internship::delete))
        .route("/{id}/status", put(internship::set_status))
        .route("/{id}/notes", post(internship::add_note))
        .route("/{id}/scores", put(internship::update_scores))
        .route("/{id}/assignment", put(internship::set_assignment))
        .route("/{id}/assignment/submission", post(internship::submit_assignment))
}
