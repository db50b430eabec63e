pub mod analytics;
pub mod assistant;
pub mod auth;
pub mod contact;
pub mod health;
pub mod internship;
pub mod project;
pub mod service_request;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /auth/register                                   register (public)
/// /auth/login                                      login (public)
/// /auth/me                                         current user (auth)
///
/// /contact                                         submit (public), list (admin)
/// /contact/{id}                                    delete (admin)
/// /contact/{id}/status                             set status (admin)
///
/// /projects                                        list (public), create (admin)
/// /projects/{id}                                   get (public), update, delete (admin)
///
/// /service-requests                                submit (optional auth), list (admin)
/// /service-requests/mine                           caller's requests (auth)
/// /service-requests/stats                          counters (admin)
/// /service-requests/{id}                           get (admin or owner), update, delete (admin)
/// /service-requests/{id}/status                    set status (admin)
/// /service-requests/{id}/notes                     append note (admin)
/// /service-requests/{id}/pricing                   update pricing (admin)
///
/// /internships                                     list (admin)
/// /internships/apply                               apply (public)
/// /internships/stats                               counters (admin)
/// /internships/{id}                                get, delete (admin)
/// /internships/{id}/status                         set status (admin)
/// /internships/{id}/notes                          append note (admin)
/// /internships/{id}/scores                         update scores (admin)
/// /internships/{id}/assignment                     set assignment (admin)
/// /internships/{id}/assignment/submission          hand in (public, email must match)
///
/// /analytics/events                                record (public), list (admin)
/// /analytics/summary                               report (admin)
///
/// /assistant/chat                                  relay chat (public)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/auth", auth::router())
        .nest("/contact", contact::router())
        .nest("/projects", project::router())
        .nest("/service-requests", service_request::router())
        .nest("/internships", internship::router())
        .nest("/analytics", analytics::router())
        .nest("/assistant", assistant::router())
}
