//! Handlers for contact-form messages.
//!
//! Submitting is public and alerts the site admin by email; reading and
//! triaging messages is admin-only.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use protolab_core::contact;
use protolab_core::error::CoreError;
use protolab_core::pagination::{PageRequest, DEFAULT_ADMIN_LIST_LIMIT, MAX_PAGE_LIMIT};
use protolab_core::types::DbId;
use protolab_core::validation::validate_payload;
use protolab_db::models::contact::{Contact, ContactListParams, CreateContact, UpdateContactStatus};
use protolab_db::repositories::ContactRepo;
use protolab_notify::{send_best_effort, templates};

use crate::error::{AppError, AppResult};
use crate::extract::{AppJson, AppQuery};
use crate::middleware::rbac::RequireAdmin;
use crate::response::{DataResponse, Deleted, PageResponse};
use crate::state::AppState;

fn not_found(id: DbId) -> AppError {
    AppError::Core(CoreError::NotFound {
        entity: "Contact",
        id,
    })
}

/// POST /api/v1/contact
///
/// The admin alert is best-effort: a mail failure is logged and the message
/// is still accepted.
pub async fn create(
    State(state): State<AppState>,
    AppJson(input): AppJson<CreateContact>,
) -> AppResult<(StatusCode, Json<DataResponse<Contact>>)> {
    validate_payload(&input)?;

    let contact = ContactRepo::create(&state.pool, &input).await?;
    tracing::info!(contact_id = contact.id, "Contact message received");

    if let Some(admin) = &state.config.admin_notify_email {
        let message = templates::contact_admin_alert(
            admin,
            &contact.name,
            &contact.email,
            contact.subject.as_deref(),
            &contact.message,
        );
        send_best_effort(state.notifier.as_ref(), &message).await;
    }

    Ok((StatusCode::CREATED, Json(DataResponse { data: contact })))
}

/// GET /api/v1/contact
pub async fn list(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    AppQuery(params): AppQuery<ContactListParams>,
) -> AppResult<Json<PageResponse<Contact>>> {
    if let Some(status) = &params.status {
        contact::validate_status(status)?;
    }
    let page = PageRequest::new(params.page, params.limit, DEFAULT_ADMIN_LIST_LIMIT, MAX_PAGE_LIMIT);

    let (data, total) = ContactRepo::list(&state.pool, params.status.as_deref(), page).await?;
    Ok(Json(PageResponse {
        data,
        pagination: page.meta(total),
    }))
}

/// PUT /api/v1/contact/{id}/status
pub async fn update_status(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    AppJson(input): AppJson<UpdateContactStatus>,
) -> AppResult<Json<DataResponse<Contact>>> {
    validate_payload(&input)?;

    let contact = ContactRepo::update_status(&state.pool, id, &input.status)
        .await?
        .ok_or_else(|| not_found(id))?;

    tracing::info!(contact_id = id, status = %contact.status, admin_id = admin.user_id, "Contact status updated");
    Ok(Json(DataResponse { data: contact }))
}

/// DELETE /api/v1/contact/{id}
pub async fn delete(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Deleted>>> {
    if !ContactRepo::delete(&state.pool, id).await? {
        return Err(not_found(id));
    }
    tracing::info!(contact_id = id, admin_id = admin.user_id, "Contact deleted");
    Ok(Json(Deleted::new(id)))
}
