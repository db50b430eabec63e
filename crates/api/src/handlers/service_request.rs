//! Handlers for service requests (customer orders).
//!
//! Anyone may submit a request, with or without a token; a token links the
//! request to the caller so it shows up under `/service-requests/mine`.
//! Everything else is admin-only, except that owners may read their own
//! requests.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use protolab_core::error::CoreError;
use protolab_core::lifecycle::{normalize_author, OrderNote};
use protolab_core::pagination::{
    PageRequest, SortSpec, DEFAULT_SERVICE_REQUEST_LIMIT, MAX_PAGE_LIMIT,
};
use protolab_core::service_request::{
    validate_payment_status, validate_priority, validate_service_type, validate_status,
    SORTABLE_COLUMNS,
};
use protolab_core::types::DbId;
use protolab_core::validation::validate_payload;
use protolab_db::models::service_request::{
    AddNote, CreateServiceRequest, ServiceRequest, ServiceRequestListParams, ServiceRequestStats,
    UpdatePricing, UpdateServiceRequest, UpdateServiceRequestStatus,
};
use protolab_db::repositories::ServiceRequestRepo;
use protolab_notify::{send_best_effort, templates};

use crate::error::{AppError, AppResult};
use crate::extract::{AppJson, AppQuery};
use crate::middleware::auth::{AuthUser, OptionalAuthUser};
use crate::middleware::rbac::RequireAdmin;
use crate::response::{DataResponse, Deleted, PageResponse};
use crate::state::AppState;
use crate::uploads::Submission;

/// Multipart field name for service-request attachments.
pub const FILES_FIELD: &str = "files";

fn not_found(id: DbId) -> AppError {
    AppError::Core(CoreError::NotFound {
        entity: "ServiceRequest",
        id,
    })
}

fn validate_filters(params: &ServiceRequestListParams) -> Result<(), CoreError> {
    if let Some(v) = &params.status {
        validate_status(v)?;
    }
    if let Some(v) = &params.service_type {
        validate_service_type(v)?;
    }
    if let Some(v) = &params.payment_status {
        validate_payment_status(v)?;
    }
    if let Some(v) = &params.priority {
        validate_priority(v)?;
    }
    Ok(())
}

async fn list_page(
    state: &AppState,
    params: &ServiceRequestListParams,
    owner: Option<DbId>,
) -> AppResult<PageResponse<ServiceRequest>> {
    validate_filters(params)?;
    let sort = SortSpec::resolve(
        params.sort_by.as_deref(),
        params.sort_order.as_deref(),
        SORTABLE_COLUMNS,
    );
    let page = PageRequest::new(
        params.page,
        params.limit,
        DEFAULT_SERVICE_REQUEST_LIMIT,
        MAX_PAGE_LIMIT,
    );

    let (data, total) = ServiceRequestRepo::list(&state.pool, params, owner, sort, page).await?;
    Ok(PageResponse {
        data,
        pagination: page.meta(total),
    })
}

// ---------------------------------------------------------------------------
// Public / customer
// ---------------------------------------------------------------------------

/// POST /api/v1/service-requests
///
/// Accepts JSON, or multipart with a `data` part and up to ten `files`
/// parts. Files are only stored once the payload has validated.
pub async fn submit(
    OptionalAuthUser(caller): OptionalAuthUser,
    State(state): State<AppState>,
    submission: Submission<CreateServiceRequest>,
) -> AppResult<(StatusCode, Json<DataResponse<ServiceRequest>>)> {
    let input = submission.payload;
    validate_payload(&input)?;
    if let Some(stray) = submission.files.iter().find(|f| f.field != FILES_FIELD) {
        return Err(AppError::BadRequest(format!(
            "Unexpected file field '{}'. Attachments must be sent as '{FILES_FIELD}'",
            stray.field
        )));
    }

    let files = state.uploads.store_all(submission.files).await?;
    let user_id = caller.map(|c| c.user_id);

    let request = match ServiceRequestRepo::create(&state.pool, user_id, &input, &files).await {
        Ok(request) => request,
        Err(e) => {
            state.uploads.discard(&files).await;
            return Err(e.into());
        }
    };

    tracing::info!(
        service_request_id = request.id,
        service_type = %request.service_type,
        file_count = files.len(),
        user_id = ?user_id,
        "Service request submitted",
    );

    let ack = templates::service_request_received(
        &request.customer_email,
        &request.customer_name,
        request.id,
        &request.project_title,
        &request.service_type,
    );
    send_best_effort(state.notifier.as_ref(), &ack).await;

    if let Some(admin) = &state.config.admin_notify_email {
        let alert = templates::service_request_admin_alert(
            admin,
            request.id,
            &request.customer_name,
            &request.customer_email,
            &request.project_title,
            &request.service_type,
            files.len(),
        );
        send_best_effort(state.notifier.as_ref(), &alert).await;
    }

    Ok((StatusCode::CREATED, Json(DataResponse { data: request })))
}

/// GET /api/v1/service-requests/mine
pub async fn list_mine(
    auth: AuthUser,
    State(state): State<AppState>,
    AppQuery(params): AppQuery<ServiceRequestListParams>,
) -> AppResult<Json<PageResponse<ServiceRequest>>> {
    Ok(Json(list_page(&state, &params, Some(auth.user_id)).await?))
}

/// GET /api/v1/service-requests/{id}
///
/// Admins can read any request; other users only their own.
pub async fn get_by_id(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<ServiceRequest>>> {
    let request = ServiceRequestRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| not_found(id))?;

    if !auth.is_admin() && request.user_id != Some(auth.user_id) {
        return Err(AppError::Core(CoreError::Forbidden(
            "You can only view your own service requests".into(),
        )));
    }

    Ok(Json(DataResponse { data: request }))
}

// ---------------------------------------------------------------------------
// Admin
// ---------------------------------------------------------------------------

/// GET /api/v1/service-requests
pub async fn list(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    AppQuery(params): AppQuery<ServiceRequestListParams>,
) -> AppResult<Json<PageResponse<ServiceRequest>>> {
    Ok(Json(list_page(&state, &params, None).await?))
}

/// GET /api/v1/service-requests/stats
pub async fn stats(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<ServiceRequestStats>>> {
    let stats = ServiceRequestRepo::stats(&state.pool).await?;
    Ok(Json(DataResponse { data: stats }))
}

/// PUT /api/v1/service-requests/{id}
pub async fn update(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    AppJson(input): AppJson<UpdateServiceRequest>,
) -> AppResult<Json<DataResponse<ServiceRequest>>> {
    validate_payload(&input)?;
    let request = ServiceRequestRepo::update(&state.pool, id, &input)
        .await?
        .ok_or_else(|| not_found(id))?;
    tracing::info!(service_request_id = id, admin_id = admin.user_id, "Service request updated");
    Ok(Json(DataResponse { data: request }))
}

/// PUT /api/v1/service-requests/{id}/status
///
/// Any status may follow any other; every change is appended to
/// `status_history`.
pub async fn set_status(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    AppJson(input): AppJson<UpdateServiceRequestStatus>,
) -> AppResult<Json<DataResponse<ServiceRequest>>> {
    validate_payload(&input)?;
    let changed_by = normalize_author(input.changed_by.as_deref())?;

    let request = ServiceRequestRepo::set_status(&state.pool, id, &input.status, &changed_by)
        .await?
        .ok_or_else(|| not_found(id))?;

    tracing::info!(
        service_request_id = id,
        status = %request.status,
        admin_id = admin.user_id,
        "Service request status changed",
    );
    Ok(Json(DataResponse { data: request }))
}

/// POST /api/v1/service-requests/{id}/notes
pub async fn add_note(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    AppJson(input): AppJson<AddNote>,
) -> AppResult<Json<DataResponse<ServiceRequest>>> {
    let note = OrderNote::new(&input.note, input.added_by.as_deref())?;

    let request = ServiceRequestRepo::append_note(&state.pool, id, &note)
        .await?
        .ok_or_else(|| not_found(id))?;

    tracing::info!(
        service_request_id = id,
        note_count = request.notes.len(),
        admin_id = admin.user_id,
        "Note added to service request",
    );
    Ok(Json(DataResponse { data: request }))
}

/// PUT /api/v1/service-requests/{id}/pricing
pub async fn update_pricing(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    AppJson(input): AppJson<UpdatePricing>,
) -> AppResult<Json<DataResponse<ServiceRequest>>> {
    validate_payload(&input)?;
    let request = ServiceRequestRepo::update_pricing(&state.pool, id, &input)
        .await?
        .ok_or_else(|| not_found(id))?;
    tracing::info!(service_request_id = id, admin_id = admin.user_id, "Service request pricing updated");
    Ok(Json(DataResponse { data: request }))
}

/// DELETE /api/v1/service-requests/{id}
///
/// Attached files stay on disk.
pub async fn delete(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Deleted>>> {
    if !ServiceRequestRepo::delete(&state.pool, id).await? {
        return Err(not_found(id));
    }
    tracing::info!(service_request_id = id, admin_id = admin.user_id, "Service request deleted");
    Ok(Json(Deleted::new(id)))
}
