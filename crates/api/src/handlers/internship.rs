//! Handlers for internship applications.
//!
//! Applying and handing in an assignment are public; the rest of the
//! pipeline (screening, scoring, notes) is admin-only.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use protolab_core::attachment::FileAttachment;
use protolab_core::error::CoreError;
use protolab_core::internship::{validate_position, validate_status, Portfolio, SORTABLE_COLUMNS};
use protolab_core::lifecycle::{normalize_author, OrderNote};
use protolab_core::pagination::{PageRequest, SortSpec, DEFAULT_ADMIN_LIST_LIMIT, MAX_PAGE_LIMIT};
use protolab_core::types::DbId;
use protolab_core::validation::{collect_errors, ensure_valid, push_error, validate_payload};
use protolab_db::models::internship::{
    ApplicationListParams, ApplicationStats, CreateInternshipApplication, InternshipApplication,
    SetAssignment, SubmitAssignment, UpdateApplicationStatus, UpdateScores,
};
use protolab_db::models::service_request::AddNote;
use protolab_db::repositories::InternshipRepo;
use protolab_notify::{send_best_effort, templates};

use crate::error::{AppError, AppResult};
use crate::extract::{AppJson, AppQuery};
use crate::middleware::rbac::RequireAdmin;
use crate::response::{DataResponse, Deleted, PageResponse};
use crate::state::AppState;
use crate::uploads::Submission;

/// Multipart field carrying the resume file.
pub const RESUME_FIELD: &str = "resume";

/// Multipart field carrying an uploaded portfolio.
pub const PORTFOLIO_FIELD: &str = "portfolio_file";

fn not_found(id: DbId) -> AppError {
    AppError::Core(CoreError::NotFound {
        entity: "InternshipApplication",
        id,
    })
}

// ---------------------------------------------------------------------------
// Public
// ---------------------------------------------------------------------------

/// POST /api/v1/internships/apply
///
/// Accepts JSON, or multipart with a `data` part plus optional `resume` and
/// `portfolio_file` parts. A resume is required, either uploaded or given
/// inline; an uploaded file takes precedence over an inline one.
pub async fn apply(
    State(state): State<AppState>,
    mut submission: Submission<CreateInternshipApplication>,
) -> AppResult<(StatusCode, Json<DataResponse<InternshipApplication>>)> {
    let resume_file = submission.take_file(RESUME_FIELD);
    let portfolio_file = submission.take_file(PORTFOLIO_FIELD);
    let input = submission.payload;

    let mut errors = collect_errors(&input);
    if input.resume.is_none() && resume_file.is_none() {
        push_error(&mut errors, "resume", "is required");
    }
    ensure_valid(errors)?;

    let mut stored: Vec<FileAttachment> = Vec::new();
    let resume = match resume_file {
        Some(file) => {
            let attachment = state.uploads.store(file).await?;
            stored.push(attachment.clone());
            attachment
        }
        // Checked above.
        None => input
            .resume
            .clone()
            .ok_or_else(|| AppError::InternalError("resume missing after validation".into()))?,
    };
    let portfolio = match portfolio_file {
        Some(file) => match state.uploads.store(file).await {
            Ok(attachment) => {
                stored.push(attachment.clone());
                Some(Portfolio::File { file: attachment })
            }
            Err(e) => {
                state.uploads.discard(&stored).await;
                return Err(e.into());
            }
        },
        None => input.portfolio.clone(),
    };

    let application =
        match InternshipRepo::create(&state.pool, &input, &resume, portfolio.as_ref()).await {
            Ok(application) => application,
            Err(e) => {
                state.uploads.discard(&stored).await;
                return Err(e.into());
            }
        };

    tracing::info!(
        application_id = application.id,
        position = %application.position,
        uploaded_files = stored.len(),
        "Internship application received",
    );

    let ack = templates::application_received(
        &application.email,
        &application.full_name,
        &application.position,
    );
    send_best_effort(state.notifier.as_ref(), &ack).await;

    Ok((StatusCode::CREATED, Json(DataResponse { data: application })))
}

/// POST /api/v1/internships/{id}/assignment/submission
///
/// The candidate proves ownership with the email they applied with
/// (case-insensitive). Resubmitting replaces the previous URL.
pub async fn submit_assignment(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    AppJson(input): AppJson<SubmitAssignment>,
) -> AppResult<Json<DataResponse<InternshipApplication>>> {
    validate_payload(&input)?;

    let application = InternshipRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| not_found(id))?;

    if !application.email.eq_ignore_ascii_case(input.email.trim()) {
        return Err(AppError::Core(CoreError::Forbidden(
            "Email does not match this application".into(),
        )));
    }

    let no_assignment =
        || AppError::Core(CoreError::Conflict("No assignment has been set for this application".into()));
    if application.assignment.is_none() {
        return Err(no_assignment());
    }

    let application = InternshipRepo::submit_assignment(&state.pool, id, &input.submission_url)
        .await?
        .ok_or_else(no_assignment)?;

    tracing::info!(application_id = id, "Assignment submitted");
    Ok(Json(DataResponse { data: application }))
}

// ---------------------------------------------------------------------------
// Admin
// ---------------------------------------------------------------------------

/// GET /api/v1/internships
pub async fn list(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    AppQuery(params): AppQuery<ApplicationListParams>,
) -> AppResult<Json<PageResponse<InternshipApplication>>> {
    if let Some(status) = &params.status {
        validate_status(status)?;
    }
    if let Some(position) = &params.position {
        validate_position(position)?;
    }
    let sort = SortSpec::resolve(
        params.sort_by.as_deref(),
        params.sort_order.as_deref(),
        SORTABLE_COLUMNS,
    );
    let page = PageRequest::new(params.page, params.limit, DEFAULT_ADMIN_LIST_LIMIT, MAX_PAGE_LIMIT);

    let (data, total) = InternshipRepo::list(&state.pool, &params, sort, page).await?;
    Ok(Json(PageResponse {
        data,
        pagination: page.meta(total),
    }))
}

/// GET /api/v1/internships/stats
pub async fn stats(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<ApplicationStats>>> {
    let stats = InternshipRepo::stats(&state.pool).await?;
    Ok(Json(DataResponse { data: stats }))
}

/// GET /api/v1/internships/{id}
pub async fn get_by_id(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<InternshipApplication>>> {
    let application = InternshipRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| not_found(id))?;
    Ok(Json(DataResponse { data: application }))
}

/// PUT /api/v1/internships/{id}/status
pub async fn set_status(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    AppJson(input): AppJson<UpdateApplicationStatus>,
) -> AppResult<Json<DataResponse<InternshipApplication>>> {
    validate_payload(&input)?;
    let changed_by = normalize_author(input.changed_by.as_deref())?;

    let application = InternshipRepo::set_status(&state.pool, id, &input.status, &changed_by)
        .await?
        .ok_or_else(|| not_found(id))?;

    tracing::info!(
        application_id = id,
        status = %application.status,
        admin_id = admin.user_id,
        "Application status changed",
    );
    Ok(Json(DataResponse { data: application }))
}

/// POST /api/v1/internships/{id}/notes
pub async fn add_note(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    AppJson(input): AppJson<AddNote>,
) -> AppResult<Json<DataResponse<InternshipApplication>>> {
    let note = OrderNote::new(&input.note, input.added_by.as_deref())?;
    let application = InternshipRepo::append_note(&state.pool, id, &note)
        .await?
        .ok_or_else(|| not_found(id))?;
    tracing::info!(application_id = id, admin_id = admin.user_id, "Note added to application");
    Ok(Json(DataResponse { data: application }))
}

/// PUT /api/v1/internships/{id}/scores
pub async fn update_scores(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    AppJson(input): AppJson<UpdateScores>,
) -> AppResult<Json<DataResponse<InternshipApplication>>> {
    validate_payload(&input)?;
    let application = InternshipRepo::update_scores(&state.pool, id, &input)
        .await?
        .ok_or_else(|| not_found(id))?;
    tracing::info!(application_id = id, admin_id = admin.user_id, "Application scores updated");
    Ok(Json(DataResponse { data: application }))
}

/// PUT /api/v1/internships/{id}/assignment
pub async fn set_assignment(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    AppJson(input): AppJson<SetAssignment>,
) -> AppResult<Json<DataResponse<InternshipApplication>>> {
    validate_payload(&input)?;
    let application = InternshipRepo::set_assignment(&state.pool, id, &input)
        .await?
        .ok_or_else(|| not_found(id))?;
    tracing::info!(application_id = id, admin_id = admin.user_id, "Assignment set");
    Ok(Json(DataResponse { data: application }))
}

/// DELETE /api/v1/internships/{id}
pub async fn delete(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Deleted>>> {
    if !InternshipRepo::delete(&state.pool, id).await? {
        return Err(not_found(id));
    }
    tracing::info!(application_id = id, admin_id = admin.user_id, "Application deleted");
    Ok(Json(Deleted::new(id)))
}
