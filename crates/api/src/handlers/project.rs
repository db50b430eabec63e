//! Handlers for the public portfolio of past projects.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use protolab_core::error::CoreError;
use protolab_core::project;
use protolab_core::types::DbId;
use protolab_core::validation::validate_payload;
use protolab_db::models::project::{CreateProject, Project, ProjectListParams, UpdateProject};
use protolab_db::repositories::ProjectRepo;

use crate::error::{AppError, AppResult};
use crate::extract::{AppJson, AppQuery};
use crate::middleware::rbac::RequireAdmin;
use crate::response::{DataResponse, Deleted};
use crate::state::AppState;

fn not_found(id: DbId) -> AppError {
    AppError::Core(CoreError::NotFound {
        entity: "Project",
        id,
    })
}

/// GET /api/v1/projects
///
/// Featured projects first, then newest.
pub async fn list(
    State(state): State<AppState>,
    AppQuery(params): AppQuery<ProjectListParams>,
) -> AppResult<Json<DataResponse<Vec<Project>>>> {
    if let Some(status) = &params.status {
        project::validate_status(status)?;
    }
    let projects = ProjectRepo::list(&state.pool, &params).await?;
    Ok(Json(DataResponse { data: projects }))
}

/// GET /api/v1/projects/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Project>>> {
    let project = ProjectRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| not_found(id))?;
    Ok(Json(DataResponse { data: project }))
}

/// POST /api/v1/projects
pub async fn create(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    AppJson(input): AppJson<CreateProject>,
) -> AppResult<(StatusCode, Json<DataResponse<Project>>)> {
    validate_payload(&input)?;
    let project = ProjectRepo::create(&state.pool, &input).await?;
    tracing::info!(project_id = project.id, admin_id = admin.user_id, "Project created");
    Ok((StatusCode::CREATED, Json(DataResponse { data: project })))
}

/// PUT /api/v1/projects/{id}
pub async fn update(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    AppJson(input): AppJson<UpdateProject>,
) -> AppResult<Json<DataResponse<Project>>> {
    validate_payload(&input)?;
    let project = ProjectRepo::update(&state.pool, id, &input)
        .await?
        .ok_or_else(|| not_found(id))?;
    tracing::info!(project_id = id, admin_id = admin.user_id, "Project updated");
    Ok(Json(DataResponse { data: project }))
}

/// DELETE /api/v1/projects/{id}
pub async fn delete(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Deleted>>> {
    if !ProjectRepo::delete(&state.pool, id).await? {
        return Err(not_found(id));
    }
    tracing::info!(project_id = id, admin_id = admin.user_id, "Project deleted");
    Ok(Json(Deleted::new(id)))
}
