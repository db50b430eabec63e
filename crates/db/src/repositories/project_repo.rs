//! Repository for the `projects` (portfolio) table.

use protolab_core::project::STATUS_COMPLETED;
use protolab_core::types::DbId;
use sqlx::PgPool;

use crate::filter::{bind_values, Filter};
use crate::models::project::{CreateProject, Project, ProjectListParams, UpdateProject};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, title, description, category, technologies, image_url, \
                       project_url, github_url, client, featured, completion_date, \
                       status, created_at, updated_at";

/// Provides CRUD operations for portfolio projects.
pub struct ProjectRepo;

impl ProjectRepo {
    /// Insert a new project, returning the created row.
    ///
    /// If `status` is `None`, defaults to `completed`.
    pub async fn create(pool: &PgPool, input: &CreateProject) -> Result<Project, sqlx::Error> {
        let query = format!(
            "INSERT INTO projects
                (title, description, category, technologies, image_url, project_url,
                 github_url, client, featured, completion_date, status)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Project>(&query)
            .bind(&input.title)
            .bind(&input.description)
            .bind(&input.category)
            .bind(&input.technologies)
            .bind(&input.image_url)
            .bind(&input.project_url)
            .bind(&input.github_url)
            .bind(&input.client)
            .bind(input.featured.unwrap_or(false))
            .bind(input.completion_date)
            .bind(input.status.as_deref().unwrap_or(STATUS_COMPLETED))
            .fetch_one(pool)
            .await
    }

    /// Find a project by its internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Project>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM projects WHERE id = $1");
        sqlx::query_as::<_, Project>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List projects, featured first then newest.
    pub async fn list(
        pool: &PgPool,
        params: &ProjectListParams,
    ) -> Result<Vec<Project>, sqlx::Error> {
        let mut filter = Filter::new();
        filter
            .eq_text("category", params.category.as_deref())
            .eq_text("status", params.status.as_deref())
            .eq_bool("featured", params.featured);
        let query = format!(
            "SELECT {COLUMNS} FROM projects {} \
             ORDER BY featured DESC, created_at DESC, id DESC",
            filter.where_clause()
        );
        bind_values(sqlx::query_as::<_, Project>(&query), filter.binds())
            .fetch_all(pool)
            .await
    }

    /// Update a project. Only non-`None` fields in `input` are applied.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateProject,
    ) -> Result<Option<Project>, sqlx::Error> {
        let query = format!(
            "UPDATE projects SET
                title = COALESCE($2, title),
                description = COALESCE($3, description),
                category = COALESCE($4, category),
                technologies = COALESCE($5, technologies),
                image_url = COALESCE($6, image_url),
                project_url = COALESCE($7, project_url),
                github_url = COALESCE($8, github_url),
                client = COALESCE($9, client),
                featured = COALESCE($10, featured),
                completion_date = COALESCE($11, completion_date),
                status = COALESCE($12, status)
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Project>(&query)
            .bind(id)
            .bind(&input.title)
            .bind(&input.description)
            .bind(&input.category)
            .bind(&input.technologies)
            .bind(&input.image_url)
            .bind(&input.project_url)
            .bind(&input.github_url)
            .bind(&input.client)
            .bind(input.featured)
            .bind(input.completion_date)
            .bind(&input.status)
            .fetch_optional(pool)
            .await
    }

    /// Delete a project. Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM projects WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
