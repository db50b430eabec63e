//! Repository for the `internship_applications` table.
//!
//! Lifecycle mutations follow the same single-statement pattern as
//! [`super::ServiceRequestRepo`]. The assignment sub-record is a JSONB object
//! merged with `||`, so setting it twice keeps the original `assigned_at`.

use protolab_core::attachment::FileAttachment;
use protolab_core::internship::Portfolio;
use protolab_core::lifecycle::OrderNote;
use protolab_core::pagination::{PageRequest, SortSpec};
use protolab_core::types::DbId;
use sqlx::types::Json;
use sqlx::PgPool;

use crate::filter::{bind_values, bind_values_scalar, Filter};
use crate::models::internship::{
    ApplicationListParams, ApplicationStats, CreateInternshipApplication, InternshipApplication,
    SetAssignment, UpdateScores,
};
use crate::models::LabelCount;

/// Column list for `internship_applications` queries.
const COLUMNS: &str = "\
    id, full_name, email, phone, linkedin_url, github_url, college, degree, \
    branch, year_of_study, graduation_year, cgpa, position, resume, portfolio, \
    projects, skills, cover_letter, availability, preferred_start_date, status, \
    interview_date, interview_score, technical_score, communication_score, \
    notes, status_history, assignment, applied_at, created_at, updated_at";

/// Provides CRUD and lifecycle operations for internship applications.
pub struct InternshipRepo;

impl InternshipRepo {
    /// Insert a new application in status `applied`.
    ///
    /// `resume` and `portfolio` are the resolved attachments (uploaded or
    /// given inline); the corresponding DTO fields are ignored.
    pub async fn create(
        pool: &PgPool,
        input: &CreateInternshipApplication,
        resume: &FileAttachment,
        portfolio: Option<&Portfolio>,
    ) -> Result<InternshipApplication, sqlx::Error> {
        let query = format!(
            "INSERT INTO internship_applications \
                (full_name, email, phone, linkedin_url, github_url, college, degree, \
                 branch, year_of_study, graduation_year, cgpa, position, resume, \
                 portfolio, projects, skills, cover_letter, availability, \
                 preferred_start_date) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, \
                     $14, $15, $16, $17, $18, $19) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, InternshipApplication>(&query)
            .bind(&input.full_name)
            .bind(&input.email)
            .bind(&input.phone)
            .bind(&input.linkedin_url)
            .bind(&input.github_url)
            .bind(&input.college)
            .bind(&input.degree)
            .bind(&input.branch)
            .bind(input.year_of_study)
            .bind(input.graduation_year)
            .bind(input.cgpa)
            .bind(&input.position)
            .bind(Json(resume))
            .bind(portfolio.map(Json))
            .bind(Json(&input.projects))
            .bind(&input.skills)
            .bind(&input.cover_letter)
            .bind(&input.availability)
            .bind(input.preferred_start_date)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<InternshipApplication>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM internship_applications WHERE id = $1");
        sqlx::query_as::<_, InternshipApplication>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// One page of applications matching every present filter, plus the
    /// total number of matches.
    pub async fn list(
        pool: &PgPool,
        params: &ApplicationListParams,
        sort: SortSpec,
        page: PageRequest,
    ) -> Result<(Vec<InternshipApplication>, i64), sqlx::Error> {
        let mut filter = Filter::new();
        filter
            .eq_text("position", params.position.as_deref())
            .eq_text("status", params.status.as_deref())
            .eq_text_ci("email", params.email.as_deref());
        let where_clause = filter.where_clause();
        let idx = filter.next_param();

        let query = format!(
            "SELECT {COLUMNS} FROM internship_applications {where_clause} \
             ORDER BY {} \
             LIMIT ${idx} OFFSET ${}",
            sort.order_by(),
            idx + 1
        );
        let rows = bind_values(
            sqlx::query_as::<_, InternshipApplication>(&query),
            filter.binds(),
        )
        .bind(page.limit)
        .bind(page.offset())
        .fetch_all(pool)
        .await?;

        let count_query = format!("SELECT COUNT(*) FROM internship_applications {where_clause}");
        let total = bind_values_scalar(sqlx::query_scalar::<_, i64>(&count_query), filter.binds())
            .fetch_one(pool)
            .await?;

        Ok((rows, total))
    }

    /// Overwrite the status and append a history entry recording the change.
    pub async fn set_status(
        pool: &PgPool,
        id: DbId,
        status: &str,
        changed_by: &str,
    ) -> Result<Option<InternshipApplication>, sqlx::Error> {
        let query = format!(
            "UPDATE internship_applications SET \
                status = $2, \
                status_history = status_history || jsonb_build_array(jsonb_build_object( \
                    'from', status, 'to', $2::text, \
                    'changed_by', $3::text, 'changed_at', NOW())) \
             WHERE id = $1 \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, InternshipApplication>(&query)
            .bind(id)
            .bind(status)
            .bind(changed_by)
            .fetch_optional(pool)
            .await
    }

    /// Append a reviewer note. Returns `None` if not found.
    pub async fn append_note(
        pool: &PgPool,
        id: DbId,
        note: &OrderNote,
    ) -> Result<Option<InternshipApplication>, sqlx::Error> {
        let query = format!(
            "UPDATE internship_applications SET notes = notes || $2 \
             WHERE id = $1 \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, InternshipApplication>(&query)
            .bind(id)
            .bind(Json([note]))
            .fetch_optional(pool)
            .await
    }

    /// Set whichever scores are present; absent ones keep their value.
    pub async fn update_scores(
        pool: &PgPool,
        id: DbId,
        input: &UpdateScores,
    ) -> Result<Option<InternshipApplication>, sqlx::Error> {
        let query = format!(
            "UPDATE internship_applications SET \
                interview_score = COALESCE($2, interview_score), \
                technical_score = COALESCE($3, technical_score), \
                communication_score = COALESCE($4, communication_score), \
                interview_date = COALESCE($5, interview_date) \
             WHERE id = $1 \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, InternshipApplication>(&query)
            .bind(id)
            .bind(input.interview_score)
            .bind(input.technical_score)
            .bind(input.communication_score)
            .bind(input.interview_date)
            .fetch_optional(pool)
            .await
    }

    /// Create or amend the take-home assignment.
    pub async fn set_assignment(
        pool: &PgPool,
        id: DbId,
        input: &SetAssignment,
    ) -> Result<Option<InternshipApplication>, sqlx::Error> {
        let query = format!(
            "UPDATE internship_applications SET \
                assignment = COALESCE(assignment, jsonb_build_object('assigned_at', NOW())) || $2 \
             WHERE id = $1 \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, InternshipApplication>(&query)
            .bind(id)
            .bind(Json(input))
            .fetch_optional(pool)
            .await
    }

    /// Record the candidate's submission URL on an existing assignment.
    ///
    /// Returns `None` if the application does not exist or has no assignment.
    pub async fn submit_assignment(
        pool: &PgPool,
        id: DbId,
        submission_url: &str,
    ) -> Result<Option<InternshipApplication>, sqlx::Error> {
        let query = format!(
            "UPDATE internship_applications SET \
                assignment = assignment || jsonb_build_object( \
                    'submission_url', $2::text, 'submitted_at', NOW()) \
             WHERE id = $1 AND assignment IS NOT NULL \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, InternshipApplication>(&query)
            .bind(id)
            .bind(submission_url)
            .fetch_optional(pool)
            .await
    }

    /// Delete an application. Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM internship_applications WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Totals grouped by status and by position.
    pub async fn stats(pool: &PgPool) -> Result<ApplicationStats, sqlx::Error> {
        let total = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM internship_applications")
            .fetch_one(pool)
            .await?;
        Ok(ApplicationStats {
            total,
            by_status: count_by(pool, "status").await?,
            by_position: count_by(pool, "position").await?,
        })
    }
}

async fn count_by(pool: &PgPool, column: &'static str) -> Result<Vec<LabelCount>, sqlx::Error> {
    let query = format!(
        "SELECT {column} AS label, COUNT(*) AS count FROM internship_applications \
         GROUP BY {column} ORDER BY count DESC, label"
    );
    sqlx::query_as::<_, LabelCount>(&query).fetch_all(pool).await
}
