//! Internship application model and DTOs.

use chrono::NaiveDate;
use protolab_core::attachment::{validate_attachment, FileAttachment};
use protolab_core::internship::{
    validate_portfolio, validate_position_field, validate_project_count, validate_status_field,
    ApplicantProject, Assignment, Portfolio,
};
use protolab_core::lifecycle::{OrderNote, StatusChange};
use protolab_core::types::{DbId, Timestamp};
use protolab_core::validation::{validate_phone, validate_tags};
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::FromRow;
use validator::Validate;

use super::LabelCount;

/// A row from the `internship_applications` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct InternshipApplication {
    pub id: DbId,
    pub full_name: String,
    pub email: String,
    pub phone: String,
    pub linkedin_url: Option<String>,
    pub github_url: Option<String>,
    pub college: String,
    pub degree: String,
    pub branch: Option<String>,
    pub year_of_study: Option<i32>,
    pub graduation_year: i32,
    pub cgpa: Option<f64>,
    pub position: String,
    pub resume: Json<FileAttachment>,
    pub portfolio: Option<Json<Portfolio>>,
    pub projects: Json<Vec<ApplicantProject>>,
    pub skills: Vec<String>,
    pub cover_letter: Option<String>,
    pub availability: Option<String>,
    pub preferred_start_date: Option<NaiveDate>,
    pub status: String,
    pub interview_date: Option<Timestamp>,
    pub interview_score: Option<f64>,
    pub technical_score: Option<f64>,
    pub communication_score: Option<f64>,
    pub notes: Json<Vec<OrderNote>>,
    pub status_history: Json<Vec<StatusChange>>,
    pub assignment: Option<Json<Assignment>>,
    pub applied_at: Timestamp,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Candidate submission.
///
/// `resume` and `portfolio` may be given inline (already-hosted files or a
/// link); multipart uploads fill them in after validation succeeds.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateInternshipApplication {
    #[serde(default)]
    #[validate(length(min = 2, max = 100))]
    pub full_name: String,
    #[serde(default)]
    #[validate(email)]
    pub email: String,
    #[serde(default)]
    #[validate(custom(function = "validate_phone"))]
    pub phone: String,
    #[validate(url)]
    pub linkedin_url: Option<String>,
    #[validate(url)]
    pub github_url: Option<String>,
    #[serde(default)]
    #[validate(length(min = 2, max = 200))]
    pub college: String,
    #[serde(default)]
    #[validate(length(min = 2, max = 100))]
    pub degree: String,
    #[validate(length(max = 100))]
    pub branch: Option<String>,
    #[validate(range(min = 1, max = 6))]
    pub year_of_study: Option<i32>,
    #[validate(required)]
    pub graduation_year: Option<i32>,
    #[validate(range(min = 0.0, max = 10.0))]
    pub cgpa: Option<f64>,
    #[serde(default)]
    #[validate(custom(function = "validate_position_field"))]
    pub position: String,
    #[validate(custom(function = "validate_attachment"))]
    pub resume: Option<FileAttachment>,
    #[validate(custom(function = "validate_portfolio"))]
    pub portfolio: Option<Portfolio>,
    #[serde(default)]
    #[validate(nested, custom(function = "validate_project_count"))]
    pub projects: Vec<ApplicantProject>,
    #[serde(default)]
    #[validate(custom(function = "validate_tags"))]
    pub skills: Vec<String>,
    #[validate(length(max = 5000))]
    pub cover_letter: Option<String>,
    #[validate(length(max = 200))]
    pub availability: Option<String>,
    pub preferred_start_date: Option<NaiveDate>,
}

/// Body of `PUT /internships/{id}/status`.
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateApplicationStatus {
    #[serde(default)]
    #[validate(custom(function = "validate_status_field"))]
    pub status: String,
    #[validate(length(max = 100))]
    pub changed_by: Option<String>,
}

/// Body of `PUT /internships/{id}/scores`. Absent fields are kept.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateScores {
    #[validate(range(min = 0.0, max = 10.0))]
    pub interview_score: Option<f64>,
    #[validate(range(min = 0.0, max = 10.0))]
    pub technical_score: Option<f64>,
    #[validate(range(min = 0.0, max = 10.0))]
    pub communication_score: Option<f64>,
    pub interview_date: Option<Timestamp>,
}

/// Body of `PUT /internships/{id}/assignment`.
///
/// Merged into any existing assignment; `assigned_at` is stamped on first set
/// and kept afterwards. `due_date`, `score` and `feedback` are only written
/// when present.
#[derive(Debug, Clone, Deserialize, Serialize, Validate)]
pub struct SetAssignment {
    #[serde(default)]
    #[validate(length(min = 2, max = 200))]
    pub title: String,
    #[serde(default)]
    #[validate(length(min = 10, max = 5000))]
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due_date: Option<Timestamp>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(range(min = 0.0, max = 100.0))]
    pub score: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(length(max = 5000))]
    pub feedback: Option<String>,
}

/// Candidate's assignment hand-in.
#[derive(Debug, Deserialize, Validate)]
pub struct SubmitAssignment {
    #[serde(default)]
    #[validate(email)]
    pub email: String,
    #[serde(default)]
    #[validate(url)]
    pub submission_url: String,
}

/// Query parameters for the admin listing.
#[derive(Debug, Default, Deserialize)]
pub struct ApplicationListParams {
    pub position: Option<String>,
    pub status: Option<String>,
    pub email: Option<String>,
    pub sort_by: Option<String>,
    pub sort_order: Option<String>,
    pub page: Option<i64>,
    pub limit: Option<i64>,
}

/// Dashboard counters for `GET /internships/stats`.
#[derive(Debug, Clone, Serialize)]
pub struct ApplicationStats {
    pub total: i64,
    pub by_status: Vec<LabelCount>,
    pub by_position: Vec<LabelCount>,
}
