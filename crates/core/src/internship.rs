//! Internship application vocabularies, nested records and validation.
//!
//! Applications move through a rough funnel
//! (`applied -> screening -> shortlisted -> interview_scheduled ->
//! interviewed -> accepted | rejected | withdrawn`), but like service
//! requests the status is a plain setter with no guarded transitions.

use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

use crate::attachment::{is_hosted_url, validate_attachment, FileAttachment};
use crate::error::CoreError;
use crate::types::Timestamp;
use crate::validation::{check_membership, check_value, field_error, validate_tags};

// ---------------------------------------------------------------------------
// Positions
// ---------------------------------------------------------------------------

pub const POSITION_WEB_DEVELOPMENT: &str = "WEB_DEVELOPMENT";
pub const POSITION_EMBEDDED_SYSTEMS: &str = "EMBEDDED_SYSTEMS";
pub const POSITION_PCB_DESIGN: &str = "PCB_DESIGN";
pub const POSITION_PRODUCT_DESIGN: &str = "PRODUCT_DESIGN";
pub const POSITION_3D_DESIGN: &str = "3D_DESIGN";
pub const POSITION_IOT_DEVELOPMENT: &str = "IOT_DEVELOPMENT";
pub const POSITION_ROBOTICS: &str = "ROBOTICS";
pub const POSITION_FULL_STACK: &str = "FULL_STACK";
pub const POSITION_FRONTEND: &str = "FRONTEND";
pub const POSITION_BACKEND: &str = "BACKEND";
pub const POSITION_MECHANICAL_DESIGN: &str = "MECHANICAL_DESIGN";
pub const POSITION_ELECTRONICS: &str = "ELECTRONICS";
pub const POSITION_AI_ML: &str = "AI_ML";
pub const POSITION_TRAINING_INQUIRY: &str = "TRAINING_INQUIRY";

pub const VALID_POSITIONS: &[&str] = &[
    POSITION_WEB_DEVELOPMENT,
    POSITION_EMBEDDED_SYSTEMS,
    POSITION_PCB_DESIGN,
    POSITION_PRODUCT_DESIGN,
    POSITION_3D_DESIGN,
    POSITION_IOT_DEVELOPMENT,
    POSITION_ROBOTICS,
    POSITION_FULL_STACK,
    POSITION_FRONTEND,
    POSITION_BACKEND,
    POSITION_MECHANICAL_DESIGN,
    POSITION_ELECTRONICS,
    POSITION_AI_ML,
    POSITION_TRAINING_INQUIRY,
];

// ---------------------------------------------------------------------------
// Status funnel
// ---------------------------------------------------------------------------

/// Initial status of every new application.
pub const STATUS_APPLIED: &str = "applied";
pub const STATUS_SCREENING: &str = "screening";
pub const STATUS_SHORTLISTED: &str = "shortlisted";
pub const STATUS_INTERVIEW_SCHEDULED: &str = "interview_scheduled";
pub const STATUS_INTERVIEWED: &str = "interviewed";
pub const STATUS_ACCEPTED: &str = "accepted";
pub const STATUS_REJECTED: &str = "rejected";
pub const STATUS_WITHDRAWN: &str = "withdrawn";

pub const VALID_STATUSES: &[&str] = &[
    STATUS_APPLIED,
    STATUS_SCREENING,
    STATUS_SHORTLISTED,
    STATUS_INTERVIEW_SCHEDULED,
    STATUS_INTERVIEWED,
    STATUS_ACCEPTED,
    STATUS_REJECTED,
    STATUS_WITHDRAWN,
];

// ---------------------------------------------------------------------------
// Ranges and listing
// ---------------------------------------------------------------------------

/// Upper bound for CGPA.
pub const MAX_CGPA: f64 = 10.0;

/// Upper bound for interview / technical / communication scores.
pub const MAX_SCORE: f64 = 10.0;

/// Upper bound for the assignment score.
pub const MAX_ASSIGNMENT_SCORE: f64 = 100.0;

/// Maximum number of project entries on one application.
pub const MAX_PROJECTS: usize = 10;

/// Columns admins may sort application listings by.
pub const SORTABLE_COLUMNS: &[&str] = &[
    "created_at",
    "applied_at",
    "updated_at",
    "status",
    "position",
    "full_name",
    "graduation_year",
    "cgpa",
    "interview_score",
    "technical_score",
];

// ---------------------------------------------------------------------------
// Nested records
// ---------------------------------------------------------------------------

/// A project the candidate worked on.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct ApplicantProject {
    #[serde(default)]
    #[validate(length(min = 2, max = 200))]
    pub name: String,
    #[serde(default)]
    #[validate(length(min = 10, max = 2000))]
    pub description: String,
    #[serde(default)]
    #[validate(custom(function = "validate_tags"))]
    pub technologies: Vec<String>,
    #[validate(url)]
    pub github_url: Option<String>,
    #[validate(url)]
    pub live_url: Option<String>,
}

/// Portfolio: either an external link or an uploaded file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Portfolio {
    Link { url: String },
    File { file: FileAttachment },
}

/// Take-home assignment given to a candidate, with its submission and score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Assignment {
    pub title: String,
    pub description: String,
    pub assigned_at: Timestamp,
    pub due_date: Option<Timestamp>,
    pub submission_url: Option<String>,
    pub submitted_at: Option<Timestamp>,
    pub score: Option<f64>,
    pub feedback: Option<String>,
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

pub fn validate_position_field(value: &str) -> Result<(), ValidationError> {
    check_membership(value, VALID_POSITIONS)
}

pub fn validate_status_field(value: &str) -> Result<(), ValidationError> {
    check_membership(value, VALID_STATUSES)
}

pub fn validate_status(status: &str) -> Result<(), CoreError> {
    check_value("application status", status, VALID_STATUSES)
}

pub fn validate_position(position: &str) -> Result<(), CoreError> {
    check_value("position", position, VALID_POSITIONS)
}

/// Bound the number of project entries.
pub fn validate_project_count(projects: &[ApplicantProject]) -> Result<(), ValidationError> {
    if projects.len() > MAX_PROJECTS {
        return Err(field_error(
            "projects",
            format!("must contain at most {MAX_PROJECTS} entries"),
        ));
    }
    Ok(())
}

/// Links must be absolute `http(s)` URLs; inline files follow the upload
/// allow-lists.
pub fn validate_portfolio(portfolio: &Portfolio) -> Result<(), ValidationError> {
    match portfolio {
        Portfolio::Link { url } => {
            let lower = url.trim().to_ascii_lowercase();
            if (lower.starts_with("http://") || lower.starts_with("https://")) && is_hosted_url(url) {
                Ok(())
            } else {
                Err(field_error("url", "portfolio link must be an http(s) URL".into()))
            }
        }
        Portfolio::File { file } => validate_attachment(file),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
