//! Portfolio project model and DTOs.

use chrono::NaiveDate;
use protolab_core::project::validate_status_field;
use protolab_core::types::{DbId, Timestamp};
use protolab_core::validation::validate_tags;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// A row from the `projects` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Project {
    pub id: DbId,
    pub title: String,
    pub description: String,
    pub category: String,
    pub technologies: Vec<String>,
    pub image_url: Option<String>,
    pub project_url: Option<String>,
    pub github_url: Option<String>,
    pub client: Option<String>,
    pub featured: bool,
    pub completion_date: Option<NaiveDate>,
    pub status: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a portfolio project.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateProject {
    #[serde(default)]
    #[validate(length(min = 3, max = 200))]
    pub title: String,
    #[serde(default)]
    #[validate(length(min = 10, max = 5000))]
    pub description: String,
    #[serde(default)]
    #[validate(length(min = 2, max = 100))]
    pub category: String,
    #[serde(default)]
    #[validate(custom(function = "validate_tags"))]
    pub technologies: Vec<String>,
    #[validate(url)]
    pub image_url: Option<String>,
    #[validate(url)]
    pub project_url: Option<String>,
    #[validate(url)]
    pub github_url: Option<String>,
    #[validate(length(max = 200))]
    pub client: Option<String>,
    pub featured: Option<bool>,
    pub completion_date: Option<NaiveDate>,
    #[validate(custom(function = "validate_status_field"))]
    pub status: Option<String>,
}

/// DTO for updating a project. Only present fields change.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateProject {
    #[validate(length(min = 3, max = 200))]
    pub title: Option<String>,
    #[validate(length(min = 10, max = 5000))]
    pub description: Option<String>,
    #[validate(length(min = 2, max = 100))]
    pub category: Option<String>,
    #[validate(custom(function = "validate_tags"))]
    pub technologies: Option<Vec<String>>,
    #[validate(url)]
    pub image_url: Option<String>,
    #[validate(url)]
    pub project_url: Option<String>,
    #[validate(url)]
    pub github_url: Option<String>,
    #[validate(length(max = 200))]
    pub client: Option<String>,
    pub featured: Option<bool>,
    pub completion_date: Option<NaiveDate>,
    #[validate(custom(function = "validate_status_field"))]
    pub status: Option<String>,
}

/// Query parameters for the public project list.
#[derive(Debug, Default, Deserialize)]
pub struct ProjectListParams {
    pub category: Option<String>,
    pub status: Option<String>,
    pub featured: Option<bool>,
}
