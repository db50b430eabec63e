//! Contact-form message model and DTOs.

use protolab_core::contact::validate_status_field;
use protolab_core::types::{DbId, Timestamp};
use protolab_core::validation::validate_phone;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// A row from the `contacts` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Contact {
    pub id: DbId,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub subject: Option<String>,
    pub message: String,
    pub status: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Public contact-form submission.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateContact {
    #[serde(default)]
    #[validate(length(min = 2, max = 100))]
    pub name: String,
    #[serde(default)]
    #[validate(email)]
    pub email: String,
    #[validate(custom(function = "validate_phone"))]
    pub phone: Option<String>,
    #[validate(length(max = 200))]
    pub subject: Option<String>,
    #[serde(default)]
    #[validate(length(min = 10, max = 5000))]
    pub message: String,
}

/// Body of `PUT /contact/{id}/status`.
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateContactStatus {
    #[serde(default)]
    #[validate(custom(function = "validate_status_field"))]
    pub status: String,
}

/// Query parameters for listing contact messages.
#[derive(Debug, Default, Deserialize)]
pub struct ContactListParams {
    pub status: Option<String>,
    pub page: Option<i64>,
    pub limit: Option<i64>,
}
