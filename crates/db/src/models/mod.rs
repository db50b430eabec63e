//! Domain model structs and DTOs.
//!
//! Each submodule contains:
//! - A `FromRow` + `Serialize` entity struct matching the database row
//! - A `Deserialize` + `Validate` create DTO for inserts
//! - A `Deserialize` update DTO (all `Option` fields) for patches
//! - A `Deserialize` list-params struct for query strings

pub mod analytics;
pub mod contact;
pub mod internship;
pub mod project;
pub mod service_request;
pub mod user;

use serde::Serialize;
use sqlx::FromRow;

/// One `GROUP BY` bucket: a label and how many rows carry it.
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize)]
pub struct LabelCount {
    pub label: String,
    pub count: i64,
}
