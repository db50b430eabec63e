//! Service request (customer order) model and DTOs.

use chrono::NaiveDate;
use protolab_core::attachment::FileAttachment;
use protolab_core::lifecycle::{OrderNote, StatusChange};
use protolab_core::service_request::{
    validate_payment_status_field, validate_priority_field, validate_service_type_field,
    validate_specifications, validate_status_field,
};
use protolab_core::types::{DbId, Timestamp};
use protolab_core::validation::validate_phone;
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::FromRow;
use validator::Validate;

use super::LabelCount;

/// Free-form, order-preserving specifications object.
pub type Specifications = serde_json::Map<String, serde_json::Value>;

/// A row from the `service_requests` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ServiceRequest {
    pub id: DbId,
    pub user_id: Option<DbId>,
    pub service_type: String,
    pub status: String,
    pub customer_name: String,
    pub customer_email: String,
    pub customer_phone: Option<String>,
    pub company_name: Option<String>,
    pub project_title: String,
    pub description: String,
    pub quantity: Option<i32>,
    pub budget_range: Option<String>,
    pub required_by: Option<NaiveDate>,
    pub specifications: Json<Specifications>,
    pub files: Json<Vec<FileAttachment>>,
    pub estimated_cost: Option<f64>,
    pub quoted_price: Option<f64>,
    pub final_price: Option<f64>,
    pub estimated_delivery: Option<NaiveDate>,
    pub actual_delivery: Option<NaiveDate>,
    pub payment_status: String,
    pub priority: String,
    pub assigned_to: Option<DbId>,
    pub notes: Json<Vec<OrderNote>>,
    pub status_history: Json<Vec<StatusChange>>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Customer submission. Files arrive separately through the upload store.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateServiceRequest {
    #[serde(default)]
    #[validate(custom(function = "validate_service_type_field"))]
    pub service_type: String,
    #[serde(default)]
    #[validate(length(min = 2, max = 100))]
    pub customer_name: String,
    #[serde(default)]
    #[validate(email)]
    pub customer_email: String,
    #[validate(custom(function = "validate_phone"))]
    pub customer_phone: Option<String>,
    #[validate(length(max = 200))]
    pub company_name: Option<String>,
    #[serde(default)]
    #[validate(length(min = 3, max = 200))]
    pub project_title: String,
    #[serde(default)]
    #[validate(length(min = 10, max = 10000))]
    pub description: String,
    #[validate(range(min = 1))]
    pub quantity: Option<i32>,
    #[validate(length(max = 100))]
    pub budget_range: Option<String>,
    pub required_by: Option<NaiveDate>,
    #[serde(default)]
    #[validate(custom(function = "validate_specifications"))]
    pub specifications: Specifications,
}

/// Admin edit of the operational fields. Only present fields change.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateServiceRequest {
    #[validate(custom(function = "validate_payment_status_field"))]
    pub payment_status: Option<String>,
    #[validate(custom(function = "validate_priority_field"))]
    pub priority: Option<String>,
    pub estimated_delivery: Option<NaiveDate>,
    pub actual_delivery: Option<NaiveDate>,
    pub assigned_to: Option<DbId>,
}

/// Body of `PUT /service-requests/{id}/status`.
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateServiceRequestStatus {
    #[serde(default)]
    #[validate(custom(function = "validate_status_field"))]
    pub status: String,
    #[validate(length(max = 100))]
    pub changed_by: Option<String>,
}

/// Body of the note endpoints (shared with internship applications).
#[derive(Debug, Deserialize)]
pub struct AddNote {
    #[serde(default)]
    pub note: String,
    pub added_by: Option<String>,
}

/// Body of `PUT /service-requests/{id}/pricing`. Absent fields are kept.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdatePricing {
    #[validate(range(min = 0.0))]
    pub estimated_cost: Option<f64>,
    #[validate(range(min = 0.0))]
    pub quoted_price: Option<f64>,
    #[validate(range(min = 0.0))]
    pub final_price: Option<f64>,
}

/// Query parameters for the admin listing.
#[derive(Debug, Default, Deserialize)]
pub struct ServiceRequestListParams {
    pub service_type: Option<String>,
    pub status: Option<String>,
    pub payment_status: Option<String>,
    pub priority: Option<String>,
    pub customer_email: Option<String>,
    pub sort_by: Option<String>,
    pub sort_order: Option<String>,
    pub page: Option<i64>,
    pub limit: Option<i64>,
}

/// Dashboard counters for `GET /service-requests/stats`.
#[derive(Debug, Clone, Serialize)]
pub struct ServiceRequestStats {
    pub total: i64,
    pub by_status: Vec<LabelCount>,
    pub by_service_type: Vec<LabelCount>,
    pub by_payment_status: Vec<LabelCount>,
}
