//! Service request vocabularies and validation helpers.
//!
//! A service request is a customer order (PCB fabrication, 3D printing, web
//! development, ...) tracked through a nine-stage status pipeline. Status
//! changes are a plain setter: any status may follow any other.

use validator::ValidationError;

use crate::error::CoreError;
use crate::validation::{check_membership, check_value};

// ---------------------------------------------------------------------------
// Service types
// ---------------------------------------------------------------------------

pub const SERVICE_PCB_DESIGN: &str = "PCB_DESIGN";
pub const SERVICE_PCB_FABRICATION: &str = "PCB_FABRICATION";
pub const SERVICE_PCB_ASSEMBLY: &str = "PCB_ASSEMBLY";
pub const SERVICE_3D_PRINTING: &str = "3D_PRINTING";
pub const SERVICE_3D_DESIGN: &str = "3D_DESIGN";
pub const SERVICE_EMBEDDED_SYSTEMS: &str = "EMBEDDED_SYSTEMS";
pub const SERVICE_WEB_DEVELOPMENT: &str = "WEB_DEVELOPMENT";
pub const SERVICE_IOT_SOLUTIONS: &str = "IOT_SOLUTIONS";

/// All valid service types.
pub const VALID_SERVICE_TYPES: &[&str] = &[
    SERVICE_PCB_DESIGN,
    SERVICE_PCB_FABRICATION,
    SERVICE_PCB_ASSEMBLY,
    SERVICE_3D_PRINTING,
    SERVICE_3D_DESIGN,
    SERVICE_EMBEDDED_SYSTEMS,
    SERVICE_WEB_DEVELOPMENT,
    SERVICE_IOT_SOLUTIONS,
];

// ---------------------------------------------------------------------------
// Status pipeline
// ---------------------------------------------------------------------------

/// Initial status of every newly submitted request.
pub const STATUS_PENDING: &str = "pending";
pub const STATUS_UNDER_REVIEW: &str = "under_review";
pub const STATUS_QUOTE_SENT: &str = "quote_sent";
pub const STATUS_PAYMENT_PENDING: &str = "payment_pending";
pub const STATUS_IN_PROGRESS: &str = "in_progress";
pub const STATUS_QUALITY_CHECK: &str = "quality_check";
pub const STATUS_COMPLETED: &str = "completed";
pub const STATUS_DELIVERED: &str = "delivered";
pub const STATUS_CANCELLED: &str = "cancelled";

/// All valid statuses, in pipeline order.
pub const VALID_STATUSES: &[&str] = &[
    STATUS_PENDING,
    STATUS_UNDER_REVIEW,
    STATUS_QUOTE_SENT,
    STATUS_PAYMENT_PENDING,
    STATUS_IN_PROGRESS,
    STATUS_QUALITY_CHECK,
    STATUS_COMPLETED,
    STATUS_DELIVERED,
    STATUS_CANCELLED,
];

// ---------------------------------------------------------------------------
// Payment status / priority
// ---------------------------------------------------------------------------

pub const PAYMENT_UNPAID: &str = "unpaid";
pub const PAYMENT_PARTIAL: &str = "partial";
pub const PAYMENT_PAID: &str = "paid";
pub const PAYMENT_REFUNDED: &str = "refunded";

pub const VALID_PAYMENT_STATUSES: &[&str] =
    &[PAYMENT_UNPAID, PAYMENT_PARTIAL, PAYMENT_PAID, PAYMENT_REFUNDED];

pub const PRIORITY_LOW: &str = "low";
pub const PRIORITY_MEDIUM: &str = "medium";
pub const PRIORITY_HIGH: &str = "high";
pub const PRIORITY_URGENT: &str = "urgent";

pub const VALID_PRIORITIES: &[&str] =
    &[PRIORITY_LOW, PRIORITY_MEDIUM, PRIORITY_HIGH, PRIORITY_URGENT];

// ---------------------------------------------------------------------------
// Listing
// ---------------------------------------------------------------------------

/// Columns admins may sort service-request listings by.
pub const SORTABLE_COLUMNS: &[&str] = &[
    "created_at",
    "updated_at",
    "status",
    "priority",
    "service_type",
    "payment_status",
    "customer_name",
    "required_by",
    "estimated_delivery",
    "quoted_price",
];

/// Maximum number of top-level keys in the free-form specifications object.
pub const MAX_SPECIFICATION_KEYS: usize = 100;

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

pub fn validate_service_type_field(value: &str) -> Result<(), ValidationError> {
    check_membership(value, VALID_SERVICE_TYPES)
}

pub fn validate_status_field(value: &str) -> Result<(), ValidationError> {
    check_membership(value, VALID_STATUSES)
}

pub fn validate_payment_status_field(value: &str) -> Result<(), ValidationError> {
    check_membership(value, VALID_PAYMENT_STATUSES)
}

pub fn validate_priority_field(value: &str) -> Result<(), ValidationError> {
    check_membership(value, VALID_PRIORITIES)
}

/// Validate a status string (filters and status-update bodies).
pub fn validate_status(status: &str) -> Result<(), CoreError> {
    check_value("service request status", status, VALID_STATUSES)
}

pub fn validate_service_type(service_type: &str) -> Result<(), CoreError> {
    check_value("service type", service_type, VALID_SERVICE_TYPES)
}

pub fn validate_payment_status(payment_status: &str) -> Result<(), CoreError> {
    check_value("payment status", payment_status, VALID_PAYMENT_STATUSES)
}

pub fn validate_priority(priority: &str) -> Result<(), CoreError> {
    check_value("priority", priority, VALID_PRIORITIES)
}

/// The specifications payload is free-form but bounded in breadth.
pub fn validate_specifications(
    specs: &serde_json::Map<String, serde_json::Value>,
) -> Result<(), ValidationError> {
    if specs.len() > MAX_SPECIFICATION_KEYS {
        return Err(crate::validation::field_error(
            "specifications",
            format!("must contain at most {MAX_SPECIFICATION_KEYS} keys"),
        ));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
