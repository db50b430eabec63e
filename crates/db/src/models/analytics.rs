//! Analytics event model, DTOs and the summary report.

use protolab_core::analytics::validate_event_type;
use protolab_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::FromRow;
use validator::Validate;

use super::LabelCount;

/// A row from the append-only `analytics_events` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct AnalyticsEvent {
    pub id: DbId,
    pub event_type: String,
    pub page: Option<String>,
    pub visitor_id: Option<String>,
    pub user_agent: Option<String>,
    pub referrer: Option<String>,
    pub ip_address: Option<String>,
    pub event_data: Json<serde_json::Value>,
    pub created_at: Timestamp,
}

/// Tracking beacon body. Header-derived fields are filled in by the handler
/// when omitted.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct CreateAnalyticsEvent {
    #[serde(default)]
    #[validate(custom(function = "validate_event_type"))]
    pub event_type: String,
    #[validate(length(max = 2048))]
    pub page: Option<String>,
    #[validate(length(max = 128))]
    pub visitor_id: Option<String>,
    #[validate(length(max = 1024))]
    pub user_agent: Option<String>,
    #[validate(length(max = 2048))]
    pub referrer: Option<String>,
    #[validate(length(max = 64))]
    pub ip_address: Option<String>,
    pub event_data: Option<serde_json::Map<String, serde_json::Value>>,
}

/// Query parameters for `GET /analytics/events`.
#[derive(Debug, Default, Deserialize)]
pub struct EventListParams {
    pub event_type: Option<String>,
    pub limit: Option<i64>,
}

/// Query parameters for `GET /analytics/summary`.
#[derive(Debug, Default, Deserialize)]
pub struct SummaryParams {
    pub from: Option<Timestamp>,
    pub to: Option<Timestamp>,
}

/// Aggregated traffic report.
#[derive(Debug, Clone, Serialize)]
pub struct AnalyticsSummary {
    pub total_events: i64,
    pub unique_visitors: i64,
    pub by_event_type: Vec<LabelCount>,
    pub top_pages: Vec<LabelCount>,
}
