//! Handlers for the analytics beacon and its admin reports.

use axum::extract::State;
use axum::http::header::{REFERER, USER_AGENT};
use axum::http::{HeaderMap, StatusCode};
use axum::Json;
use protolab_core::error::CoreError;
use protolab_core::pagination::{clamp_limit, DEFAULT_EVENT_LIMIT, MAX_EVENT_LIMIT};
use protolab_core::validation::validate_payload;
use protolab_db::models::analytics::{
    AnalyticsEvent, AnalyticsSummary, CreateAnalyticsEvent, EventListParams, SummaryParams,
};
use protolab_db::repositories::AnalyticsRepo;

use crate::error::{AppError, AppResult};
use crate::extract::{AppJson, AppQuery};
use crate::middleware::rbac::RequireAdmin;
use crate::response::DataResponse;
use crate::state::AppState;

/// Fill `user_agent`, `referrer` and `ip_address` from request headers when
/// the body leaves them out.
///
/// The client address comes from the first `X-Forwarded-For` hop, falling
/// back to `X-Real-IP`.
pub fn apply_header_defaults(event: &mut CreateAnalyticsEvent, headers: &HeaderMap) {
    let header = |name: &str| {
        headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .map(str::to_string)
    };

    if event.user_agent.is_none() {
        event.user_agent = header(USER_AGENT.as_str());
    }
    if event.referrer.is_none() {
        event.referrer = header(REFERER.as_str());
    }
    if event.ip_address.is_none() {
        event.ip_address = header("x-forwarded-for")
            .and_then(|v| v.split(',').next().map(|hop| hop.trim().to_string()))
            .filter(|v| !v.is_empty())
            .or_else(|| header("x-real-ip"));
    }
}

/// POST /api/v1/analytics/events
pub async fn record(
    State(state): State<AppState>,
    headers: HeaderMap,
    AppJson(mut input): AppJson<CreateAnalyticsEvent>,
) -> AppResult<(StatusCode, Json<DataResponse<AnalyticsEvent>>)> {
    apply_header_defaults(&mut input, &headers);
    validate_payload(&input)?;

    let event = AnalyticsRepo::create(&state.pool, &input).await?;
    tracing::debug!(event_id = event.id, event_type = %event.event_type, "Analytics event recorded");
    Ok((StatusCode::CREATED, Json(DataResponse { data: event })))
}

/// GET /api/v1/analytics/events
pub async fn list_events(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    AppQuery(params): AppQuery<EventListParams>,
) -> AppResult<Json<DataResponse<Vec<AnalyticsEvent>>>> {
    let limit = clamp_limit(params.limit, DEFAULT_EVENT_LIMIT, MAX_EVENT_LIMIT);
    let events = AnalyticsRepo::list_recent(&state.pool, params.event_type.as_deref(), limit).await?;
    Ok(Json(DataResponse { data: events }))
}

/// GET /api/v1/analytics/summary
pub async fn summary(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    AppQuery(params): AppQuery<SummaryParams>,
) -> AppResult<Json<DataResponse<AnalyticsSummary>>> {
    if let (Some(from), Some(to)) = (params.from, params.to) {
        if from > to {
            return Err(AppError::Core(CoreError::Validation(
                "'from' must not be later than 'to'".into(),
            )));
        }
    }
    let summary = AnalyticsRepo::summary(&state.pool, params.from, params.to).await?;
    Ok(Json(DataResponse { data: summary }))
}
