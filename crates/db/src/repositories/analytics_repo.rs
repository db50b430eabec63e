//! Repository for the append-only `analytics_events` table.

use protolab_core::analytics::{EVENT_PAGE_VIEW, TOP_PAGES_LIMIT};
use protolab_core::types::Timestamp;
use sqlx::types::Json;
use sqlx::PgPool;

use crate::filter::{bind_values, bind_values_scalar, Filter};
use crate::models::analytics::{AnalyticsEvent, AnalyticsSummary, CreateAnalyticsEvent};
use crate::models::LabelCount;

const COLUMNS: &str = "id, event_type, page, visitor_id, user_agent, referrer, \
                       ip_address, event_data, created_at";

/// Insert and aggregate operations for analytics events. There is no update
/// or delete.
pub struct AnalyticsRepo;

impl AnalyticsRepo {
    /// Record one event.
    pub async fn create(
        pool: &PgPool,
        input: &CreateAnalyticsEvent,
    ) -> Result<AnalyticsEvent, sqlx::Error> {
        let query = format!(
            "INSERT INTO analytics_events \
                (event_type, page, visitor_id, user_agent, referrer, ip_address, event_data) \
             VALUES ($1, $2, $3, $4, $5, $6, $7) \
             RETURNING {COLUMNS}"
        );
        let event_data = input.event_data.clone().unwrap_or_default();
        sqlx::query_as::<_, AnalyticsEvent>(&query)
            .bind(&input.event_type)
            .bind(&input.page)
            .bind(&input.visitor_id)
            .bind(&input.user_agent)
            .bind(&input.referrer)
            .bind(&input.ip_address)
            .bind(Json(event_data))
            .fetch_one(pool)
            .await
    }

    /// Most recent events first, optionally restricted to one type.
    pub async fn list_recent(
        pool: &PgPool,
        event_type: Option<&str>,
        limit: i64,
    ) -> Result<Vec<AnalyticsEvent>, sqlx::Error> {
        let mut filter = Filter::new();
        filter.eq_text("event_type", event_type);
        let query = format!(
            "SELECT {COLUMNS} FROM analytics_events {} \
             ORDER BY created_at DESC, id DESC \
             LIMIT ${}",
            filter.where_clause(),
            filter.next_param()
        );
        bind_values(sqlx::query_as::<_, AnalyticsEvent>(&query), filter.binds())
            .bind(limit)
            .fetch_all(pool)
            .await
    }

    /// Event counts by type, distinct visitors and the most viewed pages
    /// within the optional `[from, to)` window.
    pub async fn summary(
        pool: &PgPool,
        from: Option<Timestamp>,
        to: Option<Timestamp>,
    ) -> Result<AnalyticsSummary, sqlx::Error> {
        let mut filter = Filter::new();
        filter.since("created_at", from).before("created_at", to);
        let where_clause = filter.where_clause();

        let totals_query = format!("SELECT COUNT(*) FROM analytics_events {where_clause}");
        let total_events =
            bind_values_scalar(sqlx::query_scalar::<_, i64>(&totals_query), filter.binds())
                .fetch_one(pool)
                .await?;

        let visitors_query =
            format!("SELECT COUNT(DISTINCT visitor_id) FROM analytics_events {where_clause}");
        let unique_visitors =
            bind_values_scalar(sqlx::query_scalar::<_, i64>(&visitors_query), filter.binds())
                .fetch_one(pool)
                .await?;

        let by_type_query = format!(
            "SELECT event_type AS label, COUNT(*) AS count FROM analytics_events \
             {where_clause} GROUP BY event_type ORDER BY count DESC, label"
        );
        let by_event_type =
            bind_values(sqlx::query_as::<_, LabelCount>(&by_type_query), filter.binds())
                .fetch_all(pool)
                .await?;

        let pages_query = format!(
            "SELECT page AS label, COUNT(*) AS count FROM analytics_events \
             {} GROUP BY page ORDER BY count DESC, label LIMIT {TOP_PAGES_LIMIT}",
            filter.where_clause_with(&format!(
                "event_type = '{EVENT_PAGE_VIEW}' AND page IS NOT NULL"
            ))
        );
        let top_pages = bind_values(sqlx::query_as::<_, LabelCount>(&pages_query), filter.binds())
            .fetch_all(pool)
            .await?;

        Ok(AnalyticsSummary {
            total_events,
            unique_visitors,
            by_event_type,
            top_pages,
        })
    }
}
