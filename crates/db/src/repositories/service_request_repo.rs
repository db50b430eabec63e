//! Repository for the `service_requests` table.
//!
//! Every lifecycle mutation is a single `UPDATE ... RETURNING` statement:
//! notes and status-history entries are concatenated onto the stored JSONB
//! arrays and pricing uses `COALESCE`, so concurrent admin edits never
//! overwrite each other's changes.

use protolab_core::attachment::FileAttachment;
use protolab_core::lifecycle::OrderNote;
use protolab_core::pagination::{PageRequest, SortSpec};
use protolab_core::types::DbId;
use sqlx::types::Json;
use sqlx::PgPool;

use crate::filter::{bind_values, bind_values_scalar, Filter};
use crate::models::service_request::{
    CreateServiceRequest, ServiceRequest, ServiceRequestListParams, ServiceRequestStats,
    UpdatePricing, UpdateServiceRequest,
};
use crate::models::LabelCount;

/// Column list for `service_requests` queries.
const COLUMNS: &str = "\
    id, user_id, service_type, status, customer_name, customer_email, \
    customer_phone, company_name, project_title, description, quantity, \
    budget_range, required_by, specifications, files, estimated_cost, \
    quoted_price, final_price, estimated_delivery, actual_delivery, \
    payment_status, priority, assigned_to, notes, status_history, \
    created_at, updated_at";

/// Provides CRUD and lifecycle operations for service requests.
pub struct ServiceRequestRepo;

impl ServiceRequestRepo {
    /// Insert a new request in status `pending` with an empty note list.
    pub async fn create(
        pool: &PgPool,
        user_id: Option<DbId>,
        input: &CreateServiceRequest,
        files: &[FileAttachment],
    ) -> Result<ServiceRequest, sqlx::Error> {
        // Bound as text and cast so the JSON column keeps the submitted key order.
        let specifications = serde_json::Value::Object(input.specifications.clone()).to_string();
        let query = format!(
            "INSERT INTO service_requests \
                (user_id, service_type, customer_name, customer_email, customer_phone, \
                 company_name, project_title, description, quantity, budget_range, \
                 required_by, specifications, files) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, CAST($12 AS JSON), $13) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, ServiceRequest>(&query)
            .bind(user_id)
            .bind(&input.service_type)
            .bind(&input.customer_name)
            .bind(&input.customer_email)
            .bind(&input.customer_phone)
            .bind(&input.company_name)
            .bind(&input.project_title)
            .bind(&input.description)
            .bind(input.quantity)
            .bind(&input.budget_range)
            .bind(input.required_by)
            .bind(specifications)
            .bind(Json(files))
            .fetch_one(pool)
            .await
    }

    /// Find a request by ID.
    pub async fn find_by_id(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<ServiceRequest>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM service_requests WHERE id = $1");
        sqlx::query_as::<_, ServiceRequest>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// One page of requests matching every present filter, plus the total
    /// number of matches.
    ///
    /// `owner` restricts the listing to requests submitted by that user.
    pub async fn list(
        pool: &PgPool,
        params: &ServiceRequestListParams,
        owner: Option<DbId>,
        sort: SortSpec,
        page: PageRequest,
    ) -> Result<(Vec<ServiceRequest>, i64), sqlx::Error> {
        let mut filter = Filter::new();
        filter
            .eq_text("service_type", params.service_type.as_deref())
            .eq_text("status", params.status.as_deref())
            .eq_text("payment_status", params.payment_status.as_deref())
            .eq_text("priority", params.priority.as_deref())
            .eq_text_ci("customer_email", params.customer_email.as_deref())
            .eq_id("user_id", owner);
        let where_clause = filter.where_clause();
        let idx = filter.next_param();

        let query = format!(
            "SELECT {COLUMNS} FROM service_requests {where_clause} \
             ORDER BY {} \
             LIMIT ${idx} OFFSET ${}",
            sort.order_by(),
            idx + 1
        );
        let rows = bind_values(sqlx::query_as::<_, ServiceRequest>(&query), filter.binds())
            .bind(page.limit)
            .bind(page.offset())
            .fetch_all(pool)
            .await?;

        let count_query = format!("SELECT COUNT(*) FROM service_requests {where_clause}");
        let total = bind_values_scalar(sqlx::query_scalar::<_, i64>(&count_query), filter.binds())
            .fetch_one(pool)
            .await?;

        Ok((rows, total))
    }

    /// Overwrite the status and append a history entry recording the change.
    ///
    /// Any status may follow any other. Returns `None` if not found.
    pub async fn set_status(
        pool: &PgPool,
        id: DbId,
        status: &str,
        changed_by: &str,
    ) -> Result<Option<ServiceRequest>, sqlx::Error> {
        let query = format!(
            "UPDATE service_requests SET \
                status = $2, \
                status_history = status_history || jsonb_build_array(jsonb_build_object( \
                    'from', status, 'to', $2::text, \
                    'changed_by', $3::text, 'changed_at', NOW())) \
             WHERE id = $1 \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, ServiceRequest>(&query)
            .bind(id)
            .bind(status)
            .bind(changed_by)
            .fetch_optional(pool)
            .await
    }

    /// Append a note to the end of the note list. Returns `None` if not found.
    pub async fn append_note(
        pool: &PgPool,
        id: DbId,
        note: &OrderNote,
    ) -> Result<Option<ServiceRequest>, sqlx::Error> {
        let query = format!(
            "UPDATE service_requests SET notes = notes || $2 \
             WHERE id = $1 \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, ServiceRequest>(&query)
            .bind(id)
            .bind(Json([note]))
            .fetch_optional(pool)
            .await
    }

    /// Set whichever pricing fields are present; absent ones keep their value.
    pub async fn update_pricing(
        pool: &PgPool,
        id: DbId,
        input: &UpdatePricing,
    ) -> Result<Option<ServiceRequest>, sqlx::Error> {
        let query = format!(
            "UPDATE service_requests SET \
                estimated_cost = COALESCE($2, estimated_cost), \
                quoted_price = COALESCE($3, quoted_price), \
                final_price = COALESCE($4, final_price) \
             WHERE id = $1 \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, ServiceRequest>(&query)
            .bind(id)
            .bind(input.estimated_cost)
            .bind(input.quoted_price)
            .bind(input.final_price)
            .fetch_optional(pool)
            .await
    }

    /// Admin edit of payment status, priority, delivery dates and assignee.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateServiceRequest,
    ) -> Result<Option<ServiceRequest>, sqlx::Error> {
        let query = format!(
            "UPDATE service_requests SET \
                payment_status = COALESCE($2, payment_status), \
                priority = COALESCE($3, priority), \
                estimated_delivery = COALESCE($4, estimated_delivery), \
                actual_delivery = COALESCE($5, actual_delivery), \
                assigned_to = COALESCE($6, assigned_to) \
             WHERE id = $1 \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, ServiceRequest>(&query)
            .bind(id)
            .bind(&input.payment_status)
            .bind(&input.priority)
            .bind(input.estimated_delivery)
            .bind(input.actual_delivery)
            .bind(input.assigned_to)
            .fetch_optional(pool)
            .await
    }

    /// Delete a request. Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM service_requests WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Totals grouped by status, service type and payment status.
    pub async fn stats(pool: &PgPool) -> Result<ServiceRequestStats, sqlx::Error> {
        let total = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM service_requests")
            .fetch_one(pool)
            .await?;
        Ok(ServiceRequestStats {
            total,
            by_status: count_by(pool, "status").await?,
            by_service_type: count_by(pool, "service_type").await?,
            by_payment_status: count_by(pool, "payment_status").await?,
        })
    }
}

async fn count_by(pool: &PgPool, column: &'static str) -> Result<Vec<LabelCount>, sqlx::Error> {
    let query = format!(
        "SELECT {column} AS label, COUNT(*) AS count FROM service_requests \
         GROUP BY {column} ORDER BY count DESC, label"
    );
    sqlx::query_as::<_, LabelCount>(&query).fetch_all(pool).await
}
