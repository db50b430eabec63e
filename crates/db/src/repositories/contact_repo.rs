//! Repository for the `contacts` table.

use protolab_core::pagination::PageRequest;
use protolab_core::types::DbId;
use sqlx::PgPool;

use crate::filter::{bind_values, bind_values_scalar, Filter};
use crate::models::contact::{Contact, CreateContact};

const COLUMNS: &str = "id, name, email, phone, subject, message, status, created_at, updated_at";

/// Provides CRUD operations for contact-form messages.
pub struct ContactRepo;

impl ContactRepo {
    /// Store a new message with status `new`.
    pub async fn create(pool: &PgPool, input: &CreateContact) -> Result<Contact, sqlx::Error> {
        let query = format!(
            "INSERT INTO contacts (name, email, phone, subject, message)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Contact>(&query)
            .bind(&input.name)
            .bind(&input.email)
            .bind(&input.phone)
            .bind(&input.subject)
            .bind(&input.message)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Contact>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM contacts WHERE id = $1");
        sqlx::query_as::<_, Contact>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// One page of messages, newest first, plus the total match count.
    pub async fn list(
        pool: &PgPool,
        status: Option<&str>,
        page: PageRequest,
    ) -> Result<(Vec<Contact>, i64), sqlx::Error> {
        let mut filter = Filter::new();
        filter.eq_text("status", status);
        let where_clause = filter.where_clause();
        let idx = filter.next_param();

        let query = format!(
            "SELECT {COLUMNS} FROM contacts {where_clause} \
             ORDER BY created_at DESC, id DESC \
             LIMIT ${idx} OFFSET ${}",
            idx + 1
        );
        let rows = bind_values(sqlx::query_as::<_, Contact>(&query), filter.binds())
            .bind(page.limit)
            .bind(page.offset())
            .fetch_all(pool)
            .await?;

        let count_query = format!("SELECT COUNT(*) FROM contacts {where_clause}");
        let total = bind_values_scalar(sqlx::query_scalar::<_, i64>(&count_query), filter.binds())
            .fetch_one(pool)
            .await?;

        Ok((rows, total))
    }

    /// Set the status of a message. Returns `None` if not found.
    pub async fn update_status(
        pool: &PgPool,
        id: DbId,
        status: &str,
    ) -> Result<Option<Contact>, sqlx::Error> {
        let query = format!("UPDATE contacts SET status = $2 WHERE id = $1 RETURNING {COLUMNS}");
        sqlx::query_as::<_, Contact>(&query)
            .bind(id)
            .bind(status)
            .fetch_optional(pool)
            .await
    }

    /// Delete a message. Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM contacts WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
