//! Shared response envelope types for API handlers.
//!
//! All API responses use a `{ "data": ... }` envelope. Paginated listings add
//! a `pagination` block next to it.

use protolab_core::pagination::PageMeta;
use serde::Serialize;

/// Standard `{ "data": T }` response envelope.
///
/// ```ignore
/// Ok(Json(DataResponse { data: items }))
/// ```
#[derive(Debug, Serialize)]
pub struct DataResponse<T: Serialize> {
    pub data: T,
}

/// `{ "data": [...], "pagination": {page, limit, total, pages} }`.
#[derive(Debug, Serialize)]
pub struct PageResponse<T: Serialize> {
    pub data: Vec<T>,
    pub pagination: PageMeta,
}

/// Body of a successful delete: `{ "data": { "id": 7, "deleted": true } }`.
#[derive(Debug, Serialize)]
pub struct Deleted {
    pub id: protolab_core::types::DbId,
    pub deleted: bool,
}

impl Deleted {
    pub fn new(id: protolab_core::types::DbId) -> DataResponse<Self> {
        DataResponse {
            data: Self { id, deleted: true },
        }
    }
}
