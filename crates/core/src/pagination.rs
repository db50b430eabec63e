//! Page / limit pagination and sort resolution for list endpoints.
//!
//! Lives in `core` so the repositories and handlers agree on the defaults,
//! ceilings and page-count math.

use serde::Serialize;

// ---------------------------------------------------------------------------
// Defaults
// ---------------------------------------------------------------------------

/// Default page size for service-request listings.
pub const DEFAULT_SERVICE_REQUEST_LIMIT: i64 = 20;

/// Default page size for applications and contact messages.
pub const DEFAULT_ADMIN_LIST_LIMIT: i64 = 50;

/// Hard ceiling for any paginated listing.
pub const MAX_PAGE_LIMIT: i64 = 100;

/// Default number of raw analytics events returned.
pub const DEFAULT_EVENT_LIMIT: i64 = 100;

/// Ceiling for raw analytics event listings.
pub const MAX_EVENT_LIMIT: i64 = 500;

// ---------------------------------------------------------------------------
// Page request
// ---------------------------------------------------------------------------

/// A resolved page request: 1-based page number and a clamped limit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: i64,
    pub limit: i64,
}

impl PageRequest {
    /// Resolve user-supplied `page` / `limit`.
    ///
    /// `page` floors at 1. `limit` defaults to `default_limit` and is clamped
    /// to `1..=max_limit`.
    pub fn new(page: Option<i64>, limit: Option<i64>, default_limit: i64, max_limit: i64) -> Self {
        Self {
            page: page.unwrap_or(1).max(1),
            limit: clamp_limit(limit, default_limit, max_limit),
        }
    }

    /// Row offset of the first item on this page.
    pub fn offset(&self) -> i64 {
        (self.page - 1).saturating_mul(self.limit)
    }

    /// Build the metadata block for a result set of `total` rows.
    pub fn meta(&self, total: i64) -> PageMeta {
        PageMeta {
            page: self.page,
            limit: self.limit,
            total,
            pages: page_count(total, self.limit),
        }
    }
}

/// Pagination metadata returned next to a page of results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PageMeta {
    pub page: i64,
    pub limit: i64,
    pub total: i64,
    pub pages: i64,
}

/// Clamp a user-provided limit to `[1, max]`, using `default` when absent.
pub fn clamp_limit(limit: Option<i64>, default: i64, max: i64) -> i64 {
    limit.unwrap_or(default).max(1).min(max)
}

/// Number of pages needed for `total` rows at `limit` rows per page.
pub fn page_count(total: i64, limit: i64) -> i64 {
    if total <= 0 || limit <= 0 {
        return 0;
    }
    (total + limit - 1) / limit
}

// ---------------------------------------------------------------------------
// Sorting
// ---------------------------------------------------------------------------

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    /// Parse `asc` / `desc` (case-insensitive). Anything else is descending.
    pub fn parse(value: Option<&str>) -> Self {
        match value.map(str::to_ascii_lowercase).as_deref() {
            Some("asc") | Some("ascending") => SortDirection::Asc,
            _ => SortDirection::Desc,
        }
    }

    pub fn as_sql(self) -> &'static str {
        match self {
            SortDirection::Asc => "ASC",
            SortDirection::Desc => "DESC",
        }
    }
}

/// A sort column taken from a fixed allow-list, plus a direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortSpec {
    pub column: &'static str,
    pub direction: SortDirection,
}

/// Default sort column for every listing.
pub const DEFAULT_SORT_COLUMN: &str = "created_at";

impl SortSpec {
    /// Resolve a user-supplied sort field against `allowed`.
    ///
    /// Unknown fields fall back to `created_at`; the returned column is always
    /// one of the `'static` allow-list entries, so it is safe to interpolate.
    pub fn resolve(sort_by: Option<&str>, sort_order: Option<&str>, allowed: &[&'static str]) -> Self {
        let column = sort_by
            .and_then(|field| allowed.iter().copied().find(|c| *c == field))
            .unwrap_or(DEFAULT_SORT_COLUMN);
        Self {
            column,
            direction: SortDirection::parse(sort_order),
        }
    }

    /// `ORDER BY` body with `id` as a stable tie-breaker.
    pub fn order_by(&self) -> String {
        let dir = self.direction.as_sql();
        format!("{} {dir}, id {dir}", self.column)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
