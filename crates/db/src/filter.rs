//! Dynamic `WHERE` clause builder shared by the filtered list queries.
//!
//! Conditions are ANDed together. Every value is bound as a positional
//! parameter; only column names (which come from `'static` call sites) are
//! interpolated into the SQL text.

use protolab_core::types::{DbId, Timestamp};
use sqlx::postgres::PgArguments;
use sqlx::query::{QueryAs, QueryScalar};
use sqlx::Postgres;

/// A value waiting to be bound to a positional parameter.
#[derive(Debug, Clone, PartialEq)]
pub enum BindValue {
    BigInt(i64),
    Text(String),
    Bool(bool),
    Timestamp(Timestamp),
}

/// Accumulates conditions and their bind values in parameter order.
#[derive(Debug, Default)]
pub struct Filter {
    conditions: Vec<String>,
    binds: Vec<BindValue>,
}

impl Filter {
    pub fn new() -> Self {
        Self::default()
    }

    fn push(&mut self, column: &str, op: &str, value: BindValue) {
        let idx = self.binds.len() + 1;
        self.conditions.push(format!("{column} {op} ${idx}"));
        self.binds.push(value);
    }

    /// `column = value` when `value` is present.
    pub fn eq_text(&mut self, column: &'static str, value: Option<&str>) -> &mut Self {
        if let Some(v) = value {
            self.push(column, "=", BindValue::Text(v.to_string()));
        }
        self
    }

    /// Case-insensitive equality (`LOWER(column) = LOWER(value)`).
    pub fn eq_text_ci(&mut self, column: &'static str, value: Option<&str>) -> &mut Self {
        if let Some(v) = value {
            let idx = self.binds.len() + 1;
            self.conditions.push(format!("LOWER({column}) = LOWER(${idx})"));
            self.binds.push(BindValue::Text(v.to_string()));
        }
        self
    }

    pub fn eq_id(&mut self, column: &'static str, value: Option<DbId>) -> &mut Self {
        if let Some(v) = value {
            self.push(column, "=", BindValue::BigInt(v));
        }
        self
    }

    pub fn eq_bool(&mut self, column: &'static str, value: Option<bool>) -> &mut Self {
        if let Some(v) = value {
            self.push(column, "=", BindValue::Bool(v));
        }
        self
    }

    /// Inclusive lower bound on a timestamp column.
    pub fn since(&mut self, column: &'static str, value: Option<Timestamp>) -> &mut Self {
        if let Some(v) = value {
            self.push(column, ">=", BindValue::Timestamp(v));
        }
        self
    }

    /// Exclusive upper bound on a timestamp column.
    pub fn before(&mut self, column: &'static str, value: Option<Timestamp>) -> &mut Self {
        if let Some(v) = value {
            self.push(column, "<", BindValue::Timestamp(v));
        }
        self
    }

    /// `WHERE a AND b ...`, or an empty string when nothing was added.
    pub fn where_clause(&self) -> String {
        if self.conditions.is_empty() {
            String::new()
        } else {
            format!("WHERE {}", self.conditions.join(" AND "))
        }
    }

    /// Like [`Filter::where_clause`] but with an extra fixed condition.
    pub fn where_clause_with(&self, extra: &str) -> String {
        if self.conditions.is_empty() {
            format!("WHERE {extra}")
        } else {
            format!("WHERE {} AND {extra}", self.conditions.join(" AND "))
        }
    }

    /// Index of the next free positional parameter.
    pub fn next_param(&self) -> usize {
        self.binds.len() + 1
    }

    pub fn binds(&self) -> &[BindValue] {
        &self.binds
    }
}

/// Bind a slice of `BindValue` to a sqlx `QueryAs`.
pub fn bind_values<'q, O>(
    mut q: QueryAs<'q, Postgres, O, PgArguments>,
    bind_values: &'q [BindValue],
) -> QueryAs<'q, Postgres, O, PgArguments> {
    for val in bind_values {
        match val {
            BindValue::BigInt(v) => q = q.bind(*v),
            BindValue::Text(v) => q = q.bind(v.as_str()),
            BindValue::Bool(v) => q = q.bind(*v),
            BindValue::Timestamp(v) => q = q.bind(*v),
        }
    }
    q
}

/// Bind a slice of `BindValue` to a sqlx `QueryScalar`.
pub fn bind_values_scalar<'q, O>(
    mut q: QueryScalar<'q, Postgres, O, PgArguments>,
    bind_values: &'q [BindValue],
) -> QueryScalar<'q, Postgres, O, PgArguments> {
    for val in bind_values {
        match val {
            BindValue::BigInt(v) => q = q.bind(*v),
            BindValue::Text(v) => q = q.bind(v.as_str()),
            BindValue::Bool(v) => q = q.bind(*v),
            BindValue::Timestamp(v) => q = q.bind(*v),
        }
    }
    q
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_filter_has_no_where() {
        let f = Filter::new();
        assert_eq!(f.where_clause(), "");
        assert_eq!(f.next_param(), 1);
        assert_eq!(f.where_clause_with("x IS NOT NULL"), "WHERE x IS NOT NULL");
    }

    #[test]
    fn absent_values_are_skipped() {
        let mut f = Filter::new();
        f.eq_text("status", None)
            .eq_text("priority", Some("high"))
            .eq_bool("featured", None)
            .eq_id("user_id", Some(7));
        assert_eq!(f.where_clause(), "WHERE priority = $1 AND user_id = $2");
        assert_eq!(f.next_param(), 3);
        assert_eq!(
            f.binds(),
            &[BindValue::Text("high".into()), BindValue::BigInt(7)]
        );
    }

    #[test]
    fn case_insensitive_and_ranges() {
        let now = chrono::Utc::now();
        let mut f = Filter::new();
        f.eq_text_ci("email", Some("A@B.io"))
            .since("created_at", Some(now))
            .before("created_at", Some(now));
        assert_eq!(
            f.where_clause_with("event_type = 'page_view'"),
            "WHERE LOWER(email) = LOWER($1) AND created_at >= $2 AND created_at < $3 \
             AND event_type = 'page_view'"
        );
    }
}
