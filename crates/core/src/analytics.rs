//! Analytics event rules.
//!
//! Events are append-only. The event type is a short machine identifier
//! (`page_view`, `cta_click`, ...); everything else about an event is
//! optional.

use validator::ValidationError;

use crate::validation::field_error;

/// Event type recorded by the front end on every route change.
pub const EVENT_PAGE_VIEW: &str = "page_view";

/// Maximum length of an event type identifier.
pub const MAX_EVENT_TYPE_LENGTH: usize = 64;

/// Number of pages returned in the page-view histogram.
pub const TOP_PAGES_LIMIT: i64 = 20;

/// Event types are lowercase identifiers: `[a-z0-9_.-]`, starting with a letter.
pub fn validate_event_type(value: &str) -> Result<(), ValidationError> {
    let mut chars = value.chars();
    let starts_with_letter = chars.next().is_some_and(|c| c.is_ascii_lowercase());
    let rest_ok = value
        .chars()
        .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || matches!(c, '_' | '.' | '-'));
    if starts_with_letter && rest_ok && value.len() <= MAX_EVENT_TYPE_LENGTH {
        Ok(())
    } else {
        Err(field_error(
            "event_type",
            format!(
                "must be a lowercase identifier of at most {MAX_EVENT_TYPE_LENGTH} characters"
            ),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_identifiers() {
        assert!(validate_event_type(EVENT_PAGE_VIEW).is_ok());
        assert!(validate_event_type("cta.click-2").is_ok());
    }

    #[test]
    fn rejects_malformed_types() {
        assert!(validate_event_type("").is_err());
        assert!(validate_event_type("PageView").is_err());
        assert!(validate_event_type("1st_visit").is_err());
        assert!(validate_event_type("page view").is_err());
        assert!(validate_event_type(&"a".repeat(MAX_EVENT_TYPE_LENGTH + 1)).is_err());
    }
}
