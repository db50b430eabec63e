//! Contact-message status vocabulary.

use validator::ValidationError;

use crate::error::CoreError;
use crate::validation::{check_membership, check_value};

/// Initial status for a newly submitted message.
pub const STATUS_NEW: &str = "new";
/// An admin is following up.
pub const STATUS_IN_PROGRESS: &str = "in-progress";
/// The enquiry has been answered.
pub const STATUS_RESOLVED: &str = "resolved";

/// All valid contact statuses.
pub const VALID_STATUSES: &[&str] = &[STATUS_NEW, STATUS_IN_PROGRESS, STATUS_RESOLVED];

pub fn validate_status_field(value: &str) -> Result<(), ValidationError> {
    check_membership(value, VALID_STATUSES)
}

pub fn validate_status(status: &str) -> Result<(), CoreError> {
    check_value("contact status", status, VALID_STATUSES)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hyphenated_status_is_valid() {
        assert!(validate_status("in-progress").is_ok());
        assert!(validate_status("in_progress").is_err());
    }

    #[test]
    fn all_statuses_are_valid() {
        for s in VALID_STATUSES {
            assert!(validate_status_field(s).is_ok());
        }
    }
}
