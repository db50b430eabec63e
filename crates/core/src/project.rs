//! Portfolio project status vocabulary.

use validator::ValidationError;

use crate::error::CoreError;
use crate::validation::{check_membership, check_value};

pub const STATUS_COMPLETED: &str = "completed";
pub const STATUS_IN_PROGRESS: &str = "in-progress";
pub const STATUS_UPCOMING: &str = "upcoming";

/// All valid project statuses.
pub const VALID_STATUSES: &[&str] = &[STATUS_COMPLETED, STATUS_IN_PROGRESS, STATUS_UPCOMING];

pub fn validate_status_field(value: &str) -> Result<(), ValidationError> {
    check_membership(value, VALID_STATUSES)
}

pub fn validate_status(status: &str) -> Result<(), CoreError> {
    check_value("project status", status, VALID_STATUSES)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn statuses_validate() {
        assert!(validate_status(STATUS_UPCOMING).is_ok());
        assert!(validate_status("archived").is_err());
        assert!(validate_status_field("in-progress").is_ok());
    }
}
