//! Append-only lifecycle records shared by service requests and internship
//! applications.
//!
//! Both entities carry an ordered list of [`OrderNote`]s and an ordered list of
//! [`StatusChange`]s. Neither list exposes edit or delete operations; the
//! repositories only ever concatenate new entries onto the stored array.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::types::Timestamp;

/// Maximum length of a single note (characters).
pub const MAX_NOTE_LENGTH: usize = 5_000;

/// Maximum length of the `added_by` / `changed_by` author tag.
pub const MAX_AUTHOR_LENGTH: usize = 100;

/// Author tag used when an admin does not supply one.
pub const DEFAULT_NOTE_AUTHOR: &str = "admin";

/// A timestamped, authored note attached to a service request or application.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderNote {
    pub note: String,
    pub added_by: String,
    pub added_at: Timestamp,
}

impl OrderNote {
    /// Build a note stamped with the current time.
    ///
    /// The text is trimmed; blank text or text longer than
    /// [`MAX_NOTE_LENGTH`] is rejected. A blank author falls back to
    /// [`DEFAULT_NOTE_AUTHOR`].
    pub fn new(note: &str, added_by: Option<&str>) -> Result<Self, CoreError> {
        let note = note.trim();
        if note.is_empty() {
            return Err(CoreError::Validation("Note text must not be empty".into()));
        }
        if note.chars().count() > MAX_NOTE_LENGTH {
            return Err(CoreError::Validation(format!(
                "Note exceeds maximum length of {MAX_NOTE_LENGTH} characters"
            )));
        }
        Ok(Self {
            note: note.to_string(),
            added_by: normalize_author(added_by)?,
            added_at: chrono::Utc::now(),
        })
    }
}

/// One entry in a status history: the previous and new status values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatusChange {
    pub from: String,
    pub to: String,
    pub changed_by: String,
    pub changed_at: Timestamp,
}

/// Trim an optional author tag, defaulting blank values.
pub fn normalize_author(author: Option<&str>) -> Result<String, CoreError> {
    let author = author.map(str::trim).filter(|a| !a.is_empty());
    match author {
        None => Ok(DEFAULT_NOTE_AUTHOR.to_string()),
        Some(a) if a.chars().count() > MAX_AUTHOR_LENGTH => Err(CoreError::Validation(format!(
            "Author exceeds maximum length of {MAX_AUTHOR_LENGTH} characters"
        ))),
        Some(a) => Ok(a.to_string()),
    }
}
