//! Field-level validation helpers shared by every request DTO.
//!
//! DTOs derive [`validator::Validate`]; this module turns the nested
//! [`ValidationErrors`] tree into a flat, ordered `field -> reasons` map so the
//! HTTP layer can report every violated constraint at once.

use std::borrow::Cow;
use std::collections::BTreeMap;
use std::sync::LazyLock;

use regex::Regex;
use validator::{Validate, ValidationError, ValidationErrors, ValidationErrorsKind};

use crate::error::CoreError;

/// Field path -> list of human-readable reasons.
pub type FieldErrors = BTreeMap<String, Vec<String>>;

/// Loose international phone pattern: optional `+`, digits, spaces, dashes
/// and parentheses, 7 to 20 characters overall.
static PHONE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\+?[0-9][0-9 ()\-]{6,19}$").expect("valid regex"));

/// Maximum number of free-form tags (technologies, skills) on one record.
pub const MAX_TAGS: usize = 30;

/// Maximum length of a single tag.
pub const MAX_TAG_LENGTH: usize = 60;

// ---------------------------------------------------------------------------
// Running validation
// ---------------------------------------------------------------------------

/// Validate a payload, returning every violation as [`FieldErrors`].
///
/// An empty map means the payload is valid.
pub fn collect_errors<T: Validate>(payload: &T) -> FieldErrors {
    match payload.validate() {
        Ok(()) => FieldErrors::new(),
        Err(errors) => flatten_errors(&errors),
    }
}

/// Convert a non-empty error map into [`CoreError::ValidationFailed`].
pub fn ensure_valid(errors: FieldErrors) -> Result<(), CoreError> {
    if errors.is_empty() {
        Ok(())
    } else {
        Err(CoreError::ValidationFailed(errors))
    }
}

/// Validate a payload and fail with every violation.
pub fn validate_payload<T: Validate>(payload: &T) -> Result<(), CoreError> {
    ensure_valid(collect_errors(payload))
}

/// Record an extra violation that a derive cannot express (e.g. a missing
/// uploaded file).
pub fn push_error(errors: &mut FieldErrors, field: &str, reason: impl Into<String>) {
    errors
        .entry(field.to_string())
        .or_default()
        .push(reason.into());
}

/// Flatten a [`ValidationErrors`] tree into dotted / indexed field paths.
pub fn flatten_errors(errors: &ValidationErrors) -> FieldErrors {
    let mut out = FieldErrors::new();
    collect_into(errors, "", &mut out);
    out
}

fn collect_into(errors: &ValidationErrors, prefix: &str, out: &mut FieldErrors) {
    for (field, kind) in errors.errors() {
        let path = if prefix.is_empty() {
            field.to_string()
        } else {
            format!("{prefix}.{field}")
        };
        match kind {
            ValidationErrorsKind::Field(list) => {
                out.entry(path).or_default().extend(list.iter().map(describe));
            }
            ValidationErrorsKind::Struct(inner) => collect_into(inner, &path, out),
            ValidationErrorsKind::List(items) => {
                for (idx, inner) in items {
                    collect_into(inner, &format!("{path}[{idx}]"), out);
                }
            }
        }
    }
}

/// Render one violation. Explicit messages win over code-derived text.
fn describe(err: &ValidationError) -> String {
    if let Some(message) = &err.message {
        return message.to_string();
    }
    let param = |name: &str| err.params.get(name).map(|v| v.to_string());
    match err.code.as_ref() {
        "length" => match (param("min"), param("max")) {
            (Some(min), Some(max)) => format!("must be between {min} and {max} characters"),
            (Some(min), None) => format!("must be at least {min} characters"),
            (None, Some(max)) => format!("must be at most {max} characters"),
            (None, None) => "has an invalid length".to_string(),
        },
        "range" => match (param("min"), param("max")) {
            (Some(min), Some(max)) => format!("must be between {min} and {max}"),
            (Some(min), None) => format!("must be at least {min}"),
            (None, Some(max)) => format!("must be at most {max}"),
            (None, None) => "is out of range".to_string(),
        },
        "email" => "must be a valid email address".to_string(),
        "url" => "must be a valid URL".to_string(),
        "required" => "is required".to_string(),
        other => format!("is invalid ({other})"),
    }
}

// ---------------------------------------------------------------------------
// Reusable field validators (for `#[validate(custom(function = ...))]`)
// ---------------------------------------------------------------------------

/// Build a [`ValidationError`] with an explicit message.
pub fn field_error(code: &'static str, message: String) -> ValidationError {
    let mut err = ValidationError::new(code);
    err.message = Some(Cow::Owned(message));
    err
}

/// Check that `value` is one of `allowed`.
pub fn check_membership(value: &str, allowed: &[&str]) -> Result<(), ValidationError> {
    if allowed.contains(&value) {
        Ok(())
    } else {
        Err(field_error(
            "enum",
            format!("must be one of: {}", allowed.join(", ")),
        ))
    }
}

/// Same as [`check_membership`] but reports through [`CoreError`], for query
/// filters and single-field bodies.
pub fn check_value(field: &str, value: &str, allowed: &[&str]) -> Result<(), CoreError> {
    if allowed.contains(&value) {
        Ok(())
    } else {
        Err(CoreError::Validation(format!(
            "Invalid {field} '{value}'. Must be one of: {allowed:?}"
        )))
    }
}

/// Phone numbers: digits with optional `+`, spaces, dashes and parentheses.
pub fn validate_phone(value: &str) -> Result<(), ValidationError> {
    if PHONE_RE.is_match(value.trim()) {
        Ok(())
    } else {
        Err(field_error("phone", "must be a valid phone number".into()))
    }
}

/// Tag lists: bounded count, each entry non-blank and short.
pub fn validate_tags(tags: &[String]) -> Result<(), ValidationError> {
    if tags.len() > MAX_TAGS {
        return Err(field_error(
            "tags",
            format!("must contain at most {MAX_TAGS} entries"),
        ));
    }
    if tags
        .iter()
        .any(|t| t.trim().is_empty() || t.chars().count() > MAX_TAG_LENGTH)
    {
        return Err(field_error(
            "tags",
            format!("entries must be non-empty and at most {MAX_TAG_LENGTH} characters"),
        ));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
