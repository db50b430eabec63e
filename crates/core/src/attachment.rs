//! File-attachment metadata and upload acceptance rules.
//!
//! The HTTP layer stores the bytes; this module decides whether a file may be
//! accepted at all and defines the metadata record attached to service
//! requests and internship applications.

use serde::{Deserialize, Serialize};
use validator::{ValidateUrl, ValidationError};

use crate::types::Timestamp;
use crate::validation::field_error;

// ---------------------------------------------------------------------------
// Limits
// ---------------------------------------------------------------------------

/// Per-file size ceiling (50 MiB).
pub const MAX_FILE_BYTES: usize = 50 * 1024 * 1024;

/// Maximum number of files accepted in a single submission.
pub const MAX_FILES_PER_SUBMISSION: usize = 10;

/// Request body ceiling for multipart submissions: every file at the ceiling
/// plus 1 MiB for the JSON part and multipart framing.
pub const MAX_SUBMISSION_BODY_BYTES: usize = MAX_FILE_BYTES * MAX_FILES_PER_SUBMISSION + 1024 * 1024;

/// Generic binary MIME type browsers send for unknown formats.
pub const OCTET_STREAM: &str = "application/octet-stream";

/// Accepted extensions (lowercase, without the dot).
pub const ALLOWED_EXTENSIONS: &[&str] =
    &["jpeg", "jpg", "png", "pdf", "zip", "stl", "gerber", "rar"];

/// MIME types accepted for a given extension.
///
/// STL, ZIP, RAR and Gerber files are commonly sent with vendor-specific or
/// generic types, so each has a short list of alternates.
pub fn allowed_mime_types(extension: &str) -> &'static [&'static str] {
    match extension {
        "jpeg" | "jpg" => &["image/jpeg", "image/jpg"],
        "png" => &["image/png"],
        "pdf" => &["application/pdf"],
        "zip" => &["application/zip", "application/x-zip-compressed", OCTET_STREAM],
        "stl" => &[
            "model/stl",
            "application/sla",
            "application/vnd.ms-pki.stl",
            OCTET_STREAM,
        ],
        "gerber" => &["application/vnd.gerber", "text/plain", OCTET_STREAM],
        "rar" => &[
            "application/vnd.rar",
            "application/x-rar-compressed",
            OCTET_STREAM,
        ],
        _ => &[],
    }
}

// ---------------------------------------------------------------------------
// Metadata record
// ---------------------------------------------------------------------------

/// Metadata for a stored file. The URL points at the upload store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileAttachment {
    pub file_name: String,
    pub file_url: String,
    pub file_type: String,
    pub uploaded_at: Timestamp,
}

// ---------------------------------------------------------------------------
// Acceptance
// ---------------------------------------------------------------------------

/// Why an upload was refused.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum UploadRejection {
    #[error("File '{file_name}' has unsupported extension. Allowed: {}", ALLOWED_EXTENSIONS.join(", "))]
    Extension { file_name: String },

    #[error("File '{file_name}' has unsupported content type '{content_type}'")]
    MimeType {
        file_name: String,
        content_type: String,
    },

    #[error("File '{file_name}' exceeds the {} limit", describe_limit(.limit_bytes))]
    TooLarge {
        file_name: String,
        limit_bytes: usize,
    },

    #[error("At most {MAX_FILES_PER_SUBMISSION} files may be uploaded at once")]
    TooMany,
}

/// Lowercased extension of `file_name`, if it has one.
pub fn extension_of(file_name: &str) -> Option<String> {
    let (stem, ext) = file_name.rsplit_once('.')?;
    if stem.is_empty() || ext.is_empty() {
        return None;
    }
    Some(ext.to_ascii_lowercase())
}

/// Check a file name and declared content type against the allow-lists.
///
/// A missing content type is treated as [`OCTET_STREAM`]. On success returns
/// the normalized extension.
pub fn check_type(file_name: &str, content_type: Option<&str>) -> Result<String, UploadRejection> {
    let ext = extension_of(file_name)
        .filter(|e| ALLOWED_EXTENSIONS.contains(&e.as_str()))
        .ok_or_else(|| UploadRejection::Extension {
            file_name: file_name.to_string(),
        })?;

    let content_type = content_type
        .map(|ct| ct.split(';').next().unwrap_or(ct).trim().to_ascii_lowercase())
        .filter(|ct| !ct.is_empty())
        .unwrap_or_else(|| OCTET_STREAM.to_string());

    if !allowed_mime_types(&ext).contains(&content_type.as_str()) {
        return Err(UploadRejection::MimeType {
            file_name: file_name.to_string(),
            content_type,
        });
    }

    Ok(ext)
}

/// Enforce a per-file ceiling. The ceiling itself is accepted.
pub fn check_size(file_name: &str, size_bytes: usize, limit_bytes: usize) -> Result<(), UploadRejection> {
    if size_bytes > limit_bytes {
        return Err(UploadRejection::TooLarge {
            file_name: file_name.to_string(),
            limit_bytes,
        });
    }
    Ok(())
}

fn describe_limit(limit_bytes: &usize) -> String {
    const MIB: usize = 1024 * 1024;
    if *limit_bytes >= MIB && limit_bytes % MIB == 0 {
        format!("{} MiB", limit_bytes / MIB)
    } else {
        format!("{limit_bytes} byte")
    }
}

// ---------------------------------------------------------------------------
// Inline attachments
// ---------------------------------------------------------------------------

/// `true` for an absolute `http(s)` URL or a server-relative path without
/// traversal segments.
pub fn is_hosted_url(value: &str) -> bool {
    let lower = value.trim().to_ascii_lowercase();
    if lower.starts_with("http://") || lower.starts_with("https://") {
        return value.validate_url();
    }
    value.starts_with('/')
        && !value.starts_with("//")
        && !value.contains('\\')
        && !value.split('/').any(|segment| segment == "..")
        && !value.chars().any(|c| c.is_whitespace() || c.is_control())
}

/// Attachment metadata sent inline in a JSON body (no upload) must describe a
/// file the upload rules would have accepted and point at a hosted location.
pub fn validate_attachment(file: &FileAttachment) -> Result<(), ValidationError> {
    if file.file_name.trim().is_empty() {
        return Err(field_error("file_name", "file name is required".into()));
    }
    check_type(&file.file_name, Some(&file.file_type))
        .map_err(|rejection| field_error("file_type", rejection.to_string()))?;
    if !is_hosted_url(&file.file_url) {
        return Err(field_error(
            "file_url",
            "file URL must be an http(s) URL or an upload path".into(),
        ));
    }
    Ok(())
}

/// Strip directory components and unsafe characters from a client file name
/// so it can be shown back to admins.
pub fn sanitize_file_name(file_name: &str) -> String {
    let base = file_name
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or(file_name)
        .trim();
    let cleaned: String = base
        .chars()
        .map(|c| {
            if c.is_alphanumeric() || matches!(c, '.' | '-' | '_' | ' ') {
                c
            } else {
                '_'
            }
        })
        .collect();
    if cleaned.is_empty() {
        "file".to_string()
    } else {
        cleaned
    }
}
