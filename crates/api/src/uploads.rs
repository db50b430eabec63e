//! Attachment intake and on-disk storage.
//!
//! Submission endpoints accept either a plain JSON body or a
//! `multipart/form-data` body whose `data` part holds the same JSON and whose
//! file parts carry attachments. [`Submission`] normalizes both shapes. Each
//! file part is checked against the allow-lists and streamed to a temporary
//! file inside the upload directory; it only gets its final name once the
//! handler has validated the payload and calls [`UploadStore::store`].
//! Temporary files still pending when a request fails are removed on drop.

use std::path::{Path, PathBuf};

use axum::extract::multipart::{Field, MultipartError, MultipartRejection};
use axum::extract::{FromRequest, Multipart, Request};
use axum::http::header::CONTENT_TYPE;
use axum::http::StatusCode;
use protolab_core::attachment::{
    check_size, check_type, sanitize_file_name, FileAttachment, UploadRejection,
    MAX_FILES_PER_SUBMISSION, OCTET_STREAM,
};
use serde::de::DeserializeOwned;
use tempfile::TempPath;
use tokio::io::AsyncWriteExt;
use uuid::Uuid;

use crate::error::AppError;
use crate::extract::AppJson;
use crate::state::AppState;

/// Name of the multipart part that carries the JSON payload.
pub const DATA_FIELD: &str = "data";

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

#[derive(Debug, thiserror::Error)]
pub enum UploadError {
    #[error(transparent)]
    Rejected(#[from] UploadRejection),

    #[error("Malformed multipart body: {message}")]
    Multipart { status: StatusCode, message: String },

    #[error("{0}")]
    Payload(String),

    #[error("Failed to store upload: {0}")]
    Io(#[from] std::io::Error),
}

impl From<MultipartError> for UploadError {
    fn from(err: MultipartError) -> Self {
        UploadError::Multipart {
            status: err.status(),
            message: err.body_text(),
        }
    }
}

impl From<MultipartRejection> for UploadError {
    fn from(err: MultipartRejection) -> Self {
        UploadError::Multipart {
            status: err.status(),
            message: err.body_text(),
        }
    }
}

impl From<UploadError> for AppError {
    fn from(err: UploadError) -> Self {
        match err {
            UploadError::Rejected(rejection @ UploadRejection::TooLarge { .. }) => {
                AppError::PayloadTooLarge(rejection.to_string())
            }
            UploadError::Rejected(rejection) => AppError::BadRequest(rejection.to_string()),
            UploadError::Multipart { status, message } if status == StatusCode::PAYLOAD_TOO_LARGE => {
                AppError::PayloadTooLarge(message)
            }
            UploadError::Multipart { message, .. } => AppError::BadRequest(message),
            UploadError::Payload(message) => AppError::BadRequest(message),
            UploadError::Io(e) => AppError::InternalError(e.to_string()),
        }
    }
}

// ---------------------------------------------------------------------------
// Intake
// ---------------------------------------------------------------------------

/// A file part that passed the extension / MIME / size checks and sits in a
/// temporary file until it is stored or dropped.
#[derive(Debug)]
pub struct PendingFile {
    /// Multipart field name (`files`, `resume`, ...).
    pub field: String,
    /// Sanitized client file name.
    pub file_name: String,
    /// Normalized MIME type.
    pub content_type: String,
    /// Lowercased extension without the dot.
    pub extension: String,
    pub size_bytes: usize,
    /// Deleted on drop unless persisted.
    temp: TempPath,
}

impl PendingFile {
    pub fn temp_path(&self) -> &Path {
        &self.temp
    }
}

/// A submission body: the JSON payload plus any accepted file parts.
#[derive(Debug)]
pub struct Submission<T> {
    pub payload: T,
    pub files: Vec<PendingFile>,
}

impl<T> Submission<T> {
    /// Remove and return the first file sent under `field`.
    pub fn take_file(&mut self, field: &str) -> Option<PendingFile> {
        let idx = self.files.iter().position(|f| f.field == field)?;
        Some(self.files.remove(idx))
    }
}

impl<T> FromRequest<AppState> for Submission<T>
where
    T: DeserializeOwned + Send,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &AppState) -> Result<Self, Self::Rejection> {
        let is_multipart = req
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .is_some_and(|ct| ct.starts_with("multipart/form-data"));

        if !is_multipart {
            let AppJson(payload) = AppJson::<T>::from_request(req, state).await?;
            return Ok(Submission {
                payload,
                files: Vec::new(),
            });
        }

        let multipart = Multipart::from_request(req, state)
            .await
            .map_err(UploadError::from)?;
        Ok(read_multipart(multipart, &state.uploads).await?)
    }
}

async fn read_multipart<T: DeserializeOwned + Send>(
    mut multipart: Multipart,
    store: &UploadStore,
) -> Result<Submission<T>, UploadError> {
    let mut payload: Option<T> = None;
    let mut files = Vec::new();

    while let Some(field) = multipart.next_field().await? {
        let name = field.name().unwrap_or("").to_string();

        if field.file_name().is_some() {
            if files.len() >= MAX_FILES_PER_SUBMISSION {
                return Err(UploadRejection::TooMany.into());
            }
            files.push(read_file(name, field, store).await?);
        } else if name == DATA_FIELD {
            let text = field.text().await?;
            let parsed = serde_json::from_str(&text).map_err(|e| {
                UploadError::Payload(format!("Invalid JSON in '{DATA_FIELD}' field: {e}"))
            })?;
            payload = Some(parsed);
        }
        // Other text parts are ignored.
    }

    let payload = payload.ok_or_else(|| {
        UploadError::Payload(format!("Missing '{DATA_FIELD}' field in multipart body"))
    })?;
    Ok(Submission { payload, files })
}

/// Stream one file part to disk, aborting as soon as it crosses the ceiling.
async fn read_file(
    field_name: String,
    mut field: Field<'_>,
    store: &UploadStore,
) -> Result<PendingFile, UploadError> {
    let file_name = sanitize_file_name(field.file_name().unwrap_or_default());
    let content_type = field
        .content_type()
        .map(|ct| ct.split(';').next().unwrap_or(ct).trim().to_ascii_lowercase())
        .filter(|ct| !ct.is_empty())
        .unwrap_or_else(|| OCTET_STREAM.to_string());

    // Extension and MIME type first, so a bad file is refused before it is read.
    let extension = check_type(&file_name, Some(&content_type))?;

    let (file, temp) = store.temp_file().await?;
    let mut file = tokio::fs::File::from_std(file);
    let mut size_bytes = 0usize;
    while let Some(chunk) = field.chunk().await? {
        size_bytes += chunk.len();
        check_size(&file_name, size_bytes, store.max_file_bytes())?;
        file.write_all(&chunk).await?;
    }
    file.flush().await?;

    Ok(PendingFile {
        field: field_name,
        file_name,
        content_type,
        extension,
        size_bytes,
        temp,
    })
}

// ---------------------------------------------------------------------------
// Storage
// ---------------------------------------------------------------------------

/// Where uploads live, how they are addressed, and how large one may be.
#[derive(Debug, Clone)]
pub struct UploadConfig {
    /// Directory files are written to.
    pub dir: PathBuf,
    /// URL prefix under which `dir` is served, without a trailing slash.
    pub public_prefix: String,
    /// Per-file ceiling in bytes.
    pub max_file_bytes: usize,
}

/// Writes accepted files under a random name and builds their metadata.
#[derive(Debug, Clone)]
pub struct UploadStore {
    config: UploadConfig,
}

impl UploadStore {
    pub fn new(config: UploadConfig) -> Self {
        Self { config }
    }

    pub fn dir(&self) -> &Path {
        &self.config.dir
    }

    pub fn max_file_bytes(&self) -> usize {
        self.config.max_file_bytes
    }

    /// Create the upload directory if it does not exist yet.
    pub async fn ensure_dir(&self) -> std::io::Result<()> {
        tokio::fs::create_dir_all(&self.config.dir).await
    }

    /// Open a hidden scratch file in the upload directory. Keeping it on the
    /// same filesystem lets [`store`](Self::store) finish with a rename.
    async fn temp_file(&self) -> std::io::Result<(std::fs::File, TempPath)> {
        self.ensure_dir().await?;
        let dir = self.config.dir.clone();
        let temp = tokio::task::spawn_blocking(move || {
            tempfile::Builder::new()
                .prefix(".upload-")
                .suffix(".part")
                .tempfile_in(dir)
        })
        .await
        .map_err(std::io::Error::other)??;
        Ok(temp.into_parts())
    }

    /// Move one file to its final name and return its metadata record.
    pub async fn store(&self, file: PendingFile) -> Result<FileAttachment, UploadError> {
        let stored_name = format!("{}.{}", Uuid::new_v4(), file.extension);
        let destination = self.config.dir.join(&stored_name);
        let PendingFile {
            file_name,
            content_type,
            size_bytes,
            temp,
            ..
        } = file;
        tokio::task::spawn_blocking(move || temp.persist(destination))
            .await
            .map_err(std::io::Error::other)?
            .map_err(std::io::Error::from)?;

        tracing::debug!(
            file_name = %file_name,
            stored_name = %stored_name,
            size_bytes,
            "Stored upload",
        );

        Ok(FileAttachment {
            file_name,
            file_url: format!("{}/{stored_name}", self.config.public_prefix),
            file_type: content_type,
            uploaded_at: chrono::Utc::now(),
        })
    }

    /// Store every file, removing the ones already stored if one fails.
    pub async fn store_all(&self, files: Vec<PendingFile>) -> Result<Vec<FileAttachment>, UploadError> {
        let mut stored = Vec::with_capacity(files.len());
        for file in files {
            match self.store(file).await {
                Ok(attachment) => stored.push(attachment),
                Err(e) => {
                    self.discard(&stored).await;
                    return Err(e);
                }
            }
        }
        Ok(stored)
    }

    /// Best-effort removal of files whose record was never persisted.
    pub async fn discard(&self, attachments: &[FileAttachment]) {
        for attachment in attachments {
            let Some(path) = self.local_path(&attachment.file_url) else {
                continue;
            };
            if let Err(e) = tokio::fs::remove_file(&path).await {
                tracing::warn!(path = %path.display(), error = %e, "Failed to remove orphaned upload");
            }
        }
    }

    /// Map a URL produced by [`store`](Self::store) back to its file.
    pub fn local_path(&self, file_url: &str) -> Option<PathBuf> {
        let name = file_url
            .strip_prefix(&self.config.public_prefix)?
            .strip_prefix('/')?;
        if name.is_empty() || name.contains(['/', '\\']) || name.starts_with('.') {
            return None;
        }
        Some(self.config.dir.join(name))
    }
}
