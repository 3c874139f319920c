//! Evidence upload validation and the single-file staging slot.

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const MAX_UPLOAD_BYTES: u64 = 10 * 1024 * 1024;

pub const ALLOWED_MEDIA_TYPES: &[&str] =
    &["application/pdf", "image/jpeg", "image/png", "video/mp4"];

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum UploadError {
    #[error("unsupported file type {media_type:?}; allowed: PDF, JPEG, PNG, MP4")]
    UnsupportedType { media_type: String },
    #[error("file is {size} bytes, exceeding the 10 MB limit ({limit} bytes)")]
    TooLarge { size: u64, limit: u64 },
}

impl UploadError {
    /// Short machine label, used for metrics and JSON responses.
    pub fn reason(&self) -> &'static str {
        match self {
            UploadError::UnsupportedType { .. } => "unsupported_type",
            UploadError::TooLarge { .. } => "too_large",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadCandidate {
    pub file_name: String,
    pub media_type: String,
    pub size: u64,
}

impl UploadCandidate {
    pub fn new(file_name: impl Into<String>, media_type: impl Into<String>, size: u64) -> Self {
        Self {
            file_name: file_name.into(),
            media_type: media_type.into(),
            size,
        }
    }

    pub fn validate(&self) -> Result<(), UploadError> {
        let essence = self
            .media_type
            .parse::<mime::Mime>()
            .map(|m| m.essence_str().to_ascii_lowercase())
            .ok();
        let allowed = essence
            .as_deref()
            .map(|e| ALLOWED_MEDIA_TYPES.contains(&e))
            .unwrap_or(false);
        if !allowed {
            return Err(UploadError::UnsupportedType {
                media_type: self.media_type.clone(),
            });
        }
        if self.size > MAX_UPLOAD_BYTES {
            return Err(UploadError::TooLarge {
                size: self.size,
                limit: MAX_UPLOAD_BYTES,
            });
        }
        Ok(())
    }
}

/// Media type implied by a file name's extension, if it is one we recognise.
pub fn media_type_for_extension(file_name: &str) -> Option<&'static str> {
    let ext = std::path::Path::new(file_name)
        .extension()?
        .to_str()?
        .to_ascii_lowercase();
    let media = match ext.as_str() {
        "pdf" => "application/pdf",
        "jpg" | "jpeg" => "image/jpeg",
        "png" => "image/png",
        "mp4" => "video/mp4",
        "gif" => "image/gif",
        "txt" => "text/plain",
        "csv" => "text/csv",
        _ => return None,
    };
    Some(media)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SelectionOrigin {
    DragDrop,
    Browse,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StagedUpload {
    pub candidate: UploadCandidate,
    pub origin: SelectionOrigin,
}

/// Holds at most one selected file. A new selection replaces the previous
/// one; a rejected selection leaves the slot empty.
#[derive(Debug, Default)]
pub struct UploadSlot {
    staged: Option<StagedUpload>,
}

impl UploadSlot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn select(
        &mut self,
        candidate: UploadCandidate,
        origin: SelectionOrigin,
    ) -> Result<&StagedUpload, UploadError> {
        self.staged = None;
        candidate.validate()?;
        Ok(self.staged.insert(StagedUpload { candidate, origin }))
    }

    pub fn staged(&self) -> Option<&StagedUpload> {
        self.staged.as_ref()
    }
}
