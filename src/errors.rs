use crate::media_file::MediaFile;
use serde::Serialize;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum MediaError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Media endpoint returned {status}: {body}")]
    Endpoint { status: u16, body: String },

    #[error("Configuration error: {0}")]
    Config(String),
}

/// Custom result type
pub type MediaResult<T> = Result<T, MediaError>;

impl MediaError {
    pub fn endpoint(status: u16, body: impl Into<String>) -> Self {
        Self::Endpoint {
            status,
            body: body.into(),
        }
    }

    pub fn config(message: &str) -> Self {
        Self::Config(message.to_string())
    }

    /// Whether the failure could plausibly succeed on a later attempt.
    /// The upload pipeline never retries; callers re-invoke the whole
    /// operation if they want another attempt.
    pub fn is_transient(&self) -> bool {
        match self {
            MediaError::Network(_) | MediaError::Io(_) => true,
            MediaError::Endpoint { status, .. } => {
                matches!(status, 429 | 500 | 502 | 503 | 504)
            }
            _ => false,
        }
    }
}

/// Error kinds surfaced to the caller through the `on_error` callback.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UploadErrorCode {
    MimeTypeNotAllowedForUser,
    SizeAboveLimit,
    General,
}

/// A per-file upload failure, delivered via callback and never thrown
/// across the public entry point. Carries the offending file so callers
/// can correlate errors with their own state.
#[derive(Debug, Clone)]
pub struct UploadError {
    pub code: UploadErrorCode,
    pub message: String,
    pub file: MediaFile,
}

impl UploadError {
    pub fn not_allowed_for_user(file: MediaFile) -> Self {
        Self {
            code: UploadErrorCode::MimeTypeNotAllowedForUser,
            message: "Sorry, you are not allowed to upload this file type.".to_string(),
            file,
        }
    }

    pub fn size_above_limit(file: MediaFile) -> Self {
        Self {
            code: UploadErrorCode::SizeAboveLimit,
            message: format!(
                "{}: This file exceeds the maximum upload size for this site.",
                file.name
            ),
            file,
        }
    }

    pub fn general(file: MediaFile) -> Self {
        Self {
            code: UploadErrorCode::General,
            message: format!(
                "Error while uploading file {} to the media library.",
                file.name
            ),
            file,
        }
    }
}
