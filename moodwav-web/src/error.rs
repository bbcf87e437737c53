//! Error types for moodwav-web
//!
//! Two wire shapes are in play, kept for compatibility with clients of the
//! original service: upload validation failures answer `{"error": ...}`,
//! everything after validation answers `{"ok": false, "error": ...}`.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::audio::normalizer::NormalizeError;
use crate::pipeline::PipelineError;

/// API error type
#[derive(Debug, Error)]
pub enum ApiError {
    /// Upload rejected before any processing (400, bare shape)
    #[error("{0}")]
    Validation(String),

    /// Upload exceeds the configured body cap (413)
    #[error("Uploaded file is too large")]
    TooLarge,

    /// Resource not found (404)
    #[error("Not found: {0}")]
    NotFound(String),

    /// Conversion to canonical WAV failed (400)
    #[error("Failed to convert audio to WAV: {0}")]
    Conversion(String),

    /// Non-WAV upload on a build without a converter (400)
    #[error("Non-WAV upload received but the audio converter is not available in this build. Rebuild with the `transcode` feature or upload a WAV file")]
    ConverterUnavailable,

    /// Inference pipeline failed after a successful upload (500)
    #[error("{0}")]
    Pipeline(String),

    /// Internal server error (500)
    #[error("Internal server error: {0}")]
    Internal(String),

    /// IO error (500)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let message = self.to_string();
        let (status, body) = match self {
            ApiError::Validation(_) => (StatusCode::BAD_REQUEST, json!({ "error": message })),
            ApiError::TooLarge => (
                StatusCode::PAYLOAD_TOO_LARGE,
                json!({ "error": message }),
            ),
            ApiError::NotFound(_) => (StatusCode::NOT_FOUND, json!({ "error": message })),
            ApiError::Conversion(_) | ApiError::ConverterUnavailable => (
                StatusCode::BAD_REQUEST,
                json!({ "ok": false, "error": message }),
            ),
            ApiError::Pipeline(_) | ApiError::Internal(_) | ApiError::Io(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                json!({ "ok": false, "error": message }),
            ),
        };

        (status, Json(body)).into_response()
    }
}

impl From<NormalizeError> for ApiError {
    fn from(err: NormalizeError) -> Self {
        match err {
            NormalizeError::ConverterUnavailable => ApiError::ConverterUnavailable,
            other => ApiError::Conversion(other.to_string()),
        }
    }
}

impl From<PipelineError> for ApiError {
    fn from(err: PipelineError) -> Self {
        ApiError::Pipeline(err.to_string())
    }
}

/// Result type for API handlers
pub type ApiResult<T> = Result<T, ApiError>;
