//! Prediction endpoint
//!
//! Accepts one audio file as the `file` part of a multipart form, stores it
//! under the uploads directory, normalizes it to WAV, and runs both
//! classifier slots. The CPU-bound part of the request runs on the blocking
//! pool so the handler never stalls the async runtime.

use std::path::Path;

use axum::{
    body::Bytes,
    extract::{multipart::MultipartError, Multipart, State},
    http::StatusCode,
    routing::post,
    Json, Router,
};
use serde_json::json;
use tracing::info;

use crate::audio::normalizer;
use crate::error::{ApiError, ApiResult};
use crate::{pipeline, AppState};

/// Upload extensions the normalizer can take in.
const ALLOWED_EXTENSIONS: [&str; 6] = ["wav", "mp3", "m4a", "ogg", "flac", "webm"];

/// POST /api/predict
///
/// Multipart upload with a single `file` part. Responds with one prediction
/// per classifier slot and a suggested video link.
pub async fn predict(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> ApiResult<Json<serde_json::Value>> {
    let mut upload: Option<(String, Bytes)> = None;
    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        if field.name() == Some("file") {
            let raw_name = field.file_name().unwrap_or_default().to_string();
            let data = field.bytes().await.map_err(multipart_error)?;
            upload = Some((raw_name, data));
            break;
        }
    }

    let Some((raw_name, data)) = upload else {
        return Err(ApiError::Validation("No file part in the request".to_string()));
    };
    if raw_name.is_empty() {
        return Err(ApiError::Validation("No selected file".to_string()));
    }
    if !allowed_extension(&raw_name) {
        return Err(ApiError::Validation("Unsupported file type".to_string()));
    }

    // Sanitizing can only shrink the name, so re-check the extension
    let stored_name = sanitize_filename(&raw_name);
    if !allowed_extension(&stored_name) {
        return Err(ApiError::Validation("Unsupported file type".to_string()));
    }

    let stored_path = state.uploads_dir.join(&stored_name);
    tokio::fs::write(&stored_path, &data).await?;
    info!("Received upload {} ({} bytes)", stored_name, data.len());

    let models = state.models.clone();
    let upload_path = stored_path.clone();
    let (wav_path, predictions) = tokio::task::spawn_blocking(move || {
        let wav_path = normalizer::normalize_to_wav(&upload_path)?;
        let predictions = pipeline::run(&models, &wav_path)?;
        Ok::<_, ApiError>((wav_path, predictions))
    })
    .await
    .map_err(|_| ApiError::Internal("analysis task panicked".to_string()))??;

    let analyzed_name = wav_path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| stored_name.clone());

    Ok(Json(json!({
        "ok": true,
        "filename": analyzed_name,
        "predictions": predictions.to_payload(),
    })))
}

/// Map a multipart read failure, keeping the extractor's 413 for body-cap
/// overruns.
fn multipart_error(err: MultipartError) -> ApiError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        ApiError::TooLarge
    } else {
        ApiError::Validation(format!("Malformed multipart request: {err}"))
    }
}

/// Strip any path component and keep only characters safe for a file name.
fn sanitize_filename(name: &str) -> String {
    let base = name.rsplit(['/', '\\']).next().unwrap_or(name);
    base.chars()
        .filter(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_'))
        .collect()
}

/// Case-insensitive extension allow-list check.
fn allowed_extension(name: &str) -> bool {
    Path::new(name)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| {
            let ext = ext.to_ascii_lowercase();
            ALLOWED_EXTENSIONS.contains(&ext.as_str())
        })
        .unwrap_or(false)
}

/// Build prediction routes
pub fn predict_routes() -> Router<AppState> {
    Router::new().route("/api/predict", post(predict))
}
