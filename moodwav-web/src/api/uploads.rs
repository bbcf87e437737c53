//! Stored upload retrieval
//!
//! Serves files from the uploads directory by bare file name. Names with
//! path separators or parent references are treated as not found rather
//! than resolved.

use axum::{
    extract::{Path, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Router,
};

use crate::error::{ApiError, ApiResult};
use crate::AppState;

/// GET /uploads/:filename
pub async fn serve_upload(
    State(state): State<AppState>,
    Path(filename): Path<String>,
) -> ApiResult<Response> {
    // Dots inside a name are fine ("clip..wav" is a legal upload); only the
    // bare "." and ".." segments resolve outside a stored file
    if filename.contains(['/', '\\']) || filename == ".." || filename == "." {
        return Err(ApiError::NotFound(format!("No such upload: {filename}")));
    }

    let path = state.uploads_dir.join(&filename);
    let data = tokio::fs::read(&path).await.map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            ApiError::NotFound(format!("No such upload: {filename}"))
        } else {
            ApiError::Io(e)
        }
    })?;

    Ok((
        StatusCode::OK,
        [(header::CONTENT_TYPE, content_type_for(&filename))],
        data,
    )
        .into_response())
}

/// Content type from the file name extension.
fn content_type_for(filename: &str) -> &'static str {
    let ext = std::path::Path::new(filename)
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase());
    match ext.as_deref() {
        Some("wav") => "audio/wav",
        Some("mp3") => "audio/mpeg",
        Some("m4a") => "audio/mp4",
        Some("ogg") => "audio/ogg",
        Some("flac") => "audio/flac",
        Some("webm") => "audio/webm",
        _ => "application/octet-stream",
    }
}

/// Build upload retrieval routes
pub fn upload_routes() -> Router<AppState> {
    Router::new().route("/uploads/:filename", get(serve_upload))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_content_type_for_known_extensions() {
        assert_eq!(content_type_for("clip.wav"), "audio/wav");
        assert_eq!(content_type_for("CLIP.WAV"), "audio/wav");
        assert_eq!(content_type_for("song.mp3"), "audio/mpeg");
        assert_eq!(content_type_for("voice.m4a"), "audio/mp4");
        assert_eq!(content_type_for("rec.ogg"), "audio/ogg");
        assert_eq!(content_type_for("take.flac"), "audio/flac");
        assert_eq!(content_type_for("cam.webm"), "audio/webm");
    }

    #[test]
    fn test_content_type_falls_back_to_octet_stream() {
        assert_eq!(content_type_for("notes.txt"), "application/octet-stream");
        assert_eq!(content_type_for("noext"), "application/octet-stream");
    }
}
