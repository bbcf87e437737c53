//! Browser UI: landing page and static assets
//!
//! Assets are embedded at compile time so the binary is self-contained.

use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    routing::get,
    Router,
};

use crate::AppState;

const APP_JS: &str = include_str!("../../static/app.js");
const STYLE_CSS: &str = include_str!("../../static/style.css");

/// GET /
///
/// Upload page with build info in the header.
pub async fn index_page() -> Html<String> {
    let version = env!("CARGO_PKG_VERSION");
    let git_hash = env!("GIT_HASH");
    let build_profile = env!("BUILD_PROFILE");
    let build_timestamp = env!("BUILD_TIMESTAMP");

    Html(format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>MoodWav</title>
    <link rel="stylesheet" href="/static/style.css">
</head>
<body>
    <header>
        <div class="header-content">
            <div class="header-left">
                <h1>MoodWav</h1>
                <p class="subtitle">Speech emotion recognition</p>
            </div>
            <div class="header-right">
                <div class="build-info-line">moodwav-web v{version}</div>
                <div class="build-info-line">{git_hash} ({build_profile})</div>
                <div class="build-info-line">{build_timestamp}</div>
            </div>
        </div>
    </header>
    <div class="content">
        <section class="upload-card">
            <h2>Analyze a recording</h2>
            <p>Upload a short speech clip, or record one from your microphone. WAV is analyzed as-is; other formats are converted first.</p>
            <form id="upload-form">
                <input type="file" id="file-input" name="file"
                       accept=".wav,.mp3,.m4a,.ogg,.flac,.webm">
                <button type="submit" class="button" id="analyze-button">Analyze</button>
            </form>
            <div class="record-controls">
                <button type="button" class="button" id="record-button">Record</button>
                <button type="button" class="button" id="stop-button" disabled>Stop</button>
            </div>
            <audio id="preview" controls class="hidden"></audio>
            <p id="status" class="status"></p>
        </section>
        <section id="results" class="results hidden">
            <h2>Predictions</h2>
            <div class="model-grid">
                <div class="model-card">
                    <h3>LSTM</h3>
                    <p class="emotion" id="lstm-emotion">-</p>
                    <p class="confidence" id="lstm-confidence"></p>
                </div>
                <div class="model-card">
                    <h3>CNN</h3>
                    <p class="emotion" id="cnn-emotion">-</p>
                    <p class="confidence" id="cnn-confidence"></p>
                </div>
            </div>
            <p><a id="video-link" class="button" target="_blank" rel="noopener">Suggested video</a></p>
            <audio id="playback" controls class="hidden"></audio>
        </section>
    </div>
    <script src="/static/app.js"></script>
</body>
</html>"#
    ))
}

/// GET /static/app.js
pub async fn serve_app_js() -> Response {
    (
        StatusCode::OK,
        [
            ("content-type", "application/javascript"),
            ("cache-control", "no-cache, no-store, must-revalidate"),
        ],
        APP_JS,
    )
        .into_response()
}

/// GET /static/style.css
pub async fn serve_style_css() -> Response {
    (
        StatusCode::OK,
        [
            ("content-type", "text/css"),
            ("cache-control", "no-cache, no-store, must-revalidate"),
        ],
        STYLE_CSS,
    )
        .into_response()
}

/// Build UI routes
pub fn ui_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(index_page))
        .route("/static/app.js", get(serve_app_js))
        .route("/static/style.css", get(serve_style_css))
}
