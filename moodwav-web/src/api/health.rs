//! Health check endpoint

use axum::{extract::State, routing::get, Json, Router};
use chrono::Utc;
use serde::Serialize;

use crate::audio::normalizer;
use crate::AppState;

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// "ok", or "degraded" when a classifier slot failed to load
    pub status: String,
    /// Module name ("moodwav-web")
    pub module: String,
    /// Crate version from Cargo.toml
    pub version: String,
    /// Seconds since service started
    pub uptime_seconds: u64,
    /// Whether non-WAV uploads can be converted
    pub converter: bool,
    /// Per-slot load status
    pub models: ModelsHealth,
}

#[derive(Debug, Serialize)]
pub struct ModelsHealth {
    pub lstm: bool,
    pub cnn: bool,
}

/// GET /health
///
/// Health check endpoint for monitoring.
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let uptime = Utc::now().signed_duration_since(state.startup_time);
    let uptime_seconds = uptime.num_seconds().max(0) as u64;

    let lstm = state.models.lstm_loaded();
    let cnn = state.models.cnn_loaded();
    let status = if lstm && cnn { "ok" } else { "degraded" };

    Json(HealthResponse {
        status: status.to_string(),
        module: "moodwav-web".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_seconds,
        converter: normalizer::converter_available(),
        models: ModelsHealth { lstm, cnn },
    })
}

/// Build health check routes
pub fn health_routes() -> Router<AppState> {
    Router::new().route("/health", get(health_check))
}
