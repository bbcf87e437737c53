//! moodwav-web library interface
//!
//! Exposes the router, state and pipeline pieces for integration testing.

pub mod api;
pub mod audio;
pub mod config;
pub mod error;
pub mod features;
pub mod model;
pub mod pipeline;
pub mod retention;

pub use crate::error::{ApiError, ApiResult};

use std::path::PathBuf;
use std::sync::Arc;

use axum::extract::DefaultBodyLimit;
use axum::Router;
use chrono::{DateTime, Utc};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::model::ModelStore;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    /// Directory uploads are stored in
    pub uploads_dir: PathBuf,
    /// Loaded classifier slots
    pub models: Arc<ModelStore>,
    /// Service startup timestamp for uptime tracking
    pub startup_time: DateTime<Utc>,
    /// Request body cap in bytes
    pub max_upload_bytes: usize,
}

impl AppState {
    pub fn new(uploads_dir: PathBuf, models: Arc<ModelStore>, max_upload_bytes: usize) -> Self {
        Self {
            uploads_dir,
            models,
            startup_time: Utc::now(),
            max_upload_bytes,
        }
    }
}

/// Build application router
pub fn build_router(state: AppState) -> Router {
    let body_limit = DefaultBodyLimit::max(state.max_upload_bytes);

    Router::new()
        // UI routes (HTML page + assets)
        .merge(api::ui_routes())
        // API routes
        .merge(api::predict_routes())
        .merge(api::upload_routes())
        .merge(api::health_routes())
        .layer(body_limit)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
