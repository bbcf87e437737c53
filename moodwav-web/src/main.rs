//! moodwav-web - Main entry point
//!
//! Speech emotion recognition web service: accepts audio uploads over
//! HTTP, normalizes them to canonical WAV, extracts MFCC features and
//! answers with one prediction per classifier slot.

use std::fs::File;
use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tokio::signal;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use moodwav_common::config::ensure_directory;
use moodwav_web::config::{Args, ServiceConfig};
use moodwav_web::model::ModelStore;
use moodwav_web::{build_router, retention, AppState};

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let config = ServiceConfig::resolve(&args).context("Failed to resolve configuration")?;

    init_tracing(&config)?;

    info!(
        "Starting moodwav-web v{} ({} {})",
        env!("CARGO_PKG_VERSION"),
        env!("GIT_HASH"),
        env!("BUILD_PROFILE")
    );
    if let Some(path) = &config.config_path {
        info!("Loaded config from {}", path.display());
    }
    info!("Root folder: {}", config.root_folder.display());
    info!("Models directory: {}", config.models_dir.display());

    ensure_directory(&config.uploads_dir).context("Failed to create uploads directory")?;

    let models = Arc::new(ModelStore::load(&config.models_dir));
    info!(
        "Classifier slots: lstm={} cnn={}",
        if models.lstm_loaded() { "loaded" } else { "empty" },
        if models.cnn_loaded() { "loaded" } else { "empty" },
    );

    tokio::spawn(retention::run_sweeper(
        config.uploads_dir.clone(),
        config.retention,
        config.sweep_interval,
    ));

    let state = AppState::new(config.uploads_dir.clone(), models, config.max_upload_bytes);
    let app = build_router(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    info!("Starting HTTP server on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .context("Failed to bind to address")?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Server shutdown complete");
    Ok(())
}

/// Install the tracing subscriber, optionally teeing into a log file.
fn init_tracing(config: &ServiceConfig) -> Result<()> {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        tracing_subscriber::EnvFilter::new(format!(
            "moodwav_web={0},tower_http={0}",
            config.log_level
        ))
    });

    let registry = tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer());

    match &config.log_file {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("Failed to create log file {}", path.display()))?;
            registry
                .with(
                    tracing_subscriber::fmt::layer()
                        .with_writer(Arc::new(file))
                        .with_ansi(false),
                )
                .init();
        }
        None => registry.init(),
    }
    Ok(())
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, shutting down");
        },
        _ = terminate => {
            info!("Received terminate signal, shutting down");
        },
    }
}
