//! Upload retention sweeper
//!
//! Stored uploads are transient: a periodic background sweep removes files
//! older than the retention window. A zero window disables the sweeper and
//! keeps uploads indefinitely.

use std::io;
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};

use tokio::time::interval;
use tracing::{debug, info, warn};

/// Periodic sweep loop. Runs until the process exits.
pub async fn run_sweeper(uploads_dir: PathBuf, retention: Duration, sweep_interval: Duration) {
    if retention.is_zero() {
        info!("Upload retention disabled, keeping uploads indefinitely");
        return;
    }

    info!(
        "Upload sweeper started: retention {}s, sweep every {}s",
        retention.as_secs(),
        sweep_interval.as_secs()
    );

    let mut tick = interval(sweep_interval);
    loop {
        tick.tick().await;
        match sweep_once(&uploads_dir, retention) {
            Ok(0) => {}
            Ok(removed) => debug!("Upload sweep removed {} expired file(s)", removed),
            Err(e) => warn!("Upload sweep failed: {}", e),
        }
    }
}

/// One sweep pass: remove regular files modified before the retention
/// cutoff. Subdirectories and unreadable entries are left alone.
pub fn sweep_once(uploads_dir: &Path, retention: Duration) -> io::Result<usize> {
    let Some(cutoff) = SystemTime::now().checked_sub(retention) else {
        return Ok(0);
    };

    let mut removed = 0;
    for entry in std::fs::read_dir(uploads_dir)? {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                warn!("Skipping unreadable directory entry: {}", e);
                continue;
            }
        };
        let is_file = entry.file_type().map(|t| t.is_file()).unwrap_or(false);
        if !is_file {
            continue;
        }

        let path = entry.path();
        let modified = match entry.metadata().and_then(|m| m.modified()) {
            Ok(modified) => modified,
            Err(e) => {
                warn!("Skipping {}: {}", path.display(), e);
                continue;
            }
        };
        if modified < cutoff {
            match std::fs::remove_file(&path) {
                Ok(()) => removed += 1,
                Err(e) => warn!("Failed to remove {}: {}", path.display(), e),
            }
        }
    }
    Ok(removed)
}
