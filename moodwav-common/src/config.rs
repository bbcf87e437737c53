//! Configuration loading and default path resolution
//!
//! Bootstrap configuration comes from a TOML file; these settings cannot
//! change while the service runs. The service crate layers command-line
//! arguments and environment variables on top (CLI > env > TOML > default).

use crate::{Error, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Bootstrap configuration loaded from a TOML file
///
/// Every field is optional in the file; missing values fall back to the
/// built-in defaults below.
#[derive(Debug, Clone, Deserialize)]
pub struct TomlConfig {
    /// HTTP server port
    #[serde(default = "default_port")]
    pub port: u16,

    /// Root folder holding the uploads directory (optional)
    ///
    /// If not specified, falls back to env var then the OS default.
    #[serde(default)]
    pub root_folder: Option<PathBuf>,

    /// Directory holding classifier artifacts (optional)
    #[serde(default)]
    pub models_dir: Option<PathBuf>,

    /// Upload handling configuration (optional)
    #[serde(default)]
    pub uploads: UploadsConfig,

    /// Logging configuration (optional)
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Default for TomlConfig {
    fn default() -> Self {
        Self {
            port: default_port(),
            root_folder: None,
            models_dir: None,
            uploads: UploadsConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

/// Upload handling configuration
#[derive(Debug, Clone, Deserialize)]
pub struct UploadsConfig {
    /// Request body cap for uploads, in MiB
    #[serde(default = "default_max_upload_mb")]
    pub max_upload_mb: u64,

    /// Seconds an upload is kept before the sweeper may delete it
    ///
    /// Zero disables sweeping.
    #[serde(default = "default_retention_secs")]
    pub retention_secs: u64,

    /// Seconds between sweeper passes
    #[serde(default = "default_sweep_interval_secs")]
    pub sweep_interval_secs: u64,
}

impl Default for UploadsConfig {
    fn default() -> Self {
        Self {
            max_upload_mb: default_max_upload_mb(),
            retention_secs: default_retention_secs(),
            sweep_interval_secs: default_sweep_interval_secs(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Log file path (optional, logs to stderr if not specified)
    #[serde(default)]
    pub file: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            file: None,
        }
    }
}

fn default_port() -> u16 {
    5740
}

fn default_max_upload_mb() -> u64 {
    25
}

fn default_retention_secs() -> u64 {
    3600
}

fn default_sweep_interval_secs() -> u64 {
    300
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Load and parse a TOML configuration file.
pub fn load_toml_config(path: &Path) -> Result<TomlConfig> {
    let raw = std::fs::read_to_string(path)
        .map_err(|e| Error::Config(format!("Failed to read config file {}: {}", path.display(), e)))?;
    toml::from_str(&raw)
        .map_err(|e| Error::Config(format!("Failed to parse {}: {}", path.display(), e)))
}

/// Default configuration file path for the platform
/// (`<config_dir>/moodwav/moodwav.toml`).
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("moodwav").join("moodwav.toml"))
}

/// OS-dependent default root folder path.
pub fn default_root_folder() -> PathBuf {
    if cfg!(target_os = "linux") {
        // ~/.local/share/moodwav
        dirs::data_local_dir()
            .map(|d| d.join("moodwav"))
            .unwrap_or_else(|| PathBuf::from("/var/lib/moodwav"))
    } else if cfg!(target_os = "macos") {
        // ~/Library/Application Support/moodwav
        dirs::data_dir()
            .map(|d| d.join("moodwav"))
            .unwrap_or_else(|| PathBuf::from("/Library/Application Support/moodwav"))
    } else if cfg!(target_os = "windows") {
        // %LOCALAPPDATA%\moodwav
        dirs::data_local_dir()
            .map(|d| d.join("moodwav"))
            .unwrap_or_else(|| PathBuf::from("C:\\ProgramData\\moodwav"))
    } else {
        PathBuf::from("./moodwav_data")
    }
}

/// Create a directory (and parents) if it does not exist yet.
pub fn ensure_directory(path: &Path) -> Result<()> {
    if !path.exists() {
        std::fs::create_dir_all(path)
            .map_err(|e| Error::Config(format!("Failed to create {}: {}", path.display(), e)))?;
    }
    Ok(())
}
