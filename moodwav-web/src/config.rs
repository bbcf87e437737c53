//! Configuration resolution for moodwav-web
//!
//! Settings resolve with CLI > environment > TOML > built-in default
//! priority. CLI flags double as environment variables via clap's `env`
//! attribute, so the env tier needs no separate handling.

use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;

use moodwav_common::config::{
    default_config_path, default_root_folder, load_toml_config, TomlConfig,
};
use moodwav_common::Result;

/// Command-line arguments for moodwav-web
#[derive(Parser, Debug)]
#[command(name = "moodwav-web")]
#[command(about = "Speech emotion recognition web service")]
#[command(version)]
pub struct Args {
    /// Port to listen on
    #[arg(short, long, env = "MOODWAV_PORT")]
    pub port: Option<u16>,

    /// Root folder holding the uploads directory
    #[arg(short, long, env = "MOODWAV_ROOT_FOLDER")]
    pub root_folder: Option<PathBuf>,

    /// Directory holding classifier artifacts (lstm.json, cnn.json)
    #[arg(long, env = "MOODWAV_MODELS_DIR")]
    pub models_dir: Option<PathBuf>,

    /// Path to a TOML config file
    #[arg(long)]
    pub config: Option<PathBuf>,
}

/// Fully resolved runtime configuration.
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    pub port: u16,
    pub root_folder: PathBuf,
    pub uploads_dir: PathBuf,
    pub models_dir: PathBuf,
    pub max_upload_bytes: usize,
    pub retention: Duration,
    pub sweep_interval: Duration,
    pub log_level: String,
    pub log_file: Option<PathBuf>,
    /// TOML file the configuration was layered from, when one was used
    pub config_path: Option<PathBuf>,
}

impl ServiceConfig {
    /// Resolve the runtime configuration from arguments and the TOML layer.
    pub fn resolve(args: &Args) -> Result<Self> {
        let (toml, config_path) = load_layered_toml(args)?;

        let port = args.port.unwrap_or(toml.port);
        let root_folder = args
            .root_folder
            .clone()
            .or(toml.root_folder)
            .unwrap_or_else(default_root_folder);
        let models_dir = args
            .models_dir
            .clone()
            .or(toml.models_dir)
            .unwrap_or_else(|| PathBuf::from("models"));
        let uploads_dir = root_folder.join("uploads");

        Ok(Self {
            port,
            root_folder,
            uploads_dir,
            models_dir,
            max_upload_bytes: (toml.uploads.max_upload_mb as usize) * 1024 * 1024,
            retention: Duration::from_secs(toml.uploads.retention_secs),
            // tokio's interval panics on a zero period
            sweep_interval: Duration::from_secs(toml.uploads.sweep_interval_secs.max(1)),
            log_level: toml.logging.level,
            log_file: toml.logging.file,
            config_path,
        })
    }
}

/// Load the TOML layer. An explicit `--config` path must exist; the default
/// path is used only when present, and built-in defaults apply otherwise.
fn load_layered_toml(args: &Args) -> Result<(TomlConfig, Option<PathBuf>)> {
    if let Some(path) = &args.config {
        let config = load_toml_config(path)?;
        return Ok((config, Some(path.clone())));
    }

    match default_config_path() {
        Some(path) if path.exists() => {
            let config = load_toml_config(&path)?;
            Ok((config, Some(path)))
        }
        _ => Ok((TomlConfig::default(), None)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_without_config_file() {
        let args = Args::parse_from(["moodwav-web"]);
        let config = ServiceConfig::resolve(&args).unwrap();

        assert_eq!(config.port, 5740);
        assert_eq!(config.max_upload_bytes, 25 * 1024 * 1024);
        assert_eq!(config.retention, Duration::from_secs(3600));
        assert_eq!(config.sweep_interval, Duration::from_secs(300));
        assert_eq!(config.log_level, "info");
        assert!(config.log_file.is_none());
        assert!(config.uploads_dir.ends_with("uploads"));
        assert_eq!(config.models_dir, PathBuf::from("models"));
        assert!(config.config_path.is_none());
    }

    #[test]
    fn test_cli_overrides_take_priority() {
        let args = Args::parse_from([
            "moodwav-web",
            "--port",
            "9000",
            "--root-folder",
            "/tmp/mw",
            "--models-dir",
            "/tmp/artifacts",
        ]);
        let config = ServiceConfig::resolve(&args).unwrap();

        assert_eq!(config.port, 9000);
        assert_eq!(config.root_folder, PathBuf::from("/tmp/mw"));
        assert_eq!(config.uploads_dir, PathBuf::from("/tmp/mw/uploads"));
        assert_eq!(config.models_dir, PathBuf::from("/tmp/artifacts"));
    }

    #[test]
    fn test_toml_layer_fills_what_cli_leaves() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("moodwav.toml");
        std::fs::write(
            &path,
            r#"
port = 6000
root_folder = "/srv/moodwav"

[uploads]
max_upload_mb = 5
retention_secs = 60

[logging]
level = "debug"
"#,
        )
        .unwrap();

        let args = Args::parse_from([
            "moodwav-web",
            "--config",
            path.to_str().unwrap(),
            "--port",
            "7000",
        ]);
        let config = ServiceConfig::resolve(&args).unwrap();

        assert_eq!(config.port, 7000);
        assert_eq!(config.root_folder, PathBuf::from("/srv/moodwav"));
        assert_eq!(config.max_upload_bytes, 5 * 1024 * 1024);
        assert_eq!(config.retention, Duration::from_secs(60));
        assert_eq!(config.sweep_interval, Duration::from_secs(300));
        assert_eq!(config.log_level, "debug");
    }

    #[test]
    fn test_explicit_config_path_must_exist() {
        let args = Args::parse_from(["moodwav-web", "--config", "/nonexistent/moodwav.toml"]);
        assert!(ServiceConfig::resolve(&args).is_err());
    }

    #[test]
    fn test_zero_sweep_interval_is_clamped() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("moodwav.toml");
        std::fs::write(&path, "[uploads]\nsweep_interval_secs = 0\n").unwrap();

        let args = Args::parse_from(["moodwav-web", "--config", path.to_str().unwrap()]);
        let config = ServiceConfig::resolve(&args).unwrap();
        assert_eq!(config.sweep_interval, Duration::from_secs(1));
    }
}
