//! Upload normalization to canonical WAV
//!
//! `.wav` uploads pass through untouched and are analyzed at their native
//! rate. Everything else is decoded, downmixed to mono, resampled to
//! 44.1 kHz and written as a 16-bit PCM sibling `<stem>.wav`. The original
//! upload is kept either way.

use std::path::{Path, PathBuf};

use thiserror::Error;
#[cfg(feature = "transcode")]
use tracing::info;

/// Canonical sample rate for converted uploads.
pub const TARGET_SAMPLE_RATE: u32 = 44_100;

/// Normalization failure taxonomy
#[derive(Debug, Error)]
pub enum NormalizeError {
    /// Built without the transcode feature
    #[error("audio converter not compiled in")]
    ConverterUnavailable,

    /// Container or codec the decoder does not support
    #[error("unsupported audio format: {0}")]
    UnsupportedFormat(String),

    /// Decode, resample or encode failure
    #[error("{0}")]
    Conversion(String),

    /// IO failure while reading the upload or writing the WAV
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// True when this build can convert non-WAV uploads.
pub fn converter_available() -> bool {
    cfg!(feature = "transcode")
}

/// Lowercase extension of a path, if any.
pub fn extension_of(path: &Path) -> Option<String> {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
}

/// Normalize an upload for analysis.
///
/// Returns the path the pipeline should analyze: the upload itself for WAV,
/// the converted sibling otherwise.
pub fn normalize_to_wav(path: &Path) -> Result<PathBuf, NormalizeError> {
    if extension_of(path).as_deref() == Some("wav") {
        return Ok(path.to_path_buf());
    }
    convert_to_wav(path)
}

#[cfg(feature = "transcode")]
fn convert_to_wav(path: &Path) -> Result<PathBuf, NormalizeError> {
    let decoded = super::decoder::decode_to_mono(path)?;
    if decoded.samples.is_empty() {
        return Err(NormalizeError::Conversion("decoded audio is empty".to_string()));
    }

    let resampled = super::resampler::resample_to_target(&decoded.samples, decoded.sample_rate)?;

    let wav_path = path.with_extension("wav");
    super::wav::write_wav_mono(&wav_path, &resampled, TARGET_SAMPLE_RATE)
        .map_err(|e| NormalizeError::Conversion(format!("WAV encode failed: {e}")))?;

    info!(
        source = %path.display(),
        target = %wav_path.display(),
        source_rate = decoded.sample_rate,
        source_channels = decoded.channels,
        "converted upload to canonical WAV"
    );
    Ok(wav_path)
}

#[cfg(not(feature = "transcode"))]
fn convert_to_wav(_path: &Path) -> Result<PathBuf, NormalizeError> {
    Err(NormalizeError::ConverterUnavailable)
}
