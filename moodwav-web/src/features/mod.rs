//! Acoustic feature extraction
//!
//! Turns an analyzable WAV into the fixed-length vector both classifiers
//! consume: per-coefficient means of 40 MFCCs computed over the whole clip.
//! Identical input bytes always produce the identical vector.

mod mfcc;

pub use mfcc::{MfccExtractor, FRAME_SIZE, HOP_SIZE, NUM_COEFFICIENTS, NUM_MEL_BANDS};

use std::path::Path;

use ndarray::Array1;
use thiserror::Error;
use tracing::debug;

use crate::audio::wav;

/// Length of the feature vector both classifiers consume.
pub const FEATURE_DIM: usize = NUM_COEFFICIENTS;

/// Feature extraction failure taxonomy
#[derive(Debug, Error)]
pub enum FeatureError {
    /// WAV could not be read
    #[error("failed to read WAV: {0}")]
    Read(String),

    /// File contains no samples
    #[error("audio contains no samples")]
    Empty,

    /// Clip shorter than one analysis frame
    #[error("audio too short for analysis: {samples} samples, need at least {needed}")]
    TooShort { samples: usize, needed: usize },

    /// FFT failure
    #[error("FFT failed: {0}")]
    Fft(String),
}

/// Extract the feature vector from a WAV file.
///
/// Rate-aware: the mel filterbank is built for the file's own sample rate,
/// so native-rate pass-throughs and 44.1 kHz conversions both analyze
/// correctly.
pub fn extract(path: &Path) -> Result<Array1<f32>, FeatureError> {
    let audio = wav::read_wav_mono(path).map_err(|e| FeatureError::Read(e.to_string()))?;
    if audio.samples.is_empty() {
        return Err(FeatureError::Empty);
    }

    let extractor = MfccExtractor::new(audio.sample_rate);
    let features = extractor.extract(&audio.samples)?;

    debug!(
        path = %path.display(),
        sample_rate = audio.sample_rate,
        samples = audio.samples.len(),
        dim = features.len(),
        "extracted feature vector"
    );
    Ok(features)
}
