//! Resampling to the canonical rate using rubato
//!
//! The normalizer hands over mono audio at the source rate; this module
//! brings it to 44.1 kHz for the canonical WAV.

use rubato::{FastFixedIn, PolynomialDegree, Resampler};
use tracing::debug;

use super::normalizer::{NormalizeError, TARGET_SAMPLE_RATE};

/// Resample mono audio to the canonical 44.1 kHz rate.
///
/// Returns a copy when the input is already at the target rate.
pub fn resample_to_target(input: &[f32], input_rate: u32) -> Result<Vec<f32>, NormalizeError> {
    if input_rate == TARGET_SAMPLE_RATE {
        debug!("sample rate already at {}Hz, skipping resample", TARGET_SAMPLE_RATE);
        return Ok(input.to_vec());
    }
    if input.is_empty() {
        return Err(NormalizeError::Conversion("no samples to resample".to_string()));
    }

    debug!(
        "resampling from {}Hz to {}Hz ({} samples)",
        input_rate,
        TARGET_SAMPLE_RATE,
        input.len()
    );

    // FastFixedIn trades a little quality for speed; ample for feature
    // extraction. The whole clip goes through in one chunk.
    let mut resampler = FastFixedIn::<f32>::new(
        TARGET_SAMPLE_RATE as f64 / input_rate as f64,
        1.0,
        PolynomialDegree::Septic,
        input.len(),
        1,
    )
    .map_err(|e| NormalizeError::Conversion(format!("failed to create resampler: {e}")))?;

    let mut output = resampler
        .process(&[input.to_vec()], None)
        .map_err(|e| NormalizeError::Conversion(format!("resampling failed: {e}")))?;

    Ok(output.remove(0))
}
