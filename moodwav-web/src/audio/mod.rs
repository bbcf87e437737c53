//! Audio handling: canonical WAV I/O and upload normalization
//!
//! The pipeline only analyzes WAV. `.wav` uploads pass through untouched;
//! everything else goes through decode / downmix / resample (the `transcode`
//! feature) before analysis.

#[cfg(feature = "transcode")]
pub mod decoder;
pub mod normalizer;
#[cfg(feature = "transcode")]
pub mod resampler;
pub mod wav;
