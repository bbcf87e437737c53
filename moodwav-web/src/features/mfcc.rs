//! MFCC computation
//!
//! Frame the signal with a Hann window, take the real FFT power spectrum,
//! pool it through a mel filterbank (HTK scale), log, then DCT-II down to
//! cepstral coefficients. The clip-level vector is the per-coefficient mean
//! across frames, so clip length never changes the output dimension.

use ndarray::{Array1, Array2};
use realfft::{RealFftPlanner, RealToComplex};
use std::sync::Arc;

use super::FeatureError;

/// Analysis frame length in samples.
pub const FRAME_SIZE: usize = 2048;
/// Hop between successive frames.
pub const HOP_SIZE: usize = 512;
/// Mel filterbank resolution.
pub const NUM_MEL_BANDS: usize = 128;
/// Cepstral coefficients kept per frame.
pub const NUM_COEFFICIENTS: usize = 40;

/// Floor added before the log so silent bands stay finite.
const MEL_FLOOR: f32 = 1e-10;

/// MFCC extractor for one sample rate.
///
/// The FFT plan, window, filterbank and DCT basis are built once and reused
/// across frames.
pub struct MfccExtractor {
    fft: Arc<dyn RealToComplex<f32>>,
    window: Vec<f32>,
    mel_filters: Array2<f32>,
    dct: Array2<f32>,
}

impl MfccExtractor {
    pub fn new(sample_rate: u32) -> Self {
        let mut planner = RealFftPlanner::<f32>::new();
        Self {
            fft: planner.plan_fft_forward(FRAME_SIZE),
            window: hann_window(FRAME_SIZE),
            mel_filters: mel_filterbank(sample_rate, FRAME_SIZE, NUM_MEL_BANDS),
            dct: dct_matrix(NUM_COEFFICIENTS, NUM_MEL_BANDS),
        }
    }

    /// Mean MFCC vector over all complete frames of `samples`.
    pub fn extract(&self, samples: &[f32]) -> Result<Array1<f32>, FeatureError> {
        if samples.len() < FRAME_SIZE {
            return Err(FeatureError::TooShort {
                samples: samples.len(),
                needed: FRAME_SIZE,
            });
        }

        let mut frame_buf = vec![0.0f32; FRAME_SIZE];
        let mut spectrum = self.fft.make_output_vec();
        let mut sums = Array1::<f32>::zeros(NUM_COEFFICIENTS);
        let mut frames = 0usize;

        let mut start = 0;
        while start + FRAME_SIZE <= samples.len() {
            // The FFT consumes its input as scratch, so the frame is
            // refilled every pass
            for (dst, (&sample, &weight)) in frame_buf
                .iter_mut()
                .zip(samples[start..start + FRAME_SIZE].iter().zip(&self.window))
            {
                *dst = sample * weight;
            }
            self.fft
                .process(&mut frame_buf, &mut spectrum)
                .map_err(|e| FeatureError::Fft(e.to_string()))?;

            let power = Array1::from_iter(spectrum.iter().map(|c| c.norm_sqr()));
            let log_mel = self.mel_filters.dot(&power).mapv(|e| (e + MEL_FLOOR).ln());
            sums += &self.dct.dot(&log_mel);
            frames += 1;
            start += HOP_SIZE;
        }

        Ok(sums / frames as f32)
    }
}

/// Periodic Hann window.
fn hann_window(len: usize) -> Vec<f32> {
    (0..len)
        .map(|i| {
            let phase = 2.0 * std::f32::consts::PI * i as f32 / len as f32;
            0.5 * (1.0 - phase.cos())
        })
        .collect()
}

/// Triangular mel filterbank over the FFT bins, HTK mel scale, 0 Hz to
/// Nyquist.
fn mel_filterbank(sample_rate: u32, frame_size: usize, num_bands: usize) -> Array2<f32> {
    let n_bins = frame_size / 2 + 1;
    let nyquist = sample_rate as f32 / 2.0;
    let mel_max = hz_to_mel(nyquist);

    // Band edges equally spaced on the mel scale; band m spans
    // edges[m]..edges[m + 2] with its peak at edges[m + 1]
    let edges: Vec<f32> = (0..num_bands + 2)
        .map(|i| mel_to_hz(mel_max * i as f32 / (num_bands + 1) as f32))
        .collect();

    let bin_hz = sample_rate as f32 / frame_size as f32;
    let mut filters = Array2::<f32>::zeros((num_bands, n_bins));
    for band in 0..num_bands {
        let (left, center, right) = (edges[band], edges[band + 1], edges[band + 2]);
        for bin in 0..n_bins {
            let freq = bin as f32 * bin_hz;
            let weight = if freq <= left || freq >= right {
                0.0
            } else if freq <= center {
                (freq - left) / (center - left)
            } else {
                (right - freq) / (right - center)
            };
            filters[[band, bin]] = weight;
        }
    }
    filters
}

/// Orthonormal DCT-II basis, `rows` coefficients over `cols` mel bands.
fn dct_matrix(rows: usize, cols: usize) -> Array2<f32> {
    let scale0 = (1.0 / cols as f32).sqrt();
    let scale = (2.0 / cols as f32).sqrt();
    let mut dct = Array2::<f32>::zeros((rows, cols));
    for k in 0..rows {
        for n in 0..cols {
            let angle = std::f32::consts::PI * k as f32 * (n as f32 + 0.5) / cols as f32;
            dct[[k, n]] = angle.cos() * if k == 0 { scale0 } else { scale };
        }
    }
    dct
}

fn hz_to_mel(hz: f32) -> f32 {
    2595.0 * (1.0 + hz / 700.0).log10()
}

fn mel_to_hz(mel: f32) -> f32 {
    700.0 * (10.0f32.powf(mel / 2595.0) - 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn sine(rate: u32, seconds: f32, hz: f32) -> Vec<f32> {
        let total = (rate as f32 * seconds) as usize;
        (0..total)
            .map(|i| {
                let t = i as f32 / rate as f32;
                (2.0 * std::f32::consts::PI * hz * t).sin() * 0.5
            })
            .collect()
    }

    #[test]
    fn test_hann_window_shape() {
        let window = hann_window(FRAME_SIZE);
        assert_eq!(window.len(), FRAME_SIZE);
        assert_relative_eq!(window[0], 0.0, epsilon = 1e-6);
        assert_relative_eq!(window[FRAME_SIZE / 2], 1.0, epsilon = 1e-6);
        assert!(window.iter().all(|&w| (0.0..=1.0).contains(&w)));
    }

    #[test]
    fn test_mel_scale_round_trip() {
        for hz in [100.0f32, 440.0, 1000.0, 8000.0, 22050.0] {
            assert_relative_eq!(mel_to_hz(hz_to_mel(hz)), hz, max_relative = 1e-4);
        }
    }

    #[test]
    fn test_filterbank_covers_every_band() {
        let filters = mel_filterbank(44100, FRAME_SIZE, NUM_MEL_BANDS);
        assert_eq!(filters.shape(), &[NUM_MEL_BANDS, FRAME_SIZE / 2 + 1]);
        for (band, row) in filters.rows().into_iter().enumerate() {
            assert!(
                row.iter().any(|&w| w > 0.0),
                "band {band} has no contributing bins"
            );
        }
    }

    #[test]
    fn test_dct_rows_are_orthonormal() {
        let dct = dct_matrix(NUM_COEFFICIENTS, NUM_MEL_BANDS);
        for k in 0..NUM_COEFFICIENTS {
            let norm: f32 = dct.row(k).iter().map(|v| v * v).sum();
            assert_relative_eq!(norm, 1.0, epsilon = 1e-4);
        }
        let cross: f32 = dct
            .row(0)
            .iter()
            .zip(dct.row(1).iter())
            .map(|(a, b)| a * b)
            .sum();
        assert_relative_eq!(cross, 0.0, epsilon = 1e-4);
    }

    #[test]
    fn test_extract_dimension_is_length_independent() {
        let extractor = MfccExtractor::new(44100);
        let short = extractor.extract(&sine(44100, 0.2, 440.0)).unwrap();
        let long = extractor.extract(&sine(44100, 1.5, 440.0)).unwrap();
        assert_eq!(short.len(), NUM_COEFFICIENTS);
        assert_eq!(long.len(), NUM_COEFFICIENTS);
    }

    #[test]
    fn test_extract_is_deterministic() {
        let extractor = MfccExtractor::new(44100);
        let samples = sine(44100, 0.5, 440.0);
        let first = extractor.extract(&samples).unwrap();
        let second = extractor.extract(&samples).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_extract_distinguishes_tones() {
        let extractor = MfccExtractor::new(44100);
        let low = extractor.extract(&sine(44100, 0.5, 200.0)).unwrap();
        let high = extractor.extract(&sine(44100, 0.5, 3000.0)).unwrap();
        let distance: f32 = low
            .iter()
            .zip(high.iter())
            .map(|(a, b)| (a - b).powi(2))
            .sum();
        assert!(distance > 1.0, "tones should separate, distance {distance}");
    }

    #[test]
    fn test_extract_rejects_short_input() {
        let extractor = MfccExtractor::new(44100);
        let result = extractor.extract(&[0.0; FRAME_SIZE - 1]);
        assert!(matches!(result, Err(FeatureError::TooShort { .. })));
    }

    #[test]
    fn test_extract_handles_silence() {
        let extractor = MfccExtractor::new(44100);
        let features = extractor.extract(&vec![0.0; FRAME_SIZE * 4]).unwrap();
        assert!(features.iter().all(|v| v.is_finite()));
    }
}
