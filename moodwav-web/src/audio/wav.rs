//! WAV read/write via hound
//!
//! Reading accepts any channel count and 8/16/24/32-bit int or f32 samples,
//! downmixing to mono by channel averaging. Writing always produces the
//! canonical 16-bit PCM mono format.

use hound::{SampleFormat, WavSpec, WavWriter};
use std::path::Path;

/// Samples read from a WAV file, downmixed to mono
#[derive(Debug)]
pub struct WavAudio {
    /// Mono samples in [-1.0, 1.0]
    pub samples: Vec<f32>,
    /// Sample rate in Hz
    pub sample_rate: u32,
}

/// Read a WAV file as mono f32 samples at its native rate.
pub fn read_wav_mono(path: &Path) -> Result<WavAudio, hound::Error> {
    let mut reader = hound::WavReader::open(path)?;
    let spec = reader.spec();
    let channels = spec.channels.max(1) as usize;

    let interleaved: Vec<f32> = match spec.sample_format {
        SampleFormat::Float => reader.samples::<f32>().collect::<Result<_, _>>()?,
        SampleFormat::Int => {
            let scale = 1.0 / (1i64 << (spec.bits_per_sample - 1)) as f32;
            reader
                .samples::<i32>()
                .map(|s| s.map(|v| v as f32 * scale))
                .collect::<Result<_, _>>()?
        }
    };

    let mut samples = Vec::with_capacity(interleaved.len() / channels);
    for frame in interleaved.chunks_exact(channels) {
        samples.push(frame.iter().sum::<f32>() / channels as f32);
    }

    Ok(WavAudio {
        samples,
        sample_rate: spec.sample_rate,
    })
}

/// Write mono f32 samples as a 16-bit PCM WAV.
#[cfg(feature = "transcode")]
pub fn write_wav_mono(path: &Path, samples: &[f32], sample_rate: u32) -> Result<(), hound::Error> {
    let spec = WavSpec {
        channels: 1,
        sample_rate,
        bits_per_sample: 16,
        sample_format: SampleFormat::Int,
    };
    let mut writer = WavWriter::create(path, spec)?;
    for &sample in samples {
        let clamped = sample.clamp(-1.0, 1.0);
        writer.write_sample((clamped * i16::MAX as f32) as i16)?;
    }
    writer.finalize()
}
