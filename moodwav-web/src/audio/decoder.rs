//! Audio decoding via symphonia
//!
//! Decodes any supported container/codec to mono f32 samples at the source
//! rate. Multi-channel sources are downmixed by channel averaging.

use std::path::Path;

use symphonia::core::audio::{AudioBufferRef, Signal};
use symphonia::core::codecs::{DecoderOptions, CODEC_TYPE_NULL};
use symphonia::core::conv::FromSample;
use symphonia::core::errors::Error as SymphoniaError;
use symphonia::core::formats::FormatOptions;
use symphonia::core::io::MediaSourceStream;
use symphonia::core::meta::MetadataOptions;
use symphonia::core::probe::Hint;
use tracing::debug;

use super::normalizer::NormalizeError;

/// Decoded audio, downmixed to mono
#[derive(Debug)]
pub struct DecodedAudio {
    /// Mono samples in [-1.0, 1.0]
    pub samples: Vec<f32>,
    /// Source sample rate in Hz
    pub sample_rate: u32,
    /// Channel count before the downmix
    pub channels: usize,
}

/// Decode an audio file to mono f32 samples at its native rate.
pub fn decode_to_mono(path: &Path) -> Result<DecodedAudio, NormalizeError> {
    let file = std::fs::File::open(path)?;
    let mss = MediaSourceStream::new(Box::new(file), Default::default());

    // The extension is only a probe hint; the container is identified by
    // content.
    let mut hint = Hint::new();
    if let Some(ext) = path.extension().and_then(|e| e.to_str()) {
        hint.with_extension(ext);
    }

    let probed = symphonia::default::get_probe()
        .format(
            &hint,
            mss,
            &FormatOptions::default(),
            &MetadataOptions::default(),
        )
        .map_err(as_normalize_error)?;
    let mut format = probed.format;

    let track = format
        .tracks()
        .iter()
        .find(|t| t.codec_params.codec != CODEC_TYPE_NULL)
        .ok_or_else(|| NormalizeError::UnsupportedFormat("no audio track found".to_string()))?;
    let track_id = track.id;
    let sample_rate = track
        .codec_params
        .sample_rate
        .ok_or_else(|| NormalizeError::Conversion("source sample rate unknown".to_string()))?;
    let channels = track.codec_params.channels.map(|c| c.count()).unwrap_or(1);

    let mut decoder = symphonia::default::get_codecs()
        .make(&track.codec_params, &DecoderOptions::default())
        .map_err(as_normalize_error)?;

    let mut samples = Vec::new();
    loop {
        let packet = match format.next_packet() {
            Ok(packet) => packet,
            Err(SymphoniaError::IoError(e)) if e.kind() == std::io::ErrorKind::UnexpectedEof => {
                // End of stream
                break;
            }
            Err(e) => return Err(NormalizeError::Conversion(format!("packet read failed: {e}"))),
        };

        if packet.track_id() != track_id {
            continue;
        }

        let decoded = decoder
            .decode(&packet)
            .map_err(|e| NormalizeError::Conversion(format!("decode failed: {e}")))?;
        downmix_into(&decoded, &mut samples);
    }

    debug!(
        path = %path.display(),
        sample_rate,
        channels,
        total_samples = samples.len(),
        "decoded audio"
    );

    Ok(DecodedAudio {
        samples,
        sample_rate,
        channels,
    })
}

/// Map probe and codec construction failures onto the normalizer taxonomy.
fn as_normalize_error(err: SymphoniaError) -> NormalizeError {
    match err {
        SymphoniaError::Unsupported(what) => NormalizeError::UnsupportedFormat(what.to_string()),
        SymphoniaError::IoError(e) => NormalizeError::Io(e),
        other => NormalizeError::Conversion(other.to_string()),
    }
}

/// Append a decoded buffer to `out`, averaging channels down to mono.
fn downmix_into(decoded: &AudioBufferRef, out: &mut Vec<f32>) {
    macro_rules! mix {
        ($buf:expr) => {{
            let buf = $buf;
            let num_channels = buf.spec().channels.count();
            let num_frames = buf.frames();
            out.reserve(num_frames);
            for frame_idx in 0..num_frames {
                let mut sum = 0.0f32;
                for ch in 0..num_channels {
                    sum += f32::from_sample(buf.chan(ch)[frame_idx]);
                }
                out.push(sum / num_channels as f32);
            }
        }};
    }

    match decoded {
        AudioBufferRef::U8(buf) => mix!(buf),
        AudioBufferRef::U16(buf) => mix!(buf),
        AudioBufferRef::U24(buf) => mix!(buf),
        AudioBufferRef::U32(buf) => mix!(buf),
        AudioBufferRef::S8(buf) => mix!(buf),
        AudioBufferRef::S16(buf) => mix!(buf),
        AudioBufferRef::S24(buf) => mix!(buf),
        AudioBufferRef::S32(buf) => mix!(buf),
        AudioBufferRef::F32(buf) => mix!(buf),
        AudioBufferRef::F64(buf) => mix!(buf),
    }
}
