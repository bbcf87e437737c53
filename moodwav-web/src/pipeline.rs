//! Analysis pipeline
//!
//! One normalized WAV in, one `Predictions` out: extract the feature
//! vector once, run both classifier slots on it, and pick the suggested
//! video from the lstm label. Feature extraction failure fails the whole
//! request; a failed slot only degrades its own outcome.

use std::path::Path;

use serde::Serialize;
use thiserror::Error;
use tracing::debug;

use crate::features::{self, FeatureError};
use crate::model::{ModelOutcome, ModelStore};
use moodwav_common::emotion::Emotion;

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("feature extraction failed: {0}")]
    FeatureExtraction(#[from] FeatureError),
}

/// Outcome of both classifier slots for one upload.
#[derive(Debug, Clone, PartialEq)]
pub struct Predictions {
    pub lstm: ModelOutcome,
    pub cnn: ModelOutcome,
}

/// Wire shape of the `predictions` response object.
#[derive(Debug, Serialize)]
pub struct PredictionsPayload {
    pub lstm_prediction: String,
    pub lstm_confidence: Option<f32>,
    pub cnn_prediction: String,
    pub cnn_confidence: Option<f32>,
    pub suggested_video: String,
}

impl Predictions {
    /// Video link keyed by the lstm label; a failed lstm falls back to the
    /// neutral link so the response always carries one.
    pub fn suggested_video(&self) -> &'static str {
        match self.lstm.emotion() {
            Some(emotion) => emotion.suggested_video(),
            None => Emotion::fallback_video(),
        }
    }

    pub fn to_payload(&self) -> PredictionsPayload {
        PredictionsPayload {
            lstm_prediction: self.lstm.wire_label().to_string(),
            lstm_confidence: self.lstm.confidence(),
            cnn_prediction: self.cnn.wire_label().to_string(),
            cnn_confidence: self.cnn.confidence(),
            suggested_video: self.suggested_video().to_string(),
        }
    }
}

/// Run the full pipeline on a normalized WAV file.
pub fn run(store: &ModelStore, wav_path: &Path) -> Result<Predictions, PipelineError> {
    let features = features::extract(wav_path)?;
    let lstm = store.run_lstm(&features);
    let cnn = store.run_cnn(&features);
    debug!(
        "Analyzed {}: lstm={} cnn={}",
        wav_path.display(),
        lstm.wire_label(),
        cnn.wire_label()
    );
    Ok(Predictions { lstm, cnn })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn predicted(emotion: Emotion, confidence: Option<f32>) -> ModelOutcome {
        ModelOutcome::Predicted {
            emotion,
            confidence,
        }
    }

    #[test]
    fn test_suggested_video_follows_lstm_label() {
        let predictions = Predictions {
            lstm: predicted(Emotion::Happy, Some(0.8)),
            cnn: predicted(Emotion::Sad, Some(0.6)),
        };
        assert_eq!(predictions.suggested_video(), Emotion::Happy.suggested_video());
    }

    #[test]
    fn test_suggested_video_falls_back_when_lstm_failed() {
        let predictions = Predictions {
            lstm: ModelOutcome::Failed {
                reason: "lstm model not loaded".to_string(),
            },
            cnn: predicted(Emotion::Angry, None),
        };
        assert_eq!(predictions.suggested_video(), Emotion::fallback_video());
    }

    #[test]
    fn test_payload_wire_shape() {
        let predictions = Predictions {
            lstm: predicted(Emotion::Fearful, Some(0.72)),
            cnn: ModelOutcome::Failed {
                reason: "cnn model not loaded".to_string(),
            },
        };
        let value = serde_json::to_value(predictions.to_payload()).unwrap();

        assert_eq!(value["lstm_prediction"], "fearful");
        assert!((value["lstm_confidence"].as_f64().unwrap() - 0.72).abs() < 1e-6);
        assert_eq!(value["cnn_prediction"], "error");
        // Absent confidence serializes as null, not a missing key
        assert!(value["cnn_confidence"].is_null());
        assert_eq!(
            value["suggested_video"],
            Emotion::Fearful.suggested_video()
        );
    }
}
