//! Classifier abstraction and per-model outcomes
//!
//! Each response carries one outcome per classifier slot. Slots fail
//! independently: a broken artifact or a bad prediction only downgrades its
//! own outcome, never the whole request.

mod artifact;
mod store;

pub use artifact::{load_artifact, CentroidClassifier, MlpClassifier};
pub use store::ModelStore;

use ndarray::Array1;
use thiserror::Error;

use moodwav_common::emotion::Emotion;

/// Classifier failure taxonomy
#[derive(Debug, Error)]
pub enum ModelError {
    /// Artifact file missing, unreadable or structurally invalid
    #[error("failed to load artifact: {0}")]
    Artifact(String),

    /// Vector length does not match the model input
    #[error("feature dimension mismatch: got {got}, model expects {expected}")]
    Dimension { got: usize, expected: usize },

    /// Model produced a class index outside the label set
    #[error("class index {index} outside the {classes}-label set")]
    InvalidIndex { index: usize, classes: usize },

    /// Numerical failure during inference
    #[error("inference failed: {0}")]
    Inference(String),
}

/// A loaded emotion classifier.
///
/// `predict` is required. `predict_proba` is an optional capability: `None`
/// means the model kind has no probability notion at all, `Some(Err)` means
/// the attempt failed. Callers treat both as "confidence unknown".
pub trait EmotionClassifier: Send + Sync {
    /// Class index for a feature vector.
    fn predict(&self, features: &Array1<f32>) -> Result<usize, ModelError>;

    /// Per-class probabilities, when the model supports them.
    fn predict_proba(&self, features: &Array1<f32>) -> Option<Result<Vec<f32>, ModelError>>;
}

/// Result of running one classifier slot on one upload.
#[derive(Debug, Clone, PartialEq)]
pub enum ModelOutcome {
    /// The model produced a label; confidence is present when the
    /// probability capability exists and succeeded.
    Predicted {
        emotion: Emotion,
        confidence: Option<f32>,
    },
    /// The slot is empty or inference failed.
    Failed { reason: String },
}

impl ModelOutcome {
    /// Wire label: the emotion string, or the `"error"` sentinel existing
    /// clients expect for a failed model.
    pub fn wire_label(&self) -> &str {
        match self {
            ModelOutcome::Predicted { emotion, .. } => emotion.as_str(),
            ModelOutcome::Failed { .. } => "error",
        }
    }

    /// Confidence in [0, 1], when known.
    pub fn confidence(&self) -> Option<f32> {
        match self {
            ModelOutcome::Predicted { confidence, .. } => *confidence,
            ModelOutcome::Failed { .. } => None,
        }
    }

    /// The predicted emotion, when the model succeeded.
    pub fn emotion(&self) -> Option<Emotion> {
        match self {
            ModelOutcome::Predicted { emotion, .. } => Some(*emotion),
            ModelOutcome::Failed { .. } => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wire_label_for_outcomes() {
        let ok = ModelOutcome::Predicted {
            emotion: Emotion::Happy,
            confidence: Some(0.9),
        };
        assert_eq!(ok.wire_label(), "happy");
        assert_eq!(ok.confidence(), Some(0.9));
        assert_eq!(ok.emotion(), Some(Emotion::Happy));

        let failed = ModelOutcome::Failed {
            reason: "model not loaded".to_string(),
        };
        assert_eq!(failed.wire_label(), "error");
        assert_eq!(failed.confidence(), None);
        assert_eq!(failed.emotion(), None);
    }
}
