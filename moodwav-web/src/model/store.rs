//! Classifier slots
//!
//! Two fixed slots, `lstm` and `cnn`, loaded once at startup from
//! `<models_dir>/<name>.json`. A slot whose artifact is missing or invalid
//! stays empty and reports a failed outcome on every request while the
//! other slot keeps serving.

use std::path::Path;

use ndarray::Array1;
use tracing::{error, info, warn};

use super::{load_artifact, EmotionClassifier, ModelOutcome};
use moodwav_common::emotion::Emotion;

struct Slot {
    name: &'static str,
    classifier: Option<Box<dyn EmotionClassifier>>,
}

impl Slot {
    fn load(name: &'static str, models_dir: &Path) -> Self {
        let path = models_dir.join(format!("{name}.json"));
        match load_artifact(&path) {
            Ok(classifier) => {
                info!("Loaded {} model from {}", name, path.display());
                Self {
                    name,
                    classifier: Some(classifier),
                }
            }
            Err(e) => {
                error!("Failed to load {} model from {}: {}", name, path.display(), e);
                Self {
                    name,
                    classifier: None,
                }
            }
        }
    }

    fn run(&self, features: &Array1<f32>) -> ModelOutcome {
        let Some(classifier) = &self.classifier else {
            return ModelOutcome::Failed {
                reason: format!("{} model not loaded", self.name),
            };
        };

        let index = match classifier.predict(features) {
            Ok(index) => index,
            Err(e) => {
                error!("{} prediction failed: {}", self.name, e);
                return ModelOutcome::Failed {
                    reason: e.to_string(),
                };
            }
        };

        let Some(emotion) = Emotion::from_index(index) else {
            let reason = format!("{} produced class index {index} outside the label set", self.name);
            error!("{}", reason);
            return ModelOutcome::Failed { reason };
        };

        // Confidence is best-effort: a failed probability estimate still
        // leaves a usable label.
        let confidence = match classifier.predict_proba(features) {
            Some(Ok(probs)) => probs.get(index).copied(),
            Some(Err(e)) => {
                warn!("{} probability estimate failed: {}", self.name, e);
                None
            }
            None => None,
        };

        ModelOutcome::Predicted {
            emotion,
            confidence,
        }
    }

    fn is_loaded(&self) -> bool {
        self.classifier.is_some()
    }
}

/// Both classifier slots, shared across requests.
pub struct ModelStore {
    lstm: Slot,
    cnn: Slot,
}

impl ModelStore {
    /// Load both slots from `models_dir`. Load failures leave the slot
    /// empty rather than aborting startup.
    pub fn load(models_dir: &Path) -> Self {
        Self {
            lstm: Slot::load("lstm", models_dir),
            cnn: Slot::load("cnn", models_dir),
        }
    }

    pub fn run_lstm(&self, features: &Array1<f32>) -> ModelOutcome {
        self.lstm.run(features)
    }

    pub fn run_cnn(&self, features: &Array1<f32>) -> ModelOutcome {
        self.cnn.run(features)
    }

    pub fn lstm_loaded(&self) -> bool {
        self.lstm.is_loaded()
    }

    pub fn cnn_loaded(&self) -> bool {
        self.cnn.is_loaded()
    }
}
