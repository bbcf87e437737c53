//! Serialized classifier artifacts
//!
//! Artifacts are JSON files, one per slot, tagged by kind: `mlp` is a dense
//! feed-forward network with probabilities via softmax, `centroid` is a
//! nearest-centroid table with no probability capability. Shapes are
//! validated at load so a bad artifact disables its slot instead of failing
//! requests later.

use std::path::Path;

use ndarray::{Array1, Array2};
use serde::Deserialize;

use super::{EmotionClassifier, ModelError};
use crate::features::FEATURE_DIM;
use moodwav_common::emotion::EMOTION_CLASSES;

/// On-disk artifact, tagged by kind
#[derive(Debug, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
enum ModelArtifact {
    Mlp(MlpArtifact),
    Centroid(CentroidArtifact),
}

#[derive(Debug, Deserialize)]
struct MlpArtifact {
    input_dim: usize,
    layers: Vec<LayerArtifact>,
}

#[derive(Debug, Deserialize)]
struct LayerArtifact {
    /// Row-major weights, one row per output unit
    weights: Vec<Vec<f32>>,
    bias: Vec<f32>,
    activation: Activation,
}

#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(rename_all = "lowercase")]
enum Activation {
    Relu,
    Identity,
}

#[derive(Debug, Deserialize)]
struct CentroidArtifact {
    input_dim: usize,
    /// One centroid per class, in class-index order
    centroids: Vec<Vec<f32>>,
}

/// Load and validate an artifact file, returning a ready classifier.
pub fn load_artifact(path: &Path) -> Result<Box<dyn EmotionClassifier>, ModelError> {
    let raw = std::fs::read_to_string(path)
        .map_err(|e| ModelError::Artifact(format!("{}: {}", path.display(), e)))?;
    let artifact: ModelArtifact = serde_json::from_str(&raw)
        .map_err(|e| ModelError::Artifact(format!("{}: {}", path.display(), e)))?;

    match artifact {
        ModelArtifact::Mlp(mlp) => Ok(Box::new(MlpClassifier::from_artifact(mlp)?)),
        ModelArtifact::Centroid(centroid) => {
            Ok(Box::new(CentroidClassifier::from_artifact(centroid)?))
        }
    }
}

/// Dense feed-forward classifier
pub struct MlpClassifier {
    layers: Vec<DenseLayer>,
}

struct DenseLayer {
    /// (outputs, inputs)
    weights: Array2<f32>,
    bias: Array1<f32>,
    activation: Activation,
}

impl MlpClassifier {
    fn from_artifact(artifact: MlpArtifact) -> Result<Self, ModelError> {
        if artifact.input_dim != FEATURE_DIM {
            return Err(ModelError::Dimension {
                got: artifact.input_dim,
                expected: FEATURE_DIM,
            });
        }
        if artifact.layers.is_empty() {
            return Err(ModelError::Artifact("mlp artifact has no layers".to_string()));
        }

        let mut layers = Vec::with_capacity(artifact.layers.len());
        let mut in_dim = artifact.input_dim;
        for (idx, layer) in artifact.layers.into_iter().enumerate() {
            let out_dim = layer.weights.len();
            if out_dim == 0 || layer.weights.iter().any(|row| row.len() != in_dim) {
                return Err(ModelError::Artifact(format!(
                    "layer {idx}: weight rows must all have {in_dim} columns"
                )));
            }
            if layer.bias.len() != out_dim {
                return Err(ModelError::Artifact(format!(
                    "layer {idx}: bias length {} does not match {out_dim} outputs",
                    layer.bias.len()
                )));
            }

            let flat: Vec<f32> = layer.weights.into_iter().flatten().collect();
            let weights = Array2::from_shape_vec((out_dim, in_dim), flat)
                .map_err(|e| ModelError::Artifact(format!("layer {idx}: {e}")))?;
            layers.push(DenseLayer {
                weights,
                bias: Array1::from(layer.bias),
                activation: layer.activation,
            });
            in_dim = out_dim;
        }

        if in_dim != EMOTION_CLASSES {
            return Err(ModelError::Artifact(format!(
                "final layer has {in_dim} outputs, expected {EMOTION_CLASSES}"
            )));
        }

        Ok(Self { layers })
    }

    fn forward(&self, features: &Array1<f32>) -> Result<Array1<f32>, ModelError> {
        let expected = self.layers[0].weights.ncols();
        if features.len() != expected {
            return Err(ModelError::Dimension {
                got: features.len(),
                expected,
            });
        }

        let mut activations = features.clone();
        for layer in &self.layers {
            let mut z = layer.weights.dot(&activations) + &layer.bias;
            if layer.activation == Activation::Relu {
                z.mapv_inplace(|v| v.max(0.0));
            }
            activations = z;
        }

        if activations.iter().any(|v| !v.is_finite()) {
            return Err(ModelError::Inference("non-finite logits".to_string()));
        }
        Ok(activations)
    }
}

impl EmotionClassifier for MlpClassifier {
    fn predict(&self, features: &Array1<f32>) -> Result<usize, ModelError> {
        Ok(argmax(&self.forward(features)?))
    }

    fn predict_proba(&self, features: &Array1<f32>) -> Option<Result<Vec<f32>, ModelError>> {
        Some(self.forward(features).map(|logits| softmax(&logits)))
    }
}

/// Nearest-centroid classifier
///
/// Distance to a centroid is not a calibrated probability, so the proba
/// capability is absent.
pub struct CentroidClassifier {
    /// (classes, dim)
    centroids: Array2<f32>,
}

impl CentroidClassifier {
    fn from_artifact(artifact: CentroidArtifact) -> Result<Self, ModelError> {
        if artifact.input_dim != FEATURE_DIM {
            return Err(ModelError::Dimension {
                got: artifact.input_dim,
                expected: FEATURE_DIM,
            });
        }
        if artifact.centroids.len() != EMOTION_CLASSES {
            return Err(ModelError::Artifact(format!(
                "{} centroids, expected {EMOTION_CLASSES}",
                artifact.centroids.len()
            )));
        }
        if artifact
            .centroids
            .iter()
            .any(|c| c.len() != artifact.input_dim)
        {
            return Err(ModelError::Artifact(
                "centroid length does not match input_dim".to_string(),
            ));
        }

        let flat: Vec<f32> = artifact.centroids.into_iter().flatten().collect();
        let centroids = Array2::from_shape_vec((EMOTION_CLASSES, FEATURE_DIM), flat)
            .map_err(|e| ModelError::Artifact(e.to_string()))?;
        Ok(Self { centroids })
    }
}

impl EmotionClassifier for CentroidClassifier {
    fn predict(&self, features: &Array1<f32>) -> Result<usize, ModelError> {
        if features.len() != self.centroids.ncols() {
            return Err(ModelError::Dimension {
                got: features.len(),
                expected: self.centroids.ncols(),
            });
        }

        let mut best = 0usize;
        let mut best_dist = f32::INFINITY;
        for (idx, centroid) in self.centroids.rows().into_iter().enumerate() {
            let dist: f32 = centroid
                .iter()
                .zip(features.iter())
                .map(|(c, f)| (c - f).powi(2))
                .sum();
            if dist < best_dist {
                best_dist = dist;
                best = idx;
            }
        }
        Ok(best)
    }

    fn predict_proba(&self, _features: &Array1<f32>) -> Option<Result<Vec<f32>, ModelError>> {
        None
    }
}

/// Index of the largest value; the first wins on ties.
fn argmax(values: &Array1<f32>) -> usize {
    let mut best = 0;
    for (idx, &value) in values.iter().enumerate() {
        if value > values[best] {
            best = idx;
        }
    }
    best
}

fn softmax(logits: &Array1<f32>) -> Vec<f32> {
    let max = logits.iter().copied().fold(f32::NEG_INFINITY, f32::max);
    let exp: Vec<f32> = logits.iter().map(|&v| (v - max).exp()).collect();
    let sum: f32 = exp.iter().sum();
    exp.into_iter().map(|v| v / sum).collect()
}
