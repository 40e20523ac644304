//! Pre-trained binary threat classifier. Capability (labels only, or labels plus
//! positive-class probability) is fixed when the artifact is loaded.

mod artifact;
mod forest;
mod linear;
#[cfg(feature = "onnx")]
mod onnx;

pub use artifact::{fingerprint, ModelArtifact};
pub use forest::{DecisionTree, ForestModel, TreeNode};
pub use linear::LinearModel;
#[cfg(feature = "onnx")]
pub use onnx::OnnxModel;

use crate::features::FeatureMatrix;
use ndarray::{Array2, ArrayView2};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ModelError {
    #[error("model artifact not found at {0}")]
    NotFound(PathBuf),
    #[error("model artifact i/o on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("corrupt model artifact: {0}")]
    Corrupt(String),
    #[error("unsupported model format: {0}")]
    UnsupportedFormat(String),
    #[error("model expects {expected} features, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },
    #[error("inference failed: {0}")]
    Inference(String),
}

/// Discrete prediction capability.
pub trait LabelModel: Send + Sync {
    /// Input width the model was trained on.
    fn n_features(&self) -> usize;

    /// One label in {0, 1} per row.
    fn predict(&self, x: ArrayView2<'_, f32>) -> Result<Vec<u8>, ModelError>;
}

/// Calibrated probability capability on top of labels.
pub trait ProbabilityModel: LabelModel {
    /// Per-class probabilities, shape (rows, classes). Column 1 is the positive class.
    fn predict_proba(&self, x: ArrayView2<'_, f32>) -> Result<Array2<f32>, ModelError>;
}

/// Raw classifier output for one record.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Classification {
    pub label: u8,
    /// Threat probability in [0, 1]; the label itself when uncalibrated
    pub score: f32,
}

pub enum ThreatClassifier {
    LabelOnly(Box<dyn LabelModel>),
    Probabilistic(Box<dyn ProbabilityModel>),
}

impl ThreatClassifier {
    /// Load an artifact. Any failure here is fatal for the run: there is no fallback model.
    pub fn load(path: &Path, feature_dim: usize) -> Result<Self, ModelError> {
        if !path.exists() {
            return Err(ModelError::NotFound(path.to_path_buf()));
        }
        let is_onnx = path
            .extension()
            .map(|e| e.eq_ignore_ascii_case("onnx"))
            .unwrap_or(false);

        let bytes = std::fs::read(path).map_err(|source| ModelError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let sha256 = fingerprint(&bytes);

        let classifier = if is_onnx {
            Self::load_onnx(path)?
        } else {
            ModelArtifact::from_slice(&bytes)?.into_classifier()
        };

        if classifier.n_features() != feature_dim {
            return Err(ModelError::DimensionMismatch {
                expected: classifier.n_features(),
                actual: feature_dim,
            });
        }
        tracing::info!(
            path = %path.display(),
            %sha256,
            features = feature_dim,
            probabilistic = classifier.is_probabilistic(),
            "model loaded"
        );
        Ok(classifier)
    }

    #[cfg(feature = "onnx")]
    fn load_onnx(path: &Path) -> Result<Self, ModelError> {
        OnnxModel::load(path).map(OnnxModel::into_classifier)
    }

    #[cfg(not(feature = "onnx"))]
    fn load_onnx(path: &Path) -> Result<Self, ModelError> {
        Err(ModelError::UnsupportedFormat(format!(
            "{} (built without the `onnx` feature)",
            path.display()
        )))
    }

    pub fn n_features(&self) -> usize {
        match self {
            ThreatClassifier::LabelOnly(m) => m.n_features(),
            ThreatClassifier::Probabilistic(m) => m.n_features(),
        }
    }

    pub fn is_probabilistic(&self) -> bool {
        matches!(self, ThreatClassifier::Probabilistic(_))
    }

    /// Label and score every row.
    pub fn classify(&self, features: &FeatureMatrix) -> Result<Vec<Classification>, ModelError> {
        let x = features.values.view();
        if x.ncols() != self.n_features() {
            return Err(ModelError::DimensionMismatch {
                expected: self.n_features(),
                actual: x.ncols(),
            });
        }

        let out = match self {
            ThreatClassifier::LabelOnly(m) => m
                .predict(x)?
                .into_iter()
                .map(|label| Classification {
                    label,
                    score: f32::from(label),
                })
                .collect::<Vec<_>>(),
            ThreatClassifier::Probabilistic(m) => {
                let labels = m.predict(x)?;
                let proba = m.predict_proba(x)?;
                if proba.nrows() != labels.len() || proba.ncols() == 0 {
                    return Err(ModelError::Inference(format!(
                        "probability shape {:?} does not match {} labels",
                        proba.dim(),
                        labels.len()
                    )));
                }
                // single-column output is already the positive-class probability
                let positive = if proba.ncols() > 1 { 1 } else { 0 };
                labels
                    .into_iter()
                    .zip(proba.column(positive).iter())
                    .map(|(label, &p)| Classification {
                        label,
                        score: if p.is_finite() { p.clamp(0.0, 1.0) } else { f32::from(label) },
                    })
                    .collect()
            }
        };

        if out.len() != features.rows() {
            return Err(ModelError::Inference(format!(
                "model returned {} predictions for {} rows",
                out.len(),
                features.rows()
            )));
        }
        Ok(out)
    }
}
