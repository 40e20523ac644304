//! ONNX Runtime inference (`onnx` feature). Expects a classifier export with the label
//! tensor as the first output and, optionally, a (rows, classes) float probability tensor
//! as the second (sklearn-onnx with `zipmap=False`).

use super::{LabelModel, ModelError, ProbabilityModel, ThreatClassifier};
use ndarray::{Array2, ArrayView2, Ix2};
use ort::session::{Session, SessionOutputs};
use ort::value::{Tensor, ValueType};
use std::path::Path;

pub struct OnnxModel {
    session: Session,
    input_name: String,
    n_features: usize,
    has_proba: bool,
}

fn ort_err(e: ort::Error) -> ModelError {
    ModelError::Inference(e.to_string())
}

impl OnnxModel {
    pub fn load(path: &Path) -> Result<Self, ModelError> {
        let session = Session::builder()
            .and_then(|b| b.commit_from_file(path))
            .map_err(|e| ModelError::Corrupt(e.to_string()))?;

        let input = session
            .inputs
            .first()
            .ok_or_else(|| ModelError::Corrupt("model declares no inputs".into()))?;
        let n_features = match &input.input_type {
            ValueType::Tensor { dimensions, .. } => dimensions
                .last()
                .copied()
                .filter(|d| *d > 0)
                .map(|d| d as usize)
                .ok_or_else(|| ModelError::Corrupt("input feature width is not fixed".into()))?,
            other => {
                return Err(ModelError::Corrupt(format!("unexpected input type {:?}", other)));
            }
        };
        let input_name = input.name.clone();
        let has_proba = session.outputs.len() > 1;

        Ok(Self {
            session,
            input_name,
            n_features,
            has_proba,
        })
    }

    pub fn into_classifier(self) -> ThreatClassifier {
        if self.has_proba {
            ThreatClassifier::Probabilistic(Box::new(self))
        } else {
            ThreatClassifier::LabelOnly(Box::new(self))
        }
    }

    fn run(&self, x: ArrayView2<'_, f32>) -> Result<SessionOutputs<'_, '_>, ModelError> {
        if x.ncols() != self.n_features {
            return Err(ModelError::DimensionMismatch {
                expected: self.n_features,
                actual: x.ncols(),
            });
        }
        let input = Tensor::from_array(x.to_owned()).map_err(ort_err)?;
        let inputs = ort::inputs![self.input_name.as_str() => input].map_err(ort_err)?;
        self.session.run(inputs).map_err(ort_err)
    }
}

impl LabelModel for OnnxModel {
    fn n_features(&self) -> usize {
        self.n_features
    }

    fn predict(&self, x: ArrayView2<'_, f32>) -> Result<Vec<u8>, ModelError> {
        let outputs = self.run(x)?;
        let labels = outputs[0].try_extract_tensor::<i64>().map_err(ort_err)?;
        Ok(labels.iter().map(|&l| u8::from(l == 1)).collect())
    }
}

impl ProbabilityModel for OnnxModel {
    fn predict_proba(&self, x: ArrayView2<'_, f32>) -> Result<Array2<f32>, ModelError> {
        let outputs = self.run(x)?;
        let proba = outputs[1].try_extract_tensor::<f32>().map_err(ort_err)?;
        proba
            .to_owned()
            .into_dimensionality::<Ix2>()
            .map_err(|e| ModelError::Inference(format!("probability output is not 2-D: {}", e)))
    }
}
