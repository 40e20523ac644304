//! Linear decision function `w·x + b`. Label-only unless marked calibrated, in which
//! case the logistic of the decision value is the positive-class probability.

use super::{LabelModel, ModelError, ProbabilityModel};
use ndarray::{Array1, Array2, ArrayView2};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LinearModel {
    pub weights: Vec<f32>,
    #[serde(default)]
    pub bias: f32,
    #[serde(default)]
    pub calibrated: bool,
}

impl LinearModel {
    pub fn validate(&self) -> Result<(), ModelError> {
        if self.weights.is_empty() {
            return Err(ModelError::Corrupt("linear model without weights".into()));
        }
        if !self.bias.is_finite() || self.weights.iter().any(|w| !w.is_finite()) {
            return Err(ModelError::Corrupt("non-finite linear coefficients".into()));
        }
        Ok(())
    }

    fn decision(&self, x: ArrayView2<'_, f32>) -> Result<Array1<f32>, ModelError> {
        if x.ncols() != self.weights.len() {
            return Err(ModelError::DimensionMismatch {
                expected: self.weights.len(),
                actual: x.ncols(),
            });
        }
        let w = Array1::from(self.weights.clone());
        Ok(x.dot(&w) + self.bias)
    }
}

impl LabelModel for LinearModel {
    fn n_features(&self) -> usize {
        self.weights.len()
    }

    fn predict(&self, x: ArrayView2<'_, f32>) -> Result<Vec<u8>, ModelError> {
        Ok(self.decision(x)?.iter().map(|&d| u8::from(d > 0.0)).collect())
    }
}

impl ProbabilityModel for LinearModel {
    fn predict_proba(&self, x: ArrayView2<'_, f32>) -> Result<Array2<f32>, ModelError> {
        let d = self.decision(x)?;
        let mut out = Array2::<f32>::zeros((d.len(), 2));
        for (i, &v) in d.iter().enumerate() {
            let p = 1.0 / (1.0 + (-v).exp());
            out[[i, 0]] = 1.0 - p;
            out[[i, 1]] = p;
        }
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    fn sum_rule() -> LinearModel {
        LinearModel {
            weights: vec![1.0, 1.0, 0.0],
            bias: -1.0,
            calibrated: true,
        }
    }

    #[test]
    fn labels_follow_decision_sign() {
        let x = array![[0.7f32, 0.6, 5.0], [0.2, 0.3, 5.0], [0.5, 0.5, 0.0]];
        assert_eq!(sum_rule().predict(x.view()).unwrap(), vec![1, 0, 0]);
    }

    #[test]
    fn logistic_probability() {
        let x = array![[0.5f32, 0.5, 0.0], [3.0, 0.0, 0.0]];
        let p = sum_rule().predict_proba(x.view()).unwrap();
        assert!((p[[0, 1]] - 0.5).abs() < 1e-6);
        assert!(p[[1, 1]] > 0.85);
        assert!((p[[1, 0]] + p[[1, 1]] - 1.0).abs() < 1e-6);
    }

    #[test]
    fn wrong_width_rejected() {
        let x = array![[1.0f32, 2.0]];
        assert!(matches!(
            sum_rule().predict(x.view()),
            Err(ModelError::DimensionMismatch { expected: 3, actual: 2 })
        ));
    }
}
