//! JSON model artifacts, tagged by `kind`.

use super::{ForestModel, LinearModel, ModelError, ThreatClassifier};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::path::Path;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ModelArtifact {
    Forest(ForestModel),
    Linear(LinearModel),
}

/// Hex SHA-256 of artifact bytes.
pub fn fingerprint(bytes: &[u8]) -> String {
    format!("{:x}", Sha256::digest(bytes))
}

impl ModelArtifact {
    pub fn from_slice(bytes: &[u8]) -> Result<Self, ModelError> {
        let artifact: ModelArtifact =
            serde_json::from_slice(bytes).map_err(|e| ModelError::Corrupt(e.to_string()))?;
        artifact.validate()?;
        Ok(artifact)
    }

    pub fn save(&self, path: &Path) -> Result<(), ModelError> {
        let data = serde_json::to_vec(self).map_err(|e| ModelError::Corrupt(e.to_string()))?;
        std::fs::write(path, data).map_err(|source| ModelError::Io {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn n_features(&self) -> usize {
        match self {
            ModelArtifact::Forest(f) => f.n_features,
            ModelArtifact::Linear(l) => l.weights.len(),
        }
    }

    fn validate(&self) -> Result<(), ModelError> {
        match self {
            ModelArtifact::Forest(f) => f.validate(),
            ModelArtifact::Linear(l) => l.validate(),
        }
    }

    /// Select the capability variant once, from what the artifact can do.
    pub fn into_classifier(self) -> ThreatClassifier {
        match self {
            ModelArtifact::Forest(f) => ThreatClassifier::Probabilistic(Box::new(f)),
            ModelArtifact::Linear(l) if l.calibrated => ThreatClassifier::Probabilistic(Box::new(l)),
            ModelArtifact::Linear(l) => ThreatClassifier::LabelOnly(Box::new(l)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn linear_capability_follows_calibration() {
        let raw = r#"{"kind":"linear","weights":[1.0,1.0],"bias":-1.0,"calibrated":false}"#;
        let a = ModelArtifact::from_slice(raw.as_bytes()).unwrap();
        assert_eq!(a.n_features(), 2);
        assert!(!a.into_classifier().is_probabilistic());

        let raw = r#"{"kind":"linear","weights":[1.0,1.0],"bias":-1.0,"calibrated":true}"#;
        let a = ModelArtifact::from_slice(raw.as_bytes()).unwrap();
        assert!(a.into_classifier().is_probabilistic());
    }

    #[test]
    fn garbage_is_corrupt() {
        let err = ModelArtifact::from_slice(b"\x80\x04pickle").unwrap_err();
        assert!(matches!(err, ModelError::Corrupt(_)));
        let err = ModelArtifact::from_slice(br#"{"kind":"svm"}"#).unwrap_err();
        assert!(matches!(err, ModelError::Corrupt(_)));
    }

    #[test]
    fn fingerprint_is_stable_hex() {
        let fp = fingerprint(b"abc");
        assert_eq!(
            fp,
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }

    #[test]
    fn save_then_load_through_classifier() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("model.json");
        ModelArtifact::Forest(ForestModel::placeholder(10, 5, 3, 42))
            .save(&path)
            .unwrap();
        let c = ThreatClassifier::load(&path, 10).unwrap();
        assert!(c.is_probabilistic());
        assert!(matches!(
            ThreatClassifier::load(&path, 12).err().unwrap(),
            ModelError::DimensionMismatch { expected: 10, actual: 12 }
        ));
    }
}
