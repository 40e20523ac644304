//! Scanner configuration. Paths are explicit here rather than process-wide constants.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Columns that never feed the model: record metadata, identifiers, free text,
/// and categorical address/protocol fields.
pub const DEFAULT_EXCLUDED_COLUMNS: &[&str] = &[
    "processed_at",
    "source_file",
    "timestamp",
    "log_message",
    "source_ip",
    "dest_ip",
    "protocol",
];

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("invalid config: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SentinelConfig {
    /// Pre-trained classifier artifact (`.json`, or `.onnx` with the `onnx` feature)
    pub model_path: PathBuf,
    /// Directory scanned (non-recursively) for `*.csv` log files
    pub input_dir: PathBuf,
    /// Alert report destination; parent directory is created if absent
    pub output_path: PathBuf,
    /// Feature extraction parameters
    pub features: FeaturesConfig,
    /// Severity tier thresholds
    pub severity: SeverityConfig,
    /// Logging
    pub log: LogConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FeaturesConfig {
    /// Number of numerical features expected by the model
    pub feature_dim: usize,
    /// Columns skipped even when numeric
    pub excluded_columns: Vec<String>,
    /// How missing feature columns are filled
    pub padding: PaddingPolicy,
    /// Seed for padding noise; entropy-seeded when absent
    pub seed: Option<u64>,
}

/// Fill strategy for feature columns a source does not provide.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaddingPolicy {
    /// Independent draws from uniform [0, 1). Keeps unknown schemas scoreable at the
    /// cost of detection quality on those sources.
    UniformNoise,
    /// Constant 0.0
    Zeros,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SeverityConfig {
    /// Score strictly above this is HIGH
    pub high_threshold: f32,
    /// Score strictly above this (and not HIGH) is MEDIUM
    pub medium_threshold: f32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    pub level: String,
    pub json: bool,
}

impl Default for SentinelConfig {
    fn default() -> Self {
        Self {
            model_path: PathBuf::from("/app/model.json"),
            input_dir: PathBuf::from("/input/logs"),
            output_path: PathBuf::from("/output/alerts.csv"),
            features: FeaturesConfig::default(),
            severity: SeverityConfig::default(),
            log: LogConfig::default(),
        }
    }
}

impl Default for FeaturesConfig {
    fn default() -> Self {
        Self {
            feature_dim: 10,
            excluded_columns: DEFAULT_EXCLUDED_COLUMNS.iter().map(|c| c.to_string()).collect(),
            padding: PaddingPolicy::default(),
            seed: None,
        }
    }
}

impl Default for PaddingPolicy {
    fn default() -> Self {
        PaddingPolicy::UniformNoise
    }
}

impl Default for SeverityConfig {
    fn default() -> Self {
        Self {
            high_threshold: 0.8,
            medium_threshold: 0.5,
        }
    }
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: true,
        }
    }
}

impl SentinelConfig {
    /// Load from JSON file if present; otherwise return default.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let data = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config: SentinelConfig =
            serde_json::from_str(&data).map_err(|source| ConfigError::Parse {
                path: path.to_path_buf(),
                source,
            })?;
        config.validate()?;
        Ok(config)
    }

    /// Override paths from `SENTINEL_MODEL_PATH`, `SENTINEL_INPUT_DIR`, `SENTINEL_OUTPUT_PATH`.
    pub fn apply_env_overrides(mut self) -> Self {
        if let Ok(p) = std::env::var("SENTINEL_MODEL_PATH") {
            self.model_path = PathBuf::from(p);
        }
        if let Ok(p) = std::env::var("SENTINEL_INPUT_DIR") {
            self.input_dir = PathBuf::from(p);
        }
        if let Ok(p) = std::env::var("SENTINEL_OUTPUT_PATH") {
            self.output_path = PathBuf::from(p);
        }
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.features.feature_dim == 0 {
            return Err(ConfigError::Invalid("features.feature_dim must be at least 1".into()));
        }
        let s = &self.severity;
        if !(0.0..=1.0).contains(&s.medium_threshold) || !(0.0..=1.0).contains(&s.high_threshold) {
            return Err(ConfigError::Invalid("severity thresholds must lie in [0, 1]".into()));
        }
        if s.medium_threshold > s.high_threshold {
            return Err(ConfigError::Invalid(format!(
                "severity.medium_threshold ({}) exceeds severity.high_threshold ({})",
                s.medium_threshold, s.high_threshold
            )));
        }
        Ok(())
    }
}
