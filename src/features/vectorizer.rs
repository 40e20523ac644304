//! Record set → (records × dim) matrix. Real columns first in source order, then padding.

use super::{select_feature_columns, ColumnOrigin, FeatureError, FeatureMatrix};
use crate::config::{FeaturesConfig, PaddingPolicy};
use crate::ingest::RawRecordSet;
use ndarray::Array2;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::sync::Mutex;

/// Never fails on schema mismatch: too few numeric columns are padded, too many are
/// truncated, none at all yields an all-padding matrix. Only values that do not fit
/// an `f32` are rejected.
pub struct FeatureVectorizer {
    config: FeaturesConfig,
    rng: Mutex<StdRng>,
}

impl FeatureVectorizer {
    pub fn new(config: FeaturesConfig) -> Self {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self {
            config,
            rng: Mutex::new(rng),
        }
    }

    pub fn dim(&self) -> usize {
        self.config.feature_dim
    }

    pub fn vectorize(&self, set: &RawRecordSet) -> Result<FeatureMatrix, FeatureError> {
        let dim = self.config.feature_dim;
        let candidates = select_feature_columns(set, &self.config.excluded_columns);
        let names = set.columns();

        if candidates.is_empty() {
            tracing::warn!(
                source = set.source(),
                dim,
                padding = ?self.config.padding,
                "no numeric feature columns; every feature is synthetic"
            );
        } else if candidates.len() < dim {
            tracing::info!(source = set.source(), from = candidates.len(), to = dim, "padding features");
        } else if candidates.len() > dim {
            tracing::info!(source = set.source(), from = candidates.len(), to = dim, "truncating features");
        }

        let kept = &candidates[..candidates.len().min(dim)];
        let dropped = candidates[kept.len()..]
            .iter()
            .map(|&idx| names[idx].clone())
            .collect();

        let mut values = Array2::<f32>::zeros((set.len(), dim));
        for (r, record) in set.records().iter().enumerate() {
            for (c, &idx) in kept.iter().enumerate() {
                let v = record[idx].as_f32().unwrap_or(0.0);
                if !v.is_finite() {
                    return Err(FeatureError::OutOfRange {
                        column: names[idx].clone(),
                        record: r,
                    });
                }
                values[[r, c]] = v;
            }
        }
        if kept.len() < dim {
            self.pad(&mut values, kept.len());
        }

        let mut provenance: Vec<ColumnOrigin> = kept
            .iter()
            .map(|&idx| ColumnOrigin::Source(names[idx].clone()))
            .collect();
        provenance.resize(dim, ColumnOrigin::Synthetic);

        tracing::debug!(source = set.source(), rows = set.len(), features = dim, "extracted features");
        Ok(FeatureMatrix {
            values,
            provenance,
            dropped,
        })
    }

    /// Fill columns `from..dim` per the padding policy.
    fn pad(&self, values: &mut Array2<f32>, from: usize) {
        match self.config.padding {
            PaddingPolicy::Zeros => {}
            PaddingPolicy::UniformNoise => {
                let mut rng = self.rng.lock().unwrap_or_else(|e| e.into_inner());
                for mut row in values.rows_mut() {
                    for v in row.iter_mut().skip(from) {
                        *v = rng.gen::<f32>();
                    }
                }
            }
        }
    }
}
