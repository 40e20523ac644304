//! Feature extraction: variable-schema record sets → fixed-width numeric matrix.

mod columns;
mod vectorizer;

pub use columns::select_feature_columns;
pub use vectorizer::FeatureVectorizer;

use ndarray::{Array2, ArrayView1};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum FeatureError {
    #[error("value in column {column} (record {record}) does not fit a 32-bit float")]
    OutOfRange { column: String, record: usize },
}

/// Where a feature column came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "origin", content = "column", rename_all = "snake_case")]
pub enum ColumnOrigin {
    /// Real column from the source, by header name
    Source(String),
    /// Padding fabricated by the vectorizer
    Synthetic,
}

/// Fixed-width model input for one record set: one row per record, exactly `dim` columns.
#[derive(Debug, Clone)]
pub struct FeatureMatrix {
    pub values: Array2<f32>,
    /// One entry per column of `values`
    pub provenance: Vec<ColumnOrigin>,
    /// Numeric source columns cut off by truncation
    pub dropped: Vec<String>,
}

impl FeatureMatrix {
    pub fn rows(&self) -> usize {
        self.values.nrows()
    }

    pub fn dim(&self) -> usize {
        self.values.ncols()
    }

    /// Feature vector for record `idx`.
    pub fn row(&self, idx: usize) -> ArrayView1<'_, f32> {
        self.values.row(idx)
    }

    pub fn synthetic_columns(&self) -> usize {
        self.provenance
            .iter()
            .filter(|o| matches!(o, ColumnOrigin::Synthetic))
            .count()
    }
}
