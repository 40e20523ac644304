//! Log ingestion: source discovery and typed tabular record sets.

mod discovery;
mod reader;

pub use discovery::discover_sources;
pub use reader::{parse_cell, read_source, read_records};

use chrono::{DateTime, NaiveDateTime, Utc};
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum IngestError {
    #[error("failed to open {path}: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed csv: {0}")]
    Csv(#[from] csv::Error),
    #[error("no header row")]
    MissingHeader,
    #[error("no records")]
    Empty,
    #[error("record {record} has {actual} fields, header has {expected}")]
    Ragged {
        record: usize,
        expected: usize,
        actual: usize,
    },
}

/// One scalar cell of a log record.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Integer(i64),
    Real(f64),
    Timestamp(NaiveDateTime),
    Text(String),
    Missing,
}

impl Value {
    pub fn is_numeric(&self) -> bool {
        matches!(self, Value::Integer(_) | Value::Real(_))
    }

    /// Numeric value as model input; missing cells read as 0.0.
    pub fn as_f32(&self) -> Option<f32> {
        match self {
            Value::Integer(i) => Some(*i as f32),
            Value::Real(r) => Some(*r as f32),
            Value::Missing => Some(0.0),
            _ => None,
        }
    }
}

/// Records from one input source, row-major and positionally aligned with `columns`.
/// Immutable once read.
#[derive(Debug, Clone)]
pub struct RawRecordSet {
    source: String,
    ingested_at: DateTime<Utc>,
    columns: Vec<String>,
    records: Vec<Vec<Value>>,
}

impl RawRecordSet {
    /// Build a record set; every record must be as wide as `columns`.
    pub fn new(
        source: impl Into<String>,
        columns: Vec<String>,
        records: Vec<Vec<Value>>,
    ) -> Result<Self, IngestError> {
        if columns.is_empty() {
            return Err(IngestError::MissingHeader);
        }
        if records.is_empty() {
            return Err(IngestError::Empty);
        }
        if let Some((record, r)) = records.iter().enumerate().find(|(_, r)| r.len() != columns.len()) {
            return Err(IngestError::Ragged {
                record,
                expected: columns.len(),
                actual: r.len(),
            });
        }
        Ok(Self {
            source: source.into(),
            ingested_at: Utc::now(),
            columns,
            records,
        })
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn ingested_at(&self) -> DateTime<Utc> {
        self.ingested_at
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn records(&self) -> &[Vec<Value>] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Cells of column `idx`, in record order.
    pub fn column(&self, idx: usize) -> impl Iterator<Item = &Value> + '_ {
        self.records.iter().map(move |r| &r[idx])
    }
}
