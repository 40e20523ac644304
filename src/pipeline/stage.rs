//! Per-run and per-source progress tracking.

use std::fmt;
use uuid::Uuid;

/// Where a run stands. Only a failure before `ModelLoaded` is fatal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    Init,
    ModelLoaded,
    Processing,
    Reported,
}

/// Per-source stage; a failure in any of these drops the source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Ingest,
    Vectorize,
    Classify,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Stage::Ingest => "ingest",
            Stage::Vectorize => "vectorize",
            Stage::Classify => "classify",
        })
    }
}

/// A source that contributed no alerts because one of its stages failed.
#[derive(Debug, Clone)]
pub struct SourceFailure {
    pub source: String,
    pub stage: Stage,
    pub error: String,
}

impl SourceFailure {
    pub fn new(source: impl Into<String>, stage: Stage, error: impl ToString) -> Self {
        Self {
            source: source.into(),
            stage,
            error: error.to_string(),
        }
    }
}

impl fmt::Display for SourceFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} failed at {}: {}", self.source, self.stage, self.error)
    }
}

/// Outcome counters of one completed run.
#[derive(Debug, Clone)]
pub struct RunSummary {
    pub run_id: Uuid,
    pub sources_found: usize,
    pub sources_processed: usize,
    pub sources_failed: usize,
    pub records_scanned: usize,
    pub alerts: usize,
}
