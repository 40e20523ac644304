//! Alert aggregation across sources and the persisted alert report.

mod writer;

pub use writer::{log_summary, write_report, ReportError};

use crate::model::Classification;
use crate::pipeline::SourceFailure;
use crate::risk::{Action, Assessment, Severity, SeverityPolicy};
use chrono::{DateTime, Utc};
use serde::{Serialize, Serializer};

/// Report columns, in order.
pub const REPORT_COLUMNS: [&str; 7] = [
    "timestamp",
    "source_file",
    "log_entry_id",
    "threat_detected",
    "threat_probability",
    "severity",
    "action_recommended",
];

pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Classifier verdict for one record, tagged with its severity.
#[derive(Debug, Clone, PartialEq)]
pub struct ClassificationResult {
    pub source: String,
    /// Position of the record within its source
    pub record_index: usize,
    pub label: u8,
    pub score: f32,
    pub assessment: Assessment,
}

impl ClassificationResult {
    /// Tag raw classifier output for one source, indexing records in order.
    pub fn tag_all(source: &str, classifications: &[Classification], policy: &SeverityPolicy) -> Vec<Self> {
        classifications
            .iter()
            .enumerate()
            .map(|(record_index, c)| ClassificationResult {
                source: source.to_string(),
                record_index,
                label: c.label,
                score: c.score,
                assessment: policy.assess(c.score),
            })
            .collect()
    }

    pub fn is_threat(&self) -> bool {
        self.label == 1
    }
}

/// One report row: a positive detection. Field order matches [`REPORT_COLUMNS`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Alert {
    #[serde(serialize_with = "serialize_timestamp")]
    pub timestamp: DateTime<Utc>,
    pub source_file: String,
    pub log_entry_id: usize,
    pub threat_detected: u8,
    pub threat_probability: f32,
    pub severity: Severity,
    pub action_recommended: Action,
}

fn serialize_timestamp<S: Serializer>(ts: &DateTime<Utc>, s: S) -> Result<S::Ok, S::Error> {
    s.collect_str(&ts.format(TIMESTAMP_FORMAT))
}

impl Alert {
    fn from_result(result: ClassificationResult, timestamp: DateTime<Utc>) -> Self {
        Self {
            timestamp,
            source_file: result.source,
            log_entry_id: result.record_index,
            threat_detected: result.label,
            threat_probability: result.score,
            severity: result.assessment.severity,
            action_recommended: result.assessment.action,
        }
    }
}

/// What one source contributed to the run.
#[derive(Debug)]
pub enum SourceOutcome {
    Processed {
        source: String,
        records: usize,
        alerts: usize,
    },
    Failed(SourceFailure),
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SeverityCounts {
    pub high: usize,
    pub medium: usize,
    pub low: usize,
}

/// Accumulates alerts in source-processing order. A failed source contributes nothing.
#[derive(Debug, Default)]
pub struct AlertAggregator {
    alerts: Vec<Alert>,
    outcomes: Vec<SourceOutcome>,
}

impl AlertAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn absorb(&mut self, source: &str, outcome: Result<Vec<ClassificationResult>, SourceFailure>) {
        match outcome {
            Ok(results) => {
                let records = results.len();
                let now = Utc::now();
                let before = self.alerts.len();
                self.alerts.extend(
                    results
                        .into_iter()
                        .filter(ClassificationResult::is_threat)
                        .map(|r| Alert::from_result(r, now)),
                );
                let alerts = self.alerts.len() - before;
                tracing::info!(source, records, alerts, "detected potential threats");
                self.outcomes.push(SourceOutcome::Processed {
                    source: source.to_string(),
                    records,
                    alerts,
                });
            }
            Err(failure) => {
                tracing::warn!(
                    source,
                    stage = %failure.stage,
                    error = %failure.error,
                    "source skipped"
                );
                self.outcomes.push(SourceOutcome::Failed(failure));
            }
        }
    }

    pub fn finish(self) -> AlertReport {
        AlertReport {
            alerts: self.alerts,
            outcomes: self.outcomes,
        }
    }
}

/// All alerts of one run: source order, then record order.
#[derive(Debug, Default)]
pub struct AlertReport {
    pub alerts: Vec<Alert>,
    pub outcomes: Vec<SourceOutcome>,
}

impl AlertReport {
    pub fn len(&self) -> usize {
        self.alerts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.alerts.is_empty()
    }

    pub fn severity_counts(&self) -> SeverityCounts {
        let mut counts = SeverityCounts::default();
        for a in &self.alerts {
            match a.severity {
                Severity::High => counts.high += 1,
                Severity::Medium => counts.medium += 1,
                Severity::Low => counts.low += 1,
            }
        }
        counts
    }

    pub fn failed_sources(&self) -> impl Iterator<Item = &SourceFailure> {
        self.outcomes.iter().filter_map(|o| match o {
            SourceOutcome::Failed(f) => Some(f),
            SourceOutcome::Processed { .. } => None,
        })
    }

    /// Records scored across successfully processed sources.
    pub fn records_scanned(&self) -> usize {
        self.outcomes
            .iter()
            .map(|o| match o {
                SourceOutcome::Processed { records, .. } => *records,
                SourceOutcome::Failed(_) => 0,
            })
            .sum()
    }
}
