//! Run orchestration: load the model once, then ingest → vectorize → classify → aggregate
//! each source in turn, and write one report. Per-source failures only drop that source.

mod stage;

pub use stage::{RunState, RunSummary, SourceFailure, Stage};

use crate::config::{ConfigError, SentinelConfig};
use crate::features::FeatureVectorizer;
use crate::ingest::{self, RawRecordSet};
use crate::model::{ModelError, ThreatClassifier};
use crate::report::{self, AlertAggregator, AlertReport, ClassificationResult, ReportError};
use crate::risk::SeverityPolicy;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info, warn};
use uuid::Uuid;

/// Errors that abort a run.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("model load failed: {0}")]
    Model(#[from] ModelError),
    #[error("report write failed: {0}")]
    Report(#[from] ReportError),
}

pub struct ThreatPipeline {
    config: SentinelConfig,
    vectorizer: FeatureVectorizer,
    classifier: ThreatClassifier,
    policy: SeverityPolicy,
    state: RunState,
}

impl ThreatPipeline {
    /// Load the configured model artifact. Failure here is fatal.
    pub fn new(config: SentinelConfig) -> Result<Self, PipelineError> {
        config.validate()?;
        let classifier = ThreatClassifier::load(&config.model_path, config.features.feature_dim)?;
        Self::with_classifier(config, classifier)
    }

    /// Use an already-loaded classifier; its width must match `features.feature_dim`.
    pub fn with_classifier(config: SentinelConfig, classifier: ThreatClassifier) -> Result<Self, PipelineError> {
        config.validate()?;
        let vectorizer = FeatureVectorizer::new(config.features.clone());
        if classifier.n_features() != vectorizer.dim() {
            return Err(ModelError::DimensionMismatch {
                expected: classifier.n_features(),
                actual: vectorizer.dim(),
            }
            .into());
        }
        let mut pipeline = Self {
            vectorizer,
            policy: SeverityPolicy::new(config.severity.clone()),
            classifier,
            config,
            state: RunState::Init,
        };
        pipeline.advance(RunState::ModelLoaded);
        Ok(pipeline)
    }

    fn advance(&mut self, next: RunState) {
        debug!(from = ?self.state, to = ?next, "run state");
        self.state = next;
    }

    pub fn state(&self) -> RunState {
        self.state
    }

    /// Vectorize, classify, and severity-tag one record set.
    pub fn score_records(&self, set: &RawRecordSet) -> Result<Vec<ClassificationResult>, SourceFailure> {
        let features = self
            .vectorizer
            .vectorize(set)
            .map_err(|e| SourceFailure::new(set.source(), Stage::Vectorize, e))?;
        if !features.dropped.is_empty() {
            debug!(source = set.source(), dropped = ?features.dropped, "feature columns dropped");
        }
        let classifications = self
            .classifier
            .classify(&features)
            .map_err(|e| SourceFailure::new(set.source(), Stage::Classify, e))?;
        Ok(ClassificationResult::tag_all(set.source(), &classifications, &self.policy))
    }

    /// Ingest and score one source file.
    pub fn process_source(&self, path: &Path) -> Result<Vec<ClassificationResult>, SourceFailure> {
        info!(source = %path.display(), "processing log file");
        let set = ingest::read_source(path)
            .map_err(|e| SourceFailure::new(source_name(path), Stage::Ingest, e))?;
        debug!(source = set.source(), records = set.len(), "loaded log entries");
        self.score_records(&set)
    }

    /// Score every source in order. Never fails; failed sources are recorded in the report.
    pub fn scan(&self, sources: &[PathBuf]) -> AlertReport {
        let mut aggregator = AlertAggregator::new();
        for path in sources {
            aggregator.absorb(&source_name(path), self.process_source(path));
        }
        aggregator.finish()
    }

    /// Discover sources, score them, and write the report.
    pub fn run(&mut self) -> Result<RunSummary, PipelineError> {
        let run_id = Uuid::new_v4();
        info!(%run_id, input_dir = %self.config.input_dir.display(), "analysis starting");

        let sources = ingest::discover_sources(&self.config.input_dir);
        if sources.is_empty() {
            warn!(input_dir = %self.config.input_dir.display(), "no log files found");
        } else {
            info!(count = sources.len(), "found log files to process");
        }

        self.advance(RunState::Processing);
        let alerts = self.scan(&sources);
        report::write_report(&alerts, &self.config.output_path)?;
        self.advance(RunState::Reported);
        report::log_summary(&alerts);

        let sources_failed = alerts.failed_sources().count();
        let summary = RunSummary {
            run_id,
            sources_found: sources.len(),
            sources_processed: sources.len() - sources_failed,
            sources_failed,
            records_scanned: alerts.records_scanned(),
            alerts: alerts.len(),
        };
        info!(
            %run_id,
            sources = summary.sources_found,
            failed = summary.sources_failed,
            records = summary.records_scanned,
            alerts = summary.alerts,
            "analysis completed"
        );
        Ok(summary)
    }
}

fn source_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
