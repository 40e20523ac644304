//! netlog-sentinel — batch threat scoring for network-activity logs.
//!
//! Modular structure:
//! - [`ingest`] — CSV log discovery and typed record sets
//! - [`features`] — Fixed-width feature extraction with padding/truncation
//! - [`model`] — Pre-trained binary classifier (JSON forest/linear, optional ONNX)
//! - [`risk`] — Severity tiers and recommended actions
//! - [`report`] — Alert aggregation and the CSV alert report
//! - [`pipeline`] — Per-run orchestration with per-source failure isolation
//! - [`logging`] — Structured logging

pub mod config;
pub mod ingest;
pub mod features;
pub mod model;
pub mod risk;
pub mod report;
pub mod pipeline;
pub mod logging;

pub use config::SentinelConfig;
pub use ingest::RawRecordSet;
pub use features::{FeatureMatrix, FeatureVectorizer};
pub use model::ThreatClassifier;
pub use risk::SeverityPolicy;
pub use report::{AlertAggregator, AlertReport};
pub use pipeline::ThreatPipeline;
pub use logging::StructuredLogger;
