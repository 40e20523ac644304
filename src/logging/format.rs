//! Log output: JSON lines (one object per line) for collection, or plain text for terminals.

use crate::config::{ConfigError, LogConfig, SentinelConfig};
use std::path::Path;
use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

pub struct StructuredLogger;

impl StructuredLogger {
    /// Install the global subscriber on stderr, level from RUST_LOG or `default_level`.
    /// Returns false if a subscriber was already installed.
    pub fn init(json: bool, default_level: &str) -> bool {
        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
        if json {
            let fmt = tracing_subscriber::fmt::layer()
                .json()
                .with_span_events(FmtSpan::NONE)
                .with_writer(std::io::stderr);
            tracing_subscriber::registry().with(filter).with(fmt).try_init().is_ok()
        } else {
            tracing_subscriber::registry()
                .with(filter)
                .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
                .try_init()
                .is_ok()
        }
    }
}

impl StructuredLogger {
    /// Load startup config and install the logger it asks for. A config that fails to load
    /// is reported through a default-configured logger before the error is returned.
    pub fn init_with_config(path: &Path) -> Result<SentinelConfig, ConfigError> {
        match SentinelConfig::load(path) {
            Ok(config) => {
                let config = config.apply_env_overrides();
                Self::init(config.log.json, &config.log.level);
                Ok(config)
            }
            Err(e) => {
                let log = LogConfig::default();
                Self::init(log.json, &log.level);
                tracing::error!(config = %path.display(), error = %e, "fatal error");
                Err(e)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bad_config_still_installs_logger() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, "{ not json").unwrap();
        let err = StructuredLogger::init_with_config(&path).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
        assert!(!StructuredLogger::init(false, "info"));
    }

    #[test]
    fn second_init_is_refused() {
        StructuredLogger::init(false, "warn");
        assert!(!StructuredLogger::init(true, "info"));
    }
}
