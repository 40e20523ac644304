//! netlog-sentinel entrypoint: one batch pass over the input directory, one alert report.
//! Exits non-zero only when the config or model cannot be loaded, or the report cannot be written.

use netlog_sentinel::{logging::StructuredLogger, pipeline::ThreatPipeline};
use std::path::PathBuf;
use tracing::{error, info};

fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let config_path = std::env::var("SENTINEL_CONFIG_PATH")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("config.json"));
    let config = StructuredLogger::init_with_config(&config_path)?;

    info!(
        model = %config.model_path.display(),
        input_dir = %config.input_dir.display(),
        output = %config.output_path.display(),
        "netlog-sentinel starting"
    );

    let mut pipeline = ThreatPipeline::new(config).map_err(|e| {
        error!(error = %e, "fatal error");
        e
    })?;
    pipeline.run().map_err(|e| {
        error!(error = %e, "fatal error");
        e
    })?;
    Ok(())
}
