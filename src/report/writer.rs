//! CSV report output. The file is staged next to its destination and renamed into place,
//! so a reader never sees a partial report.

use super::{AlertReport, REPORT_COLUMNS};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use thiserror::Error;
use tracing::info;

/// Report is world-readable; staged temp files start out owner-only.
#[cfg(unix)]
const REPORT_MODE: u32 = 0o644;

#[derive(Debug, Error)]
pub enum ReportError {
    #[error("report i/o on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to encode report: {0}")]
    Csv(#[from] csv::Error),
}

/// Write the full report (header-only when there are no alerts), creating the
/// destination directory if needed.
pub fn write_report(report: &AlertReport, path: &Path) -> Result<(), ReportError> {
    let dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
        _ => PathBuf::from("."),
    };
    let io_err = |source| ReportError::Io {
        path: path.to_path_buf(),
        source,
    };
    std::fs::create_dir_all(&dir).map_err(io_err)?;

    let mut staged = NamedTempFile::new_in(&dir).map_err(io_err)?;
    {
        let mut wtr = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(staged.as_file_mut());
        wtr.write_record(REPORT_COLUMNS)?;
        for alert in &report.alerts {
            wtr.serialize(alert)?;
        }
        wtr.flush().map_err(io_err)?;
    }
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        staged
            .as_file()
            .set_permissions(std::fs::Permissions::from_mode(REPORT_MODE))
            .map_err(io_err)?;
    }
    staged.as_file_mut().sync_all().map_err(io_err)?;
    staged.persist(path).map_err(|e| io_err(e.error))?;

    info!(path = %path.display(), alerts = report.len(), "alerts saved");
    Ok(())
}

/// Log the end-of-run threat summary.
pub fn log_summary(report: &AlertReport) {
    if report.is_empty() {
        info!("no threats detected in the analyzed logs");
        return;
    }
    let counts = report.severity_counts();
    info!(
        total = report.len(),
        high = counts.high,
        medium = counts.medium,
        low = counts.low,
        "threat detection summary"
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Classification;
    use crate::report::{AlertAggregator, ClassificationResult};
    use crate::risk::SeverityPolicy;

    const HEADER: &str =
        "timestamp,source_file,log_entry_id,threat_detected,threat_probability,severity,action_recommended";

    #[test]
    fn empty_report_is_header_only() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out").join("alerts.csv");
        write_report(&AlertReport::default(), &path).unwrap();
        let text = std::fs::read_to_string(&path).unwrap();
        assert_eq!(text.trim_end(), HEADER);
    }

    #[test]
    fn rows_follow_header() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("alerts.csv");
        let raw = [
            Classification { label: 1, score: 0.9 },
            Classification { label: 0, score: 0.2 },
            Classification { label: 1, score: 0.6 },
        ];
        let mut agg = AlertAggregator::new();
        agg.absorb(
            "net.csv",
            Ok(ClassificationResult::tag_all("net.csv", &raw, &SeverityPolicy::default())),
        );
        write_report(&agg.finish(), &path).unwrap();

        let mut rdr = csv::Reader::from_path(&path).unwrap();
        let header: Vec<String> = rdr.headers().unwrap().iter().map(String::from).collect();
        assert_eq!(header, REPORT_COLUMNS);
        let rows: Vec<csv::StringRecord> = rdr.records().map(|r| r.unwrap()).collect();
        assert_eq!(rows.len(), 2);
        assert_eq!(&rows[0][1], "net.csv");
        assert_eq!(&rows[0][2], "0");
        assert_eq!(&rows[0][3], "1");
        assert_eq!(&rows[0][5], "HIGH");
        assert_eq!(&rows[0][6], "BLOCK");
        assert_eq!(&rows[1][2], "2");
        assert_eq!(&rows[1][5], "MEDIUM");
        assert_eq!(&rows[1][6], "MONITOR");
        assert_eq!(rows[0][0].len(), "2024-01-01 00:00:00".len());
    }

    #[cfg(unix)]
    #[test]
    fn report_is_readable_by_others() {
        use std::os::unix::fs::PermissionsExt;
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("alerts.csv");
        write_report(&AlertReport::default(), &path).unwrap();
        let mode = std::fs::metadata(&path).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o644);
    }

    #[test]
    fn replaces_existing_report() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("alerts.csv");
        std::fs::write(&path, "stale contents\n").unwrap();
        write_report(&AlertReport::default(), &path).unwrap();
        assert!(std::fs::read_to_string(&path).unwrap().starts_with("timestamp,"));
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 1);
    }
}
