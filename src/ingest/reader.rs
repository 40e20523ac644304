//! CSV log reader: header-defined schema, per-cell type inference.

use super::{IngestError, RawRecordSet, Value};
use chrono::{DateTime, NaiveDateTime};
use std::io::Read;
use std::path::Path;

const TIMESTAMP_FORMATS: &[&str] = &["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S%.f"];

/// Infer the type of one raw cell.
pub fn parse_cell(raw: &str) -> Value {
    let s = raw.trim();
    if s.is_empty() {
        return Value::Missing;
    }
    if let Ok(i) = s.parse::<i64>() {
        return Value::Integer(i);
    }
    if let Ok(f) = s.parse::<f64>() {
        // "nan" / "inf" parse as floats but carry no usable signal
        return if f.is_finite() { Value::Real(f) } else { Value::Missing };
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Value::Timestamp(dt.naive_utc());
    }
    for fmt in TIMESTAMP_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Value::Timestamp(dt);
        }
    }
    Value::Text(s.to_string())
}

/// Read one CSV log file. The record set is labelled with the file name.
pub fn read_source(path: &Path) -> Result<RawRecordSet, IngestError> {
    let file = std::fs::File::open(path).map_err(|source| IngestError::Open {
        path: path.to_path_buf(),
        source,
    })?;
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());
    read_records(name, file)
}

/// Read CSV records from any reader. Ragged rows are rejected.
pub fn read_records(source: impl Into<String>, reader: impl Read) -> Result<RawRecordSet, IngestError> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::Headers)
        .from_reader(reader);

    let columns: Vec<String> = rdr.headers()?.iter().map(String::from).collect();
    if columns.is_empty() || columns.iter().all(|c| c.is_empty()) {
        return Err(IngestError::MissingHeader);
    }

    let mut records = Vec::new();
    for row in rdr.records() {
        let row = row?;
        records.push(row.iter().map(parse_cell).collect());
    }
    RawRecordSet::new(source, columns, records)
}
