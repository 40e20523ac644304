//! Candidate feature column selection.

use crate::ingest::{RawRecordSet, Value};

/// Indices of columns usable as features, in source order: not excluded by name, and
/// uniformly numeric (every present cell integer or real, at least one present).
pub fn select_feature_columns(set: &RawRecordSet, excluded: &[String]) -> Vec<usize> {
    set.columns()
        .iter()
        .enumerate()
        .filter(|(_, name)| !excluded.iter().any(|x| x == *name))
        .filter(|(idx, _)| is_numeric_column(set, *idx))
        .map(|(idx, _)| idx)
        .collect()
}

fn is_numeric_column(set: &RawRecordSet, idx: usize) -> bool {
    let mut seen = false;
    for cell in set.column(idx) {
        match cell {
            Value::Missing => {}
            v if v.is_numeric() => seen = true,
            _ => return false,
        }
    }
    seen
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::FeaturesConfig;

    fn excluded() -> Vec<String> {
        FeaturesConfig::default().excluded_columns
    }

    #[test]
    fn skips_excluded_and_non_numeric() {
        let set = RawRecordSet::new(
            "s.csv",
            ["source_ip", "bytes", "protocol", "flag", "duration", "blank", "port"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            vec![
                vec![
                    Value::Text("10.0.0.1".into()),
                    Value::Integer(10),
                    Value::Text("tcp".into()),
                    Value::Text("yes".into()),
                    Value::Real(0.1),
                    Value::Missing,
                    Value::Integer(443),
                ],
                vec![
                    Value::Text("10.0.0.2".into()),
                    Value::Missing,
                    Value::Text("udp".into()),
                    Value::Integer(1),
                    Value::Integer(2),
                    Value::Missing,
                    Value::Integer(53),
                ],
            ],
        )
        .unwrap();
        // flag mixes text and numbers; blank has no values at all
        assert_eq!(select_feature_columns(&set, &excluded()), vec![1, 4, 6]);
    }

    #[test]
    fn numeric_excluded_column_still_skipped() {
        let set = RawRecordSet::new(
            "s.csv",
            vec!["timestamp".into(), "x".into()],
            vec![vec![Value::Integer(1_700_000_000), Value::Integer(3)]],
        )
        .unwrap();
        assert_eq!(select_feature_columns(&set, &excluded()), vec![1]);
    }
}
