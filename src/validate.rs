//! Post-cleaning validation gate.
//!
//! Per-row noise is tolerated upstream; a violated global invariant is
//! not. Every check is fatal and names the failing invariant, because
//! downstream aggregation assumes dedup and canonical domains hold
//! unconditionally.

use std::collections::HashSet;
use tracing::info;

use crate::error::{PipelineError, Result};
use crate::model::CleanRecord;

/// Raise unless every required column name is present.
pub fn assert_columns(columns: &[String], required: &[&str]) -> Result<()> {
    for name in required {
        if !columns.iter().any(|c| c == name) {
            return Err(PipelineError::MissingColumn((*name).to_string()));
        }
    }
    Ok(())
}

/// Check the cleaned-table invariants: unique dedup keys, canonical sex
/// domain, finite-or-null values. Dates are typed and need no check.
pub fn validate_clean(records: &[CleanRecord]) -> Result<()> {
    let mut seen = HashSet::new();
    for record in records {
        if !seen.insert(record.dedup_key()) {
            return Err(PipelineError::Invariant(format!(
                "duplicate key remains after cleaning: ({}, {}, {}, {})",
                record.table, record.series_code, record.year, record.period_id
            )));
        }
    }

    for record in records {
        if record.sex.known().is_none() {
            return Err(PipelineError::Invariant(format!(
                "sex outside the canonical set: {:?} (series {})",
                record.sex.display(),
                record.series_code
            )));
        }
    }

    for record in records {
        if let Some(value) = record.value {
            if !value.is_finite() {
                return Err(PipelineError::Invariant(format!(
                    "non-finite value survived cleaning: {} (series {})",
                    value, record.series_code
                )));
            }
        }
    }

    info!(rows = records.len(), "all validations passed");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Sex, SexField, TextField};

    fn record(series_code: &str, year: i32) -> CleanRecord {
        CleanRecord {
            table: 65345,
            series_code: series_code.to_string(),
            series_name: "test".to_string(),
            year,
            period_id: 20,
            value: Some(1.0),
            date: chrono::NaiveDate::from_ymd_opt(year, 2, 1),
            province: TextField::Known("Madrid".to_string()),
            sex: SexField::Known(Sex::Hombres),
            activity: TextField::Known("Ocupados".to_string()),
        }
    }

    #[test]
    fn test_valid_records_pass() {
        let records = vec![record("EPA1", 2022), record("EPA1", 2023), record("EPA2", 2023)];
        assert!(validate_clean(&records).is_ok());
    }

    #[test]
    fn test_duplicate_key_is_fatal() {
        let records = vec![record("EPA1", 2023), record("EPA1", 2023)];
        match validate_clean(&records) {
            Err(PipelineError::Invariant(msg)) => assert!(msg.contains("duplicate key")),
            other => panic!("expected invariant violation, got {other:?}"),
        }
    }

    #[test]
    fn test_failed_sex_is_fatal() {
        // A grammar mismatch leaves sex as a sentinel; the gate must
        // reject it rather than let "Error" reach downstream consumers.
        let mut bad = record("EPA1", 2023);
        bad.sex = SexField::Failed;
        match validate_clean(&[bad]) {
            Err(PipelineError::Invariant(msg)) => assert!(msg.contains("canonical set")),
            other => panic!("expected invariant violation, got {other:?}"),
        }
    }

    #[test]
    fn test_unknown_sex_is_fatal() {
        let mut bad = record("EPA1", 2023);
        bad.sex = SexField::Unknown;
        assert!(validate_clean(&[bad]).is_err());
    }

    #[test]
    fn test_null_value_is_allowed() {
        let mut rec = record("EPA1", 2023);
        rec.value = None;
        assert!(validate_clean(&[rec]).is_ok());
    }

    #[test]
    fn test_assert_columns_names_the_missing_field() {
        let columns = vec!["tabla".to_string(), "valor".to_string()];
        match assert_columns(&columns, &["tabla", "valor", "fecha"]) {
            Err(PipelineError::MissingColumn(col)) => assert_eq!(col, "fecha"),
            other => panic!("expected missing column error, got {other:?}"),
        }
    }
}
