//! Whole-table cleaning pipeline: column normalization, coercion,
//! series-name parsing, date parsing, deduplication.
//!
//! Per-row noise (malformed names, dates, numbers) is absorbed into
//! sentinel/None fields; only structural problems with the input table
//! are fatal.

pub mod canon;
pub mod coerce;
pub mod series;

use std::collections::HashSet;
use tracing::{debug, info, warn};

use crate::error::{PipelineError, Result};
use crate::model::{CleanRecord, Frame, SexField, TextField};
use series::TableKind;

/// Normalized header spelling: trim, lowercase, spaces to underscores.
fn normalize_header(name: &str) -> String {
    name.trim().to_lowercase().replace(' ', "_")
}

/// Indices of the required input columns after header normalization.
struct ColumnLayout {
    table: usize,
    series_code: usize,
    series_name: usize,
    date: usize,
    year: usize,
    period: usize,
    value: usize,
}

fn locate_columns(columns: &[String]) -> Result<ColumnLayout> {
    let normalized: Vec<String> = columns.iter().map(|c| normalize_header(c)).collect();
    let find = |name: &str| normalized.iter().position(|c| c == name);
    let require =
        |name: &str| find(name).ok_or_else(|| PipelineError::MissingColumn(name.to_string()));

    Ok(ColumnLayout {
        table: require("tabla")?,
        series_code: require("serie_cod")?,
        series_name: require("serie_nombre")?,
        // The raw artifact names the date column after its encoding.
        date: find("fecha")
            .or_else(|| find("fecha_ms"))
            .ok_or_else(|| PipelineError::MissingColumn("fecha".to_string()))?,
        year: require("anyo")?,
        period: require("periodo_id")?,
        value: require("valor")?,
    })
}

/// Clean the raw table into typed records.
///
/// Rows are deduplicated on (table, series code, year, period), keeping
/// the first occurrence in input order. The secrecy flag and the
/// lowercased parsing helper are not part of the output shape.
pub fn clean(frame: &Frame) -> Result<Vec<CleanRecord>> {
    let layout = locate_columns(&frame.columns)?;

    let mut seen = HashSet::new();
    let mut records = Vec::with_capacity(frame.rows.len());
    let mut parse_failures = 0usize;
    let mut dropped_duplicates = 0usize;

    for row in &frame.rows {
        let cell = |idx: usize| row.get(idx).map(String::as_str).unwrap_or("");

        let table: u32 = cell(layout.table).trim().parse().unwrap_or(0);
        let series_code = cell(layout.series_code).trim().to_string();
        let series_name = cell(layout.series_name).trim().to_string();
        let year: i32 = cell(layout.year).trim().parse().unwrap_or(0);
        let period_id: u32 = cell(layout.period).trim().parse().unwrap_or(0);
        let value = coerce::parse_value(cell(layout.value));
        let date = coerce::parse_date(cell(layout.date));

        let lowered = series_name.to_lowercase();
        let (province, sex, activity) = match TableKind::from_id(table) {
            None => (TextField::Unknown, SexField::Unknown, TextField::Unknown),
            Some(kind) => match kind.parse(&lowered) {
                Ok(dims) => (
                    TextField::Known(dims.province.trim().to_string()),
                    SexField::Known(dims.sex),
                    TextField::Known(dims.activity.trim().to_string()),
                ),
                Err(err) => {
                    parse_failures += 1;
                    debug!(table, series = %series_code, %err, "series name did not match the table grammar");
                    (TextField::Failed, SexField::Failed, TextField::Failed)
                }
            },
        };

        let record = CleanRecord {
            table,
            series_code,
            series_name,
            year,
            period_id,
            value,
            date,
            province,
            sex,
            activity,
        };

        if !seen.insert(record.dedup_key()) {
            dropped_duplicates += 1;
            continue;
        }
        records.push(record);
    }

    info!(
        rows_in = frame.rows.len(),
        rows_out = records.len(),
        dropped_duplicates,
        "cleaning pass finished"
    );
    if parse_failures > 0 {
        warn!(
            parse_failures,
            "rows kept with error dimensions after grammar mismatch"
        );
    }

    Ok(records)
}
