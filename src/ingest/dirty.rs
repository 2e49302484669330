//! Deterministic dirty-CSV generator.
//!
//! Reintroduces the data-quality noise the cleaning pipeline is built
//! against: mixed date renderings, comma decimals, blanked values,
//! shouted series names, noisy headers, duplicate rows, shuffled order.

use chrono::DateTime;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use tracing::info;

use crate::model::{Frame, RawRecord};

pub const DEFAULT_SEED: u64 = 42;
const DUPLICATE_ROWS: usize = 20;

/// Header spellings with the casing and whitespace noise of a hand-made
/// export. Order differs from the raw artifact on purpose.
const DIRTY_COLUMNS: [&str; 8] = [
    "Tabla",
    "Serie_Cod",
    "Serie Nombre",
    "Anyo",
    "Periodo_ID",
    " Valor",
    "Secreto",
    "Fecha ",
];

/// Render a raw table with intentional quality issues. Same seed, same
/// output.
pub fn make_dirty(records: &[RawRecord], seed: u64) -> Frame {
    let mut rng = StdRng::seed_from_u64(seed);
    let n = records.len();

    // Cycle the date rendering per row: four textual formats plus the
    // raw millisecond string.
    let dates: Vec<String> = records
        .iter()
        .enumerate()
        .map(|(i, r)| format_date(r.epoch_millis, i % 5))
        .collect();

    let mut values: Vec<String> = records
        .iter()
        .map(|r| r.value.map(|v| v.to_string()).unwrap_or_default())
        .collect();
    for idx in sample_indices(&mut rng, n, n / 10) {
        if !values[idx].is_empty() {
            values[idx] = values[idx].replace('.', ",");
        }
    }
    for idx in sample_indices(&mut rng, n, n * 3 / 100) {
        values[idx] = String::new();
    }

    let mut names: Vec<String> = records.iter().map(|r| r.series_name.clone()).collect();
    for idx in sample_indices(&mut rng, n, n / 20) {
        names[idx] = names[idx].to_uppercase();
    }

    let mut rows: Vec<Vec<String>> = (0..n)
        .map(|i| {
            let r = &records[i];
            vec![
                r.table.to_string(),
                r.series_code.clone(),
                names[i].clone(),
                r.year.to_string(),
                r.period_id.to_string(),
                values[i].clone(),
                r.is_secret.to_string(),
                dates[i].clone(),
            ]
        })
        .collect();

    let dup_indices = sample_indices(&mut rng, rows.len(), DUPLICATE_ROWS.min(rows.len()));
    for idx in dup_indices {
        rows.push(rows[idx].clone());
    }
    rows.shuffle(&mut rng);

    info!(rows = rows.len(), seed, "generated dirty frame");
    Frame {
        columns: DIRTY_COLUMNS.iter().map(|c| c.to_string()).collect(),
        rows,
    }
}

fn format_date(epoch_millis: Option<i64>, variant: usize) -> String {
    let Some(millis) = epoch_millis else {
        return String::new();
    };
    let Some(dt) = DateTime::from_timestamp_millis(millis) else {
        return String::new();
    };
    let date = dt.date_naive();
    match variant {
        0 => date.format("%Y-%m-%d").to_string(),
        1 => date.format("%d/%m/%Y").to_string(),
        2 => date.format("%Y/%m/%d").to_string(),
        3 => date.format("%b %d, %Y").to_string(),
        _ => millis.to_string(),
    }
}

/// Distinct indices in [0, n), k at most n.
fn sample_indices(rng: &mut StdRng, n: usize, k: usize) -> Vec<usize> {
    let mut all: Vec<usize> = (0..n).collect();
    all.shuffle(rng);
    all.truncate(k);
    all
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cleaning;

    fn raw_records(n: usize) -> Vec<RawRecord> {
        (0..n)
            .map(|i| RawRecord {
                table: 65345,
                series_code: format!("EPA{i}"),
                series_name: "Hombres. Madrid. Total. Ocupados.".to_string(),
                epoch_millis: Some(1_684_108_800_000),
                year: 2020 + (i % 5) as i32,
                period_id: 19 + (i % 4) as u32,
                value: Some(100.5 + i as f64),
                is_secret: false,
            })
            .collect()
    }

    #[test]
    fn test_same_seed_same_output() {
        let records = raw_records(100);
        assert_eq!(make_dirty(&records, 42), make_dirty(&records, 42));
    }

    #[test]
    fn test_different_seed_different_order() {
        let records = raw_records(100);
        assert_ne!(make_dirty(&records, 42), make_dirty(&records, 43));
    }

    #[test]
    fn test_appends_duplicate_rows() {
        let records = raw_records(100);
        let dirty = make_dirty(&records, 42);
        assert_eq!(dirty.rows.len(), 120);
    }

    #[test]
    fn test_mixed_date_renderings_appear() {
        let records = raw_records(10);
        let dirty = make_dirty(&records, 42);
        let dates: Vec<&String> = dirty.rows.iter().map(|r| &r[7]).collect();
        assert!(dates.iter().any(|d| d.contains('-')));
        assert!(dates.iter().any(|d| d.contains('/')));
        assert!(dates.iter().any(|d| d.chars().all(|c| c.is_ascii_digit())));
    }

    #[test]
    fn test_dirty_output_cleans_back_to_input_size() {
        // The injected noise must all be recoverable by the pipeline;
        // dedup collapses the appended duplicates.
        let records = raw_records(100);
        let dirty = make_dirty(&records, 42);
        let cleaned = cleaning::clean(&dirty).unwrap();
        assert_eq!(cleaned.len(), records.len());
    }
}
