//! Ingestion of the EPA tables from the INE API.
//!
//! Sequential by design: one table at a time with a courtesy delay, so
//! the public endpoint never sees a request burst from us.

pub mod client;
pub mod dirty;
pub mod flatten;

use std::path::Path;
use std::time::Duration;
use tracing::info;

use crate::config::{COURTESY_DELAY_SECS, DIRTY_CSV, EXTRA_TABLES, MAIN_TABLES, RAW_CSV};
use crate::error::Result;
use crate::io;
use crate::model::RawRecord;
use client::{IneClient, IneSeries};

/// Download all EPA tables and produce the raw (and optionally dirty)
/// CSV artifacts in `output_dir`.
pub async fn fetch_all(
    start_year: i32,
    end_year: i32,
    output_dir: &Path,
    create_dirty: bool,
) -> Result<Vec<RawRecord>> {
    clear_previous_artifacts(output_dir)?;
    std::fs::create_dir_all(output_dir)?;

    let client = IneClient::new()?;
    let mut raw_records = Vec::new();

    for spec in MAIN_TABLES.iter().chain(EXTRA_TABLES.iter()) {
        info!(table_id = spec.id, description = spec.description, "downloading table");
        let series = client.fetch_table(spec.id, start_year, end_year).await?;
        write_table_json(output_dir, spec.slug, &series)?;

        let data_points: usize = series.iter().map(|s| s.data.len()).sum();
        info!(
            table_id = spec.id,
            series = series.len(),
            data_points,
            "table saved"
        );

        if MAIN_TABLES.iter().any(|main| main.id == spec.id) {
            raw_records.extend(flatten::flatten_table(spec.id, &series));
        }

        tokio::time::sleep(Duration::from_secs(COURTESY_DELAY_SECS)).await;
    }

    io::write_raw(&output_dir.join(RAW_CSV), &raw_records)?;

    if create_dirty {
        let frame = dirty::make_dirty(&raw_records, dirty::DEFAULT_SEED);
        io::write_frame(&output_dir.join(DIRTY_CSV), &frame)?;
    }

    Ok(raw_records)
}

/// Stale artifacts from an earlier range would silently mix into the
/// combined CSV, so previous JSON/CSV files are removed first.
fn clear_previous_artifacts(output_dir: &Path) -> Result<()> {
    if !output_dir.exists() {
        return Ok(());
    }
    for entry in std::fs::read_dir(output_dir)? {
        let path = entry?.path();
        let ext = path.extension().and_then(|e| e.to_str());
        if matches!(ext, Some("json") | Some("csv")) {
            std::fs::remove_file(&path)?;
        }
    }
    info!(dir = %output_dir.display(), "cleared previous artifacts");
    Ok(())
}

fn write_table_json(output_dir: &Path, slug: &str, series: &[IneSeries]) -> Result<()> {
    let path = output_dir.join(format!("{slug}_raw.json"));
    let json = serde_json::to_string_pretty(series)?;
    std::fs::write(path, json)?;
    Ok(())
}
