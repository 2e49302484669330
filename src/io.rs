//! Flat tabular artifacts: CSV in, CSV out.
//!
//! Reading leaves headers as-is; normalization belongs to the cleaning
//! pipeline. Writing renders the 17-column feature table with `None`
//! cells as empty strings.

use std::path::Path;
use tracing::info;

use crate::error::Result;
use crate::model::{FeatureRecord, Frame, RawRecord};
use crate::validate::assert_columns;

/// Column order of the output artifact.
pub const OUTPUT_COLUMNS: [&str; 17] = [
    "tabla",
    "serie_cod",
    "serie_nombre",
    "anyo",
    "periodo_id",
    "valor",
    "fecha",
    "provincia",
    "sexo",
    "actividad",
    "trimestre",
    "mes",
    "year",
    "trimestre_label",
    "fuente",
    "es_nacional",
    "ccaa",
];

/// Load a CSV file into an untyped frame.
pub fn read_frame(path: &Path) -> Result<Frame> {
    let mut reader = csv::ReaderBuilder::new().flexible(true).from_path(path)?;

    let columns: Vec<String> = reader
        .headers()?
        .iter()
        .map(|h| h.to_string())
        .collect();

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record?;
        rows.push(record.iter().map(|c| c.to_string()).collect());
    }

    info!(path = %path.display(), rows = rows.len(), "loaded CSV");
    Ok(Frame { columns, rows })
}

/// Write flattened raw records as CSV. Headers come from the record's
/// serde field names, matching the raw artifact contract.
pub fn write_raw(path: &Path, records: &[RawRecord]) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let mut writer = csv::Writer::from_path(path)?;
    for record in records {
        writer.serialize(record)?;
    }
    writer.flush()?;
    info!(path = %path.display(), rows = records.len(), "wrote raw CSV");
    Ok(())
}

/// Write an untyped frame verbatim, noisy headers included.
pub fn write_frame(path: &Path, frame: &Frame) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let mut writer = csv::Writer::from_path(path)?;
    writer.write_record(&frame.columns)?;
    for row in &frame.rows {
        writer.write_record(row)?;
    }
    writer.flush()?;
    Ok(())
}

/// Write the feature table as the final CSV artifact.
pub fn write_features(path: &Path, features: &[FeatureRecord]) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    // The typed records guarantee the cells; the header set still has to
    // carry every column downstream consumers select on.
    let columns: Vec<String> = OUTPUT_COLUMNS.iter().map(|c| c.to_string()).collect();
    assert_columns(
        &columns,
        &[
            "tabla",
            "serie_cod",
            "anyo",
            "periodo_id",
            "valor",
            "fecha",
            "provincia",
            "sexo",
            "actividad",
        ],
    )?;

    let mut writer = csv::Writer::from_path(path)?;
    writer.write_record(&OUTPUT_COLUMNS)?;

    for feat in features {
        let clean = &feat.clean;
        writer.write_record([
            clean.table.to_string(),
            clean.series_code.clone(),
            clean.series_name.clone(),
            clean.year.to_string(),
            clean.period_id.to_string(),
            clean.value.map(|v| v.to_string()).unwrap_or_default(),
            clean.date.map(|d| d.to_string()).unwrap_or_default(),
            clean.province.display().to_string(),
            clean.sex.display().to_string(),
            clean.activity.display().to_string(),
            feat.quarter_label.clone().unwrap_or_default(),
            feat.month.map(|m| m.to_string()).unwrap_or_default(),
            feat.year_derived.map(|y| y.to_string()).unwrap_or_default(),
            feat.period_display.to_string(),
            feat.source_name.unwrap_or_default().to_string(),
            feat.is_national.to_string(),
            feat.region.clone(),
        ])?;
    }

    writer.flush()?;
    info!(path = %path.display(), rows = features.len(), "wrote feature CSV");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{CleanRecord, Sex, SexField, TextField};
    use std::io::Write;

    fn feature_record() -> FeatureRecord {
        FeatureRecord {
            clean: CleanRecord {
                table: 65345,
                series_code: "EPA815".to_string(),
                series_name: "Hombres. Madrid. Total. Ocupados.".to_string(),
                year: 2023,
                period_id: 21,
                value: Some(1234.5),
                date: chrono::NaiveDate::from_ymd_opt(2023, 5, 15),
                province: TextField::Known("Madrid".to_string()),
                sex: SexField::Known(Sex::Hombres),
                activity: TextField::Known("Ocupados".to_string()),
            },
            quarter_label: Some("2023Q2".to_string()),
            month: Some(5),
            year_derived: Some(2023),
            period_display: "T2",
            source_name: Some("Poblacion"),
            is_national: false,
            region: "Comunidad de Madrid".to_string(),
        }
    }

    #[test]
    fn test_write_then_read_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.csv");

        write_features(&path, &[feature_record()]).unwrap();
        let frame = read_frame(&path).unwrap();

        assert_eq!(frame.columns.len(), 17);
        assert_eq!(frame.columns[0], "tabla");
        assert_eq!(frame.rows.len(), 1);
        assert_eq!(frame.rows[0][7], "Madrid");
        assert_eq!(frame.rows[0][16], "Comunidad de Madrid");
    }

    #[test]
    fn test_none_cells_serialize_empty() {
        let mut feat = feature_record();
        feat.clean.value = None;
        feat.clean.date = None;
        feat.quarter_label = None;
        feat.month = None;
        feat.year_derived = None;
        feat.source_name = None;

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.csv");
        write_features(&path, &[feat]).unwrap();

        let frame = read_frame(&path).unwrap();
        assert_eq!(frame.rows[0][5], "");
        assert_eq!(frame.rows[0][6], "");
        assert_eq!(frame.rows[0][10], "");
        assert_eq!(frame.rows[0][14], "");
    }

    #[test]
    fn test_read_frame_keeps_noisy_headers_verbatim() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("dirty.csv");
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(file, "Tabla,Serie_Cod, Valor").unwrap();
        writeln!(file, "65345,EPA1,\"12,5\"").unwrap();
        drop(file);

        let frame = read_frame(&path).unwrap();
        assert_eq!(frame.columns, vec!["Tabla", "Serie_Cod", " Valor"]);
        assert_eq!(frame.rows[0][2], "12,5");
    }
}
