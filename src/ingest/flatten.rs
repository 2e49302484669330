//! Flattening of the nested INE series JSON into raw tabular rows.

use super::client::IneSeries;
use crate::model::RawRecord;

/// One row per data point, with the series code and name repeated.
pub fn flatten_table(table_id: u32, series_list: &[IneSeries]) -> Vec<RawRecord> {
    let mut rows = Vec::new();
    for series in series_list {
        let name = series.name.trim();
        for point in &series.data {
            rows.push(RawRecord {
                table: table_id,
                series_code: series.code.clone(),
                series_name: name.to_string(),
                epoch_millis: point.epoch_millis,
                year: point.year,
                period_id: point.period_id,
                value: point.value,
                is_secret: point.is_secret,
            });
        }
    }
    rows
}
