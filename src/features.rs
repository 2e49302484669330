//! Derived reporting columns over cleaned records.
//!
//! Pure row mapping; lookup misses produce "Otro"/"Desconocida" defaults,
//! never errors.

use once_cell::sync::Lazy;
use std::collections::HashMap;
use tracing::info;

use crate::model::{CleanRecord, FeatureRecord};

/// Raw API period codes to quarter display labels. Code 19 maps to T4:
/// the survey publishes the fourth quarter under the first period code
/// of the following cycle, so the offset is part of the contract.
static PERIOD_MAP: Lazy<HashMap<u32, &'static str>> =
    Lazy::new(|| HashMap::from([(19, "T4"), (20, "T1"), (21, "T2"), (22, "T3")]));

/// Source table display names.
static SOURCE_MAP: Lazy<HashMap<u32, &'static str>> = Lazy::new(|| {
    HashMap::from([
        (65345, "Poblacion"),
        (65349, "Tasas"),
        (65354, "Ocupados por sector"),
    ])
});

/// Province to autonomous region (comunidad autónoma).
static REGION_MAP: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
    HashMap::from([
        ("Almería", "Andalucía"),
        ("Cádiz", "Andalucía"),
        ("Córdoba", "Andalucía"),
        ("Granada", "Andalucía"),
        ("Huelva", "Andalucía"),
        ("Jaén", "Andalucía"),
        ("Málaga", "Andalucía"),
        ("Sevilla", "Andalucía"),
        ("Huesca", "Aragón"),
        ("Teruel", "Aragón"),
        ("Zaragoza", "Aragón"),
        ("Asturias", "Asturias"),
        ("Balears, Illes", "Illes Balears"),
        ("Palmas, Las", "Canarias"),
        ("Santa Cruz de Tenerife", "Canarias"),
        ("Cantabria", "Cantabria"),
        ("Ávila", "Castilla y León"),
        ("Burgos", "Castilla y León"),
        ("León", "Castilla y León"),
        ("Palencia", "Castilla y León"),
        ("Salamanca", "Castilla y León"),
        ("Segovia", "Castilla y León"),
        ("Soria", "Castilla y León"),
        ("Valladolid", "Castilla y León"),
        ("Zamora", "Castilla y León"),
        ("Albacete", "Castilla-La Mancha"),
        ("Ciudad Real", "Castilla-La Mancha"),
        ("Cuenca", "Castilla-La Mancha"),
        ("Guadalajara", "Castilla-La Mancha"),
        ("Toledo", "Castilla-La Mancha"),
        ("Barcelona", "Cataluña"),
        ("Girona", "Cataluña"),
        ("Lleida", "Cataluña"),
        ("Tarragona", "Cataluña"),
        ("Alicante/Alacant", "Comunitat Valenciana"),
        ("Castellón/Castelló", "Comunitat Valenciana"),
        ("Valencia/València", "Comunitat Valenciana"),
        ("Badajoz", "Extremadura"),
        ("Cáceres", "Extremadura"),
        ("Coruña, A", "Galicia"),
        ("Lugo", "Galicia"),
        ("Ourense", "Galicia"),
        ("Pontevedra", "Galicia"),
        ("Madrid", "Comunidad de Madrid"),
        ("Murcia", "Región de Murcia"),
        ("Navarra", "Navarra"),
        ("Araba/Álava", "País Vasco"),
        ("Bizkaia", "País Vasco"),
        ("Gipuzkoa", "País Vasco"),
        ("Rioja, La", "La Rioja"),
        ("Ceuta", "Ceuta"),
        ("Melilla", "Melilla"),
        ("Total Nacional", "Total Nacional"),
    ])
});

/// Enrich cleaned records with the derived reporting columns.
pub fn build_features(records: Vec<CleanRecord>) -> Vec<FeatureRecord> {
    let features: Vec<FeatureRecord> = records.into_iter().map(derive).collect();
    info!(rows = features.len(), "feature derivation finished");
    features
}

fn derive(clean: CleanRecord) -> FeatureRecord {
    let quarter_label = clean
        .date
        .map(|d| format!("{}Q{}", d.format("%Y"), quarter_of(d)));
    let month = clean.date.map(|d| chrono::Datelike::month(&d));
    let year_derived = clean.date.map(|d| chrono::Datelike::year(&d));

    let period_display = PERIOD_MAP.get(&clean.period_id).copied().unwrap_or("Otro");
    let source_name = SOURCE_MAP.get(&clean.table).copied();

    let province_display = clean.province.display();
    let is_national = province_display.to_lowercase().contains("total nacional");
    let region = REGION_MAP
        .get(province_display)
        .copied()
        .unwrap_or("Desconocida")
        .to_string();

    FeatureRecord {
        clean,
        quarter_label,
        month,
        year_derived,
        period_display,
        source_name,
        is_national,
        region,
    }
}

fn quarter_of(date: chrono::NaiveDate) -> u32 {
    (chrono::Datelike::month(&date) - 1) / 3 + 1
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Sex, SexField, TextField};
    use chrono::NaiveDate;

    fn record(table: u32, period_id: u32, province: &str, date: Option<NaiveDate>) -> CleanRecord {
        CleanRecord {
            table,
            series_code: "EPA1".to_string(),
            series_name: "test".to_string(),
            year: 2023,
            period_id,
            value: Some(1.0),
            date,
            province: TextField::Known(province.to_string()),
            sex: SexField::Known(Sex::AmbosSexos),
            activity: TextField::Known("Ocupados".to_string()),
        }
    }

    #[test]
    fn test_period_display_offset_convention() {
        let date = NaiveDate::from_ymd_opt(2023, 2, 1);
        let feats = build_features(vec![
            record(65345, 19, "Madrid", date),
            record(65345, 20, "Madrid", date),
            record(65345, 21, "Madrid", date),
            record(65345, 22, "Madrid", date),
            record(65345, 99, "Madrid", date),
        ]);
        let labels: Vec<&str> = feats.iter().map(|f| f.period_display).collect();
        assert_eq!(labels, vec!["T4", "T1", "T2", "T3", "Otro"]);
    }

    #[test]
    fn test_temporal_buckets_from_date() {
        let date = NaiveDate::from_ymd_opt(2023, 5, 15);
        let feats = build_features(vec![record(65345, 21, "Madrid", date)]);
        assert_eq!(feats[0].quarter_label.as_deref(), Some("2023Q2"));
        assert_eq!(feats[0].month, Some(5));
        assert_eq!(feats[0].year_derived, Some(2023));
    }

    #[test]
    fn test_missing_date_yields_no_temporal_buckets() {
        let feats = build_features(vec![record(65345, 21, "Madrid", None)]);
        assert_eq!(feats[0].quarter_label, None);
        assert_eq!(feats[0].month, None);
        assert_eq!(feats[0].year_derived, None);
    }

    #[test]
    fn test_region_lookup() {
        let date = NaiveDate::from_ymd_opt(2023, 5, 15);
        let feats = build_features(vec![
            record(65345, 21, "Madrid", date),
            record(65345, 21, "Bizkaia", date),
            record(65345, 21, "Springfield", date),
        ]);
        assert_eq!(feats[0].region, "Comunidad de Madrid");
        assert_eq!(feats[1].region, "País Vasco");
        assert_eq!(feats[2].region, "Desconocida");
    }

    #[test]
    fn test_national_flag() {
        let date = NaiveDate::from_ymd_opt(2023, 5, 15);
        let feats = build_features(vec![
            record(65345, 21, "Total Nacional", date),
            record(65345, 21, "Madrid", date),
        ]);
        assert!(feats[0].is_national);
        assert!(!feats[1].is_national);
    }

    #[test]
    fn test_source_name_lookup() {
        let date = NaiveDate::from_ymd_opt(2023, 5, 15);
        let feats = build_features(vec![
            record(65345, 21, "Madrid", date),
            record(65349, 21, "Madrid", date),
            record(65354, 21, "Madrid", date),
            record(12345, 21, "Madrid", date),
        ]);
        assert_eq!(feats[0].source_name, Some("Poblacion"));
        assert_eq!(feats[1].source_name, Some("Tasas"));
        assert_eq!(feats[2].source_name, Some("Ocupados por sector"));
        assert_eq!(feats[3].source_name, None);
    }

    #[test]
    fn test_error_province_maps_to_unknown_region() {
        let date = NaiveDate::from_ymd_opt(2023, 5, 15);
        let mut rec = record(65345, 21, "Madrid", date);
        rec.province = TextField::Failed;
        let feats = build_features(vec![rec]);
        assert_eq!(feats[0].region, "Desconocida");
        assert!(!feats[0].is_national);
    }
}
