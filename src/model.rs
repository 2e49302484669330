use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

/// One flattened observation from the INE API, as written to the raw CSV.
/// Produced by ingestion; immutable once written.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawRecord {
    #[serde(rename = "tabla")]
    pub table: u32,
    #[serde(rename = "serie_cod")]
    pub series_code: String,
    #[serde(rename = "serie_nombre")]
    pub series_name: String,
    #[serde(rename = "fecha_ms")]
    pub epoch_millis: Option<i64>,
    #[serde(rename = "anyo")]
    pub year: i32,
    #[serde(rename = "periodo_id")]
    pub period_id: u32,
    #[serde(rename = "valor")]
    pub value: Option<f64>,
    #[serde(rename = "secreto")]
    pub is_secret: bool,
}

/// Untyped tabular data as read from disk: named string columns plus
/// string rows. Header spelling is normalized by the cleaning pipeline,
/// not here.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Frame {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

/// Canonical sex vocabulary. Closed set; anything else is a parse failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Sex {
    AmbosSexos,
    Hombres,
    Mujeres,
}

impl Sex {
    pub fn label(&self) -> &'static str {
        match self {
            Sex::AmbosSexos => "Ambos sexos",
            Sex::Hombres => "Hombres",
            Sex::Mujeres => "Mujeres",
        }
    }
}

impl fmt::Display for Sex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Outcome of decoding the sex dimension of one series.
///
/// `Unknown` means the source table has no grammar for the label;
/// `Failed` means the grammar did not match. Display sentinels exist only
/// at the serialization boundary so downstream logic can tell the two
/// apart without string comparison.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SexField {
    Known(Sex),
    Unknown,
    Failed,
}

impl SexField {
    pub fn known(&self) -> Option<Sex> {
        match self {
            SexField::Known(sex) => Some(*sex),
            _ => None,
        }
    }

    pub fn display(&self) -> &'static str {
        match self {
            SexField::Known(sex) => sex.label(),
            SexField::Unknown => "Desconocido",
            SexField::Failed => "Error",
        }
    }
}

/// Outcome of decoding a free-text dimension (province, activity).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TextField {
    Known(String),
    Unknown,
    Failed,
}

impl TextField {
    pub fn known(&self) -> Option<&str> {
        match self {
            TextField::Known(text) => Some(text),
            _ => None,
        }
    }

    pub fn display(&self) -> &str {
        match self {
            TextField::Known(text) => text,
            TextField::Unknown => "Desconocida",
            TextField::Failed => "Error",
        }
    }
}

/// One observation after cleaning.
#[derive(Debug, Clone, PartialEq)]
pub struct CleanRecord {
    pub table: u32,
    pub series_code: String,
    pub series_name: String,
    pub year: i32,
    pub period_id: u32,
    pub value: Option<f64>,
    pub date: Option<NaiveDate>,
    pub province: TextField,
    pub sex: SexField,
    pub activity: TextField,
}

impl CleanRecord {
    /// The tuple uniquely identifying one observation after cleaning.
    pub fn dedup_key(&self) -> (u32, String, i32, u32) {
        (
            self.table,
            self.series_code.clone(),
            self.year,
            self.period_id,
        )
    }
}

/// A cleaned observation enriched with derived reporting columns.
#[derive(Debug, Clone)]
pub struct FeatureRecord {
    pub clean: CleanRecord,
    pub quarter_label: Option<String>,
    pub month: Option<u32>,
    pub year_derived: Option<i32>,
    pub period_display: &'static str,
    pub source_name: Option<&'static str>,
    pub is_national: bool,
    pub region: String,
}
