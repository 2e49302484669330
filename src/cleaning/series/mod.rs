//! Series-name parsers, one grammar per source table.
//!
//! The INE encodes province, sex and indicator type inside the free-text
//! series name, with a different field order per table. Each grammar gets
//! its own module behind the closed [`TableKind`] dispatch.

mod population;
mod rates;
mod sectors;

use thiserror::Error;

use crate::model::Sex;

/// Structured dimensions decoded from one series label.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedDims {
    pub province: String,
    pub sex: Sex,
    pub activity: String,
}

#[derive(Debug, Error, PartialEq)]
pub enum SeriesError {
    #[error("expected at least {expected} segments, found {found}")]
    TooFewSegments { expected: usize, found: usize },

    #[error("unrecognized sex label: {0:?}")]
    UnrecognizedSex(String),
}

/// The closed set of tables whose series names we can decode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableKind {
    /// Table 65345: population 16+ by activity, sex and province.
    Population,
    /// Table 65349: activity/unemployment/employment rates.
    Rates,
    /// Table 65354: employment by economic sector.
    Sectors,
}

impl TableKind {
    pub fn from_id(table_id: u32) -> Option<Self> {
        match table_id {
            65345 => Some(TableKind::Population),
            65349 => Some(TableKind::Rates),
            65354 => Some(TableKind::Sectors),
            _ => None,
        }
    }

    /// Decode a lowercased series label with this table's grammar.
    pub fn parse(&self, label: &str) -> Result<ParsedDims, SeriesError> {
        let segments = segment(label);
        match self {
            TableKind::Population => population::parse(&segments),
            TableKind::Rates => rates::parse(&segments),
            TableKind::Sectors => sectors::parse(&segments),
        }
    }
}

/// Period-delimited segmentation with whitespace trimming. A trailing
/// period never yields an empty segment or leaks into the last one.
fn segment(label: &str) -> Vec<&str> {
    label
        .split('.')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect()
}
