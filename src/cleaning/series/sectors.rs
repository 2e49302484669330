//! Grammar for the employment-by-sector table.
//!
//! Labels lead with the province ("madrid. ocupados. industria.") or with
//! "ocupados" for the national aggregate. Sex is never encoded here.

use super::{ParsedDims, SeriesError};
use crate::cleaning::canon::{canon_province, title_case};
use crate::model::Sex;

const SECTOR_KEYWORDS: [&str; 5] = [
    "agricultura",
    "industria",
    "construcción",
    "servicios",
    "total cnae",
];

pub(super) fn parse(segments: &[&str]) -> Result<ParsedDims, SeriesError> {
    let first = segments.first().ok_or(SeriesError::TooFewSegments {
        expected: 1,
        found: 0,
    })?;

    let province = if *first == "ocupados" {
        "Total Nacional".to_string()
    } else {
        canon_province(first)
    };

    let sector = segments
        .iter()
        .copied()
        .find(|s| SECTOR_KEYWORDS.contains(s))
        .map(title_case)
        .unwrap_or_else(|| "Total".to_string());

    Ok(ParsedDims {
        province,
        sex: Sex::AmbosSexos,
        activity: format!("Ocupados - {sector}"),
    })
}
