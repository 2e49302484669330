//! Grammar for the population-by-activity table.
//!
//! Labels read "sex. province. total. activity", except national
//! aggregates which lead with "total nacional. sex. total. activity".

use super::{ParsedDims, SeriesError};
use crate::cleaning::canon::{canon_province, canon_sex, title_case};
use crate::model::Sex;

pub(super) fn parse(segments: &[&str]) -> Result<ParsedDims, SeriesError> {
    if segments.len() < 4 {
        return Err(SeriesError::TooFewSegments {
            expected: 4,
            found: segments.len(),
        });
    }

    if segments[0] == "total nacional" {
        return Ok(ParsedDims {
            province: "Total Nacional".to_string(),
            sex: sex_segment(segments[1])?,
            activity: title_case(segments[3]),
        });
    }

    Ok(ParsedDims {
        province: canon_province(segments[1]),
        sex: sex_segment(segments[0])?,
        activity: title_case(segments[3]),
    })
}

fn sex_segment(segment: &str) -> Result<Sex, SeriesError> {
    canon_sex(segment).ok_or_else(|| SeriesError::UnrecognizedSex(segment.to_string()))
}
