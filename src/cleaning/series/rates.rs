//! Grammar for the rates table.
//!
//! Labels mix filler tokens with the rate name, a sex and a province in
//! no fixed order, e.g. "tasa de paro de la población. mujeres. madrid.".
//! The segment containing "tasa" is the indicator; the rest is scanned.

use super::{ParsedDims, SeriesError};
use crate::cleaning::canon::{canon_province, canon_sex};
use crate::model::Sex;

const FILLER: [&str; 2] = ["total", "personas"];

pub(super) fn parse(segments: &[&str]) -> Result<ParsedDims, SeriesError> {
    let rate = segments.iter().copied().find(|s| s.contains("tasa"));
    let activity = match rate {
        Some(r) => r
            .replace("tasa de ", "Tasa de ")
            .replace("la población", "la poblacion"),
        None => "Desconocida".to_string(),
    };

    let mut province = "Total Nacional".to_string();
    let mut sex = Sex::AmbosSexos;
    for seg in segments.iter().copied() {
        if Some(seg) == rate || FILLER.contains(&seg) {
            continue;
        }
        if let Some(parsed) = canon_sex(seg) {
            sex = parsed;
        } else if seg == "total nacional" {
            province = "Total Nacional".to_string();
        } else {
            province = canon_province(seg);
        }
    }

    Ok(ParsedDims {
        province,
        sex,
        activity,
    })
}

#[cfg(test)]
mod tests {
    use super::super::TableKind;
    use super::*;

    fn parse_label(label: &str) -> ParsedDims {
        TableKind::Rates.parse(label).unwrap()
    }

    #[test]
    fn test_full_label() {
        let dims = parse_label("tasa de paro de la población. mujeres. madrid.");
        assert_eq!(dims.activity, "Tasa de paro de la poblacion");
        assert_eq!(dims.sex, Sex::Mujeres);
        assert_eq!(dims.province, "Madrid");
    }

    #[test]
    fn test_filler_tokens_are_dropped() {
        let dims = parse_label("tasa de actividad. total. personas. sevilla.");
        assert_eq!(dims.activity, "Tasa de actividad");
        assert_eq!(dims.sex, Sex::AmbosSexos);
        assert_eq!(dims.province, "Sevilla");
    }

    #[test]
    fn test_defaults_when_only_the_rate_is_present() {
        let dims = parse_label("tasa de empleo.");
        assert_eq!(dims.province, "Total Nacional");
        assert_eq!(dims.sex, Sex::AmbosSexos);
    }

    #[test]
    fn test_national_aggregate() {
        let dims = parse_label("tasa de paro. hombres. total nacional.");
        assert_eq!(dims.province, "Total Nacional");
        assert_eq!(dims.sex, Sex::Hombres);
    }

    #[test]
    fn test_missing_rate_segment_yields_unknown_label() {
        let dims = parse_label("hombres. madrid.");
        assert_eq!(dims.activity, "Desconocida");
        assert_eq!(dims.sex, Sex::Hombres);
        assert_eq!(dims.province, "Madrid");
    }
}
