//! Tolerant coercion of the raw value and date encodings.
//!
//! Both parsers absorb malformed input as `None` rather than failing the
//! batch; only structural problems are fatal and they are handled upstream.

use chrono::{DateTime, NaiveDate};
use once_cell::sync::Lazy;
use regex::Regex;

/// Numeric coercion: comma decimal separators are replaced with dots.
/// Empty, unparseable and non-finite input all coerce to `None`.
pub fn parse_value(raw: &str) -> Option<f64> {
    let cleaned = raw.trim().replace(',', ".");
    if cleaned.is_empty() {
        return None;
    }
    match cleaned.parse::<f64>() {
        Ok(v) if v.is_finite() => Some(v),
        _ => None,
    }
}

/// The fixed textual formats, tried in this order. "01/02/2020" must
/// resolve day-first, so the order is part of the contract.
const DATE_FORMATS: [&str; 4] = ["%Y-%m-%d", "%d/%m/%Y", "%Y/%m/%d", "%b %d, %Y"];

/// Date parsing over the mixed encodings the source emits: epoch
/// milliseconds, four fixed textual formats, then a lenient day-first
/// fallback. Returns `None` when nothing matches.
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let val = raw.trim();
    if val.is_empty() || val == "<NA>" {
        return None;
    }

    if val.len() > 10 && val.bytes().all(|b| b.is_ascii_digit()) {
        if let Some(date) = val.parse::<i64>().ok().and_then(millis_to_date) {
            return Some(date);
        }
    }

    for fmt in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(val, fmt) {
            return Some(date);
        }
    }

    parse_date_lenient(val)
}

fn millis_to_date(millis: i64) -> Option<NaiveDate> {
    DateTime::from_timestamp_millis(millis).map(|dt| dt.date_naive())
}

static DATE_TOKENS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[A-Za-z]+|\d+").expect("valid token pattern"));

const MONTH_NAMES: [&str; 12] = [
    "jan", "feb", "mar", "apr", "may", "jun", "jul", "aug", "sep", "oct", "nov", "dec",
];

/// Last-resort parser for stray separators ("15.05.2023") and reordered
/// month names ("15 May 2023"). Day-first unless the leading token is a
/// 4-digit year.
fn parse_date_lenient(val: &str) -> Option<NaiveDate> {
    let tokens: Vec<&str> = DATE_TOKENS.find_iter(val).map(|m| m.as_str()).collect();
    if tokens.len() != 3 {
        return None;
    }

    if let Some(pos) = tokens.iter().position(|t| t.chars().all(char::is_alphabetic)) {
        let month = month_from_name(tokens[pos])?;
        let numeric: Vec<&str> = tokens
            .iter()
            .enumerate()
            .filter(|(i, _)| *i != pos)
            .map(|(_, t)| *t)
            .collect();
        let first: u32 = numeric[0].parse().ok()?;
        let second: u32 = numeric[1].parse().ok()?;
        let (day, year) = if numeric[0].len() == 4 {
            (second, first)
        } else {
            (first, second)
        };
        return NaiveDate::from_ymd_opt(expand_year(year), month, day);
    }

    let numbers: Vec<u32> = tokens
        .iter()
        .map(|t| t.parse().ok())
        .collect::<Option<Vec<u32>>>()?;
    if tokens[0].len() == 4 {
        return NaiveDate::from_ymd_opt(numbers[0] as i32, numbers[1], numbers[2]);
    }
    // Day-first, falling back to month-first for values like "05/15/2023".
    NaiveDate::from_ymd_opt(expand_year(numbers[2]), numbers[1], numbers[0])
        .or_else(|| NaiveDate::from_ymd_opt(expand_year(numbers[2]), numbers[0], numbers[1]))
}

fn month_from_name(name: &str) -> Option<u32> {
    let prefix = name.to_lowercase();
    MONTH_NAMES
        .iter()
        .position(|m| prefix.starts_with(m))
        .map(|i| i as u32 + 1)
}

fn expand_year(year: u32) -> i32 {
    if year < 100 {
        year as i32 + 2000
    } else {
        year as i32
    }
}
