//! # CSV persistence
//!
//! Readers and writers for the files exchanged with the surrounding tooling. The core
//! never depends on them: every stage works on in-memory structures.
//!
//! Modules
//! -----------------
//! * [`ephemeris_file`] – header-driven readers for position ephemerides and magnetic
//!   ephemerides (position + L + MLT).
//! * [`separation_file`] – separation series with optional attribute columns.
//! * [`lap_times_file`] – lapping-event tables.
//!
//! Column detection
//! -----------------
//! Headers are matched by case-insensitive patterns after trimming, so `Time (ISO)`,
//! `dateTime`, `Lat (deg)` or ` Alt (km)` are all recognized. Unrecognized columns are
//! ignored by the ephemeris readers.
pub mod ephemeris_file;
pub mod lap_times_file;
pub mod separation_file;

use regex::Regex;

use crate::lap_errors::LapError;

/// Index of the first header matching `pattern`.
pub(crate) fn find_column(
    headers: &csv::StringRecord,
    pattern: &Regex,
    name: &str,
) -> Result<usize, LapError> {
    find_optional_column(headers, pattern).ok_or_else(|| LapError::MissingColumn(name.to_string()))
}

pub(crate) fn find_optional_column(headers: &csv::StringRecord, pattern: &Regex) -> Option<usize> {
    headers.iter().position(|h| pattern.is_match(h.trim()))
}

/// Parse the float at `col` of `record`, with the line number in the error.
pub(crate) fn parse_field(record: &csv::StringRecord, col: usize) -> Result<f64, LapError> {
    let line = record.position().map_or(0, |p| p.line());
    let raw = record
        .get(col)
        .ok_or_else(|| LapError::ParseError(format!("line {line}: missing field {col}")))?;
    raw.trim()
        .parse::<f64>()
        .map_err(|e| LapError::ParseError(format!("line {line}: '{raw}' is not a number ({e})")))
}

/// Raw text of the field at `col`.
pub(crate) fn text_field(record: &csv::StringRecord, col: usize) -> Result<&str, LapError> {
    record.get(col).ok_or_else(|| {
        let line = record.position().map_or(0, |p| p.line());
        LapError::ParseError(format!("line {line}: missing field {col}"))
    })
}

#[cfg(test)]
mod io_test {
    use super::*;

    #[test]
    fn test_find_column() {
        let headers = csv::StringRecord::from(vec!["Time (ISO)", " Lat (deg)", "Lon (deg)"]);
        let lat = Regex::new(r"(?i)^lat").unwrap();
        let alt = Regex::new(r"(?i)^alt").unwrap();
        assert_eq!(find_column(&headers, &lat, "latitude").unwrap(), 1);
        assert_eq!(
            find_column(&headers, &alt, "altitude"),
            Err(LapError::MissingColumn("altitude".into()))
        );
    }

    #[test]
    fn test_parse_field() {
        let record = csv::StringRecord::from(vec!["1.5", " -2 ", "abc"]);
        assert_eq!(parse_field(&record, 0).unwrap(), 1.5);
        assert_eq!(parse_field(&record, 1).unwrap(), -2.0);
        assert!(matches!(parse_field(&record, 2), Err(LapError::ParseError(_))));
        assert!(parse_field(&record, 5).is_err());
    }
}
