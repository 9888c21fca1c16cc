//! Separation series CSV files.
//!
//! ```text
//! dateTime,dist_total [km],dist_in_track [km],dist_cross_track [km],dist_straight [km],L_FU3,L_FU4
//! 2018-12-10T00:00:00 UTC,412.7,-398.2,108.4,412.1,4.51,4.62
//! ```
//!
//! Every column that is neither the time nor a distance column is read back as a named
//! attribute.
use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;
use std::sync::LazyLock;

use regex::Regex;

use crate::io::{find_column, find_optional_column, parse_field, text_field};
use crate::lap_errors::LapError;
use crate::separation::SeparationSeries;
use crate::time::parse_epoch;

pub const TIME_HEADER: &str = "dateTime";
pub const TOTAL_HEADER: &str = "dist_total [km]";
pub const IN_TRACK_HEADER: &str = "dist_in_track [km]";
pub const CROSS_TRACK_HEADER: &str = "dist_cross_track [km]";
pub const STRAIGHT_HEADER: &str = "dist_straight [km]";

static TIME_COL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^(date\s*time|time|epoch)").expect("valid regex"));
static TOTAL_COL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^dist_total").expect("valid regex"));
static IN_TRACK_COL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^dist_in_track").expect("valid regex"));
static CROSS_TRACK_COL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^dist_cross_track").expect("valid regex"));
static STRAIGHT_COL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^dist_straight").expect("valid regex"));

/// Write a separation series, attribute columns last.
pub fn write_separation<W: Write>(writer: W, series: &SeparationSeries) -> Result<(), LapError> {
    let mut wtr = csv::Writer::from_writer(writer);

    let mut header = vec![
        TIME_HEADER.to_string(),
        TOTAL_HEADER.to_string(),
        IN_TRACK_HEADER.to_string(),
        CROSS_TRACK_HEADER.to_string(),
        STRAIGHT_HEADER.to_string(),
    ];
    header.extend(series.attributes().iter().map(|(name, _)| name.clone()));
    wtr.write_record(&header)?;

    for (idx, rec) in series.records().enumerate() {
        let sep = rec.separation;
        let mut row = vec![
            rec.epoch.to_string(),
            sep.total_km.to_string(),
            sep.in_track_km.to_string(),
            sep.cross_track_km.to_string(),
            sep.straight_km.to_string(),
        ];
        row.extend(series.attributes().iter().map(|(_, values)| values[idx].to_string()));
        wtr.write_record(&row)?;
    }
    wtr.flush()?;
    Ok(())
}

pub fn write_separation_csv(
    path: impl AsRef<Path>,
    series: &SeparationSeries,
) -> Result<(), LapError> {
    write_separation(File::create(path)?, series)
}

/// Read a separation series.
///
/// Files without a `dist_total` column get the total rebuilt as
/// `sqrt(in_track² + cross_track²)`; a missing `dist_straight` column is read as NaN.
pub fn read_separation<R: Read>(reader: R) -> Result<SeparationSeries, LapError> {
    let mut rdr = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);
    let headers = rdr.headers()?.clone();

    let time = find_column(&headers, &TIME_COL, "time")?;
    let in_track = find_column(&headers, &IN_TRACK_COL, "in-track distance")?;
    let cross_track = find_column(&headers, &CROSS_TRACK_COL, "cross-track distance")?;
    let total = find_optional_column(&headers, &TOTAL_COL);
    let straight = find_optional_column(&headers, &STRAIGHT_COL);

    let known = [Some(time), Some(in_track), Some(cross_track), total, straight];
    let attr_cols: Vec<(usize, String)> = headers
        .iter()
        .enumerate()
        .filter(|(i, _)| !known.contains(&Some(*i)))
        .map(|(i, h)| (i, h.to_string()))
        .collect();

    let mut epochs = Vec::new();
    let (mut d_total, mut d_in, mut d_cross, mut d_straight) =
        (Vec::new(), Vec::new(), Vec::new(), Vec::new());
    let mut attr_values: Vec<Vec<f64>> = vec![Vec::new(); attr_cols.len()];

    for record in rdr.records() {
        let record = record?;
        epochs.push(parse_epoch(text_field(&record, time)?)?);
        let i = parse_field(&record, in_track)?;
        let c = parse_field(&record, cross_track)?;
        d_in.push(i);
        d_cross.push(c);
        d_total.push(match total {
            Some(col) => parse_field(&record, col)?,
            None => i.hypot(c),
        });
        d_straight.push(match straight {
            Some(col) => parse_field(&record, col)?,
            None => f64::NAN,
        });
        for ((col, _), values) in attr_cols.iter().zip(attr_values.iter_mut()) {
            values.push(parse_field(&record, *col)?);
        }
    }

    let mut series = SeparationSeries::new(epochs, d_total, d_in, d_cross, d_straight)?;
    for ((_, name), values) in attr_cols.into_iter().zip(attr_values) {
        series = series.with_attribute(name, values)?;
    }
    Ok(series)
}

pub fn read_separation_csv(path: impl AsRef<Path>) -> Result<SeparationSeries, LapError> {
    read_separation(File::open(path)?)
}
