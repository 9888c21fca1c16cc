//! Ephemeris and magnetic-ephemeris CSV readers.
//!
//! Expected layout (extra columns are ignored):
//!
//! ```text
//! Time (ISO),Lat (deg),Lon (deg),Alt (km)
//! 2018-04-11T00:00:00.000Z,52.1,-31.4,602.3
//! ```
//!
//! A magnetic ephemeris additionally carries an `L` (or `Lm`) column and optionally `MLT`.
use std::fs::File;
use std::io::Read;
use std::path::Path;
use std::sync::LazyLock;

use regex::Regex;

use crate::constants::INVARIANT_FILL_VALUE;
use crate::io::{find_column, find_optional_column, parse_field, text_field};
use crate::lap_errors::LapError;
use crate::time::parse_epoch;
use crate::trajectory::invariant::InvariantSeries;
use crate::trajectory::Trajectory;

static TIME_COL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^(time|date\s*time|epoch|utc)").expect("valid regex"));
static LAT_COL: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)^lat").expect("valid regex"));
static LON_COL: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)^lon").expect("valid regex"));
static ALT_COL: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)^alt").expect("valid regex"));
static L_COL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^(l|lm|l_?shell)(\s|\(|\[|$)").expect("valid regex"));
static MLT_COL: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)^mlt").expect("valid regex"));

struct Columns {
    time: usize,
    lat: usize,
    lon: usize,
    alt: usize,
}

impl Columns {
    fn locate(headers: &csv::StringRecord) -> Result<Self, LapError> {
        Ok(Columns {
            time: find_column(headers, &TIME_COL, "time")?,
            lat: find_column(headers, &LAT_COL, "latitude")?,
            lon: find_column(headers, &LON_COL, "longitude")?,
            alt: find_column(headers, &ALT_COL, "altitude")?,
        })
    }
}

/// Read a position ephemeris from any reader.
pub fn read_ephemeris<R: Read>(reader: R) -> Result<Trajectory, LapError> {
    let (trajectory, _, _) = read_columns(reader, false)?;
    Ok(trajectory)
}

/// Read a position ephemeris from a CSV file.
pub fn read_ephemeris_csv(path: impl AsRef<Path>) -> Result<Trajectory, LapError> {
    read_ephemeris(File::open(path)?)
}

/// Read a magnetic ephemeris: the trajectory and its invariant series.
///
/// A missing `MLT` column yields an MLT column of fill values.
pub fn read_magephem<R: Read>(reader: R) -> Result<(Trajectory, InvariantSeries), LapError> {
    let (trajectory, l, mlt) = read_columns(reader, true)?;
    let invariants = InvariantSeries::new(trajectory.epochs().to_vec(), l, mlt)?;
    Ok((trajectory, invariants))
}

/// Read a magnetic ephemeris from a CSV file.
pub fn read_magephem_csv(
    path: impl AsRef<Path>,
) -> Result<(Trajectory, InvariantSeries), LapError> {
    read_magephem(File::open(path)?)
}

fn read_columns<R: Read>(
    reader: R,
    with_invariants: bool,
) -> Result<(Trajectory, Vec<f64>, Vec<f64>), LapError> {
    let mut rdr = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);
    let headers = rdr.headers()?.clone();
    let cols = Columns::locate(&headers)?;
    let (l_col, mlt_col) = if with_invariants {
        (
            Some(find_column(&headers, &L_COL, "L")?),
            find_optional_column(&headers, &MLT_COL),
        )
    } else {
        (None, None)
    };

    let (mut epochs, mut lat, mut lon, mut alt) = (Vec::new(), Vec::new(), Vec::new(), Vec::new());
    let (mut l, mut mlt) = (Vec::new(), Vec::new());

    for record in rdr.records() {
        let record = record?;
        epochs.push(parse_epoch(text_field(&record, cols.time)?)?);
        lat.push(parse_field(&record, cols.lat)?);
        lon.push(parse_field(&record, cols.lon)?);
        alt.push(parse_field(&record, cols.alt)?);
        if let Some(c) = l_col {
            l.push(parse_field(&record, c)?);
            mlt.push(match mlt_col {
                Some(c) => parse_field(&record, c)?,
                None => INVARIANT_FILL_VALUE,
            });
        }
    }

    Ok((Trajectory::new(epochs, lat, lon, alt)?, l, mlt))
}

#[cfg(test)]
mod ephemeris_file_test {
    use hifitime::Epoch;

    use super::*;

    const EPHEM: &str = "\
Time (ISO), Lat (deg), Lon (deg), Alt (km), Speed (km/s)
2018-04-11T00:00:00.000Z,52.1,-31.4,602.3,7.6
2018-04-11T00:00:01.000Z,52.16,-31.38,602.2,7.6
";

    const MAGEPHEM: &str = "\
dateTime,Lat,Lon,Alt,Lm,MLT
2018-12-10 00:00:00,60.0,10.0,450.0,4.5,3.2
2018-12-10 00:00:01,60.1,10.0,450.0,-1e31,-1e31
";

    #[test]
    fn test_read_ephemeris() {
        let traj = read_ephemeris(EPHEM.as_bytes()).unwrap();
        assert_eq!(traj.len(), 2);
        assert_eq!(traj.lat(), &[52.1, 52.16]);
        assert_eq!(traj.alt()[1], 602.2);
        assert_eq!(
            traj.epochs()[1],
            Epoch::from_gregorian_utc_hms(2018, 4, 11, 0, 0, 1)
        );
    }

    #[test]
    fn test_read_magephem() {
        let (traj, inv) = read_magephem(MAGEPHEM.as_bytes()).unwrap();
        assert_eq!(traj.len(), 2);
        assert_eq!(inv.valid_l(0), Some(4.5));
        assert_eq!(inv.valid_l(1), None);
        assert_eq!(inv.mlt()[0], 3.2);
    }

    #[test]
    fn test_missing_columns() {
        let no_alt = "Time,Lat,Lon\n2018-04-11T00:00:00,1,2\n";
        assert_eq!(
            read_ephemeris(no_alt.as_bytes()),
            Err(LapError::MissingColumn("altitude".into()))
        );
        assert_eq!(
            read_magephem(EPHEM.as_bytes()).map(|_| ()),
            Err(LapError::MissingColumn("L".into()))
        );
    }

    #[test]
    fn test_bad_value() {
        let bad = "Time,Lat,Lon,Alt\n2018-04-11T00:00:00,north,2,500\n";
        assert!(matches!(
            read_ephemeris(bad.as_bytes()),
            Err(LapError::ParseError(_))
        ));
    }
}
