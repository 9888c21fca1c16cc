//! Lapping-event tables.
//!
//! ```text
//! lapStartTime,lapEndTime,lapDuration [min],minDist [km],minIndex,L_FU3_at_min
//! 2018-12-10T00:06:12 UTC,2018-12-10T00:14:40 UTC,8.466666666666667,3.2,1012,4.4
//! ```
use std::fs::File;
use std::io::Write;
use std::path::Path;

use crate::intervals::LappingEvent;
use crate::lap_errors::LapError;

const FIXED_HEADER: [&str; 5] = [
    "lapStartTime",
    "lapEndTime",
    "lapDuration [min]",
    "minDist [km]",
    "minIndex",
];

/// Write one row per event. Attribute columns are named `<attribute>_at_min` after the
/// attributes of the first event; events without a given attribute get an empty field.
pub fn write_lap_times<W: Write>(writer: W, events: &[LappingEvent]) -> Result<(), LapError> {
    let mut wtr = csv::Writer::from_writer(writer);

    let attr_names: Vec<&str> = events
        .first()
        .map(|e| e.attributes.iter().map(|(n, _)| n.as_str()).collect())
        .unwrap_or_default();

    let header: Vec<String> = FIXED_HEADER
        .iter()
        .map(|h| h.to_string())
        .chain(attr_names.iter().map(|n| format!("{n}_at_min")))
        .collect();
    wtr.write_record(&header)?;

    for event in events {
        let mut row = vec![
            event.start.to_string(),
            event.end.to_string(),
            event.duration_min().to_string(),
            event.min_separation_km.to_string(),
            event.min_index.to_string(),
        ];
        row.extend(
            attr_names
                .iter()
                .map(|n| event.attribute(n).map(|v| v.to_string()).unwrap_or_default()),
        );
        wtr.write_record(&row)?;
    }
    wtr.flush()?;
    Ok(())
}

pub fn write_lap_times_csv(
    path: impl AsRef<Path>,
    events: &[LappingEvent],
) -> Result<(), LapError> {
    write_lap_times(File::create(path)?, events)
}
