//! Recurrence of lapping events.
//!
//! Two spacecraft on slightly different orbits lap each other periodically; the spacing
//! between successive event starts measures that period. [`RevisitStats`] summarizes the
//! distribution of those spacings.
use std::fmt;

use itertools::Itertools;

use crate::constants::Seconds;
use crate::intervals::LappingEvent;
use crate::time::seconds_between;

/// Seconds elapsed between the starts of successive events.
pub fn revisit_intervals(events: &[LappingEvent]) -> Vec<Seconds> {
    events
        .iter()
        .tuple_windows()
        .map(|(prev, next)| seconds_between(prev.start, next.start))
        .collect()
}

/// Summary statistics of the spacing between successive lapping events.
///
/// Percentiles use the *nearest-rank* method: index `round(q × (N-1))` of the sorted
/// intervals.
///
/// Display
/// -----------------
/// * `format!("{}", stats)` – compact single line.
/// * `format!("{:#}", stats)` – multi-line table.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RevisitStats {
    pub count: usize,
    pub min: Seconds,
    pub p25: Seconds,
    pub median: Seconds,
    pub max: Seconds,
    pub mean: Seconds,
}

impl RevisitStats {
    /// `None` when fewer than two events are given.
    pub fn from_events(events: &[LappingEvent]) -> Option<Self> {
        Self::from_intervals(&revisit_intervals(events))
    }

    pub fn from_intervals(intervals: &[Seconds]) -> Option<Self> {
        if intervals.is_empty() {
            return None;
        }
        let mut sorted = intervals.to_vec();
        sorted.sort_by(|a, b| a.total_cmp(b));

        let n = sorted.len();
        let rank = |q: f64| sorted[((q * (n - 1) as f64).round() as usize).min(n - 1)];

        Some(RevisitStats {
            count: n,
            min: sorted[0],
            p25: rank(0.25),
            median: rank(0.5),
            max: sorted[n - 1],
            mean: sorted.iter().sum::<f64>() / n as f64,
        })
    }
}

impl fmt::Display for RevisitStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if f.alternate() {
            writeln!(f, "Time between lapping events (s)")?;
            writeln!(f, "-------------------------------")?;
            writeln!(f, "count  : {}", self.count)?;
            writeln!(f, "min    : {:.1}", self.min)?;
            writeln!(f, "p25    : {:.1}", self.p25)?;
            writeln!(f, "median : {:.1}", self.median)?;
            writeln!(f, "max    : {:.1}", self.max)?;
            write!(f, "mean   : {:.1}", self.mean)
        } else {
            write!(
                f,
                "count={}, min={:.1}s, p25={:.1}s, median={:.1}s, max={:.1}s, mean={:.1}s",
                self.count, self.min, self.p25, self.median, self.max, self.mean
            )
        }
    }
}

#[cfg(test)]
mod revisit_test {
    use hifitime::Epoch;

    use super::*;
    use crate::time::shift_epoch;

    fn event_at(t: Epoch) -> LappingEvent {
        LappingEvent {
            start: t,
            end: shift_epoch(t, 60.0),
            duration_s: 60.0,
            min_separation_km: 100.0,
            min_index: 0,
            start_index: 0,
            end_index: 0,
            nudged: true,
            attributes: Vec::new(),
        }
    }

    #[test]
    fn test_intervals_and_stats() {
        let t0 = Epoch::from_gregorian_utc_at_midnight(2018, 4, 11);
        let events: Vec<LappingEvent> = [0.0, 30000.0, 61000.0, 92000.0, 124000.0]
            .iter()
            .map(|&s| event_at(shift_epoch(t0, s)))
            .collect();

        assert_eq!(
            revisit_intervals(&events),
            vec![30000.0, 31000.0, 31000.0, 32000.0]
        );

        let stats = RevisitStats::from_events(&events).unwrap();
        assert_eq!(stats.count, 4);
        assert_eq!(stats.min, 30000.0);
        assert_eq!(stats.median, 31000.0);
        assert_eq!(stats.max, 32000.0);
        assert_eq!(stats.mean, 31000.0);
        assert!(format!("{stats}").starts_with("count=4, min=30000.0s"));
        assert!(format!("{stats:#}").contains("median : 31000.0"));
    }

    #[test]
    fn test_not_enough_events() {
        let t0 = Epoch::from_gregorian_utc_at_midnight(2018, 4, 11);
        assert_eq!(RevisitStats::from_events(&[]), None);
        assert_eq!(RevisitStats::from_events(&[event_at(t0)]), None);
    }
}
