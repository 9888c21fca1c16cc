//! # Lapping-event extraction
//!
//! Turns a separation time series into discrete **lapping events**: maximal runs of
//! consecutive samples whose separation magnitude is strictly below a threshold.
//!
//! ## Algorithm
//! -----------------
//! 1. `S` = ascending indices where `|d[i]| < threshold`.
//! 2. `S` is split wherever two neighbours are not exactly one apart; each piece is a run
//!    `[start, end]` (inclusive). Runs are disjoint and chronological by construction.
//! 3. For each run, the minimum `|d|` over the closed range and the first index reaching
//!    it are recorded; auxiliary columns are read at that index.
//! 4. An event whose end time equals its start time (single sample, or duplicated time
//!    stamps) has its end moved forward by a configurable nudge so that every event has a
//!    strictly positive duration. The nudge is a boundary-smoothing rule with no physical
//!    meaning.
//!
//! ## Edge cases
//! -----------------
//! * Empty series, `threshold ≤ 0` or a NaN threshold → no event.
//! * A NaN distance never compares below the threshold: it ends the current run, so the
//!   sample just outside an event is either at or above the threshold, or NaN.
//! * Single-sample runs are kept.
//! * Length mismatch between times, distances or any attribute column →
//!   [`LapError::ShapeMismatch`].
//!
//! Modules
//! -----------------
//! * [`revisit`] – statistics on the time between successive events.
pub mod revisit;

use hifitime::Epoch;
use itertools::Itertools;
use tracing::debug;

use crate::constants::{Kilometer, Seconds};
use crate::lap_errors::LapError;
use crate::params::LapParams;
use crate::separation::SeparationSeries;
use crate::time::{seconds_between, try_shift_epoch};

/// Distance column of a [`SeparationSeries`] used for thresholding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DistanceMetric {
    /// Great-circle separation.
    #[default]
    Total,
    /// `sqrt(in_track² + cross_track²)`.
    Combined,
    /// Signed in-track component (its magnitude is thresholded).
    InTrack,
    /// Straight-line chord.
    StraightLine,
}

impl DistanceMetric {
    fn column(&self, series: &SeparationSeries) -> Vec<Kilometer> {
        match self {
            DistanceMetric::Total => series.total_km().to_vec(),
            DistanceMetric::Combined => series.combined_km(),
            DistanceMetric::InTrack => series.in_track_km().to_vec(),
            DistanceMetric::StraightLine => series.straight_km().to_vec(),
        }
    }
}

/// One contiguous below-threshold interval.
#[derive(Debug, Clone, PartialEq)]
pub struct LappingEvent {
    pub start: Epoch,
    /// End time, nudged forward for zero-duration events.
    pub end: Epoch,
    pub duration_s: Seconds,
    /// Smallest `|d|` in `[start_index, end_index]`.
    pub min_separation_km: Kilometer,
    /// Index (into the separation series) of the minimum.
    pub min_index: usize,
    pub start_index: usize,
    pub end_index: usize,
    /// Whether the end time was moved by the degenerate-event nudge.
    pub nudged: bool,
    /// `(name, value)` of each auxiliary column at `min_index`.
    pub attributes: Vec<(String, f64)>,
}

impl LappingEvent {
    pub fn duration_min(&self) -> f64 {
        self.duration_s / 60.0
    }

    pub fn attribute(&self, name: &str) -> Option<f64> {
        self.attributes
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| *v)
    }

    /// Number of separation samples in the event.
    pub fn sample_count(&self) -> usize {
        self.end_index - self.start_index + 1
    }
}

/// Extracts [`LappingEvent`]s from a separation series.
#[derive(Debug, Clone, Copy)]
pub struct IntervalExtractor {
    threshold_km: Kilometer,
    nudge_s: Seconds,
}

impl Default for IntervalExtractor {
    fn default() -> Self {
        Self::new(&LapParams::default())
    }
}

impl IntervalExtractor {
    pub fn new(params: &LapParams) -> Self {
        IntervalExtractor {
            threshold_km: params.threshold_km,
            nudge_s: params.degenerate_nudge_s,
        }
    }

    /// Extract events from a [`SeparationSeries`], reading every attribute column the
    /// series carries at each event's minimum.
    pub fn extract_series(
        &self,
        series: &SeparationSeries,
        metric: DistanceMetric,
    ) -> Result<Vec<LappingEvent>, LapError> {
        self.extract_with_attributes(series.epochs(), &metric.column(series), series.attributes())
    }

    /// Extract events from raw columns, without auxiliary attributes.
    pub fn extract(
        &self,
        epochs: &[Epoch],
        distance_km: &[f64],
    ) -> Result<Vec<LappingEvent>, LapError> {
        self.extract_with_attributes(epochs, distance_km, &[])
    }

    /// Extract events and look up `attributes` at each event's minimum.
    ///
    /// Arguments
    /// -----------------
    /// * `epochs`: ascending sample times of the separation series.
    /// * `distance_km`: separation per sample; its magnitude is compared to the threshold.
    /// * `attributes`: named columns aligned with the series (e.g. each spacecraft's L).
    ///
    /// Return
    /// ----------
    /// * Chronological, disjoint events.
    /// * `Err(LapError::ShapeMismatch)` when any column length differs from `epochs`.
    /// * `Err(LapError::NonFiniteOffset)` when a zero-duration event meets a NaN or
    ///   infinite nudge.
    pub fn extract_with_attributes(
        &self,
        epochs: &[Epoch],
        distance_km: &[f64],
        attributes: &[(String, Vec<f64>)],
    ) -> Result<Vec<LappingEvent>, LapError> {
        if distance_km.len() != epochs.len() {
            return Err(LapError::ShapeMismatch {
                context: "interval distances",
                left: epochs.len(),
                right: distance_km.len(),
            });
        }
        if let Some((_, col)) = attributes.iter().find(|(_, col)| col.len() != epochs.len()) {
            return Err(LapError::ShapeMismatch {
                context: "interval attribute",
                left: epochs.len(),
                right: col.len(),
            });
        }
        if self.threshold_km.is_nan() || self.threshold_km <= 0.0 {
            return Ok(Vec::new());
        }

        let below = distance_km
            .iter()
            .positions(|d| d.abs() < self.threshold_km);

        // consecutive indices share the same `index − rank` key
        let runs = below.enumerate().chunk_by(|(rank, idx)| idx - rank);

        let events = runs
            .into_iter()
            .filter_map(|(_, mut run)| {
                let (_, start_index) = run.next()?;
                let end_index = run.last().map_or(start_index, |(_, idx)| idx);
                Some(self.summarize(epochs, distance_km, attributes, start_index, end_index))
            })
            .collect::<Result<Vec<_>, _>>()?;

        debug!(
            samples = epochs.len(),
            threshold_km = self.threshold_km,
            events = events.len(),
            "lapping events extracted"
        );
        Ok(events)
    }

    fn summarize(
        &self,
        epochs: &[Epoch],
        distance_km: &[f64],
        attributes: &[(String, Vec<f64>)],
        start_index: usize,
        end_index: usize,
    ) -> Result<LappingEvent, LapError> {
        // closed range: a single-sample run still has one element
        let (offset, min_separation_km) = distance_km[start_index..=end_index]
            .iter()
            .map(|d| d.abs())
            .enumerate()
            .fold((0, f64::INFINITY), |best, (k, d)| if d < best.1 { (k, d) } else { best });
        let min_index = start_index + offset;

        let start = epochs[start_index];
        let mut end = epochs[end_index];
        let nudged = end == start;
        if nudged {
            end = try_shift_epoch(end, self.nudge_s, "degenerate nudge")?;
        }

        Ok(LappingEvent {
            start,
            end,
            duration_s: seconds_between(start, end),
            min_separation_km,
            min_index,
            start_index,
            end_index,
            nudged,
            attributes: attributes
                .iter()
                .map(|(name, col)| (name.clone(), col[min_index]))
                .collect(),
        })
    }
}

#[cfg(test)]
mod interval_test {
    use super::*;
    use crate::time::shift_epoch;

    fn epochs(n: usize) -> Vec<Epoch> {
        let t0 = Epoch::from_gregorian_utc_at_midnight(2018, 4, 11);
        (0..n).map(|i| shift_epoch(t0, 10.0 * i as f64)).collect()
    }

    #[test]
    fn test_reference_series() {
        let d = [600.0, 600.0, 400.0, 300.0, 300.0, 600.0, 200.0, 600.0];
        let t = epochs(d.len());
        let events = IntervalExtractor::default().extract(&t, &d).unwrap();

        assert_eq!(events.len(), 2);
        assert_eq!((events[0].start_index, events[0].end_index), (2, 4));
        assert_eq!(events[0].min_separation_km, 300.0);
        assert_eq!(events[0].min_index, 3);
        assert_eq!(events[0].duration_s, 20.0);
        assert!(!events[0].nudged);

        assert_eq!((events[1].start_index, events[1].end_index), (6, 6));
        assert_eq!(events[1].min_separation_km, 200.0);
        assert!(events[1].nudged);
        assert_eq!(events[1].duration_s, 60.0);
        assert_eq!(events[1].sample_count(), 1);
    }

    #[test]
    fn test_empty_and_non_positive_threshold() {
        let extractor = IntervalExtractor::default();
        assert!(extractor.extract(&[], &[]).unwrap().is_empty());

        let t = epochs(3);
        let d = [-10.0, 0.0, 10.0];
        let zero = IntervalExtractor::new(&LapParams::builder().threshold_km(0.0).build().unwrap());
        assert!(zero.extract(&t, &d).unwrap().is_empty());
        let negative = IntervalExtractor::new(&LapParams {
            threshold_km: -5.0,
            ..LapParams::default()
        });
        assert!(negative.extract(&t, &d).unwrap().is_empty());
    }

    #[test]
    fn test_all_below_is_one_event() {
        let d = [100.0, -50.0, 20.0, 499.9];
        let t = epochs(d.len());
        let events = IntervalExtractor::default().extract(&t, &d).unwrap();
        assert_eq!(events.len(), 1);
        assert_eq!((events[0].start_index, events[0].end_index), (0, 3));
        assert_eq!(events[0].min_separation_km, 20.0);
        assert_eq!(events[0].start, t[0]);
        assert_eq!(events[0].end, t[3]);
    }

    #[test]
    fn test_threshold_is_strict_and_nan_ignored() {
        let d = [500.0, 499.0, f64::NAN, 499.0];
        let t = epochs(d.len());
        let events = IntervalExtractor::default().extract(&t, &d).unwrap();
        assert_eq!(events.len(), 2);
        assert_eq!(events[0].start_index, 1);
        assert_eq!(events[1].start_index, 3);
    }

    #[test]
    fn test_attributes_at_minimum() {
        let d = [600.0, 450.0, 120.0, 480.0];
        let t = epochs(d.len());
        let attrs = vec![
            ("L_FU3".to_string(), vec![3.0, 4.0, 5.0, 6.0]),
            ("L_ELFIN_A".to_string(), vec![3.5, 4.5, 5.5, 6.5]),
        ];
        let events = IntervalExtractor::default()
            .extract_with_attributes(&t, &d, &attrs)
            .unwrap();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].attribute("L_FU3"), Some(5.0));
        assert_eq!(events[0].attribute("L_ELFIN_A"), Some(5.5));
        assert_eq!(events[0].attribute("MLT"), None);
    }

    #[test]
    fn test_shape_mismatch() {
        let t = epochs(3);
        assert_eq!(
            IntervalExtractor::default().extract(&t, &[1.0, 2.0]),
            Err(LapError::ShapeMismatch {
                context: "interval distances",
                left: 3,
                right: 2
            })
        );
        let attrs = vec![("L".to_string(), vec![1.0])];
        assert!(IntervalExtractor::default()
            .extract_with_attributes(&t, &[1.0, 2.0, 3.0], &attrs)
            .is_err());
    }

    #[test]
    fn test_duplicate_epochs_nudged() {
        let t0 = Epoch::from_gregorian_utc_at_midnight(2018, 4, 11);
        let t = vec![t0, t0, shift_epoch(t0, 10.0)];
        let d = [100.0, 90.0, 600.0];
        let extractor = IntervalExtractor::new(&LapParams {
            degenerate_nudge_s: 5.0,
            ..LapParams::default()
        });
        let events = extractor.extract(&t, &d).unwrap();
        assert_eq!(events.len(), 1);
        assert!(events[0].nudged);
        assert_eq!(events[0].duration_s, 5.0);
        assert_eq!(events[0].min_index, 1);
    }

    #[test]
    fn test_nan_breaks_runs() {
        let d = [100.0, f64::NAN, 100.0, 600.0];
        let t = epochs(d.len());
        let events = IntervalExtractor::default().extract(&t, &d).unwrap();
        assert_eq!(events.len(), 2);
        assert_eq!((events[0].start_index, events[0].end_index), (0, 0));
        assert_eq!((events[1].start_index, events[1].end_index), (2, 2));
    }

    #[test]
    fn test_non_finite_nudge_is_an_error() {
        let t = epochs(3);
        let extractor = IntervalExtractor::new(&LapParams {
            degenerate_nudge_s: f64::NAN,
            ..LapParams::default()
        });
        let err = extractor.extract(&t, &[100.0, 600.0, 600.0]).unwrap_err();
        assert!(matches!(err, LapError::NonFiniteOffset(_)));
        // longer events never read the nudge
        assert_eq!(extractor.extract(&t, &[100.0, 100.0, 600.0]).unwrap().len(), 1);
    }
}
