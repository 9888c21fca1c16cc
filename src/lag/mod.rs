//! # Lag estimation between two ground tracks
//!
//! Given a window of interest on spacecraft A, find when spacecraft B occupies the same
//! point of its ground track. Two estimators are provided:
//!
//! * [`latitude`] – coarse lag from the in-track separation, sign chosen by comparing
//!   latitudes, then refined to the exact time difference of two matched samples.
//! * [`invariant`] – matches the window bounds in magnetic invariant-coordinate (L-shell)
//!   space, returning a mutually consistent pair of windows.
//!
//! ## Sign convention
//!
//! Every lag in this module is the offset of B relative to A, `lag = t_B − t_A`: a
//! positive lag means B passes the same track point later than A.
pub mod invariant;
pub mod latitude;

use hifitime::Epoch;

use crate::constants::Seconds;
use crate::lap_errors::LapError;
use crate::time::{first_index_after, seconds_between};

/// Closed time window `[start, end]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimeWindow {
    pub start: Epoch,
    pub end: Epoch,
}

impl TimeWindow {
    pub fn new(start: Epoch, end: Epoch) -> Self {
        TimeWindow { start, end }
    }

    /// Signed length of the window in seconds.
    pub fn duration_s(&self) -> Seconds {
        seconds_between(self.start, self.end)
    }

    pub fn contains(&self, t: Epoch) -> bool {
        self.start <= t && t <= self.end
    }

    /// Index range of the ascending `epochs` falling inside the window.
    pub fn index_range(&self, epochs: &[Epoch]) -> std::ops::Range<usize> {
        let lo = epochs.partition_point(|e| *e < self.start);
        let hi = epochs.partition_point(|e| *e <= self.end);
        lo..hi.max(lo)
    }
}

/// Zeroth-order, unsigned lag: separation at the first sample after `start` divided by
/// the ground-track speed.
///
/// Arguments
/// -----------------
/// * `epochs`, `distance_km`: the separation series (any distance column).
/// * `start`: beginning of the window of interest.
/// * `ground_track_speed`: km/s.
///
/// Return
/// ----------
/// * `(index, lag_s)` of the separation sample used.
/// * `Err(LapError::NoSampleInWindow)` when no separation sample follows `start`.
/// * `Err(LapError::NonFiniteOffset)` when the distance or the speed yields a NaN or
///   infinite lag.
pub fn coarse_lag(
    epochs: &[Epoch],
    distance_km: &[f64],
    start: Epoch,
    ground_track_speed: f64,
) -> Result<(usize, Seconds), LapError> {
    signed_coarse_lag(epochs, distance_km, start, ground_track_speed)
        .map(|(idx, lag_s)| (idx, lag_s.abs()))
}

/// Same as [`coarse_lag`] keeping the sign of the distance.
///
/// Fed with the in-track column (positive when A leads), the result follows the
/// `t_B − t_A` convention.
pub fn signed_coarse_lag(
    epochs: &[Epoch],
    distance_km: &[f64],
    start: Epoch,
    ground_track_speed: f64,
) -> Result<(usize, Seconds), LapError> {
    if epochs.len() != distance_km.len() {
        return Err(LapError::ShapeMismatch {
            context: "coarse lag separation",
            left: epochs.len(),
            right: distance_km.len(),
        });
    }
    let idx = first_index_after(epochs, start)
        .ok_or_else(|| LapError::NoSampleInWindow(format!("separation after {start}")))?;
    let lag_s = distance_km[idx] / ground_track_speed;
    if !lag_s.is_finite() {
        return Err(LapError::NonFiniteOffset(format!(
            "coarse lag = {} km / {ground_track_speed} km/s",
            distance_km[idx]
        )));
    }
    Ok((idx, lag_s))
}

/// Index of the value nearest `target`, ignoring NaN entries.
pub(crate) fn nearest_index(values: &[f64], target: f64) -> Option<usize> {
    values
        .iter()
        .enumerate()
        .filter(|(_, v)| !v.is_nan())
        .min_by(|(_, x), (_, y)| (*x - target).abs().total_cmp(&(*y - target).abs()))
        .map(|(i, _)| i)
}

#[cfg(test)]
mod lag_test {
    use super::*;
    use crate::time::shift_epoch;

    #[test]
    fn test_coarse_lag() {
        let t0 = Epoch::from_gregorian_utc_at_midnight(2018, 3, 26);
        let epochs: Vec<Epoch> = (0..4).map(|i| shift_epoch(t0, 10.0 * i as f64)).collect();
        let d = [750.0, -1500.0, 2250.0, 3000.0];

        assert_eq!(coarse_lag(&epochs, &d, t0, 7.5).unwrap(), (1, 200.0));
        assert_eq!(
            coarse_lag(&epochs, &d, shift_epoch(t0, 25.0), 7.5).unwrap(),
            (3, 400.0)
        );
        assert!(matches!(
            coarse_lag(&epochs, &d, shift_epoch(t0, 30.0), 7.5),
            Err(LapError::NoSampleInWindow(_))
        ));
    }

    #[test]
    fn test_signed_and_non_finite_coarse_lag() {
        let t0 = Epoch::from_gregorian_utc_at_midnight(2018, 3, 26);
        let epochs: Vec<Epoch> = (0..3).map(|i| shift_epoch(t0, 10.0 * i as f64)).collect();

        let d = [0.0, -1500.0, 750.0];
        assert_eq!(signed_coarse_lag(&epochs, &d, t0, 7.5).unwrap(), (1, -200.0));

        let nan = [f64::NAN; 3];
        assert!(matches!(
            coarse_lag(&epochs, &nan, t0, 7.5),
            Err(LapError::NonFiniteOffset(_))
        ));
        assert!(matches!(
            coarse_lag(&epochs, &d, t0, 0.0),
            Err(LapError::NonFiniteOffset(_))
        ));
    }

    #[test]
    fn test_nearest_index_skips_nan() {
        let values = [f64::NAN, 3.0, 4.9, f64::NAN, 5.2];
        assert_eq!(nearest_index(&values, 5.0), Some(2));
        assert_eq!(nearest_index(&values, -10.0), Some(1));
        assert_eq!(nearest_index(&[f64::NAN], 1.0), None);
        assert_eq!(nearest_index(&[], 1.0), None);
    }

    #[test]
    fn test_window_index_range() {
        let t0 = Epoch::from_gregorian_utc_at_midnight(2018, 3, 26);
        let epochs: Vec<Epoch> = (0..10).map(|i| shift_epoch(t0, i as f64)).collect();
        let w = TimeWindow::new(shift_epoch(t0, 2.0), shift_epoch(t0, 4.5));
        assert_eq!(w.index_range(&epochs), 2..5);
        assert!(w.contains(shift_epoch(t0, 4.5)));
        assert_eq!(w.duration_s(), 2.5);

        let reversed = TimeWindow::new(shift_epoch(t0, 4.0), shift_epoch(t0, 2.0));
        assert!(reversed.index_range(&epochs).is_empty());
    }
}
