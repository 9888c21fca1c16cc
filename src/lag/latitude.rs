//! Latitude-matching lag estimator.
//!
//! ```text
//! 1. lag₀   = |d(first separation sample after start)| / ground_track_speed
//! 2. past   = first B sample after start − lag₀
//!    future = first B sample after start + lag₀
//!    keep whichever B latitude is closer to A's latitude at start (past on ties)
//! 3. lag    = t_B[chosen] − t_A[first A sample after start]
//! ```
//!
//! The B trajectory must extend at least `lag₀` on both sides of `start`, otherwise the
//! estimator fails with [`LapError::NoSampleInWindow`].
use hifitime::Epoch;
use tracing::debug;

use crate::constants::Seconds;
use crate::lag::coarse_lag;
use crate::lap_errors::LapError;
use crate::params::LapParams;
use crate::separation::SeparationSeries;
use crate::time::{first_index_after, seconds_between, try_shift_epoch};
use crate::trajectory::Trajectory;

/// Side of the window start on which the matching B sample was found.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchSide {
    Past,
    Future,
}

/// Outcome of [`LatitudeLagEstimator::estimate`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LatitudeLag {
    /// Unsigned zeroth-order estimate (s).
    pub coarse_lag_s: Seconds,
    /// Refined signed lag `t_B − t_A` (s).
    pub lag_s: Seconds,
    /// A sample matched at the window start.
    pub a_index: usize,
    /// B sample at the same latitude.
    pub b_index: usize,
    pub side: MatchSide,
}

#[derive(Debug, Clone, Copy)]
pub struct LatitudeLagEstimator {
    ground_track_speed: f64,
}

impl Default for LatitudeLagEstimator {
    fn default() -> Self {
        Self::new(&LapParams::default())
    }
}

impl LatitudeLagEstimator {
    pub fn new(params: &LapParams) -> Self {
        LatitudeLagEstimator {
            ground_track_speed: params.ground_track_speed,
        }
    }

    /// Estimate the lag of `b` relative to `a` at `start`, using the in-track column of
    /// `separation` for the coarse estimate.
    pub fn estimate(
        &self,
        a: &Trajectory,
        b: &Trajectory,
        separation: &SeparationSeries,
        start: Epoch,
    ) -> Result<LatitudeLag, LapError> {
        self.estimate_with_distance(a, b, separation.epochs(), separation.in_track_km(), start)
    }

    /// Same as [`estimate`](Self::estimate) with an explicit distance column.
    ///
    /// Arguments
    /// -----------------
    /// * `a`, `b`: the two trajectories, each at its native cadence.
    /// * `sep_epochs`, `sep_km`: separation series used for the coarse lag.
    /// * `start`: beginning of the window of interest on A.
    ///
    /// Return
    /// ----------
    /// * The refined [`LatitudeLag`].
    /// * `Err(LapError::NoSampleInWindow)` when the separation, A or B series has no
    ///   sample on a required side of the search.
    /// * `Err(LapError::NonFiniteOffset)` when the separation sample at `start` is NaN.
    pub fn estimate_with_distance(
        &self,
        a: &Trajectory,
        b: &Trajectory,
        sep_epochs: &[Epoch],
        sep_km: &[f64],
        start: Epoch,
    ) -> Result<LatitudeLag, LapError> {
        let (_, coarse_lag_s) = coarse_lag(sep_epochs, sep_km, start, self.ground_track_speed)?;

        let before = try_shift_epoch(start, -coarse_lag_s, "coarse lag")?;
        let after = try_shift_epoch(start, coarse_lag_s, "coarse lag")?;
        let past = first_index_after(b.epochs(), before).ok_or_else(|| {
            LapError::NoSampleInWindow(format!("second spacecraft before {start}"))
        })?;
        let future = first_index_after(b.epochs(), after).ok_or_else(|| {
            LapError::NoSampleInWindow(format!("second spacecraft after {start}"))
        })?;
        let a_index = first_index_after(a.epochs(), start)
            .ok_or_else(|| LapError::NoSampleInWindow(format!("first spacecraft after {start}")))?;

        let lat_a = a.lat()[a_index];
        let past_diff = (lat_a - b.lat()[past]).abs();
        let future_diff = (lat_a - b.lat()[future]).abs();

        let (b_index, side) = if past_diff > future_diff {
            (future, MatchSide::Future)
        } else {
            (past, MatchSide::Past)
        };
        let lag_s = seconds_between(a.epochs()[a_index], b.epochs()[b_index]);

        debug!(
            coarse_lag_s,
            lag_s,
            ?side,
            past_diff,
            future_diff,
            "latitude lag estimated"
        );

        Ok(LatitudeLag {
            coarse_lag_s,
            lag_s,
            a_index,
            b_index,
            side,
        })
    }
}

#[cfg(test)]
mod latitude_lag_test {
    use super::*;
    use crate::time::shift_epoch;

    fn ramp(t0: Epoch, n: usize, delay_s: f64) -> Trajectory {
        Trajectory::new(
            (0..n).map(|i| shift_epoch(t0, i as f64)).collect(),
            (0..n).map(|i| -60.0 + 0.06 * (i as f64 - delay_s)).collect(),
            vec![-30.0; n],
            vec![500.0; n],
        )
        .unwrap()
    }

    #[test]
    fn test_past_side_when_b_leads() {
        let t0 = Epoch::from_gregorian_utc_at_midnight(2018, 3, 26);
        let a = ramp(t0, 2000, 0.0);
        // B reaches every latitude 200 s before A
        let b = ramp(t0, 2000, -200.0);
        let sep_epochs = a.epochs().to_vec();
        let sep_km = vec![-1500.0; 2000];

        let lag = LatitudeLagEstimator::default()
            .estimate_with_distance(&a, &b, &sep_epochs, &sep_km, shift_epoch(t0, 1000.0))
            .unwrap();
        assert_eq!(lag.side, MatchSide::Past);
        assert_eq!(lag.coarse_lag_s, 200.0);
        assert!((lag.lag_s + 200.0).abs() <= 1.0);
    }

    #[test]
    fn test_b_trajectory_too_short() {
        let t0 = Epoch::from_gregorian_utc_at_midnight(2018, 3, 26);
        let a = ramp(t0, 2000, 0.0);
        let b = ramp(t0, 1100, 300.0);
        let sep_km = vec![2250.0; 2000];

        let err = LatitudeLagEstimator::default()
            .estimate_with_distance(&a, &b, a.epochs(), &sep_km, shift_epoch(t0, 1000.0))
            .unwrap_err();
        assert!(matches!(err, LapError::NoSampleInWindow(_)));
        assert!(err.is_no_conjunction());
    }

    #[test]
    fn test_nan_separation_is_an_error() {
        let t0 = Epoch::from_gregorian_utc_at_midnight(2018, 3, 26);
        let a = ramp(t0, 2000, 0.0);
        let b = ramp(t0, 2000, 120.0);
        let sep_km = vec![f64::NAN; 2000];

        let err = LatitudeLagEstimator::default()
            .estimate_with_distance(&a, &b, a.epochs(), &sep_km, shift_epoch(t0, 1000.0))
            .unwrap_err();
        assert!(matches!(err, LapError::NonFiniteOffset(_)));
        assert!(!err.is_no_conjunction());
    }
}
