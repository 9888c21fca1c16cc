//! Invariant-coordinate (L-shell) window matching.
//!
//! Aligns a science window on spacecraft A with the window on spacecraft B covering the
//! same L range, so two asynchronously sampled data streams can be compared at the same
//! magnetic location.
//!
//! Algorithm
//! -----------------
//! 1. A's L at the window start (forward scan) and end (backward scan), skipping missing
//!    samples.
//! 2. Search window on B: `[A_start + lag − tol, A_end + lag + tol]`.
//! 3. B samples nearest A's start and end L values, over a copy where missing samples
//!    are NaN.
//! 4. Identical B indices mean the two L ranges do not overlap: explicit failure.
//! 5. A bound whose B match differs by more than the mismatch tolerance is re-derived
//!    once as the A sample (inside the original A window) nearest the B value.
use tracing::{debug, trace};

use crate::constants::Seconds;
use crate::lag::{nearest_index, signed_coarse_lag, TimeWindow};
use crate::lap_errors::LapError;
use crate::params::LapParams;
use crate::separation::SeparationSeries;
use crate::time::try_shift_epoch;
use crate::trajectory::invariant::InvariantSeries;

/// Mutually consistent windows on both spacecraft.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MatchedWindows {
    pub a: TimeWindow,
    pub b: TimeWindow,
    /// `(start, end)` indices into A's series.
    pub a_indices: (usize, usize),
    /// `(start, end)` indices into B's series. The start may follow the end when B
    /// crosses the L range in the opposite direction.
    pub b_indices: (usize, usize),
    /// L values at A's final bounds.
    pub a_l: (f64, f64),
    /// L values at B's bounds.
    pub b_l: (f64, f64),
    /// Whether the A start / end bound was re-derived from the B match.
    pub corrected: (bool, bool),
}

#[derive(Debug, Clone, Copy)]
pub struct InvariantMatcher {
    lag_tolerance_s: Seconds,
    mismatch_tolerance: f64,
    ground_track_speed: f64,
}

impl Default for InvariantMatcher {
    fn default() -> Self {
        Self::new(&LapParams::default())
    }
}

impl InvariantMatcher {
    pub fn new(params: &LapParams) -> Self {
        InvariantMatcher {
            lag_tolerance_s: params.lag_tolerance_s,
            mismatch_tolerance: params.mismatch_tolerance,
            ground_track_speed: params.ground_track_speed,
        }
    }

    /// Same as [`InvariantMatcher::match_windows`] with the lag taken from the separation
    /// series: the signed in-track distance at the first sample after the window start,
    /// divided by the ground-track speed.
    ///
    /// Return
    /// ----------
    /// * The [`MatchedWindows`] pair, or any error of `match_windows`.
    /// * `Err(LapError::NoSampleInWindow)` when the separation has no sample after the
    ///   window start.
    /// * `Err(LapError::NonFiniteOffset)` when that separation sample is NaN.
    pub fn match_with_separation(
        &self,
        a: &InvariantSeries,
        b: &InvariantSeries,
        separation: &SeparationSeries,
        window: TimeWindow,
    ) -> Result<MatchedWindows, LapError> {
        let (index, lag_s) = signed_coarse_lag(
            separation.epochs(),
            separation.in_track_km(),
            window.start,
            self.ground_track_speed,
        )?;
        debug!(index, lag_s, "lag derived from in-track separation");
        self.match_windows(a, b, window, lag_s)
    }

    /// Match `window` on `a` with the window on `b` covering the same L range.
    ///
    /// Arguments
    /// -----------------
    /// * `a`, `b`: invariant series of the two spacecraft (read only).
    /// * `window`: window of interest on A.
    /// * `lag_s`: expected offset `t_B − t_A`, e.g. the refined latitude lag.
    ///
    /// Return
    /// ----------
    /// * The [`MatchedWindows`] pair.
    /// * `Err(LapError::NoSampleInWindow)` when A has no sample in `window`.
    /// * `Err(LapError::AllInvariantMissing)` when every L value is missing on either side.
    /// * `Err(LapError::NoDataInSearchWindow)` when B has no sample in the search window.
    /// * `Err(LapError::NoInvariantOverlap)` when the start and end bounds collapse.
    /// * `Err(LapError::NonFiniteOffset)` when `lag_s` is NaN or infinite.
    pub fn match_windows(
        &self,
        a: &InvariantSeries,
        b: &InvariantSeries,
        window: TimeWindow,
        lag_s: Seconds,
    ) -> Result<MatchedWindows, LapError> {
        let a_range = window.index_range(a.epochs());
        if a_range.is_empty() {
            return Err(LapError::NoSampleInWindow(format!(
                "first spacecraft in [{}, {}]",
                window.start, window.end
            )));
        }

        let missing_a = || LapError::AllInvariantMissing("first spacecraft window".into());
        let mut a_start = a_range
            .clone()
            .find(|&i| a.valid_l(i).is_some())
            .ok_or_else(missing_a)?;
        let mut a_end = a_range
            .clone()
            .rev()
            .find(|&i| a.valid_l(i).is_some())
            .ok_or_else(missing_a)?;
        let a_start_l = a.l()[a_start];
        let a_end_l = a.l()[a_end];

        let search = TimeWindow::new(
            try_shift_epoch(window.start, lag_s - self.lag_tolerance_s, "search window start")?,
            try_shift_epoch(window.end, lag_s + self.lag_tolerance_s, "search window end")?,
        );
        let b_range = search.index_range(b.epochs());
        if b_range.is_empty() {
            return Err(LapError::NoDataInSearchWindow {
                start: search.start.to_string(),
                end: search.end.to_string(),
            });
        }

        let b_l = b.l_with_nan();
        let b_slice = &b_l[b_range.clone()];
        let missing_b = || LapError::AllInvariantMissing("second spacecraft search window".into());
        let b_start = b_range.start + nearest_index(b_slice, a_start_l).ok_or_else(missing_b)?;
        let b_end = b_range.start + nearest_index(b_slice, a_end_l).ok_or_else(missing_b)?;
        if b_start == b_end {
            debug!(b_index = b_start, "start and end bounds matched the same sample");
            return Err(LapError::NoInvariantOverlap);
        }

        let a_l = a.l_with_nan();
        let a_slice = &a_l[a_range.clone()];
        let mut corrected = (false, false);

        if (b_l[b_start] - a_start_l).abs() > self.mismatch_tolerance {
            if let Some(k) = nearest_index(a_slice, b_l[b_start]) {
                trace!(from = a_start, to = a_range.start + k, "start bound re-derived");
                a_start = a_range.start + k;
                corrected.0 = true;
            }
        }
        if (b_l[b_end] - a_end_l).abs() > self.mismatch_tolerance {
            if let Some(k) = nearest_index(a_slice, b_l[b_end]) {
                trace!(from = a_end, to = a_range.start + k, "end bound re-derived");
                a_end = a_range.start + k;
                corrected.1 = true;
            }
        }
        if a_start == a_end {
            debug!(a_index = a_start, "corrected bounds collapsed to one sample");
            return Err(LapError::NoInvariantOverlap);
        }

        let matched = MatchedWindows {
            a: TimeWindow::new(a.epochs()[a_start], a.epochs()[a_end]),
            b: TimeWindow::new(b.epochs()[b_start], b.epochs()[b_end]),
            a_indices: (a_start, a_end),
            b_indices: (b_start, b_end),
            a_l: (a_l[a_start], a_l[a_end]),
            b_l: (b_l[b_start], b_l[b_end]),
            corrected,
        };
        debug!(
            a_indices = ?matched.a_indices,
            b_indices = ?matched.b_indices,
            ?corrected,
            "invariant windows matched"
        );
        Ok(matched)
    }
}
