//! # Lapping-analysis parameters
//!
//! This module defines the [`LapParams`] configuration struct and its builder. It gathers
//! every caller-tunable value used by the separation, lag and interval stages so that no
//! module reads process-wide state.
//!
//! ## Purpose
//!
//! - Choose the separation **threshold** defining a lapping event,
//! - Set the **ground-track speed** that converts an in-track distance into a time lag,
//! - Size the **search window** opened on the second spacecraft during invariant matching,
//! - Bound the accepted **invariant-coordinate mismatch** between matched window bounds,
//! - Control the **nudge** applied to zero-duration events,
//! - Override the **Earth mean radius** used by the spherical geometry.
//!
//! ## Example
//!
//! ```rust
//! use leolap::params::LapParams;
//!
//! let params = LapParams::builder()
//!     .threshold_km(250.0)
//!     .lag_tolerance_s(120.0)
//!     .build()
//!     .unwrap();
//! assert_eq!(params.threshold_km, 250.0);
//! ```
use std::cmp::Ordering::{Equal, Greater};
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::constants::{
    Kilometer, Seconds, DEFAULT_DEGENERATE_NUDGE_S, DEFAULT_LAG_TOLERANCE_S,
    DEFAULT_MISMATCH_TOLERANCE, DEFAULT_THRESHOLD_KM, EARTH_MEAN_RADIUS, GROUND_TRACK_SPEED,
};
use crate::lap_errors::LapError;

/// Configuration of a lapping analysis.
///
/// Defaults
/// -----------------
/// * `threshold_km`: 500 km
/// * `ground_track_speed`: 7.5 km/s
/// * `lag_tolerance_s`: 60 s
/// * `mismatch_tolerance`: 0.5 (invariant-coordinate units)
/// * `degenerate_nudge_s`: 60 s
/// * `earth_radius_km`: 6371 km
///
/// Notes & Validation
/// -----------------
/// * `threshold_km` may be zero or negative; the interval stage then reports no event.
///   It must not be NaN.
/// * `ground_track_speed > 0`, `degenerate_nudge_s > 0`, `earth_radius_km > 0`.
/// * `lag_tolerance_s ≥ 0`, `mismatch_tolerance ≥ 0`.
///
/// See also
/// -----------------
/// * [`IntervalExtractor`](crate::intervals::IntervalExtractor) – consumes the threshold and nudge.
/// * [`InvariantMatcher`](crate::lag::invariant::InvariantMatcher) – consumes the tolerances.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LapParams {
    /// Separation below which the spacecraft are considered lapping (km).
    pub threshold_km: Kilometer,
    /// Shared ground-track speed used for the coarse lag (km/s).
    pub ground_track_speed: f64,
    /// Padding of the search window on the second spacecraft (s).
    pub lag_tolerance_s: Seconds,
    /// Largest accepted |L_B − L_A| before an A bound is re-derived.
    pub mismatch_tolerance: f64,
    /// Added to the end time of zero-duration events (s).
    pub degenerate_nudge_s: Seconds,
    pub earth_radius_km: Kilometer,
}

impl LapParams {
    /// Construct a new [`LapParams`] with the default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a new [`LapParamsBuilder`] initialized with the defaults.
    pub fn builder() -> LapParamsBuilder {
        LapParamsBuilder::new()
    }
}

impl Default for LapParams {
    fn default() -> Self {
        LapParams {
            threshold_km: DEFAULT_THRESHOLD_KM,
            ground_track_speed: GROUND_TRACK_SPEED,
            lag_tolerance_s: DEFAULT_LAG_TOLERANCE_S,
            mismatch_tolerance: DEFAULT_MISMATCH_TOLERANCE,
            degenerate_nudge_s: DEFAULT_DEGENERATE_NUDGE_S,
            earth_radius_km: EARTH_MEAN_RADIUS,
        }
    }
}

/// Builder for [`LapParams`], with validation.
#[derive(Debug, Clone, Default)]
pub struct LapParamsBuilder {
    params: LapParams,
}

impl LapParamsBuilder {
    pub fn new() -> Self {
        Self {
            params: LapParams::default(),
        }
    }

    pub fn threshold_km(mut self, v: Kilometer) -> Self {
        self.params.threshold_km = v;
        self
    }
    pub fn ground_track_speed(mut self, v: f64) -> Self {
        self.params.ground_track_speed = v;
        self
    }
    pub fn lag_tolerance_s(mut self, v: Seconds) -> Self {
        self.params.lag_tolerance_s = v;
        self
    }
    pub fn mismatch_tolerance(mut self, v: f64) -> Self {
        self.params.mismatch_tolerance = v;
        self
    }
    pub fn degenerate_nudge_s(mut self, v: Seconds) -> Self {
        self.params.degenerate_nudge_s = v;
        self
    }
    pub fn earth_radius_km(mut self, v: Kilometer) -> Self {
        self.params.earth_radius_km = v;
        self
    }

    /// Return true iff x > 0.0 and comparable (i.e., not NaN).
    #[inline]
    fn gt0(x: f64) -> bool {
        x.partial_cmp(&0.0) == Some(Greater)
    }

    /// Return true iff x >= 0.0 and comparable (i.e., not NaN).
    #[inline]
    fn ge0(x: f64) -> bool {
        matches!(x.partial_cmp(&0.0), Some(Greater) | Some(Equal))
    }

    /// Finalize the builder and produce a validated [`LapParams`].
    ///
    /// Returns
    /// -----------------
    /// * `Ok(LapParams)` if all values are valid.
    /// * `Err(LapError::InvalidLapParameter)` naming the first rule that failed.
    pub fn build(self) -> Result<LapParams, LapError> {
        let p = &self.params;

        if p.threshold_km.is_nan() {
            return Err(LapError::InvalidLapParameter(
                "threshold_km must not be NaN".into(),
            ));
        }
        if !Self::gt0(p.ground_track_speed) {
            return Err(LapError::InvalidLapParameter(
                "ground_track_speed must be > 0".into(),
            ));
        }
        if !Self::ge0(p.lag_tolerance_s) {
            return Err(LapError::InvalidLapParameter(
                "lag_tolerance_s must be >= 0".into(),
            ));
        }
        if !Self::ge0(p.mismatch_tolerance) {
            return Err(LapError::InvalidLapParameter(
                "mismatch_tolerance must be >= 0".into(),
            ));
        }
        if !Self::gt0(p.degenerate_nudge_s) {
            return Err(LapError::InvalidLapParameter(
                "degenerate_nudge_s must be > 0".into(),
            ));
        }
        if !Self::gt0(p.earth_radius_km) {
            return Err(LapError::InvalidLapParameter(
                "earth_radius_km must be > 0".into(),
            ));
        }

        Ok(self.params)
    }
}

impl fmt::Display for LapParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if f.alternate() {
            writeln!(f, "Lapping parameters")?;
            writeln!(f, "------------------")?;
            writeln!(f, "threshold_km       : {}", self.threshold_km)?;
            writeln!(f, "ground_track_speed : {} km/s", self.ground_track_speed)?;
            writeln!(f, "lag_tolerance_s    : {}", self.lag_tolerance_s)?;
            writeln!(f, "mismatch_tolerance : {}", self.mismatch_tolerance)?;
            writeln!(f, "degenerate_nudge_s : {}", self.degenerate_nudge_s)?;
            write!(f, "earth_radius_km    : {}", self.earth_radius_km)
        } else {
            write!(
                f,
                "threshold={} km, speed={} km/s, lag_tol={} s, \
                 mismatch_tol={}, nudge={} s, Re={} km",
                self.threshold_km,
                self.ground_track_speed,
                self.lag_tolerance_s,
                self.mismatch_tolerance,
                self.degenerate_nudge_s,
                self.earth_radius_km
            )
        }
    }
}
