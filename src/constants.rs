//! # Constants and type definitions for leolap
//!
//! This module centralizes the **physical constants**, **default tuning values**, and
//! **unit type aliases** shared by the separation, alignment, lag and interval modules.
//!
//! ## Overview
//!
//! - Geophysical constants (Earth mean radius, LEO ground-track speed)
//! - Unit conversions (degrees ↔ radians)
//! - The missing-data sentinel produced by magnetic field models
//! - Defaults backing [`LapParams`](crate::params::LapParams)

// -------------------------------------------------------------------------------------------------
// Physical constants and unit conversions
// -------------------------------------------------------------------------------------------------

/// Earth mean radius in kilometers
pub const EARTH_MEAN_RADIUS: Kilometer = 6371.0;

/// Shared LEO ground-track speed in km/s, used to turn a distance into a time lag
pub const GROUND_TRACK_SPEED: f64 = 7.5;

/// Degrees → radians
pub const RADEG: f64 = std::f64::consts::PI / 180.0;

/// Magnitude used by magnetic field models to flag a failed evaluation.
///
/// Any invariant coordinate whose magnitude reaches this value (or that is not finite)
/// is a missing sample, never a valid L value.
pub const INVARIANT_FILL_VALUE: f64 = 1e31;

// -------------------------------------------------------------------------------------------------
// Defaults of the configuration surface
// -------------------------------------------------------------------------------------------------

/// Separation threshold below which two spacecraft are lapping (km)
pub const DEFAULT_THRESHOLD_KM: Kilometer = 500.0;

/// Half-width padding of the search window opened on the second spacecraft (s)
pub const DEFAULT_LAG_TOLERANCE_S: Seconds = 60.0;

/// Largest accepted invariant-coordinate mismatch between two matched bounds
pub const DEFAULT_MISMATCH_TOLERANCE: f64 = 0.5;

/// Increment added to the end of a zero-duration event (s)
pub const DEFAULT_DEGENERATE_NUDGE_S: Seconds = 60.0;

// -------------------------------------------------------------------------------------------------
// Type aliases
// -------------------------------------------------------------------------------------------------

/// Angle in degrees
pub type Degree = f64;
/// Angle in radians
pub type Radian = f64;
/// Distance in kilometers
pub type Kilometer = f64;
/// Time span in seconds
pub type Seconds = f64;

/// Return `true` when `value` is the magnetic model fill value or not a finite number.
#[inline]
pub fn is_missing_invariant(value: f64) -> bool {
    !value.is_finite() || value.abs() >= INVARIANT_FILL_VALUE
}

#[cfg(test)]
mod constants_test {
    use super::*;

    #[test]
    fn test_missing_invariant() {
        assert!(is_missing_invariant(1e31));
        assert!(is_missing_invariant(-1e31));
        assert!(is_missing_invariant(f64::NAN));
        assert!(is_missing_invariant(f64::INFINITY));
        assert!(!is_missing_invariant(4.2));
        assert!(!is_missing_invariant(-1.0));
    }
}
