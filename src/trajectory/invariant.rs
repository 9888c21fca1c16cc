//! Magnetic invariant-coordinate series.
//!
//! An [`InvariantSeries`] stores the L-shell and magnetic local time evaluated at each
//! sample of a [`Trajectory`]. The field model itself is an external collaborator behind
//! the [`MagneticFieldModel`] trait: it may be slow, so [`InvariantSeries::from_model`]
//! calls it exactly once per sample and stores failed evaluations as
//! [`INVARIANT_FILL_VALUE`].
use hifitime::Epoch;
use tracing::debug;

use crate::constants::{is_missing_invariant, Degree, Kilometer, INVARIANT_FILL_VALUE};
use crate::lap_errors::LapError;
use crate::time::is_ascending;
use crate::trajectory::Trajectory;

/// Output of one magnetic field model evaluation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MagneticCoords {
    /// Dimensionless field-line label.
    pub l: f64,
    /// Magnetic local time in hours.
    pub mlt: f64,
}

/// External magnetic field model mapping a geodetic position to `(L, MLT)`.
///
/// Implementations may return the fill value inside [`MagneticCoords`] or an error; both
/// end up as a missing sample in the series.
pub trait MagneticFieldModel {
    fn magnetic_coords(
        &self,
        epoch: Epoch,
        lat: Degree,
        lon: Degree,
        alt: Kilometer,
    ) -> Result<MagneticCoords, LapError>;
}

impl<F> MagneticFieldModel for F
where
    F: Fn(Epoch, Degree, Degree, Kilometer) -> Result<MagneticCoords, LapError>,
{
    fn magnetic_coords(
        &self,
        epoch: Epoch,
        lat: Degree,
        lon: Degree,
        alt: Kilometer,
    ) -> Result<MagneticCoords, LapError> {
        self(epoch, lat, lon, alt)
    }
}

/// Time-ordered `(L, MLT)` samples of one spacecraft.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct InvariantSeries {
    epochs: Vec<Epoch>,
    l: Vec<f64>,
    mlt: Vec<f64>,
}

impl InvariantSeries {
    pub fn new(epochs: Vec<Epoch>, l: Vec<f64>, mlt: Vec<f64>) -> Result<Self, LapError> {
        if l.len() != epochs.len() {
            return Err(LapError::ShapeMismatch {
                context: "invariant L",
                left: epochs.len(),
                right: l.len(),
            });
        }
        if mlt.len() != epochs.len() {
            return Err(LapError::ShapeMismatch {
                context: "invariant MLT",
                left: epochs.len(),
                right: mlt.len(),
            });
        }
        if !is_ascending(&epochs) {
            return Err(LapError::UnsortedSeries("invariant epochs".into()));
        }
        Ok(InvariantSeries { epochs, l, mlt })
    }

    /// Evaluate `model` once per trajectory sample.
    ///
    /// Failed evaluations are stored as [`INVARIANT_FILL_VALUE`] for both L and MLT; they
    /// are logged at debug level and never abort the series.
    pub fn from_model<M: MagneticFieldModel + ?Sized>(trajectory: &Trajectory, model: &M) -> Self {
        let n = trajectory.len();
        let mut l = Vec::with_capacity(n);
        let mut mlt = Vec::with_capacity(n);
        let mut failures = 0usize;

        for (epoch, pos) in trajectory.epochs().iter().zip(trajectory.positions()) {
            match model.magnetic_coords(*epoch, pos.lat, pos.lon, pos.alt) {
                Ok(coords) => {
                    l.push(coords.l);
                    mlt.push(coords.mlt);
                }
                Err(err) => {
                    debug!(%epoch, error = %err, "magnetic model evaluation failed");
                    failures += 1;
                    l.push(INVARIANT_FILL_VALUE);
                    mlt.push(INVARIANT_FILL_VALUE);
                }
            }
        }
        if failures > 0 {
            debug!(failures, samples = n, "invariant series built with missing samples");
        }

        InvariantSeries {
            epochs: trajectory.epochs().to_vec(),
            l,
            mlt,
        }
    }

    pub fn len(&self) -> usize {
        self.epochs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.epochs.is_empty()
    }

    pub fn epochs(&self) -> &[Epoch] {
        &self.epochs
    }

    /// Raw L values, fill values included.
    pub fn l(&self) -> &[f64] {
        &self.l
    }

    pub fn mlt(&self) -> &[f64] {
        &self.mlt
    }

    /// L value at `idx`, or `None` when out of range or missing.
    pub fn valid_l(&self, idx: usize) -> Option<f64> {
        self.l.get(idx).copied().filter(|v| !is_missing_invariant(*v))
    }

    /// Copy of the L column where missing samples are replaced by NaN.
    pub fn l_with_nan(&self) -> Vec<f64> {
        self.l
            .iter()
            .map(|&v| if is_missing_invariant(v) { f64::NAN } else { v })
            .collect()
    }

    /// Restrict the series to the given indices.
    pub fn select(&self, indices: &[usize]) -> InvariantSeries {
        let keep: Vec<usize> = indices.iter().copied().filter(|&i| i < self.len()).collect();
        InvariantSeries {
            epochs: keep.iter().map(|&i| self.epochs[i]).collect(),
            l: keep.iter().map(|&i| self.l[i]).collect(),
            mlt: keep.iter().map(|&i| self.mlt[i]).collect(),
        }
    }
}
