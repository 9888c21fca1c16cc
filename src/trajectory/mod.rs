//! # Trajectories: columnar spacecraft ephemerides
//!
//! A [`Trajectory`] holds one spacecraft's time-ordered geodetic samples as parallel
//! columns (time, latitude, longitude, altitude). Columnar storage keeps the geometry and
//! interval algorithms running over contiguous `f64` slices, and lets
//! [`select`](Trajectory::select) restrict a trajectory to the indices returned by the
//! [`alignment`](crate::alignment) stage without copying unrelated columns around.
//!
//! Modules
//! -----------------
//! * [`invariant`] – magnetic invariant-coordinate (L, MLT) series and the
//!   [`MagneticFieldModel`](invariant::MagneticFieldModel) collaborator interface.
//!
//! Units
//! -----------------
//! * Latitude / longitude in **degrees** (latitude in `[-90, 90]`, longitude in `[-180, 180]`).
//! * Altitude in **kilometers** above the mean Earth radius.
//! * Time stamps are [`hifitime::Epoch`], sampled irregularly and possibly at a different
//!   cadence for each spacecraft.
pub mod invariant;

use hifitime::Epoch;

use crate::constants::{Degree, Kilometer};
use crate::lap_errors::LapError;
use crate::time::is_ascending;

/// Geodetic position of a spacecraft at one instant.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeoPosition {
    pub lat: Degree,
    pub lon: Degree,
    pub alt: Kilometer,
}

impl GeoPosition {
    pub fn new(lat: Degree, lon: Degree, alt: Kilometer) -> Self {
        GeoPosition { lat, lon, alt }
    }
}

/// One time-tagged trajectory sample.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrajectorySample {
    pub epoch: Epoch,
    pub position: GeoPosition,
}

/// Time-ordered geodetic history of one spacecraft, stored column by column.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Trajectory {
    epochs: Vec<Epoch>,
    lat: Vec<Degree>,
    lon: Vec<Degree>,
    alt: Vec<Kilometer>,
}

impl Trajectory {
    /// Build a trajectory from parallel columns.
    ///
    /// Arguments
    /// -----------------
    /// * `epochs`: sample times, ascending (duplicates allowed).
    /// * `lat`, `lon`: geodetic coordinates in degrees.
    /// * `alt`: altitude in kilometers.
    ///
    /// Return
    /// ----------
    /// * `Err(LapError::ShapeMismatch)` if the columns differ in length.
    /// * `Err(LapError::UnsortedSeries)` if the epochs are not ascending.
    pub fn new(
        epochs: Vec<Epoch>,
        lat: Vec<Degree>,
        lon: Vec<Degree>,
        alt: Vec<Kilometer>,
    ) -> Result<Self, LapError> {
        for (context, len) in [
            ("trajectory latitude", lat.len()),
            ("trajectory longitude", lon.len()),
            ("trajectory altitude", alt.len()),
        ] {
            if len != epochs.len() {
                return Err(LapError::ShapeMismatch {
                    context,
                    left: epochs.len(),
                    right: len,
                });
            }
        }
        if !is_ascending(&epochs) {
            return Err(LapError::UnsortedSeries("trajectory epochs".into()));
        }

        Ok(Trajectory {
            epochs,
            lat,
            lon,
            alt,
        })
    }

    /// Build a trajectory from individual samples.
    pub fn from_samples(samples: &[TrajectorySample]) -> Result<Self, LapError> {
        Self::new(
            samples.iter().map(|s| s.epoch).collect(),
            samples.iter().map(|s| s.position.lat).collect(),
            samples.iter().map(|s| s.position.lon).collect(),
            samples.iter().map(|s| s.position.alt).collect(),
        )
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

    pub fn lat(&self) -> &[Degree] {
        &self.lat
    }

    pub fn lon(&self) -> &[Degree] {
        &self.lon
    }

    pub fn alt(&self) -> &[Kilometer] {
        &self.alt
    }

    pub fn position(&self, idx: usize) -> Option<GeoPosition> {
        (idx < self.len()).then(|| GeoPosition::new(self.lat[idx], self.lon[idx], self.alt[idx]))
    }

    pub fn sample(&self, idx: usize) -> Option<TrajectorySample> {
        self.position(idx).map(|position| TrajectorySample {
            epoch: self.epochs[idx],
            position,
        })
    }

    /// Iterate over the geodetic positions in time order.
    pub fn positions(&self) -> impl Iterator<Item = GeoPosition> + '_ {
        self.lat
            .iter()
            .zip(&self.lon)
            .zip(&self.alt)
            .map(|((&lat, &lon), &alt)| GeoPosition::new(lat, lon, alt))
    }

    /// Restrict the trajectory to the given non-decreasing indices; repeats duplicate a sample.
    ///
    /// Out-of-range indices are ignored; the aligner never produces them.
    pub fn select(&self, indices: &[usize]) -> Trajectory {
        let keep: Vec<usize> = indices.iter().copied().filter(|&i| i < self.len()).collect();
        Trajectory {
            epochs: keep.iter().map(|&i| self.epochs[i]).collect(),
            lat: keep.iter().map(|&i| self.lat[i]).collect(),
            lon: keep.iter().map(|&i| self.lon[i]).collect(),
            alt: keep.iter().map(|&i| self.alt[i]).collect(),
        }
    }
}

#[cfg(test)]
mod trajectory_test {
    use super::*;
    use crate::time::shift_epoch;

    fn epochs(n: usize) -> Vec<Epoch> {
        let t0 = Epoch::from_gregorian_utc_at_midnight(2018, 4, 11);
        (0..n).map(|i| shift_epoch(t0, i as f64)).collect()
    }

    #[test]
    fn test_new_shape_mismatch() {
        let err = Trajectory::new(epochs(3), vec![0.0; 3], vec![0.0; 2], vec![500.0; 3]);
        assert_eq!(
            err,
            Err(LapError::ShapeMismatch {
                context: "trajectory longitude",
                left: 3,
                right: 2
            })
        );
    }

    #[test]
    fn test_new_unsorted() {
        let mut t = epochs(3);
        t.swap(0, 2);
        let err = Trajectory::new(t, vec![0.0; 3], vec![0.0; 3], vec![500.0; 3]).unwrap_err();
        assert!(matches!(err, LapError::UnsortedSeries(_)));
    }

    #[test]
    fn test_select_and_positions() {
        let traj = Trajectory::new(
            epochs(4),
            vec![10.0, 11.0, 12.0, 13.0],
            vec![-40.0, -40.5, -41.0, -41.5],
            vec![500.0, 501.0, 502.0, 503.0],
        )
        .unwrap();

        let sub = traj.select(&[1, 3, 9]);
        assert_eq!(sub.len(), 2);
        assert_eq!(sub.lat(), &[11.0, 13.0]);
        assert_eq!(sub.epochs()[1], traj.epochs()[3]);

        let positions: Vec<GeoPosition> = sub.positions().collect();
        assert_eq!(positions[0], GeoPosition::new(11.0, -40.5, 501.0));
        assert_eq!(traj.position(4), None);
        assert_eq!(traj.sample(0).unwrap().position.alt, 500.0);
    }

    #[test]
    fn test_from_samples() {
        let t = epochs(2);
        let samples = [
            TrajectorySample {
                epoch: t[0],
                position: GeoPosition::new(1.0, 2.0, 3.0),
            },
            TrajectorySample {
                epoch: t[1],
                position: GeoPosition::new(4.0, 5.0, 6.0),
            },
        ];
        let traj = Trajectory::from_samples(&samples).unwrap();
        assert_eq!(traj.lon(), &[2.0, 5.0]);
        assert!(!traj.is_empty());
    }
}
