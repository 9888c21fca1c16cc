//! # Separation geometry between two spacecraft
//!
//! Pure geometry over index-matched position pairs: the caller aligns the two
//! trajectories first (see [`alignment`](crate::alignment)), then this module computes,
//! for every pair,
//!
//! * the **total** great-circle separation (haversine formula),
//! * its **in-track** component, signed by the lead/trail relationship,
//! * its **cross-track** component, the non-negative Pythagorean residual,
//! * the **straight-line** chord between the two Earth-centred position vectors.
//!
//! ## Spherical radius
//!
//! Each pair is evaluated on a sphere of radius `R = Re + (alt_a + alt_b) / 2` where `Re`
//! is the Earth mean radius, so the distance is consistent with the pair's actual altitude
//! rather than sea level.
//!
//! ## In-track approximation
//!
//! ```text
//! in_track    = R · (π/180) · (lat_a − lat_b) · sign(Δlat_a)
//! cross_track = sqrt(max(total² − in_track², 0))
//! ```
//!
//! `Δlat_a` is the first difference of the reference spacecraft's (the first argument's)
//! latitude. Latitude change is used as a proxy for along-track progress, which holds
//! only for **near-polar orbits of near-equal inclination** with a cross-track separation
//! small compared to the total. Outside that regime the in-track and cross-track values
//! are indicative only; the total separation is always valid.
use hifitime::Epoch;
use itertools::izip;
use nalgebra::Vector3;

use crate::constants::{Kilometer, RADEG};
use crate::lap_errors::LapError;
use crate::params::LapParams;
use crate::trajectory::{GeoPosition, Trajectory};

/// Radius of the sphere shared by a position pair.
#[inline]
fn pair_radius(a: &GeoPosition, b: &GeoPosition, earth_radius: Kilometer) -> Kilometer {
    earth_radius + (a.alt + b.alt) / 2.0
}

/// Great-circle distance between two positions (haversine formula).
///
/// Arguments
/// -----------------
/// * `a`, `b`: geodetic positions (degrees, kilometers).
/// * `earth_radius`: Earth mean radius in kilometers.
///
/// Return
/// ----------
/// * The separation in kilometers along the sphere of radius `Re + mean altitude`.
pub fn great_circle_distance(
    a: &GeoPosition,
    b: &GeoPosition,
    earth_radius: Kilometer,
) -> Kilometer {
    let d_lat = (a.lat - b.lat) * RADEG;
    let d_lon = (a.lon - b.lon) * RADEG;
    let h = (d_lat / 2.0).sin().powi(2)
        + (a.lat * RADEG).cos() * (b.lat * RADEG).cos() * (d_lon / 2.0).sin().powi(2);

    // rounding may push h slightly outside [0, 1]
    let central_angle = 2.0 * h.clamp(0.0, 1.0).sqrt().asin();
    pair_radius(a, b, earth_radius) * central_angle
}

/// Earth-centred Cartesian position on a spherical Earth.
pub fn spherical_to_cartesian(pos: &GeoPosition, earth_radius: Kilometer) -> Vector3<f64> {
    let r = earth_radius + pos.alt;
    let (lat, lon) = (pos.lat * RADEG, pos.lon * RADEG);
    Vector3::new(r * lat.cos() * lon.cos(), r * lat.cos() * lon.sin(), r * lat.sin())
}

/// Straight-line (chord) distance between two positions, in kilometers.
pub fn straight_line_distance(
    a: &GeoPosition,
    b: &GeoPosition,
    earth_radius: Kilometer,
) -> Kilometer {
    (spherical_to_cartesian(a, earth_radius) - spherical_to_cartesian(b, earth_radius)).norm()
}

/// Sign (`±1`) of the latitude first difference at every sample.
///
/// Forward difference at the first sample, backward difference at the last one and
/// central difference elsewhere. A zero difference and single-sample series count as
/// ascending (`+1`).
pub fn latitude_direction(lat: &[f64]) -> Vec<f64> {
    let n = lat.len();
    (0..n)
        .map(|i| {
            let diff = match (i.checked_sub(1), (i + 1 < n).then_some(i + 1)) {
                (Some(prev), Some(next)) => lat[next] - lat[prev],
                (None, Some(next)) => lat[next] - lat[i],
                (Some(prev), None) => lat[i] - lat[prev],
                (None, None) => 0.0,
            };
            if diff < 0.0 {
                -1.0
            } else {
                1.0
            }
        })
        .collect()
}

/// Signed in-track separation of `a` relative to `b`.
pub fn in_track_distance(
    a: &GeoPosition,
    b: &GeoPosition,
    direction: f64,
    earth_radius: Kilometer,
) -> Kilometer {
    pair_radius(a, b, earth_radius) * RADEG * (a.lat - b.lat) * direction.signum()
}

/// Non-negative cross-track residual; a negative radicand is clamped to zero.
#[inline]
pub fn cross_track_distance(total: Kilometer, in_track: Kilometer) -> Kilometer {
    (total * total - in_track * in_track).max(0.0).sqrt()
}

/// Separation of one position pair.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Separation {
    pub total_km: Kilometer,
    pub in_track_km: Kilometer,
    pub cross_track_km: Kilometer,
    pub straight_km: Kilometer,
}

/// Separation of one aligned instant.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SeparationRecord {
    pub epoch: Epoch,
    pub separation: Separation,
}

/// Computes [`Separation`]s between index-matched position sequences.
#[derive(Debug, Clone, Copy)]
pub struct SeparationCalculator {
    earth_radius: Kilometer,
}

impl Default for SeparationCalculator {
    fn default() -> Self {
        Self::new(&LapParams::default())
    }
}

impl SeparationCalculator {
    pub fn new(params: &LapParams) -> Self {
        SeparationCalculator {
            earth_radius: params.earth_radius_km,
        }
    }

    /// Separation of every index-matched pair, `a` being the reference spacecraft.
    ///
    /// Return
    /// ----------
    /// * `Err(LapError::ShapeMismatch)` when the sequences differ in length; they are
    ///   never truncated.
    pub fn separations(
        &self,
        a: &[GeoPosition],
        b: &[GeoPosition],
    ) -> Result<Vec<Separation>, LapError> {
        if a.len() != b.len() {
            return Err(LapError::ShapeMismatch {
                context: "separation positions",
                left: a.len(),
                right: b.len(),
            });
        }

        let lat_a: Vec<f64> = a.iter().map(|p| p.lat).collect();
        let direction = latitude_direction(&lat_a);

        Ok(izip!(a, b, direction)
            .map(|(pa, pb, dir)| {
                let total_km = great_circle_distance(pa, pb, self.earth_radius);
                let in_track_km = in_track_distance(pa, pb, dir, self.earth_radius);
                Separation {
                    total_km,
                    in_track_km,
                    cross_track_km: cross_track_distance(total_km, in_track_km),
                    straight_km: straight_line_distance(pa, pb, self.earth_radius),
                }
            })
            .collect())
    }

    /// Separation series of two trajectories already restricted to common times.
    ///
    /// The time stamps of the series are those of `a`.
    pub fn series(&self, a: &Trajectory, b: &Trajectory) -> Result<SeparationSeries, LapError> {
        let pa: Vec<GeoPosition> = a.positions().collect();
        let pb: Vec<GeoPosition> = b.positions().collect();
        let seps = self.separations(&pa, &pb)?;

        Ok(SeparationSeries {
            epochs: a.epochs().to_vec(),
            total_km: seps.iter().map(|s| s.total_km).collect(),
            in_track_km: seps.iter().map(|s| s.in_track_km).collect(),
            cross_track_km: seps.iter().map(|s| s.cross_track_km).collect(),
            straight_km: seps.iter().map(|s| s.straight_km).collect(),
            attributes: Vec::new(),
        })
    }
}

/// Time-ordered separation between two spacecraft, stored column by column.
///
/// Optional named attribute columns (e.g. each spacecraft's L value) are kept aligned
/// with the separation samples so the interval stage can look them up at the minimum.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SeparationSeries {
    epochs: Vec<Epoch>,
    total_km: Vec<Kilometer>,
    in_track_km: Vec<Kilometer>,
    cross_track_km: Vec<Kilometer>,
    straight_km: Vec<Kilometer>,
    attributes: Vec<(String, Vec<f64>)>,
}

impl SeparationSeries {
    pub fn new(
        epochs: Vec<Epoch>,
        total_km: Vec<Kilometer>,
        in_track_km: Vec<Kilometer>,
        cross_track_km: Vec<Kilometer>,
        straight_km: Vec<Kilometer>,
    ) -> Result<Self, LapError> {
        for (context, len) in [
            ("separation total", total_km.len()),
            ("separation in-track", in_track_km.len()),
            ("separation cross-track", cross_track_km.len()),
            ("separation straight-line", straight_km.len()),
        ] {
            if len != epochs.len() {
                return Err(LapError::ShapeMismatch {
                    context,
                    left: epochs.len(),
                    right: len,
                });
            }
        }
        Ok(SeparationSeries {
            epochs,
            total_km,
            in_track_km,
            cross_track_km,
            straight_km,
            attributes: Vec::new(),
        })
    }

    /// Attach a named column aligned with the separation samples.
    pub fn with_attribute(
        mut self,
        name: impl Into<String>,
        values: Vec<f64>,
    ) -> Result<Self, LapError> {
        if values.len() != self.len() {
            return Err(LapError::ShapeMismatch {
                context: "separation attribute",
                left: self.len(),
                right: values.len(),
            });
        }
        self.attributes.push((name.into(), values));
        Ok(self)
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

    pub fn total_km(&self) -> &[Kilometer] {
        &self.total_km
    }

    pub fn in_track_km(&self) -> &[Kilometer] {
        &self.in_track_km
    }

    pub fn cross_track_km(&self) -> &[Kilometer] {
        &self.cross_track_km
    }

    pub fn straight_km(&self) -> &[Kilometer] {
        &self.straight_km
    }

    /// `sqrt(in_track² + cross_track²)` per sample.
    ///
    /// Equal to the total separation except where the cross-track radicand was clamped.
    pub fn combined_km(&self) -> Vec<Kilometer> {
        self.in_track_km
            .iter()
            .zip(&self.cross_track_km)
            .map(|(i, c)| i.hypot(*c))
            .collect()
    }

    pub fn attributes(&self) -> &[(String, Vec<f64>)] {
        &self.attributes
    }

    pub fn attribute(&self, name: &str) -> Option<&[f64]> {
        self.attributes
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_slice())
    }

    pub fn record(&self, idx: usize) -> Option<SeparationRecord> {
        (idx < self.len()).then(|| SeparationRecord {
            epoch: self.epochs[idx],
            separation: Separation {
                total_km: self.total_km[idx],
                in_track_km: self.in_track_km[idx],
                cross_track_km: self.cross_track_km[idx],
                straight_km: self.straight_km[idx],
            },
        })
    }

    pub fn records(&self) -> impl Iterator<Item = SeparationRecord> + '_ {
        (0..self.len()).filter_map(|i| self.record(i))
    }
}
