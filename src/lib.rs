//! Detection of lapping events between pairs of low-Earth-orbit spacecraft.
//!
//! A lapping event is a contiguous stretch of time during which two spacecraft stay
//! closer than a distance threshold. The crate aligns two trajectories on their common
//! time stamps, computes their total, in-track and cross-track separations, extracts the
//! events, and estimates time lags between the spacecraft either from the latitude track
//! or from a magnetic invariant (L-shell).
pub mod alignment;
pub mod constants;
pub mod intervals;
pub mod io;
pub mod lag;
pub mod lap_errors;
pub mod params;
pub mod pipeline;
pub mod separation;
pub mod time;
pub mod trajectory;

pub use intervals::{DistanceMetric, IntervalExtractor, LappingEvent};
pub use lap_errors::LapError;
pub use params::LapParams;
pub use separation::{SeparationCalculator, SeparationSeries};
pub use trajectory::{invariant::InvariantSeries, GeoPosition, Trajectory};
