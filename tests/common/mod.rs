use hifitime::Epoch;
use leolap::time::shift_epoch;
use leolap::trajectory::invariant::InvariantSeries;
use leolap::trajectory::Trajectory;

/// Latitude rate of the synthetic ground tracks (deg/s).
pub const LAT_RATE: f64 = 0.06;

pub fn t0() -> Epoch {
    Epoch::from_gregorian_utc_at_midnight(2018, 12, 10)
}

/// Trajectory sampled every second from `t0() + offset_s`, climbing in latitude at
/// [`LAT_RATE`] and reaching `lat0` at `t0() + delay_s`.
pub fn ascending_track(offset_s: f64, n: usize, delay_s: f64, lat0: f64, lon: f64) -> Trajectory {
    let times: Vec<f64> = (0..n).map(|i| offset_s + i as f64).collect();
    Trajectory::new(
        times.iter().map(|&t| shift_epoch(t0(), t)).collect(),
        times.iter().map(|&t| lat0 + LAT_RATE * (t - delay_s)).collect(),
        vec![lon; n],
        vec![500.0; n],
    )
    .unwrap()
}

/// Invariant series sampled every second from `t0() + offset_s` with `L = l(t)`.
pub fn l_series(offset_s: f64, n: usize, l: impl Fn(f64) -> f64) -> InvariantSeries {
    let times: Vec<f64> = (0..n).map(|i| offset_s + i as f64).collect();
    InvariantSeries::new(
        times.iter().map(|&t| shift_epoch(t0(), t)).collect(),
        times.iter().map(|&t| l(t)).collect(),
        vec![12.0; n],
    )
    .unwrap()
}
