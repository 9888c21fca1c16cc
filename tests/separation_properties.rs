use approx::assert_relative_eq;
use itertools::izip;

use leolap::alignment::align_times;
use leolap::intervals::{DistanceMetric, IntervalExtractor};
use leolap::separation::SeparationCalculator;
use leolap::time::shift_epoch;
use leolap::LapParams;

mod common;
use common::{ascending_track, t0};

#[test]
fn test_swap_symmetry() {
    let a = ascending_track(0.0, 600, 0.0, -40.0, 20.0);
    let b = ascending_track(0.0, 600, 90.0, -40.0, 21.0);
    let calc = SeparationCalculator::default();

    let ab = calc.series(&a, &b).unwrap();
    let ba = calc.series(&b, &a).unwrap();

    for (x, y) in ab.records().zip(ba.records()) {
        let (x, y) = (x.separation, y.separation);
        assert_relative_eq!(x.total_km, y.total_km, epsilon = 1e-9);
        assert_relative_eq!(x.straight_km, y.straight_km, epsilon = 1e-9);
        assert_relative_eq!(x.in_track_km, -y.in_track_km, epsilon = 1e-9);
        assert_relative_eq!(x.cross_track_km, y.cross_track_km, epsilon = 1e-6);
    }
}

#[test]
fn test_components_are_consistent() {
    let a = ascending_track(0.0, 300, 0.0, 10.0, 20.0);
    let b = ascending_track(0.0, 300, 30.0, 10.0, 22.0);
    let series = SeparationCalculator::default().series(&a, &b).unwrap();

    for (total, in_track, cross, straight) in izip!(
        series.total_km(),
        series.in_track_km(),
        series.cross_track_km(),
        series.straight_km()
    ) {
        assert!(*cross >= 0.0);
        assert!(in_track.abs() <= total + 1e-9);
        // a chord is never longer than its arc
        assert!(*straight <= total + 1e-9);
        // B is 30 s behind A on an ascending track
        assert!(*in_track > 0.0);
    }
}

#[test]
fn test_aligner_selects_equal_multisets() {
    let base = t0();
    let a: Vec<_> = [0.0, 1.0, 1.0, 3.0, 5.0, 7.0, 8.0]
        .iter()
        .map(|&s| shift_epoch(base, s))
        .collect();
    let b: Vec<_> = [1.0, 2.0, 3.0, 3.0, 7.0, 9.0]
        .iter()
        .map(|&s| shift_epoch(base, s))
        .collect();

    let idx = align_times(&a, &b).unwrap();
    assert_eq!(idx.a.len(), idx.b.len());

    let va: Vec<_> = idx.a.iter().map(|&i| a[i]).collect();
    let vb: Vec<_> = idx.b.iter().map(|&i| b[i]).collect();
    assert!(va.windows(2).all(|w| w[0] <= w[1]));
    assert_eq!(va, vb);

    // 1 s twice on A, 3 s twice on B, 7 s once on each side
    let count = |s: f64| va.iter().filter(|&&e| e == shift_epoch(base, s)).count();
    assert_eq!(count(1.0), 2);
    assert_eq!(count(3.0), 2);
    assert_eq!(count(7.0), 1);
    assert_eq!(va.len(), 5);
}

#[test]
fn test_min_index_round_trip() {
    // B drifts away, then comes back: one event around the closest approach
    let a = ascending_track(0.0, 1200, 0.0, -30.0, 0.0);
    let lon: Vec<f64> = (0..1200)
        .map(|i| 8.0 * ((i as f64 - 600.0) / 600.0).powi(2))
        .collect();
    let b = leolap::Trajectory::new(
        a.epochs().to_vec(),
        a.lat().to_vec(),
        lon,
        a.alt().to_vec(),
    )
    .unwrap();

    let series = SeparationCalculator::default()
        .series(&a, &b)
        .unwrap()
        .with_attribute("sample", (0..1200).map(|i| i as f64).collect())
        .unwrap();
    let events = IntervalExtractor::new(&LapParams::default())
        .extract_series(&series, DistanceMetric::Total)
        .unwrap();

    assert_eq!(events.len(), 1);
    for event in &events {
        assert!(event.start_index <= event.min_index && event.min_index <= event.end_index);
        assert_eq!(series.total_km()[event.min_index], event.min_separation_km);
        assert_eq!(event.attribute("sample"), Some(event.min_index as f64));
        assert!(event.duration_s > 0.0);
    }
    assert_eq!(events[0].min_index, 600);
}
