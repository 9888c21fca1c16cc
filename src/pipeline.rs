//! # End-to-end lapping analysis of spacecraft pairs
//!
//! Chains the core stages for one pair of spacecraft:
//!
//! ```text
//! trajectories ─▶ align_times ─▶ SeparationCalculator ─▶ SeparationSeries
//!              ─▶ IntervalExtractor ─▶ events
//! ```
//!
//! and runs that chain over many pairs with [`run_batch`].
//!
//! ## Error Semantics
//! -----------------
//! * Failures are **per pair**: an error for one pair does **not** abort the batch.
//! * "No conjunction" failures ([`LapError::is_no_conjunction`]) are logged at `warn`
//!   level and skipped; any other failure is logged at `error` level. Both are kept in the
//!   returned map.
//!
//! ## Feature Flags
//! -----------------
//! * `progress`: renders an `indicatif` progress bar while [`run_batch`] runs.
//!
//! ## Example
//! -----------------
//! ```rust,no_run
//! use leolap::pipeline::{run_batch, LapPair};
//! use leolap::params::LapParams;
//! use leolap::intervals::DistanceMetric;
//!
//! # fn demo(pairs: Vec<LapPair>) {
//! let results = run_batch(&pairs, &LapParams::default(), DistanceMetric::Total);
//! for (key, res) in &results {
//!     match res {
//!         Ok(outcome) => eprintln!("{key}: {} events", outcome.events.len()),
//!         Err(e) => eprintln!("{key}: {e}"),
//!     }
//! }
//! # }
//! ```
use std::collections::BTreeMap;

use tracing::{debug, error, warn};

#[cfg(feature = "progress")]
use indicatif::{ProgressBar, ProgressStyle};

use crate::alignment::align_times;
use crate::intervals::{DistanceMetric, IntervalExtractor, LappingEvent};
use crate::lap_errors::LapError;
use crate::params::LapParams;
use crate::separation::{SeparationCalculator, SeparationSeries};
use crate::trajectory::invariant::InvariantSeries;
use crate::trajectory::Trajectory;

/// One spacecraft: a name, its trajectory and, optionally, its invariant series
/// (sampled at the trajectory's epochs).
#[derive(Debug, Clone)]
pub struct Spacecraft {
    pub name: String,
    pub trajectory: Trajectory,
    pub invariants: Option<InvariantSeries>,
}

impl Spacecraft {
    pub fn new(name: impl Into<String>, trajectory: Trajectory) -> Self {
        Spacecraft {
            name: name.into(),
            trajectory,
            invariants: None,
        }
    }

    /// Attach an invariant series covering the same samples as the trajectory.
    pub fn with_invariants(mut self, invariants: InvariantSeries) -> Result<Self, LapError> {
        if invariants.len() != self.trajectory.len() {
            return Err(LapError::ShapeMismatch {
                context: "spacecraft invariants",
                left: self.trajectory.len(),
                right: invariants.len(),
            });
        }
        self.invariants = Some(invariants);
        Ok(self)
    }

    /// Name of the L attribute column carried by separation series.
    pub fn l_column(&self) -> String {
        format!("L_{}", self.name)
    }
}

/// Two spacecraft analysed together; `a` is the reference of the in-track sign.
#[derive(Debug, Clone)]
pub struct LapPair {
    pub a: Spacecraft,
    pub b: Spacecraft,
}

impl LapPair {
    pub fn new(a: Spacecraft, b: Spacecraft) -> Self {
        LapPair { a, b }
    }

    /// Key used in batch results, e.g. `FU3_ELFIN_A`.
    pub fn key(&self) -> String {
        format!("{}_{}", self.a.name, self.b.name)
    }
}

/// Separation series and events of one pair.
#[derive(Debug, Clone, PartialEq)]
pub struct PairOutcome {
    pub separation: SeparationSeries,
    pub events: Vec<LappingEvent>,
}

/// Batch outcomes keyed by [`LapPair::key`].
pub type BatchResult = BTreeMap<String, Result<PairOutcome, LapError>>;

/// Align the two trajectories and compute their separation series.
///
/// Each spacecraft's L values (when present) are carried as an attribute column named
/// [`Spacecraft::l_column`].
///
/// Return
/// ----------
/// * `Err(LapError::NoCommonTimes)` when the trajectories share no time stamp.
///
/// A time stamp duplicated on either side contributes one separation sample per pair of
/// occurrences.
pub fn compute_pair_separation(
    pair: &LapPair,
    params: &LapParams,
) -> Result<SeparationSeries, LapError> {
    let idx = align_times(pair.a.trajectory.epochs(), pair.b.trajectory.epochs())?;
    if idx.is_empty() {
        return Err(LapError::NoCommonTimes);
    }
    debug!(
        pair = %pair.key(),
        samples = idx.len(),
        one_to_one = idx.is_one_to_one(),
        "trajectories aligned"
    );

    let traj_a = pair.a.trajectory.select(&idx.a);
    let traj_b = pair.b.trajectory.select(&idx.b);
    let mut series = SeparationCalculator::new(params).series(&traj_a, &traj_b)?;

    for (craft, indices) in [(&pair.a, &idx.a), (&pair.b, &idx.b)] {
        if let Some(inv) = &craft.invariants {
            series = series.with_attribute(craft.l_column(), inv.select(indices).l().to_vec())?;
        }
    }
    Ok(series)
}

/// Run the full chain for one pair.
pub fn find_lapping_events(
    pair: &LapPair,
    params: &LapParams,
    metric: DistanceMetric,
) -> Result<PairOutcome, LapError> {
    let separation = compute_pair_separation(pair, params)?;
    let events = IntervalExtractor::new(params).extract_series(&separation, metric)?;
    Ok(PairOutcome { separation, events })
}

fn log_outcome(key: &str, res: &Result<PairOutcome, LapError>) {
    match res {
        Ok(outcome) => debug!(pair = key, events = outcome.events.len(), "pair processed"),
        Err(e) if e.is_no_conjunction() => warn!(pair = key, error = %e, "pair skipped"),
        Err(e) => error!(pair = key, error = %e, "pair failed"),
    }
}

/// Process every pair independently, logging and skipping failures.
#[cfg(not(feature = "progress"))]
pub fn run_batch(pairs: &[LapPair], params: &LapParams, metric: DistanceMetric) -> BatchResult {
    let mut results = BatchResult::new();
    for pair in pairs {
        let key = pair.key();
        let res = find_lapping_events(pair, params, metric);
        log_outcome(&key, &res);
        results.insert(key, res);
    }
    results
}

/// Process every pair independently, logging and skipping failures.
#[cfg(feature = "progress")]
pub fn run_batch(pairs: &[LapPair], params: &LapParams, metric: DistanceMetric) -> BatchResult {
    let pb = ProgressBar::new((pairs.len() as u64).max(1));
    if let Ok(style) = ProgressStyle::with_template(
        "{bar:40.cyan/blue} {pos}/{len} ({percent:>3}%) | ETA {eta_precise} | {msg}",
    ) {
        pb.set_style(style);
    }

    let mut results = BatchResult::new();
    for pair in pairs {
        let key = pair.key();
        pb.set_message(key.clone());
        let res = find_lapping_events(pair, params, metric);
        log_outcome(&key, &res);
        results.insert(key, res);
        pb.inc(1);
    }

    pb.finish_and_clear();
    results
}
