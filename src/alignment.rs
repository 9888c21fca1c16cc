//! # Exact time-key alignment of two sampled series
//!
//! Two spacecraft ephemerides are usually resampled to a shared grid (e.g. whole UTC
//! seconds) so their common instants can be found by an **exact** intersection of the time
//! keys. No interpolation happens here: interpolating positions would hide data gaps.
//!
//! ## Semantics
//!
//! [`align_times`] is a many-to-many join on equal keys: a time stamp occurring `m` times
//! on A and `n` times on B yields the `m × n` index pairs. The two index lists therefore
//! have the same length, `a[k]` and `b[k]` always point at equal keys, and the multiset
//! of selected A keys equals the multiset of selected B keys.
//!
//! Selected keys are non-decreasing on both sides. Within a duplicated key the A index is
//! repeated while the B indices cycle, so an index may appear more than once.
//!
//! The inputs must be sorted ascending; the join is a single merge, linear in the input
//! length plus the number of emitted pairs.
use std::cmp::Ordering;

use crate::lap_errors::LapError;
use crate::time::is_ascending;

/// Indices selected on each side of an alignment.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AlignedIndices {
    pub a: Vec<usize>,
    pub b: Vec<usize>,
}

impl AlignedIndices {
    /// `true` when the two series share no time stamp.
    pub fn is_empty(&self) -> bool {
        self.a.is_empty() && self.b.is_empty()
    }

    /// Number of aligned pairs.
    pub fn len(&self) -> usize {
        self.a.len()
    }

    /// `true` when no index is repeated, i.e. no selected time stamp was duplicated.
    pub fn is_one_to_one(&self) -> bool {
        self.a.windows(2).all(|w| w[0] < w[1]) && self.b.windows(2).all(|w| w[0] < w[1])
    }
}

/// Intersect two ascending time-key sequences.
///
/// Arguments
/// -----------------
/// * `a`, `b`: ascending keys (typically [`hifitime::Epoch`]), duplicates allowed.
///
/// Return
/// ----------
/// * Paired indices of equal keys, of equal length on both sides.
/// * `Err(LapError::UnsortedSeries)` if either input is not ascending.
///
/// Complexity
/// ----------
/// `O(len(a) + len(b) + pairs)`.
pub fn align_times<T: PartialOrd>(a: &[T], b: &[T]) -> Result<AlignedIndices, LapError> {
    if !is_ascending(a) {
        return Err(LapError::UnsortedSeries("first time series".into()));
    }
    if !is_ascending(b) {
        return Err(LapError::UnsortedSeries("second time series".into()));
    }

    let mut out = AlignedIndices::default();
    let (mut i, mut j) = (0, 0);

    while i < a.len() && j < b.len() {
        match a[i].partial_cmp(&b[j]) {
            Some(Ordering::Less) => i += 1,
            Some(Ordering::Greater) => j += 1,
            Some(Ordering::Equal) => {
                let key = &a[i];
                let a_end = i + a[i..].iter().take_while(|k| *k == key).count();
                let b_end = j + b[j..].iter().take_while(|k| *k == key).count();
                for ia in i..a_end {
                    out.a.extend(std::iter::repeat(ia).take(b_end - j));
                    out.b.extend(j..b_end);
                }
                i = a_end;
                j = b_end;
            }
            None => {
                i += 1;
                j += 1;
            }
        }
    }

    Ok(out)
}
