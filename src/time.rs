use std::str::FromStr;
use std::sync::LazyLock;

use hifitime::{Duration, Epoch};
use regex::Regex;

use crate::constants::Seconds;
use crate::lap_errors::LapError;

/// Date and time separated by a blank, as written by most ephemeris exports.
static BLANK_SEPARATED: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\d{4}-\d{2}-\d{2})\s+(\d{2}:\d{2})").expect("valid date regex")
});

/// Parse an ISO-8601 time stamp into an [`Epoch`] (UTC unless a scale is given).
///
/// Accepted forms include `2018-04-11T00:00:00`, `2018-04-11 00:00:00.250`,
/// `2018-04-11T00:00:00Z` and hifitime's own `2018-04-11T00:00:00 UTC`.
///
/// Argument
/// --------
/// * `date`: the time stamp as read from a file
///
/// Return
/// ------
/// * the parsed epoch, or [`LapError::ParseError`] naming the offending string
pub fn parse_epoch(date: &str) -> Result<Epoch, LapError> {
    let trimmed = date.trim();
    let trimmed = trimmed.strip_suffix('Z').unwrap_or(trimmed);
    let normalized = BLANK_SEPARATED.replace(trimmed, "${1}T${2}");

    Epoch::from_str(&normalized)
        .map_err(|e| LapError::ParseError(format!("invalid time stamp '{date}': {e}")))
}

/// Transformation from a list of ISO-8601 strings to epochs
///
/// Argument
/// --------
/// * `dates`: time stamps in the format YYYY-MM-ddTHH:mm:ss
///
/// Return
/// ------
/// * the epochs in the same order, or the first parse error
pub fn epochs_from_str(dates: &[&str]) -> Result<Vec<Epoch>, LapError> {
    dates.iter().map(|d| parse_epoch(d)).collect()
}

/// Signed number of seconds from `from` to `to`.
#[inline]
pub fn seconds_between(from: Epoch, to: Epoch) -> Seconds {
    (to - from).to_seconds()
}

/// Shift an epoch by a signed number of seconds.
///
/// `seconds` must be finite; hifitime panics otherwise. Use [`try_shift_epoch`] when the
/// offset is derived from data.
#[inline]
pub fn shift_epoch(epoch: Epoch, seconds: Seconds) -> Epoch {
    epoch + Duration::from_seconds(seconds)
}

/// Shift an epoch by a signed number of seconds computed from data.
///
/// Return
/// ------
/// * `Err(LapError::NonFiniteOffset)` when `seconds` is NaN or infinite, naming `what`
pub fn try_shift_epoch(epoch: Epoch, seconds: Seconds, what: &str) -> Result<Epoch, LapError> {
    if !seconds.is_finite() {
        return Err(LapError::NonFiniteOffset(format!("{what} = {seconds}")));
    }
    Ok(shift_epoch(epoch, seconds))
}

/// Index of the first sample strictly later than `t` in an ascending series.
///
/// Return
/// ------
/// * `None` when every sample is at or before `t`
pub fn first_index_after(epochs: &[Epoch], t: Epoch) -> Option<usize> {
    let idx = epochs.partition_point(|e| *e <= t);
    (idx < epochs.len()).then_some(idx)
}

/// Check that a series is sorted in ascending (non-strict) order.
pub fn is_ascending<T: PartialOrd>(values: &[T]) -> bool {
    values.windows(2).all(|w| w[0] <= w[1])
}
