use thiserror::Error;

#[derive(Error, Debug)]
pub enum LapError {
    #[error("Shape mismatch in {context}: {left} vs {right} samples")]
    ShapeMismatch {
        context: &'static str,
        left: usize,
        right: usize,
    },

    #[error("Time series is not sorted in ascending order: {0}")]
    UnsortedSeries(String),

    #[error("No common time stamps between the two spacecraft")]
    NoCommonTimes,

    #[error("No sample found in the requested window: {0}")]
    NoSampleInWindow(String),

    #[error("No data from the second spacecraft in the search window [{start}, {end}]")]
    NoDataInSearchWindow { start: String, end: String },

    #[error("All invariant-coordinate values are missing in {0}")]
    AllInvariantMissing(String),

    #[error("Invariant-coordinate ranges of the two spacecraft do not overlap in the window")]
    NoInvariantOverlap,

    #[error("Non-finite time offset: {0}")]
    NonFiniteOffset(String),

    #[error("Invalid lapping parameter: {0}")]
    InvalidLapParameter(String),

    #[error("Magnetic field model failure: {0}")]
    MagneticModelFailure(String),

    #[error("Required column not found: {0}")]
    MissingColumn(String),

    #[error("Unable to parse value: {0}")]
    ParseError(String),

    #[error("Unable to perform file operation: {0}")]
    IoError(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),
}

impl LapError {
    /// Return `true` for the "no conjunction in window" class of failures.
    ///
    /// These are expected outcomes for a spacecraft pair or a day without usable
    /// overlap: batch callers skip them and continue instead of aborting.
    pub fn is_no_conjunction(&self) -> bool {
        matches!(
            self,
            LapError::NoCommonTimes
                | LapError::NoSampleInWindow(_)
                | LapError::NoDataInSearchWindow { .. }
                | LapError::AllInvariantMissing(_)
                | LapError::NoInvariantOverlap
        )
    }
}

impl PartialEq for LapError {
    fn eq(&self, other: &Self) -> bool {
        use LapError::*;
        match (self, other) {
            (
                ShapeMismatch {
                    context: c1,
                    left: l1,
                    right: r1,
                },
                ShapeMismatch {
                    context: c2,
                    left: l2,
                    right: r2,
                },
            ) => c1 == c2 && l1 == l2 && r1 == r2,
            (UnsortedSeries(a), UnsortedSeries(b)) => a == b,
            (NoSampleInWindow(a), NoSampleInWindow(b)) => a == b,
            (
                NoDataInSearchWindow { start: s1, end: e1 },
                NoDataInSearchWindow { start: s2, end: e2 },
            ) => s1 == s2 && e1 == e2,
            (AllInvariantMissing(a), AllInvariantMissing(b)) => a == b,
            (NonFiniteOffset(a), NonFiniteOffset(b)) => a == b,
            (InvalidLapParameter(a), InvalidLapParameter(b)) => a == b,
            (MagneticModelFailure(a), MagneticModelFailure(b)) => a == b,
            (MissingColumn(a), MissingColumn(b)) => a == b,
            (ParseError(a), ParseError(b)) => a == b,

            // not comparable: equal when the variant matches
            (IoError(_), IoError(_)) => true,
            (CsvError(_), CsvError(_)) => true,

            (NoCommonTimes, NoCommonTimes) => true,
            (NoInvariantOverlap, NoInvariantOverlap) => true,

            _ => false,
        }
    }
}
