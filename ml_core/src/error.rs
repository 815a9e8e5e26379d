use std::fmt;

/// Errors produced while fitting or applying a model when inputs are invalid.
#[derive(Debug, PartialEq)]
pub enum MlError {
    /// An input is invalid for semantic or domain reasons.
    InvalidInput(&'static str),

    /// A shape invariant was violated (e.g. mismatched lengths).
    ShapeMismatch {
        /// Human-readable context for the mismatch (e.g. "features", "targets").
        what: &'static str,
        /// Observed value.
        got: usize,
        /// Expected value.
        expected: usize,
    },

    /// Fitting requires at least `needed` samples.
    NotEnoughSamples { got: usize, needed: usize },
}

impl fmt::Display for MlError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MlError::InvalidInput(msg) => write!(f, "invalid input: {msg}"),
            MlError::ShapeMismatch {
                what,
                got,
                expected,
            } => {
                write!(f, "shape mismatch for {what}: got {got}, expected {expected}")
            }
            MlError::NotEnoughSamples { got, needed } => {
                write!(f, "not enough samples: got {got}, need at least {needed}")
            }
        }
    }
}

impl std::error::Error for MlError {}
