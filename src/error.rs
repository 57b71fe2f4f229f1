//! Error types for plot construction and rendering.

use thiserror::Error;

/// Errors surfaced by element constructors and `generate`.
///
/// Every failure is synchronous and final: there is no retry, no partial
/// canvas and no degraded rendering mode. Callers that construct elements in
/// hot paths are expected to validate inputs up front.
#[derive(Debug, Error)]
pub enum PlotError {
    /// A parameter is structurally wrong (zero bin count, zero-length range).
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// A required input sequence or matrix was empty.
    #[error("{0} must not be empty")]
    EmptyInput(&'static str),

    /// The histogram counts and bin edges disagree in length.
    #[error("length mismatch: {counts} counts but {bins} bin edges")]
    LengthMismatch { counts: usize, bins: usize },

    /// A numeric or pixel range is inverted, disjoint or too small.
    #[error("range violation: {0}")]
    RangeViolation(String),

    /// The requested text color cannot be told apart from the background.
    #[error("unsupported color: {0}")]
    UnsupportedColor(String),
}

/// Standard result type for all plot operations.
pub type Result<T> = std::result::Result<T, PlotError>;
