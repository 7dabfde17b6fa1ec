//! Error types for scaffold analysis.

use thiserror::Error;

/// Result type for scaffold analysis.
pub type AnalysisResult<T> = Result<T, AnalysisError>;

/// Errors that can occur while computing statistics.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AnalysisError {
    /// No interior cell survived extraction, so no statistic is defined.
    #[error(
        "no interior cells to analyse; raise the layer densities or enlarge the domain so whole cells fit inside it"
    )]
    NoInteriorCells,

    /// The plausible biomimetic ratio range is empty or not finite.
    #[error("plausible ratio range must satisfy 0 < min <= max, got [{min}, {max}]")]
    InvalidPlausibleRange {
        /// Lower bound.
        min: f64,
        /// Upper bound.
        max: f64,
    },
}
