//! Error types for hull construction.

use thiserror::Error;

/// Result type for hull construction.
pub type MeshResult<T> = Result<T, MeshError>;

/// Errors that can occur while building a convex hull.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum MeshError {
    /// Fewer than four distinct points were supplied.
    #[error("convex hull needs at least 4 distinct points, got {count}")]
    TooFewVertices {
        /// Number of distinct points.
        count: usize,
    },

    /// The points do not span a volume.
    #[error("degenerate hull: {0}")]
    DegenerateHull(String),

    /// The STL solid name is empty or spans several lines.
    #[error("invalid STL solid name {0:?}: must be non-empty and fit on one line")]
    InvalidSolidName(String),
}
