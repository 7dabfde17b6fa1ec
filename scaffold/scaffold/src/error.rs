//! Error type for whole scaffold runs.

use scaffold_analysis::AnalysisError;
use scaffold_io::IoError;
use scaffold_voronoi::VoronoiError;
use thiserror::Error;

/// Result type for scaffold runs.
pub type ScaffoldResult<T> = Result<T, ScaffoldError>;

/// A failed scaffold run, tagged with the stage that failed.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ScaffoldError {
    /// The request failed validation before any stage ran.
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// Parameters rejected, or seeds could not be placed.
    #[error("seed sampling failed: {0}")]
    Sampling(#[source] VoronoiError),

    /// The seeds could not be tessellated.
    #[error("tessellation failed: {0}")]
    Tessellation(#[source] VoronoiError),

    /// Statistics or gradient analysis failed.
    #[error("statistics failed: {0}")]
    Statistics(#[from] AnalysisError),

    /// Writing or reading the STL or sidecar failed.
    #[error("export failed: {0}")]
    Export(#[from] IoError),

    /// A request file could not be parsed or written.
    #[error("request JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl ScaffoldError {
    /// Short name of the failing stage, for logs.
    #[must_use]
    pub const fn stage(&self) -> &'static str {
        match self {
            Self::InvalidRequest(_) | Self::Json(_) => "request",
            Self::Sampling(_) => "sampling",
            Self::Tessellation(_) => "tessellation",
            Self::Statistics(_) => "statistics",
            Self::Export(_) => "export",
        }
    }
}
