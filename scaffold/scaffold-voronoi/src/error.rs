//! Error types for seed sampling and tessellation.

use thiserror::Error;

/// Result type for sampling and tessellation.
pub type VoronoiResult<T> = Result<T, VoronoiError>;

/// Errors that can occur while sampling seeds or tessellating them.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum VoronoiError {
    /// A domain dimension is non-positive or not finite.
    #[error("domain {axis} size must be positive and finite, got {value}")]
    InvalidDimension {
        /// Axis name (`x`, `y` or `z`).
        axis: char,
        /// The rejected value.
        value: f64,
    },

    /// A layer density is negative or not finite.
    #[error("density of layer '{band}' must be non-negative and finite, got {value}")]
    InvalidDensity {
        /// Name of the offending band.
        band: String,
        /// The rejected value.
        value: f64,
    },

    /// The layer bands do not partition the domain height.
    #[error("invalid layer spec: {0}")]
    InvalidLayerSpec(String),

    /// Too few seeds, or seeds that span no volume.
    #[error("cannot tessellate {count} seeds: {reason}")]
    InsufficientSeeds {
        /// Number of seeds supplied.
        count: usize,
        /// Why the seed set cannot be tessellated.
        reason: String,
    },

    /// A tessellation backend returned malformed output.
    #[error("tessellation backend '{backend}' failed: {message}")]
    Backend {
        /// Backend name.
        backend: &'static str,
        /// Description of the problem.
        message: String,
    },
}

impl VoronoiError {
    /// Create an `InsufficientSeeds` error.
    #[must_use]
    pub fn insufficient(count: usize, reason: impl Into<String>) -> Self {
        Self::InsufficientSeeds {
            count,
            reason: reason.into(),
        }
    }

    /// Returns true for the parameter-validation variants, raised before sampling.
    #[must_use]
    pub const fn is_invalid_parameter(&self) -> bool {
        matches!(
            self,
            Self::InvalidDimension { .. } | Self::InvalidDensity { .. } | Self::InvalidLayerSpec(_)
        )
    }
}
