//! Sampling and tessellation parameters.

use serde::{Deserialize, Serialize};

/// Controls how seed coordinates are drawn.
///
/// # Examples
///
/// ```
/// use scaffold_voronoi::SamplingParams;
///
/// // Reproducible coordinates
/// let params = SamplingParams::seeded(42);
/// assert_eq!(params.rng_seed, Some(42));
///
/// // Fresh entropy on every run
/// let params = SamplingParams::new();
/// assert!(params.rng_seed.is_none());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SamplingParams {
    /// Seed for the `ChaCha8` generator. `None` draws from OS entropy.
    #[serde(default)]
    pub rng_seed: Option<u64>,
}

impl SamplingParams {
    /// Parameters drawing from OS entropy.
    #[must_use]
    pub const fn new() -> Self {
        Self { rng_seed: None }
    }

    /// Parameters with a fixed RNG seed.
    #[must_use]
    pub const fn seeded(seed: u64) -> Self {
        Self {
            rng_seed: Some(seed),
        }
    }

    /// Sets the RNG seed.
    #[must_use]
    pub const fn with_rng_seed(mut self, seed: Option<u64>) -> Self {
        self.rng_seed = seed;
        self
    }
}

/// Tuning for [`ClippingVoronoi`](crate::ClippingVoronoi).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ClipParams {
    /// Far-box margin as a multiple of the seeds' largest extent.
    ///
    /// Cells that still touch the far box after all relevant neighbours have
    /// been clipped are reported as unbounded.
    pub far_factor: f64,

    /// Neighbours fetched in the first KD-tree query; doubled until the
    /// security radius is covered.
    pub initial_neighbors: usize,

    /// Relative tolerance for plane tests, scaled by the far-box diagonal.
    pub relative_tolerance: f64,
}

impl Default for ClipParams {
    fn default() -> Self {
        Self {
            far_factor: 8.0,
            initial_neighbors: 32,
            relative_tolerance: 1e-11,
        }
    }
}

impl ClipParams {
    /// Default clipping parameters.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the far-box factor. Values below 1.0 are raised to 1.0.
    #[must_use]
    pub const fn with_far_factor(mut self, factor: f64) -> Self {
        self.far_factor = factor.max(1.0);
        self
    }

    /// Sets the initial neighbour count. Minimum is 4.
    #[must_use]
    pub fn with_initial_neighbors(mut self, count: usize) -> Self {
        self.initial_neighbors = count.max(4);
        self
    }

    /// Sets the relative plane tolerance.
    #[must_use]
    pub const fn with_relative_tolerance(mut self, tolerance: f64) -> Self {
        self.relative_tolerance = tolerance;
        self
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn test_sampling_defaults() {
        assert_eq!(SamplingParams::default(), SamplingParams::new());
        assert_eq!(
            SamplingParams::new().with_rng_seed(Some(3)),
            SamplingParams::seeded(3)
        );
    }

    #[test]
    fn test_sampling_serde_default() {
        let params: SamplingParams = serde_json::from_str("{}").unwrap();
        assert!(params.rng_seed.is_none());
    }

    #[test]
    fn test_clip_clamping() {
        let params = ClipParams::new()
            .with_far_factor(0.1)
            .with_initial_neighbors(1);
        assert!((params.far_factor - 1.0).abs() < f64::EPSILON);
        assert_eq!(params.initial_neighbors, 4);
    }
}
