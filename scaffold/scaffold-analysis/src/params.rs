//! Parameters for statistics and gradient analysis.

use serde::{Deserialize, Serialize};

use crate::error::{AnalysisError, AnalysisResult};

/// Parameters for [`compute_cell_statistics`](crate::compute_cell_statistics).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct StatisticsParams {
    /// Also compute each cell's convex-hull volume and a hull-based porosity.
    ///
    /// The equivalent-sphere numbers are always reported; hull volumes are
    /// extra fields. Default: false
    #[serde(default)]
    pub compute_hull_volume: bool,
}

impl StatisticsParams {
    /// Default parameters (equivalent-sphere statistics only).
    #[must_use]
    pub const fn new() -> Self {
        Self {
            compute_hull_volume: false,
        }
    }

    /// Enable or disable hull volumes.
    #[must_use]
    pub const fn with_hull_volume(mut self, enabled: bool) -> Self {
        self.compute_hull_volume = enabled;
        self
    }
}

/// Parameters for [`analyze_gradient`](crate::analyze_gradient).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GradientParams {
    /// Smallest last-to-first band pore ratio considered biomimetic. Default: 1.5
    pub plausible_min: f64,

    /// Largest last-to-first band pore ratio considered biomimetic. Default: 6.0
    pub plausible_max: f64,
}

impl Default for GradientParams {
    fn default() -> Self {
        Self {
            plausible_min: 1.5,
            plausible_max: 6.0,
        }
    }
}

impl GradientParams {
    /// Default range `[1.5, 6.0]`.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the plausible ratio range.
    #[must_use]
    pub const fn with_plausible_range(mut self, min: f64, max: f64) -> Self {
        self.plausible_min = min;
        self.plausible_max = max;
        self
    }

    /// Returns true if `ratio` lies in the plausible range (inclusive).
    #[must_use]
    pub fn is_plausible(&self, ratio: f64) -> bool {
        (self.plausible_min..=self.plausible_max).contains(&ratio)
    }

    /// Validate the range.
    ///
    /// # Errors
    ///
    /// Returns [`AnalysisError::InvalidPlausibleRange`] unless
    /// `0 < plausible_min <= plausible_max` and both are finite.
    pub fn validate(&self) -> AnalysisResult<()> {
        let (min, max) = (self.plausible_min, self.plausible_max);
        if !min.is_finite() || !max.is_finite() || min <= 0.0 || min > max {
            return Err(AnalysisError::InvalidPlausibleRange { min, max });
        }
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn test_gradient_defaults() {
        let params = GradientParams::default();
        assert!(params.validate().is_ok());
        assert!(params.is_plausible(1.5));
        assert!(params.is_plausible(6.0));
        assert!(!params.is_plausible(1.49));
        assert!(!params.is_plausible(f64::NAN));
    }

    #[test]
    fn test_gradient_validation() {
        assert!(GradientParams::new()
            .with_plausible_range(3.0, 2.0)
            .validate()
            .is_err());
        assert!(GradientParams::new()
            .with_plausible_range(0.0, 2.0)
            .validate()
            .is_err());
        assert!(GradientParams::new()
            .with_plausible_range(2.0, f64::INFINITY)
            .validate()
            .is_err());
    }

    #[test]
    fn test_statistics_builder() {
        assert!(!StatisticsParams::default().compute_hull_volume);
        assert!(StatisticsParams::new().with_hull_volume(true).compute_hull_volume);
    }
}
