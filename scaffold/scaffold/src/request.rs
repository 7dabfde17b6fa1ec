//! Generation request: everything a run needs, loadable from JSON.

use std::path::Path;

use scaffold_analysis::{GradientParams, StatisticsParams};
use scaffold_mesh::MeshParams;
use scaffold_types::{Domain, LayerSpec};
use scaffold_voronoi::{ClipParams, SamplingParams};
use serde::{Deserialize, Serialize};

use crate::error::{ScaffoldError, ScaffoldResult};

/// Porosity recommended for bone scaffolds.
pub const DEFAULT_TARGET_POROSITY: f64 = 0.68;

fn default_target_porosity() -> f64 {
    DEFAULT_TARGET_POROSITY
}

/// Inputs of one scaffold run.
///
/// Only `domain` and `layers` are required in JSON; every other field falls
/// back to its default.
///
/// # Example
///
/// ```
/// use scaffold::ScaffoldRequest;
///
/// let request = ScaffoldRequest::from_json(
///     r#"{
///         "domain": { "x_size": 400.0, "y_size": 400.0, "z_size": 200.0 },
///         "layers": { "bands": [
///             { "name": "dense", "start": 0.0, "end": 0.5, "density": 20000.0 },
///             { "name": "open", "start": 0.5, "end": 1.0, "density": 5000.0 }
///         ] },
///         "sampling": { "rng_seed": 11 }
///     }"#,
/// )
/// .unwrap();
///
/// assert_eq!(request.layers.len(), 2);
/// assert_eq!(request.sampling.rng_seed, Some(11));
/// assert!((request.target_porosity - 0.68).abs() < 1e-12);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScaffoldRequest {
    /// Box to fill.
    pub domain: Domain,

    /// Axial bands and their seed densities.
    pub layers: LayerSpec,

    /// Desired porosity in `[0, 1]`. Recorded in the export, never enforced.
    #[serde(default = "default_target_porosity")]
    pub target_porosity: f64,

    /// RNG selection.
    #[serde(default)]
    pub sampling: SamplingParams,

    /// Tessellation backend tuning.
    #[serde(default)]
    pub clip: ClipParams,

    /// Statistics options.
    #[serde(default)]
    pub statistics: StatisticsParams,

    /// Biomimetic ratio range.
    #[serde(default)]
    pub gradient: GradientParams,

    /// Meshing options.
    #[serde(default)]
    pub mesh: MeshParams,
}

impl Default for ScaffoldRequest {
    fn default() -> Self {
        Self::bone_default()
    }
}

impl ScaffoldRequest {
    /// Request with default parameters for the given domain and layers.
    #[must_use]
    pub fn new(domain: Domain, layers: LayerSpec) -> Self {
        Self {
            domain,
            layers,
            target_porosity: DEFAULT_TARGET_POROSITY,
            sampling: SamplingParams::default(),
            clip: ClipParams::default(),
            statistics: StatisticsParams::default(),
            gradient: GradientParams::default(),
            mesh: MeshParams::default(),
        }
    }

    /// The recommended bone configuration: an 800 × 800 × 100 µm slab with
    /// 25 000 / 12 000 / 6 000 seeds/mm³ in the cortical, transition and
    /// trabecular bands, and a target porosity of 0.68.
    #[must_use]
    pub fn bone_default() -> Self {
        Self::new(
            Domain::micrometers(800.0, 800.0, 100.0),
            LayerSpec::bone(25_000.0, 12_000.0, 6_000.0),
        )
    }

    /// Set the target porosity.
    #[must_use]
    pub const fn with_target_porosity(mut self, target: f64) -> Self {
        self.target_porosity = target;
        self
    }

    /// Set the sampling parameters.
    #[must_use]
    pub const fn with_sampling(mut self, sampling: SamplingParams) -> Self {
        self.sampling = sampling;
        self
    }

    /// Fix the RNG seed for reproducible coordinates.
    #[must_use]
    pub const fn with_rng_seed(mut self, seed: u64) -> Self {
        self.sampling = SamplingParams::seeded(seed);
        self
    }

    /// Set the backend tuning.
    #[must_use]
    pub const fn with_clip(mut self, clip: ClipParams) -> Self {
        self.clip = clip;
        self
    }

    /// Set the statistics options.
    #[must_use]
    pub const fn with_statistics(mut self, statistics: StatisticsParams) -> Self {
        self.statistics = statistics;
        self
    }

    /// Set the biomimetic ratio range.
    #[must_use]
    pub const fn with_gradient(mut self, gradient: GradientParams) -> Self {
        self.gradient = gradient;
        self
    }

    /// Set the meshing options.
    #[must_use]
    pub fn with_mesh(mut self, mesh: MeshParams) -> Self {
        self.mesh = mesh;
        self
    }

    /// Check the options that no pipeline stage checks itself.
    ///
    /// Domain and layer problems are reported by seed sampling.
    ///
    /// # Errors
    ///
    /// Returns [`ScaffoldError::InvalidRequest`] if the target porosity is
    /// outside `[0, 1]`, the ratio range is invalid, or the solid name cannot
    /// be written to STL.
    pub fn validate(&self) -> ScaffoldResult<()> {
        if !(0.0..=1.0).contains(&self.target_porosity) {
            return Err(ScaffoldError::InvalidRequest(format!(
                "target porosity must be in [0, 1], got {}",
                self.target_porosity
            )));
        }
        self.gradient
            .validate()
            .map_err(|e| ScaffoldError::InvalidRequest(e.to_string()))?;
        self.mesh
            .validate()
            .map_err(|e| ScaffoldError::InvalidRequest(e.to_string()))?;
        Ok(())
    }

    /// Parse a request from JSON.
    ///
    /// # Errors
    ///
    /// Returns [`ScaffoldError::Json`] on malformed input.
    pub fn from_json(json: &str) -> ScaffoldResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Serialize the request as pretty JSON.
    ///
    /// # Errors
    ///
    /// Returns [`ScaffoldError::Json`] if serialization fails.
    pub fn to_json(&self) -> ScaffoldResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Read a request from a JSON file.
    ///
    /// # Errors
    ///
    /// Returns [`ScaffoldError::Export`] if the file cannot be read, or
    /// [`ScaffoldError::Json`] on malformed content.
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> ScaffoldResult<Self> {
        let text = std::fs::read_to_string(path).map_err(scaffold_io::IoError::from)?;
        Self::from_json(&text)
    }
}
