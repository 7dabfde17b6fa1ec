//! Parameters for cell meshing.

use serde::{Deserialize, Serialize};

use crate::error::{MeshError, MeshResult};

/// How the facets of a cell are enumerated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FacetStrategy {
    /// Only the faces of the cell's convex hull, wound outward.
    #[default]
    ConvexHull,
    /// One facet per 3-combination of cell vertices, normals pointing away
    /// from the seed.
    ///
    /// Produces `n(n-1)(n-2)/6` facets for an `n`-vertex cell, most of them
    /// inside the cell. Kept for compatibility with older scaffold exports.
    AllTriples,
}

/// Parameters for [`build_mesh`](crate::build_mesh).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MeshParams {
    /// Facet enumeration strategy. Default: [`FacetStrategy::ConvexHull`]
    #[serde(default)]
    pub strategy: FacetStrategy,

    /// Solid name written to the STL header. Default: `"scaffold"`
    #[serde(default = "default_solid_name")]
    pub solid_name: String,
}

fn default_solid_name() -> String {
    "scaffold".to_string()
}

impl Default for MeshParams {
    fn default() -> Self {
        Self {
            strategy: FacetStrategy::default(),
            solid_name: default_solid_name(),
        }
    }
}

impl MeshParams {
    /// Default parameters (convex-hull facets).
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parameters reproducing the all-triples facet soup.
    #[must_use]
    pub fn all_triples() -> Self {
        Self {
            strategy: FacetStrategy::AllTriples,
            ..Self::default()
        }
    }

    /// Set the facet strategy.
    #[must_use]
    pub const fn with_strategy(mut self, strategy: FacetStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    /// Set the STL solid name.
    #[must_use]
    pub fn with_solid_name(mut self, name: impl Into<String>) -> Self {
        self.solid_name = name.into();
        self
    }

    /// Check the solid name can be written on a single STL header line.
    ///
    /// # Errors
    ///
    /// Returns [`MeshError::InvalidSolidName`] if the name is empty or contains
    /// whitespace other than plain spaces.
    pub fn validate(&self) -> MeshResult<()> {
        let blank = self.solid_name.trim().is_empty();
        let multiline = self
            .solid_name
            .chars()
            .any(|c| c.is_whitespace() && c != ' ');
        if blank || multiline {
            return Err(MeshError::InvalidSolidName(self.solid_name.clone()));
        }
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let params = MeshParams::new();
        assert_eq!(params.strategy, FacetStrategy::ConvexHull);
        assert_eq!(params.solid_name, "scaffold");
        assert!(params.validate().is_ok());
        assert_eq!(MeshParams::all_triples().strategy, FacetStrategy::AllTriples);
    }

    #[test]
    fn test_validate_solid_name() {
        assert!(MeshParams::new().with_solid_name("").validate().is_err());
        assert!(MeshParams::new().with_solid_name("a\nb").validate().is_err());
        assert!(MeshParams::new()
            .with_solid_name("gradient scaffold")
            .validate()
            .is_ok());
    }

    #[test]
    fn test_serde() {
        let params: MeshParams = serde_json::from_str(r#"{"strategy": "all_triples"}"#).unwrap();
        assert_eq!(params.strategy, FacetStrategy::AllTriples);
        assert_eq!(params.solid_name, "scaffold");
    }
}
