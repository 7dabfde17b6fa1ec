//! Facet-soup triangle mesh.

use serde::{Deserialize, Serialize};

use crate::bounds::Aabb;
use crate::facet::Facet;

/// An unordered list of facets.
///
/// Each facet owns its three corners; there is no vertex sharing and no
/// edge topology, which matches what STL stores.
///
/// # Example
///
/// ```
/// use scaffold_types::{Facet, Point3, TriangleMesh};
///
/// let mut mesh = TriangleMesh::new();
/// if let Some(facet) = Facet::from_vertices(
///     Point3::new(0.0, 0.0, 0.0),
///     Point3::new(1.0, 0.0, 0.0),
///     Point3::new(0.0, 1.0, 0.0),
/// ) {
///     mesh.push(facet);
/// }
/// assert_eq!(mesh.len(), 1);
/// assert!((mesh.surface_area() - 0.5).abs() < 1e-12);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TriangleMesh {
    /// The facets, in generation order.
    pub facets: Vec<Facet>,
}

impl TriangleMesh {
    /// Create an empty mesh.
    #[must_use]
    pub const fn new() -> Self {
        Self { facets: Vec::new() }
    }

    /// Create an empty mesh with room for `capacity` facets.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            facets: Vec::with_capacity(capacity),
        }
    }

    /// Append one facet.
    pub fn push(&mut self, facet: Facet) {
        self.facets.push(facet);
    }

    /// Number of facets.
    #[must_use]
    pub fn len(&self) -> usize {
        self.facets.len()
    }

    /// Returns true if the mesh has no facets.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.facets.is_empty()
    }

    /// Iterate over the facets.
    pub fn iter(&self) -> std::slice::Iter<'_, Facet> {
        self.facets.iter()
    }

    /// Sum of facet areas.
    #[must_use]
    pub fn surface_area(&self) -> f64 {
        self.facets.iter().map(Facet::area).sum()
    }

    /// Bounding box of all facet corners.
    #[must_use]
    pub fn bounds(&self) -> Aabb {
        Aabb::from_points(self.facets.iter().flat_map(|f| f.vertices.iter()))
    }
}

impl Extend<Facet> for TriangleMesh {
    fn extend<I: IntoIterator<Item = Facet>>(&mut self, iter: I) {
        self.facets.extend(iter);
    }
}

impl FromIterator<Facet> for TriangleMesh {
    fn from_iter<I: IntoIterator<Item = Facet>>(iter: I) -> Self {
        Self {
            facets: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a TriangleMesh {
    type Item = &'a Facet;
    type IntoIter = std::slice::Iter<'a, Facet>;

    fn into_iter(self) -> Self::IntoIter {
        self.facets.iter()
    }
}
