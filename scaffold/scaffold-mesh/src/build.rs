//! Triangulate interior cells into one facet soup.

// Facet counts don't overflow in practice
#![allow(clippy::cast_precision_loss)]

use scaffold_types::{Cell, Facet, TriangleMesh};
use tracing::{debug, info};

use crate::hull::ConvexHull;
use crate::params::{FacetStrategy, MeshParams};

/// Result of [`build_mesh`].
#[derive(Debug, Clone, Default)]
pub struct MeshBuildResult {
    /// All facets of all meshed cells.
    pub mesh: TriangleMesh,

    /// Cells that contributed at least one facet attempt.
    pub cells_meshed: usize,

    /// Cells with fewer than three vertices.
    pub cells_skipped: usize,

    /// Cells meshed with all triples because their hull was degenerate
    /// (three vertices, or all vertices coplanar).
    pub hull_fallbacks: usize,

    /// Near-zero-area facets that were dropped.
    pub degenerate_facets: usize,
}

impl MeshBuildResult {
    /// Number of facets in the mesh.
    #[must_use]
    pub fn facet_count(&self) -> usize {
        self.mesh.len()
    }

    /// Mean facets per meshed cell.
    #[must_use]
    pub fn facets_per_cell(&self) -> f64 {
        if self.cells_meshed == 0 {
            0.0
        } else {
            self.mesh.len() as f64 / self.cells_meshed as f64
        }
    }
}

impl std::fmt::Display for MeshBuildResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Mesh: {} facets from {} cells ({} skipped, {} degenerate facets dropped)",
            self.mesh.len(),
            self.cells_meshed,
            self.cells_skipped,
            self.degenerate_facets
        )
    }
}

/// Triangulate every cell and collect the facets into one mesh.
///
/// Degenerate facets are dropped and counted, never reported as errors. The
/// result is a facet soup: neighbouring cells repeat their shared faces and no
/// vertices are merged.
///
/// # Example
///
/// ```
/// use scaffold_mesh::{build_mesh, MeshParams};
/// use scaffold_types::{Cell, Point3};
///
/// let mut corners = Vec::new();
/// for x in [0.0, 1.0] {
///     for y in [0.0, 1.0] {
///         for z in [0.0, 1.0] {
///             corners.push(Point3::new(x, y, z));
///         }
///     }
/// }
/// let cell = Cell::new(0, Point3::new(0.5, 0.5, 0.5), corners);
///
/// let hull = build_mesh(std::slice::from_ref(&cell), &MeshParams::default());
/// assert_eq!(hull.facet_count(), 12);
///
/// // 8 choose 3
/// let triples = build_mesh(&[cell], &MeshParams::all_triples());
/// assert_eq!(triples.facet_count(), 56);
/// ```
#[must_use]
pub fn build_mesh(cells: &[Cell], params: &MeshParams) -> MeshBuildResult {
    let mut result = MeshBuildResult::default();

    for cell in cells {
        if cell.vertex_count() < 3 {
            debug!(
                seed = cell.seed_index,
                vertices = cell.vertex_count(),
                "Skipping cell with too few vertices"
            );
            result.cells_skipped += 1;
            continue;
        }

        match params.strategy {
            FacetStrategy::ConvexHull => match ConvexHull::new(&cell.vertices) {
                Ok(hull) => {
                    for facet in hull.facets() {
                        match facet {
                            Some(facet) => result.mesh.push(facet),
                            None => result.degenerate_facets += 1,
                        }
                    }
                }
                Err(err) => {
                    debug!(
                        seed = cell.seed_index,
                        error = %err,
                        "Hull unavailable, meshing all vertex triples"
                    );
                    result.hull_fallbacks += 1;
                    push_all_triples(cell, &mut result);
                }
            },
            FacetStrategy::AllTriples => push_all_triples(cell, &mut result),
        }
        result.cells_meshed += 1;
    }

    if result.degenerate_facets > 0 {
        debug!(
            count = result.degenerate_facets,
            "Dropped degenerate facets"
        );
    }
    info!(
        facets = result.mesh.len(),
        cells = result.cells_meshed,
        skipped = result.cells_skipped,
        fallbacks = result.hull_fallbacks,
        degenerate = result.degenerate_facets,
        "Built scaffold mesh"
    );

    result
}

/// One facet per vertex triple, normal turned away from the seed.
fn push_all_triples(cell: &Cell, result: &mut MeshBuildResult) {
    let v = &cell.vertices;
    let n = v.len();
    for i in 0..n {
        for j in (i + 1)..n {
            for k in (j + 1)..n {
                match Facet::from_vertices(v[i], v[j], v[k]) {
                    Some(facet) => {
                        let outward = facet.normal.dot(&(facet.centroid() - cell.center)) >= 0.0;
                        result.mesh.push(if outward { facet } else { facet.flipped() });
                    }
                    None => result.degenerate_facets += 1,
                }
            }
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use scaffold_types::Point3;

    fn cube_cell(seed_index: usize, origin: Point3<f64>, size: f64) -> Cell {
        let mut vertices = Vec::new();
        for x in [0.0, size] {
            for y in [0.0, size] {
                for z in [0.0, size] {
                    vertices.push(origin + nalgebra::Vector3::new(x, y, z));
                }
            }
        }
        let half = size / 2.0;
        Cell::new(
            seed_index,
            origin + nalgebra::Vector3::new(half, half, half),
            vertices,
        )
    }

    #[test]
    fn test_hull_strategy_outward_normals() {
        let cell = cube_cell(0, Point3::new(10.0, 20.0, 30.0), 4.0);
        let result = build_mesh(std::slice::from_ref(&cell), &MeshParams::default());
        assert_eq!(result.facet_count(), 12);
        assert_eq!(result.cells_meshed, 1);
        assert_eq!(result.hull_fallbacks, 0);
        assert_relative_eq!(result.mesh.surface_area(), 96.0, epsilon = 1e-9);
        for facet in &result.mesh {
            assert!(facet.normal.dot(&(facet.centroid() - cell.center)) > 0.0);
        }
    }

    #[test]
    fn test_all_triples_count_and_orientation() {
        let cell = cube_cell(3, Point3::origin(), 1.0);
        let result = build_mesh(std::slice::from_ref(&cell), &MeshParams::all_triples());
        // Cube corners: no three are collinear, so every triple is a facet
        assert_eq!(result.facet_count(), 56);
        assert_eq!(result.degenerate_facets, 0);
        // Diagonal planes pass through the centre, so allow rounding there
        for facet in &result.mesh {
            assert!(facet.normal.dot(&(facet.centroid() - cell.center)) > -1e-12);
        }
    }

    #[test]
    fn test_degenerate_triples_are_counted() {
        // Collinear points along one edge
        let vertices = vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(2.0, 0.0, 0.0),
            Point3::new(0.0, 1.0, 0.0),
        ];
        let cell = Cell::new(0, Point3::new(0.5, 0.5, 0.5), vertices);
        let result = build_mesh(&[cell], &MeshParams::all_triples());
        assert_eq!(result.degenerate_facets, 1);
        assert_eq!(result.facet_count(), 3);
    }

    #[test]
    fn test_small_cells_skipped_or_fall_back() {
        let two = Cell::new(
            0,
            Point3::origin(),
            vec![Point3::new(1.0, 0.0, 0.0), Point3::new(0.0, 1.0, 0.0)],
        );
        let three = Cell::new(
            1,
            Point3::new(0.0, 0.0, -1.0),
            vec![
                Point3::new(0.0, 0.0, 0.0),
                Point3::new(1.0, 0.0, 0.0),
                Point3::new(0.0, 1.0, 0.0),
            ],
        );
        let result = build_mesh(&[two, three], &MeshParams::default());
        assert_eq!(result.cells_skipped, 1);
        assert_eq!(result.cells_meshed, 1);
        assert_eq!(result.hull_fallbacks, 1);
        assert_eq!(result.facet_count(), 1);
        // Seed below the triangle, so the normal points up
        assert!(result.mesh.facets[0].normal.z > 0.0);
    }

    #[test]
    fn test_empty_input() {
        let result = build_mesh(&[], &MeshParams::default());
        assert!(result.mesh.is_empty());
        assert_relative_eq!(result.facets_per_cell(), 0.0);
        assert!(result.to_string().contains("0 facets"));
    }
}
