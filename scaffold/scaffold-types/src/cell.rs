//! Interior Voronoi cell.

use nalgebra::Point3;
use serde::{Deserialize, Serialize};

use crate::bounds::Aabb;

/// One bounded Voronoi region, paired with the seed that generated it.
///
/// Vertices are kept in the order the tessellation reported them; no face
/// structure is stored.
///
/// # Example
///
/// ```
/// use scaffold_types::{Cell, Point3};
///
/// let cell = Cell::new(
///     0,
///     Point3::origin(),
///     vec![Point3::new(1.0, 0.0, 0.0), Point3::new(0.0, 3.0, 0.0)],
/// );
/// assert_eq!(cell.mean_vertex_distance(), Some(2.0));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Cell {
    /// Index of the generating seed in the run's seed list.
    pub seed_index: usize,
    /// The generating seed.
    pub center: Point3<f64>,
    /// Boundary vertices of the region.
    pub vertices: Vec<Point3<f64>>,
}

impl Cell {
    /// Create a cell.
    #[must_use]
    pub const fn new(seed_index: usize, center: Point3<f64>, vertices: Vec<Point3<f64>>) -> Self {
        Self {
            seed_index,
            center,
            vertices,
        }
    }

    /// Number of boundary vertices.
    #[must_use]
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    /// Mean Euclidean distance from the center to the boundary vertices.
    ///
    /// Returns `None` for a cell without vertices.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn mean_vertex_distance(&self) -> Option<f64> {
        if self.vertices.is_empty() {
            return None;
        }
        let total: f64 = self
            .vertices
            .iter()
            .map(|v| (v - self.center).norm())
            .sum();
        Some(total / self.vertices.len() as f64)
    }

    /// Bounding box of the boundary vertices.
    #[must_use]
    pub fn bounds(&self) -> Aabb {
        Aabb::from_points(self.vertices.iter())
    }

    /// Returns true if every vertex lies inside `bounds` (inclusive).
    #[must_use]
    pub fn is_within(&self, bounds: &Aabb) -> bool {
        self.vertices.iter().all(|v| bounds.contains(v))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn unit_cube_cell() -> Cell {
        let mut vertices = Vec::new();
        for &x in &[-1.0, 1.0] {
            for &y in &[-1.0, 1.0] {
                for &z in &[-1.0, 1.0] {
                    vertices.push(Point3::new(x, y, z));
                }
            }
        }
        Cell::new(7, Point3::origin(), vertices)
    }

    #[test]
    fn test_mean_vertex_distance() {
        let cell = unit_cube_cell();
        let d = cell.mean_vertex_distance().unwrap();
        assert_relative_eq!(d, 3.0_f64.sqrt(), epsilon = 1e-12);
    }

    #[test]
    fn test_empty_cell_has_no_distance() {
        let cell = Cell::new(0, Point3::origin(), Vec::new());
        assert!(cell.mean_vertex_distance().is_none());
        assert_eq!(cell.vertex_count(), 0);
    }

    #[test]
    fn test_is_within() {
        let cell = unit_cube_cell();
        let tight = Aabb::new(Point3::new(-1.0, -1.0, -1.0), Point3::new(1.0, 1.0, 1.0));
        let small = Aabb::new(Point3::new(-1.0, -1.0, -1.0), Point3::new(1.0, 1.0, 0.5));
        assert!(cell.is_within(&tight));
        assert!(!cell.is_within(&small));
        assert_eq!(cell.bounds(), tight);
    }
}
