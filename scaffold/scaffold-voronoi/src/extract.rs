//! Interior cell extraction.
//!
//! A cell is kept only if its region is finite and every vertex lies inside
//! the domain box. This filter is conservative: a cell whose seed sits well
//! inside the domain is still dropped when its region pokes through a face,
//! so edge cells are undercounted and porosity near the faces is skewed. The
//! discard counts in [`ExtractionReport`] show how large that effect is.

use nalgebra::Point3;
use scaffold_types::{Cell, Domain};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::tessellation::{Region, Tessellation};

/// Interior cells plus the number of seeds discarded for each reason.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExtractionReport {
    /// Cells fully inside the domain, in seed order.
    pub cells: Vec<Cell>,
    /// Seeds whose region extends to infinity.
    pub unbounded: usize,
    /// Seeds without a region.
    pub empty: usize,
    /// Seeds with a finite region that crosses the domain boundary.
    pub outside_domain: usize,
}

impl ExtractionReport {
    /// Number of interior cells.
    #[must_use]
    pub fn interior_count(&self) -> usize {
        self.cells.len()
    }

    /// Total number of discarded seeds.
    #[must_use]
    pub fn discarded(&self) -> usize {
        self.unbounded + self.empty + self.outside_domain
    }
}

/// Collect the cells of `tessellation` that lie entirely inside `domain`.
///
/// `seeds` and `tessellation.regions` are matched by index; seeds beyond the
/// last region (or regions beyond the last seed) are ignored.
///
/// # Example
///
/// ```
/// use nalgebra::Point3;
/// use scaffold_types::Domain;
/// use scaffold_voronoi::{extract_interior_cells, tessellate, ClippingVoronoi};
///
/// let mut seeds = Vec::new();
/// for i in 0..3 {
///     for j in 0..3 {
///         for k in 0..3 {
///             seeds.push(Point3::new(
///                 10.0 + 10.0 * f64::from(i),
///                 10.0 + 10.0 * f64::from(j),
///                 10.0 + 10.0 * f64::from(k),
///             ));
///         }
///     }
/// }
/// let tess = tessellate(&seeds, &ClippingVoronoi::default()).unwrap();
/// let report = extract_interior_cells(&seeds, &tess, &Domain::micrometers(40.0, 40.0, 40.0));
///
/// // Only the centre cell is bounded
/// assert_eq!(report.interior_count(), 1);
/// assert_eq!(report.cells[0].seed_index, 13);
/// assert_eq!(report.unbounded, 26);
/// ```
#[must_use]
pub fn extract_interior_cells(
    seeds: &[Point3<f64>],
    tessellation: &Tessellation,
    domain: &Domain,
) -> ExtractionReport {
    let bounds = domain.bounds();
    let mut report = ExtractionReport::default();

    for (seed_index, (seed, region)) in seeds.iter().zip(&tessellation.regions).enumerate() {
        let indices = match region {
            Region::Bounded(indices) => indices,
            Region::Unbounded => {
                report.unbounded += 1;
                continue;
            }
            Region::Empty => {
                report.empty += 1;
                continue;
            }
        };

        let vertices: Vec<Point3<f64>> =
            indices.iter().map(|&i| tessellation.vertices[i]).collect();
        let cell = Cell::new(seed_index, *seed, vertices);
        if cell.vertex_count() > 0 && cell.is_within(&bounds) {
            report.cells.push(cell);
        } else {
            report.outside_domain += 1;
        }
    }

    info!(
        interior = report.cells.len(),
        unbounded = report.unbounded,
        empty = report.empty,
        outside_domain = report.outside_domain,
        "Extracted interior cells"
    );

    report
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    fn tess(regions: Vec<Region>) -> Tessellation {
        Tessellation {
            vertices: vec![
                Point3::new(1.0, 1.0, 1.0),
                Point3::new(9.0, 1.0, 1.0),
                Point3::new(1.0, 9.0, 9.0),
                Point3::new(10.0, 10.0, 10.0),
                Point3::new(10.5, 5.0, 5.0),
            ],
            regions,
            backend: "test",
        }
    }

    fn seeds(n: usize) -> Vec<Point3<f64>> {
        vec![Point3::new(5.0, 5.0, 5.0); n]
    }

    #[test]
    fn test_discard_reasons() {
        let t = tess(vec![
            Region::Bounded(vec![0, 1, 2]),
            Region::Unbounded,
            Region::Empty,
            Region::Bounded(vec![0, 4]),
        ]);
        let report = extract_interior_cells(&seeds(4), &t, &Domain::micrometers(10.0, 10.0, 10.0));
        assert_eq!(report.interior_count(), 1);
        assert_eq!(report.cells[0].seed_index, 0);
        assert_eq!(report.cells[0].vertices.len(), 3);
        assert_eq!(report.unbounded, 1);
        assert_eq!(report.empty, 1);
        assert_eq!(report.outside_domain, 1);
        assert_eq!(report.discarded() + report.interior_count(), 4);
    }

    #[test]
    fn test_boundary_vertex_is_inside() {
        // Vertex exactly on the far corner counts as inside
        let t = tess(vec![Region::Bounded(vec![0, 3])]);
        let report = extract_interior_cells(&seeds(1), &t, &Domain::micrometers(10.0, 10.0, 10.0));
        assert_eq!(report.interior_count(), 1);
    }

    #[test]
    fn test_empty_index_list_is_not_interior() {
        let t = tess(vec![Region::Bounded(Vec::new())]);
        let report = extract_interior_cells(&seeds(1), &t, &Domain::micrometers(10.0, 10.0, 10.0));
        assert_eq!(report.interior_count(), 0);
        assert_eq!(report.outside_domain, 1);
    }

    #[test]
    fn test_interior_never_exceeds_seeds() {
        let t = tess(vec![Region::Bounded(vec![0, 1]); 3]);
        let report = extract_interior_cells(&seeds(2), &t, &Domain::micrometers(10.0, 10.0, 10.0));
        assert_eq!(report.interior_count(), 2);
    }
}
