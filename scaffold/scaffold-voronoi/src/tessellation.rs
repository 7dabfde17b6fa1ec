//! Backend-independent tessellation result and the adapter that produces it.

use nalgebra::Point3;
use scaffold_types::Aabb;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::backend::{RawTessellation, VoronoiBackend, UNBOUNDED_INDEX};
use crate::error::{VoronoiError, VoronoiResult};

/// Relative tolerance for the collinear/coplanar seed checks.
const SPAN_TOLERANCE: f64 = 1e-9;

/// The Voronoi region owned by one seed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Region {
    /// A finite region; indices into [`Tessellation::vertices`].
    Bounded(Vec<usize>),
    /// The region extends to infinity.
    Unbounded,
    /// The seed owns no region (e.g. it duplicates another seed).
    Empty,
}

impl Region {
    /// Returns true for a finite region.
    #[must_use]
    pub const fn is_bounded(&self) -> bool {
        matches!(self, Self::Bounded(_))
    }

    /// Vertex indices of a bounded region.
    #[must_use]
    pub fn vertex_indices(&self) -> Option<&[usize]> {
        match self {
            Self::Bounded(indices) => Some(indices),
            Self::Unbounded | Self::Empty => None,
        }
    }
}

/// Region counts of a tessellation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TessellationSummary {
    /// Backend that produced the diagram.
    pub backend: String,
    /// Number of seeds (one region each).
    pub seeds: usize,
    /// Number of distinct Voronoi vertices.
    pub vertices: usize,
    /// Finite regions.
    pub bounded: usize,
    /// Regions extending to infinity.
    pub unbounded: usize,
    /// Seeds without a region.
    pub empty: usize,
}

/// A Voronoi diagram with one [`Region`] per seed, in seed order.
#[derive(Debug, Clone, PartialEq)]
pub struct Tessellation {
    /// Global vertex array.
    pub vertices: Vec<Point3<f64>>,
    /// Region of each seed.
    pub regions: Vec<Region>,
    /// Name of the backend that computed it.
    pub backend: &'static str,
}

impl Tessellation {
    /// Number of regions (equal to the number of seeds).
    #[must_use]
    pub fn len(&self) -> usize {
        self.regions.len()
    }

    /// Returns true if there are no regions.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.regions.is_empty()
    }

    /// Region of seed `index`.
    #[must_use]
    pub fn region(&self, index: usize) -> Option<&Region> {
        self.regions.get(index)
    }

    /// Resolved vertex coordinates of a bounded region.
    #[must_use]
    pub fn cell_vertices(&self, index: usize) -> Option<Vec<Point3<f64>>> {
        let indices = self.region(index)?.vertex_indices()?;
        Some(indices.iter().map(|&i| self.vertices[i]).collect())
    }

    /// Count regions by kind.
    #[must_use]
    pub fn summary(&self) -> TessellationSummary {
        let mut summary = TessellationSummary {
            backend: self.backend.to_string(),
            seeds: self.regions.len(),
            vertices: self.vertices.len(),
            ..TessellationSummary::default()
        };
        for region in &self.regions {
            match region {
                Region::Bounded(_) => summary.bounded += 1,
                Region::Unbounded => summary.unbounded += 1,
                Region::Empty => summary.empty += 1,
            }
        }
        summary
    }
}

/// Compute the Voronoi diagram of `seeds` with the given backend.
///
/// The seeds are checked first: fewer than four, all coincident, collinear
/// or coplanar seeds cannot produce a 3D diagram.
///
/// # Errors
///
/// - [`VoronoiError::InsufficientSeeds`] for degenerate seed sets.
/// - [`VoronoiError::Backend`] if the backend fails or returns regions that
///   do not match the seeds or reference missing vertices.
///
/// # Example
///
/// ```
/// use nalgebra::Point3;
/// use scaffold_voronoi::{tessellate, ClippingVoronoi, VoronoiError};
///
/// let coplanar = vec![
///     Point3::new(0.0, 0.0, 0.0),
///     Point3::new(1.0, 0.0, 0.0),
///     Point3::new(0.0, 1.0, 0.0),
///     Point3::new(1.0, 1.0, 0.0),
/// ];
/// let err = tessellate(&coplanar, &ClippingVoronoi::default()).unwrap_err();
/// assert!(matches!(err, VoronoiError::InsufficientSeeds { count: 4, .. }));
/// ```
pub fn tessellate<B: VoronoiBackend + ?Sized>(
    seeds: &[Point3<f64>],
    backend: &B,
) -> VoronoiResult<Tessellation> {
    check_spanning(seeds)?;

    let raw = backend.compute(seeds)?;
    let tessellation = translate(raw, seeds.len(), backend.name())?;

    let summary = tessellation.summary();
    info!(
        backend = %summary.backend,
        seeds = summary.seeds,
        vertices = summary.vertices,
        bounded = summary.bounded,
        unbounded = summary.unbounded,
        empty = summary.empty,
        "Tessellated seeds"
    );

    Ok(tessellation)
}

/// Reject seed sets that do not span a volume.
fn check_spanning(points: &[Point3<f64>]) -> VoronoiResult<()> {
    let count = points.len();
    if count < 4 {
        return Err(VoronoiError::insufficient(
            count,
            "at least 4 seeds are required for a 3D tessellation",
        ));
    }
    if let Some(i) = points.iter().position(|p| !p.coords.iter().all(|c| c.is_finite())) {
        return Err(VoronoiError::insufficient(
            count,
            format!("seed {i} has a non-finite coordinate"),
        ));
    }

    let tol = SPAN_TOLERANCE * Aabb::from_points(points.iter()).diagonal();

    let first = points[0];
    let (_, a) = farthest(points, |p| (p - first).norm());
    let (spread, b) = farthest(points, |p| (p - a).norm());
    if spread <= tol {
        return Err(VoronoiError::insufficient(count, "all seeds coincide"));
    }

    let axis = (b - a) / spread;
    let (off_line, c) = farthest(points, |p| (p - a).cross(&axis).norm());
    if off_line <= tol {
        return Err(VoronoiError::insufficient(count, "all seeds are collinear"));
    }

    let normal = (b - a).cross(&(c - a)).normalize();
    let (off_plane, _) = farthest(points, |p| normal.dot(&(p - a)).abs());
    if off_plane <= tol {
        return Err(VoronoiError::insufficient(count, "all seeds are coplanar"));
    }

    Ok(())
}

/// The point maximising `metric`, with its score. `points` must be non-empty.
fn farthest(points: &[Point3<f64>], metric: impl Fn(&Point3<f64>) -> f64) -> (f64, Point3<f64>) {
    points
        .iter()
        .map(|p| (metric(p), *p))
        .max_by(|x, y| x.0.total_cmp(&y.0))
        .unwrap_or((0.0, Point3::origin()))
}

/// Convert signed backend regions into [`Region`]s, validating every index.
fn translate(
    raw: RawTessellation,
    seed_count: usize,
    backend: &'static str,
) -> VoronoiResult<Tessellation> {
    let malformed = |message: String| VoronoiError::Backend { backend, message };

    if raw.regions.len() != seed_count {
        return Err(malformed(format!(
            "returned {} regions for {seed_count} seeds",
            raw.regions.len()
        )));
    }

    let vertex_count = raw.vertices.len();
    let mut regions = Vec::with_capacity(seed_count);
    for (seed, signed) in raw.regions.iter().enumerate() {
        if signed.is_empty() {
            regions.push(Region::Empty);
            continue;
        }
        let mut indices = Vec::with_capacity(signed.len());
        let mut unbounded = false;
        for &index in signed {
            if index == UNBOUNDED_INDEX {
                unbounded = true;
            } else {
                match usize::try_from(index) {
                    Ok(i) if i < vertex_count => indices.push(i),
                    _ => {
                        return Err(malformed(format!(
                            "region {seed} references vertex {index}, only {vertex_count} exist"
                        )))
                    }
                }
            }
        }
        regions.push(if unbounded {
            Region::Unbounded
        } else {
            Region::Bounded(indices)
        });
    }

    Ok(Tessellation {
        vertices: raw.vertices,
        regions,
        backend,
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::clip::ClippingVoronoi;

    /// Backend returning a fixed answer.
    struct Canned(RawTessellation);

    impl VoronoiBackend for Canned {
        fn name(&self) -> &'static str {
            "canned"
        }

        fn compute(&self, _points: &[Point3<f64>]) -> VoronoiResult<RawTessellation> {
            Ok(self.0.clone())
        }
    }

    fn tetra() -> Vec<Point3<f64>> {
        vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(0.0, 1.0, 0.0),
            Point3::new(0.0, 0.0, 1.0),
        ]
    }

    fn reason(err: VoronoiError) -> String {
        match err {
            VoronoiError::InsufficientSeeds { reason, .. } => reason,
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_too_few_seeds() {
        let err = tessellate(&tetra()[..3], &ClippingVoronoi::default()).unwrap_err();
        assert!(matches!(err, VoronoiError::InsufficientSeeds { count: 3, .. }));

        let err = tessellate(&[], &ClippingVoronoi::default()).unwrap_err();
        assert!(matches!(err, VoronoiError::InsufficientSeeds { count: 0, .. }));
    }

    #[test]
    fn test_degenerate_configurations() {
        let backend = ClippingVoronoi::default();

        let same = vec![Point3::new(2.0, 2.0, 2.0); 6];
        assert!(reason(tessellate(&same, &backend).unwrap_err()).contains("coincide"));

        let line: Vec<_> = (0..5).map(|i| Point3::new(f64::from(i), 2.0 * f64::from(i), 0.0)).collect();
        assert!(reason(tessellate(&line, &backend).unwrap_err()).contains("collinear"));

        let plane: Vec<_> = (0..6)
            .map(|i| Point3::new(f64::from(i % 3), f64::from(i / 3), 5.0))
            .collect();
        assert!(reason(tessellate(&plane, &backend).unwrap_err()).contains("coplanar"));

        let mut bad = tetra();
        bad[2].y = f64::NAN;
        assert!(reason(tessellate(&bad, &backend).unwrap_err()).contains("non-finite"));
    }

    #[test]
    fn test_translate_regions() {
        let raw = RawTessellation {
            vertices: vec![Point3::origin(), Point3::new(1.0, 0.0, 0.0)],
            regions: vec![vec![0, 1], vec![UNBOUNDED_INDEX, 1], vec![], vec![1, 0]],
        };
        let tess = tessellate(&tetra(), &Canned(raw)).unwrap();
        assert_eq!(tess.regions[0], Region::Bounded(vec![0, 1]));
        assert_eq!(tess.regions[1], Region::Unbounded);
        assert_eq!(tess.regions[2], Region::Empty);
        assert_eq!(tess.cell_vertices(3).unwrap().len(), 2);
        assert!(tess.cell_vertices(1).is_none());

        let summary = tess.summary();
        assert_eq!(summary.backend, "canned");
        assert_eq!((summary.bounded, summary.unbounded, summary.empty), (2, 1, 1));
    }

    #[test]
    fn test_malformed_backend_output() {
        let wrong_count = RawTessellation {
            vertices: vec![Point3::origin()],
            regions: vec![vec![0]],
        };
        let err = tessellate(&tetra(), &Canned(wrong_count)).unwrap_err();
        assert!(matches!(err, VoronoiError::Backend { backend: "canned", .. }));

        let out_of_range = RawTessellation {
            vertices: vec![Point3::origin()],
            regions: vec![vec![0], vec![1], vec![], vec![]],
        };
        assert!(tessellate(&tetra(), &Canned(out_of_range)).is_err());

        let bad_sentinel = RawTessellation {
            vertices: vec![Point3::origin()],
            regions: vec![vec![0], vec![-2], vec![], vec![]],
        };
        assert!(tessellate(&tetra(), &Canned(bad_sentinel)).is_err());
    }

    #[test]
    fn test_backend_by_reference() {
        let backend = ClippingVoronoi::default();
        let by_ref: &dyn VoronoiBackend = &backend;
        let tess = tessellate(&tetra(), by_ref).unwrap();
        assert_eq!(tess.len(), 4);
        // Four points on a tetrahedron are all on the hull
        assert_eq!(tess.summary().unbounded, 4);
    }
}
