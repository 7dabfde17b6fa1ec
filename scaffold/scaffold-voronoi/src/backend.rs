//! The tessellation capability consumed by [`tessellate`](crate::tessellate).

use nalgebra::Point3;

use crate::error::VoronoiResult;

/// Index marking a vertex at infinity in a [`RawTessellation`] region.
pub const UNBOUNDED_INDEX: i64 = -1;

/// Backend output in the usual library convention.
///
/// `regions[i]` belongs to input point `i` and lists signed indices into
/// `vertices`. A region containing [`UNBOUNDED_INDEX`] extends to infinity;
/// an empty list means the point owns no region (e.g. a duplicate seed).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawTessellation {
    /// Global vertex array.
    pub vertices: Vec<Point3<f64>>,
    /// One region per input point.
    pub regions: Vec<Vec<i64>>,
}

/// A 3D Voronoi tessellation engine.
///
/// Implementations receive points that already passed the degeneracy checks
/// in [`tessellate`](crate::tessellate): at least four of them, spanning a
/// volume.
pub trait VoronoiBackend {
    /// Short name used in error messages and logs.
    fn name(&self) -> &'static str;

    /// Compute the Voronoi diagram of `points`.
    ///
    /// # Errors
    ///
    /// Returns [`VoronoiError::Backend`](crate::VoronoiError::Backend) if the
    /// diagram cannot be computed.
    fn compute(&self, points: &[Point3<f64>]) -> VoronoiResult<RawTessellation>;
}

impl<B: VoronoiBackend + ?Sized> VoronoiBackend for &B {
    fn name(&self) -> &'static str {
        (**self).name()
    }

    fn compute(&self, points: &[Point3<f64>]) -> VoronoiResult<RawTessellation> {
        (**self).compute(points)
    }
}
