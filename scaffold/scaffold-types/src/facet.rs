//! Triangle facet with an explicit unit normal.

use nalgebra::{Point3, Vector3};
use serde::{Deserialize, Serialize};

/// Ratio below which `|e1 × e2| / max(|e1|², |e2|²)` marks a triangle as degenerate.
///
/// Scale-free, so the same threshold works for metre and micrometre domains.
pub const DEGENERATE_AREA_RATIO: f64 = 1e-12;

/// A mesh triangle: three vertices and the unit normal written to STL.
///
/// Winding is counter-clockwise when viewed from the side the normal points to.
///
/// # Example
///
/// ```
/// use scaffold_types::{Facet, Point3};
///
/// let facet = Facet::from_vertices(
///     Point3::new(0.0, 0.0, 0.0),
///     Point3::new(1.0, 0.0, 0.0),
///     Point3::new(0.0, 1.0, 0.0),
/// )
/// .unwrap();
/// assert!((facet.normal.z - 1.0).abs() < 1e-12);
///
/// // Collinear points have no normal
/// assert!(Facet::from_vertices(
///     Point3::new(0.0, 0.0, 0.0),
///     Point3::new(1.0, 0.0, 0.0),
///     Point3::new(2.0, 0.0, 0.0),
/// )
/// .is_none());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Facet {
    /// Corner positions.
    pub vertices: [Point3<f64>; 3],
    /// Unit normal.
    pub normal: Vector3<f64>,
}

impl Facet {
    /// Build a facet, computing the normal from the winding.
    ///
    /// Returns `None` when the triangle is degenerate (see [`DEGENERATE_AREA_RATIO`]).
    #[must_use]
    pub fn from_vertices(v0: Point3<f64>, v1: Point3<f64>, v2: Point3<f64>) -> Option<Self> {
        let normal = unit_normal(&v0, &v1, &v2)?;
        Some(Self {
            vertices: [v0, v1, v2],
            normal,
        })
    }

    /// Build a facet with a caller-supplied normal (e.g. parsed from a file).
    #[must_use]
    pub const fn with_normal(vertices: [Point3<f64>; 3], normal: Vector3<f64>) -> Self {
        Self { vertices, normal }
    }

    /// Triangle area.
    #[must_use]
    pub fn area(&self) -> f64 {
        let [v0, v1, v2] = &self.vertices;
        (v1 - v0).cross(&(v2 - v0)).norm() * 0.5
    }

    /// Centroid of the three corners.
    #[must_use]
    pub fn centroid(&self) -> Point3<f64> {
        let [v0, v1, v2] = &self.vertices;
        Point3::from((v0.coords + v1.coords + v2.coords) / 3.0)
    }

    /// The same triangle with reversed winding and negated normal.
    #[must_use]
    pub fn flipped(&self) -> Self {
        let [v0, v1, v2] = self.vertices;
        Self {
            vertices: [v0, v2, v1],
            normal: -self.normal,
        }
    }
}

/// Unit normal of the triangle, `None` if degenerate.
#[must_use]
pub(crate) fn unit_normal(
    v0: &Point3<f64>,
    v1: &Point3<f64>,
    v2: &Point3<f64>,
) -> Option<Vector3<f64>> {
    let e1 = v1 - v0;
    let e2 = v2 - v0;
    let scale = e1.norm_squared().max(e2.norm_squared());
    if scale <= 0.0 || !scale.is_finite() {
        return None;
    }
    let n = e1.cross(&e2);
    let len = n.norm();
    if len <= DEGENERATE_AREA_RATIO * scale {
        return None;
    }
    Some(n / len)
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_normal_and_area() {
        let facet = Facet::from_vertices(
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(2.0, 0.0, 0.0),
            Point3::new(0.0, 2.0, 0.0),
        )
        .unwrap();
        assert_relative_eq!(facet.normal.z, 1.0);
        assert_relative_eq!(facet.area(), 2.0);
    }

    #[test]
    fn test_degenerate_micrometre_scale() {
        // Tiny but well-shaped triangles are not degenerate.
        let small = Facet::from_vertices(
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1e-6, 0.0, 0.0),
            Point3::new(0.0, 1e-6, 0.0),
        );
        assert!(small.is_some());

        // Repeated vertex.
        let repeated = Facet::from_vertices(
            Point3::new(1.0, 1.0, 1.0),
            Point3::new(1.0, 1.0, 1.0),
            Point3::new(0.0, 1.0, 0.0),
        );
        assert!(repeated.is_none());

        // All three identical.
        let point = Point3::new(3.0, 3.0, 3.0);
        assert!(Facet::from_vertices(point, point, point).is_none());
    }

    #[test]
    fn test_flipped() {
        let facet = Facet::from_vertices(
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(0.0, 1.0, 0.0),
        );
        if let Some(facet) = facet {
            let flipped = facet.flipped();
            assert_relative_eq!(flipped.normal.z, -1.0);
            let recomputed = unit_normal(
                &flipped.vertices[0],
                &flipped.vertices[1],
                &flipped.vertices[2],
            );
            assert_relative_eq!(recomputed.map_or(0.0, |n| n.z), -1.0);
        } else {
            panic!("right triangle must not be degenerate");
        }
    }

    #[test]
    fn test_centroid() {
        let facet = Facet::with_normal(
            [
                Point3::new(0.0, 0.0, 0.0),
                Point3::new(3.0, 0.0, 0.0),
                Point3::new(0.0, 3.0, 3.0),
            ],
            Vector3::z(),
        );
        assert_eq!(facet.centroid(), Point3::new(1.0, 1.0, 1.0));
    }
}
