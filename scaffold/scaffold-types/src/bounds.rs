//! Axis-aligned bounding box.

use nalgebra::{Point3, Vector3};
use serde::{Deserialize, Serialize};

/// An axis-aligned bounding box (AABB).
///
/// Used for the domain containment test, the far box of the tessellation
/// backend and tolerance scaling throughout the pipeline.
///
/// # Example
///
/// ```
/// use scaffold_types::{Aabb, Point3};
///
/// let aabb = Aabb::new(
///     Point3::new(0.0, 0.0, 0.0),
///     Point3::new(10.0, 10.0, 10.0),
/// );
///
/// assert!(aabb.contains(&Point3::new(5.0, 5.0, 5.0)));
/// assert!(aabb.contains(&Point3::new(10.0, 0.0, 0.0)));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Aabb {
    /// Minimum corner (smallest x, y, z values).
    pub min: Point3<f64>,
    /// Maximum corner (largest x, y, z values).
    pub max: Point3<f64>,
}

impl Aabb {
    /// Create a new AABB from two corners.
    ///
    /// The corners are sorted per axis, so argument order does not matter.
    #[must_use]
    pub fn new(min: Point3<f64>, max: Point3<f64>) -> Self {
        Self {
            min: Point3::new(min.x.min(max.x), min.y.min(max.y), min.z.min(max.z)),
            max: Point3::new(min.x.max(max.x), min.y.max(max.y), min.z.max(max.z)),
        }
    }

    /// Create an empty (inverted) AABB, the identity for [`Aabb::expand_to_include`].
    #[must_use]
    pub fn empty() -> Self {
        Self {
            min: Point3::new(f64::INFINITY, f64::INFINITY, f64::INFINITY),
            max: Point3::new(f64::NEG_INFINITY, f64::NEG_INFINITY, f64::NEG_INFINITY),
        }
    }

    /// Create the tightest AABB around a set of points.
    ///
    /// Returns an empty AABB if the iterator is empty.
    ///
    /// # Example
    ///
    /// ```
    /// use scaffold_types::{Aabb, Point3};
    ///
    /// let points = [Point3::new(1.0, 5.0, -2.0), Point3::new(3.0, 0.0, 4.0)];
    /// let aabb = Aabb::from_points(points.iter());
    /// assert_eq!(aabb.min, Point3::new(1.0, 0.0, -2.0));
    /// assert_eq!(aabb.max, Point3::new(3.0, 5.0, 4.0));
    /// ```
    #[must_use]
    pub fn from_points<'a>(points: impl Iterator<Item = &'a Point3<f64>>) -> Self {
        let mut aabb = Self::empty();
        for point in points {
            aabb.expand_to_include(point);
        }
        aabb
    }

    /// Grow the box so that it contains `point`.
    pub fn expand_to_include(&mut self, point: &Point3<f64>) {
        self.min.x = self.min.x.min(point.x);
        self.min.y = self.min.y.min(point.y);
        self.min.z = self.min.z.min(point.z);
        self.max.x = self.max.x.max(point.x);
        self.max.y = self.max.y.max(point.y);
        self.max.z = self.max.z.max(point.z);
    }

    /// Return a copy grown by `margin` on every side.
    #[must_use]
    pub fn inflated(&self, margin: f64) -> Self {
        let m = Vector3::new(margin, margin, margin);
        Self {
            min: self.min - m,
            max: self.max + m,
        }
    }

    /// Check if the AABB is empty (min > max on any axis).
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.min.x > self.max.x || self.min.y > self.max.y || self.min.z > self.max.z
    }

    #[inline]
    fn span(&self) -> Vector3<f64> {
        self.max - self.min
    }

    /// Get the volume of the AABB, 0.0 if empty.
    #[inline]
    #[must_use]
    pub fn volume(&self) -> f64 {
        if self.is_empty() {
            return 0.0;
        }
        let s = self.span();
        s.x * s.y * s.z
    }

    /// Get the length of the longest edge.
    #[inline]
    #[must_use]
    pub fn max_extent(&self) -> f64 {
        let s = self.span();
        s.x.max(s.y).max(s.z)
    }

    /// Get the diagonal length, 0.0 if empty.
    #[inline]
    #[must_use]
    pub fn diagonal(&self) -> f64 {
        if self.is_empty() {
            return 0.0;
        }
        self.span().norm()
    }

    /// Check if the AABB contains a point. Points on the boundary are inside.
    #[inline]
    #[must_use]
    pub fn contains(&self, point: &Point3<f64>) -> bool {
        point.x >= self.min.x
            && point.x <= self.max.x
            && point.y >= self.min.y
            && point.y <= self.max.y
            && point.z >= self.min.z
            && point.z <= self.max.z
    }

    /// Check whether `point` lies on the boundary of the box within `tolerance`.
    #[must_use]
    pub fn on_boundary(&self, point: &Point3<f64>, tolerance: f64) -> bool {
        (0..3).any(|axis| {
            (point[axis] - self.min[axis]).abs() <= tolerance
                || (point[axis] - self.max[axis]).abs() <= tolerance
        })
    }
}

impl Default for Aabb {
    fn default() -> Self {
        Self::empty()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_new_sorts_corners() {
        let aabb = Aabb::new(Point3::new(4.0, 0.0, 3.0), Point3::new(1.0, 2.0, -1.0));
        assert_eq!(aabb.min, Point3::new(1.0, 0.0, -1.0));
        assert_eq!(aabb.max, Point3::new(4.0, 2.0, 3.0));
    }

    #[test]
    fn test_empty_and_expand() {
        let mut aabb = Aabb::empty();
        assert!(aabb.is_empty());
        assert_relative_eq!(aabb.volume(), 0.0);
        assert_relative_eq!(aabb.diagonal(), 0.0);

        aabb.expand_to_include(&Point3::new(1.0, 1.0, 1.0));
        assert!(!aabb.is_empty());
        aabb.expand_to_include(&Point3::new(3.0, 2.0, 5.0));
        assert_relative_eq!(aabb.volume(), 2.0 * 1.0 * 4.0);
    }

    #[test]
    fn test_inflated() {
        let aabb = Aabb::new(Point3::origin(), Point3::new(1.0, 1.0, 1.0)).inflated(2.0);
        assert_eq!(aabb.min, Point3::new(-2.0, -2.0, -2.0));
        assert_eq!(aabb.max, Point3::new(3.0, 3.0, 3.0));
        assert_relative_eq!(aabb.max_extent(), 5.0);
    }

    #[test]
    fn test_contains_inclusive() {
        let aabb = Aabb::new(Point3::origin(), Point3::new(10.0, 10.0, 10.0));
        assert!(aabb.contains(&Point3::new(0.0, 10.0, 5.0)));
        assert!(!aabb.contains(&Point3::new(0.0, 10.000_001, 5.0)));
    }

    #[test]
    fn test_on_boundary() {
        let aabb = Aabb::new(Point3::origin(), Point3::new(10.0, 10.0, 10.0));
        assert!(aabb.on_boundary(&Point3::new(10.0, 3.0, 3.0), 1e-9));
        assert!(aabb.on_boundary(&Point3::new(3.0, 3.0, 1e-12), 1e-9));
        assert!(!aabb.on_boundary(&Point3::new(5.0, 5.0, 5.0), 1e-9));
    }
}
