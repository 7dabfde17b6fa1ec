//! Scaffold domain box and length units.

use nalgebra::{Point3, Vector3};
use serde::{Deserialize, Serialize};

use crate::bounds::Aabb;

/// Physical length unit of domain coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LengthUnit {
    /// Metres.
    Meter,
    /// Millimetres.
    Millimeter,
    /// Micrometres, the natural scale of bone scaffold pores.
    #[default]
    Micrometer,
}

impl LengthUnit {
    /// Multiplier converting a length in this unit to millimetres.
    #[must_use]
    pub const fn to_millimeters(self) -> f64 {
        match self {
            Self::Meter => 1e3,
            Self::Millimeter => 1.0,
            Self::Micrometer => 1e-3,
        }
    }

    /// Multiplier converting a length in this unit to micrometres.
    #[must_use]
    pub const fn to_micrometers(self) -> f64 {
        match self {
            Self::Meter => 1e6,
            Self::Millimeter => 1e3,
            Self::Micrometer => 1.0,
        }
    }

    /// Short unit symbol.
    #[must_use]
    pub const fn symbol(self) -> &'static str {
        match self {
            Self::Meter => "m",
            Self::Millimeter => "mm",
            Self::Micrometer => "um",
        }
    }
}

/// The axis-aligned box `[0, x_size] × [0, y_size] × [0, z_size]` filled by a scaffold.
///
/// The height axis (Z) carries the porosity gradient.
///
/// # Example
///
/// ```
/// use scaffold_types::{Domain, LengthUnit};
///
/// let domain = Domain::new(0.8, 0.8, 0.1, LengthUnit::Millimeter);
/// assert!((domain.volume_mm3() - 0.064).abs() < 1e-12);
///
/// let same = Domain::micrometers(800.0, 800.0, 100.0);
/// assert!((same.volume_mm3() - domain.volume_mm3()).abs() < 1e-12);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Domain {
    /// Width along X.
    pub x_size: f64,
    /// Depth along Y.
    pub y_size: f64,
    /// Height along Z (gradient axis).
    pub z_size: f64,
    /// Unit of the three sizes and of every coordinate inside the domain.
    #[serde(default)]
    pub unit: LengthUnit,
}

impl Domain {
    /// Create a domain with explicit unit.
    #[must_use]
    pub const fn new(x_size: f64, y_size: f64, z_size: f64, unit: LengthUnit) -> Self {
        Self {
            x_size,
            y_size,
            z_size,
            unit,
        }
    }

    /// Create a domain measured in micrometres.
    #[must_use]
    pub const fn micrometers(x_size: f64, y_size: f64, z_size: f64) -> Self {
        Self::new(x_size, y_size, z_size, LengthUnit::Micrometer)
    }

    /// The three sizes paired with their axis names, in X, Y, Z order.
    #[must_use]
    pub const fn axes(&self) -> [(char, f64); 3] {
        [('x', self.x_size), ('y', self.y_size), ('z', self.z_size)]
    }

    /// Returns true if every size is finite and strictly positive.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.axes()
            .iter()
            .all(|&(_, size)| size.is_finite() && size > 0.0)
    }

    /// Sizes as a vector.
    #[must_use]
    pub fn size(&self) -> Vector3<f64> {
        Vector3::new(self.x_size, self.y_size, self.z_size)
    }

    /// Volume in native units cubed.
    #[must_use]
    pub fn volume(&self) -> f64 {
        self.x_size * self.y_size * self.z_size
    }

    /// Volume in cubic millimetres.
    #[must_use]
    pub fn volume_mm3(&self) -> f64 {
        self.volume() * self.unit.to_millimeters().powi(3)
    }

    /// Volume of the horizontal slab `[z_start, z_end)` in cubic millimetres.
    #[must_use]
    pub fn slab_volume_mm3(&self, z_start: f64, z_end: f64) -> f64 {
        let height = (z_end - z_start).max(0.0);
        self.x_size * self.y_size * height * self.unit.to_millimeters().powi(3)
    }

    /// Sizes converted to micrometres.
    #[must_use]
    pub fn dimensions_um(&self) -> [f64; 3] {
        let k = self.unit.to_micrometers();
        [self.x_size * k, self.y_size * k, self.z_size * k]
    }

    /// The domain as a bounding box anchored at the origin.
    #[must_use]
    pub fn bounds(&self) -> Aabb {
        Aabb::new(
            Point3::origin(),
            Point3::new(self.x_size, self.y_size, self.z_size),
        )
    }

    /// Inclusive containment test.
    #[must_use]
    pub fn contains(&self, point: &Point3<f64>) -> bool {
        self.bounds().contains(point)
    }
}

impl Default for Domain {
    /// The 800 × 800 × 100 µm scaffold patch used throughout the bone presets.
    fn default() -> Self {
        Self::micrometers(800.0, 800.0, 100.0)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_unit_factors() {
        assert_relative_eq!(LengthUnit::Meter.to_millimeters(), 1000.0);
        assert_relative_eq!(LengthUnit::Micrometer.to_millimeters(), 0.001);
        assert_relative_eq!(LengthUnit::Millimeter.to_micrometers(), 1000.0);
        assert_eq!(LengthUnit::Micrometer.symbol(), "um");
    }

    #[test]
    fn test_volume_conversions() {
        let meters = Domain::new(800e-6, 800e-6, 100e-6, LengthUnit::Meter);
        let micros = Domain::micrometers(800.0, 800.0, 100.0);
        assert_relative_eq!(meters.volume_mm3(), 0.064, max_relative = 1e-12);
        assert_relative_eq!(micros.volume_mm3(), 0.064, max_relative = 1e-12);
        assert_relative_eq!(micros.volume(), 64_000_000.0);
    }

    #[test]
    fn test_slab_volume() {
        let domain = Domain::micrometers(800.0, 800.0, 100.0);
        assert_relative_eq!(domain.slab_volume_mm3(0.0, 20.0), 0.0128, max_relative = 1e-12);
        assert_relative_eq!(domain.slab_volume_mm3(20.0, 10.0), 0.0);
    }

    #[test]
    fn test_dimensions_um() {
        let domain = Domain::new(0.8, 0.8, 0.1, LengthUnit::Millimeter);
        let [x, y, z] = domain.dimensions_um();
        assert_relative_eq!(x, 800.0, max_relative = 1e-12);
        assert_relative_eq!(y, 800.0, max_relative = 1e-12);
        assert_relative_eq!(z, 100.0, max_relative = 1e-12);
    }

    #[test]
    fn test_validity() {
        assert!(Domain::default().is_valid());
        assert!(!Domain::micrometers(0.0, 1.0, 1.0).is_valid());
        assert!(!Domain::micrometers(1.0, -1.0, 1.0).is_valid());
        assert!(!Domain::micrometers(1.0, 1.0, f64::NAN).is_valid());
    }

    #[test]
    fn test_contains() {
        let domain = Domain::micrometers(10.0, 10.0, 10.0);
        assert!(domain.contains(&Point3::new(10.0, 0.0, 5.0)));
        assert!(!domain.contains(&Point3::new(10.5, 0.0, 5.0)));
    }

    #[test]
    fn test_serde_default_unit() {
        let json = r#"{"x_size": 1.0, "y_size": 2.0, "z_size": 3.0}"#;
        let domain: Domain = serde_json::from_str(json).unwrap();
        assert_eq!(domain.unit, LengthUnit::Micrometer);
        assert_relative_eq!(domain.y_size, 2.0);
    }
}
