//! Core data model for gradient Voronoi scaffolds.
//!
//! This crate provides the foundational types shared by every stage of the
//! scaffold pipeline:
//!
//! - [`Domain`] - The axis-aligned box the scaffold fills, with its [`LengthUnit`]
//! - [`LayerSpec`] / [`LayerBand`] - Axial bands with per-band seed densities
//! - [`Cell`] - One interior Voronoi region and its generating seed
//! - [`Facet`] - A triangle with an outward unit normal
//! - [`TriangleMesh`] - An unordered facet soup ready for export
//! - [`Aabb`] - Axis-aligned bounding box
//!
//! # Units
//!
//! Coordinates are `f64` in the domain's native [`LengthUnit`]. Seed densities
//! are always expressed in seeds per cubic millimetre, and pore sizes are
//! reported in micrometres, regardless of the native unit.
//!
//! # Coordinate System
//!
//! Right-handed, with Z as the gradient (height) axis:
//! - X: width
//! - Y: depth
//! - Z: height, from the dense cortical face (`z = 0`) to the sparse
//!   trabecular face (`z = z_size`)
//!
//! # Example
//!
//! ```
//! use scaffold_types::{Domain, LayerSpec};
//!
//! let domain = Domain::micrometers(800.0, 800.0, 100.0);
//! let layers = LayerSpec::bone(25_000.0, 12_000.0, 6_000.0);
//!
//! assert_eq!(layers.len(), 3);
//! assert_eq!(layers.band_index_for(10.0, &domain), Some(0));
//! assert_eq!(layers.band_index_for(100.0, &domain), Some(2));
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]

mod bounds;
mod cell;
mod domain;
mod facet;
mod layer;
mod mesh;

pub use bounds::Aabb;
pub use cell::Cell;
pub use domain::{Domain, LengthUnit};
pub use facet::{Facet, DEGENERATE_AREA_RATIO};
pub use layer::{LayerBand, LayerSpec};
pub use mesh::TriangleMesh;

// Re-export nalgebra types for convenience
pub use nalgebra::{Point3, Vector3};
