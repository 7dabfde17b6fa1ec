//! Convex hulls and STL-ready triangle meshes for scaffold cells.
//!
//! Every interior Voronoi cell is convex, so its surface is the convex hull
//! of its vertices. This crate provides:
//!
//! - [`ConvexHull`] - Incremental hull with outward-wound faces and exact volume
//! - [`build_mesh`] - Triangulate a list of cells into one [`TriangleMesh`](scaffold_types::TriangleMesh)
//! - [`FacetStrategy`] - Hull faces (default) or every vertex triple
//!
//! # Example
//!
//! ```
//! use scaffold_mesh::{build_mesh, ConvexHull, MeshParams};
//! use scaffold_types::{Cell, Point3};
//!
//! let vertices = vec![
//!     Point3::new(0.0, 0.0, 0.0),
//!     Point3::new(1.0, 0.0, 0.0),
//!     Point3::new(0.0, 1.0, 0.0),
//!     Point3::new(0.0, 0.0, 1.0),
//! ];
//! let hull = ConvexHull::new(&vertices).unwrap();
//! assert!((hull.volume() - 1.0 / 6.0).abs() < 1e-12);
//!
//! let cell = Cell::new(0, Point3::new(0.2, 0.2, 0.2), vertices);
//! let result = build_mesh(&[cell], &MeshParams::default());
//! assert_eq!(result.facet_count(), 4);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]

mod build;
mod error;
mod hull;
mod params;

pub use build::{build_mesh, MeshBuildResult};
pub use error::{MeshError, MeshResult};
pub use hull::ConvexHull;
pub use params::{FacetStrategy, MeshParams};
