//! STL export and JSON metadata sidecars for gradient Voronoi scaffolds.
//!
//! - [`save_stl`] / [`load_stl`] - ASCII or binary STL, facet soup in and out
//! - [`save_metadata`] / [`load_metadata`] - the [`ExportRecord`] sidecar
//! - [`export_bundle`] - both at once, as `<stem>.stl` and `<stem>.json`
//!
//! Coordinates are written in the domain's native unit; the sidecar records
//! which unit that is, and gives the domain size in micrometres.
//!
//! # Example
//!
//! ```
//! use scaffold_io::{parse_stl, write_stl, StlFormat};
//! use scaffold_types::{Facet, Point3, TriangleMesh};
//!
//! let mesh: TriangleMesh = Facet::from_vertices(
//!     Point3::new(0.0, 0.0, 0.0),
//!     Point3::new(50.0, 0.0, 0.0),
//!     Point3::new(0.0, 50.0, 0.0),
//! )
//! .into_iter()
//! .collect();
//!
//! let mut bytes = Vec::new();
//! write_stl(&mesh, &mut bytes, StlFormat::Ascii, "scaffold").unwrap();
//! assert_eq!(parse_stl(&bytes).unwrap().len(), 1);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]

mod bundle;
mod error;
mod metadata;
mod stl;

pub use bundle::{export_bundle, ExportOptions, ExportPaths};
pub use error::{IoError, IoResult};
pub use metadata::{
    load_metadata, save_metadata, BandRecord, DimensionsRecord, ExportRecord, LayerRecord,
    PoreRecord,
};
pub use stl::{
    load_stl, parse_stl, save_stl, save_stl_named, write_stl, StlFormat, DEFAULT_SOLID_NAME,
};
