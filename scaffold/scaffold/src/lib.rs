//! Gradient Voronoi bone scaffolds.
//!
//! This umbrella crate runs the whole pipeline and re-exports the stage
//! crates:
//!
//! ```text
//! ScaffoldRequest
//!   -> sample seeds per band           (voronoi)
//!   -> tessellate                      (voronoi)
//!   -> extract interior cells          (voronoi)
//!   -> pore statistics, porosity       (analysis)
//!   -> per-band gradient, ratio        (analysis)
//!   => ScaffoldRun
//!        -> mesh cells                 (mesh)
//!        -> STL + JSON sidecar         (io)
//! ```
//!
//! # Quick Start
//!
//! ```no_run
//! use scaffold::{run_pipeline, ScaffoldRequest};
//! use scaffold::io::StlFormat;
//!
//! // 800 x 800 x 100 um, cortical / transition / trabecular bands
//! let request = ScaffoldRequest::bone_default().with_rng_seed(42);
//! let run = run_pipeline(&request).unwrap();
//! println!("{run}");
//!
//! let export = run.export("out", "scaffold", StlFormat::Ascii).unwrap();
//! println!("{}", export.mesh);
//! ```
//!
//! # Module Organization
//!
//! - [`types`] - Domain, layer bands, cells, facets, meshes
//! - [`voronoi`] - Seed sampling, tessellation backends, interior extraction
//! - [`analysis`] - Pore statistics and gradient analysis
//! - [`mesh`] - Convex-hull meshing of cells
//! - [`io`] - STL and metadata export
//!
//! # Known Bias
//!
//! Only cells lying wholly inside the domain are kept, so thin domains and
//! sparse bands lose many boundary cells. [`ScaffoldRun::extraction`] carries
//! the discard counts.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]

mod error;
mod generator;
mod pipeline;
mod request;

pub use error::{ScaffoldError, ScaffoldResult};
pub use generator::ScaffoldGenerator;
pub use pipeline::{
    run_pipeline, run_pipeline_with_backend, ScaffoldExport, ScaffoldRun, GENERATOR_NAME,
};
pub use request::{ScaffoldRequest, DEFAULT_TARGET_POROSITY};

// =============================================================================
// Re-exports
// =============================================================================

/// Domain, layer bands, cells, facets, meshes.
pub use scaffold_types as types;

/// Seed sampling, tessellation and interior-cell extraction.
pub use scaffold_voronoi as voronoi;

/// Pore statistics and gradient analysis.
pub use scaffold_analysis as analysis;

/// Cell meshing.
pub use scaffold_mesh as mesh;

/// STL and metadata export.
pub use scaffold_io as io;

// =============================================================================
// Prelude
// =============================================================================

/// Common imports for scaffold generation.
///
/// ```
/// use scaffold::prelude::*;
///
/// let request = ScaffoldRequest::new(
///     Domain::micrometers(400.0, 400.0, 400.0),
///     LayerSpec::bone(25_000.0, 12_000.0, 6_000.0),
/// );
/// assert!(request.validate().is_ok());
/// ```
pub mod prelude {
    pub use crate::{run_pipeline, ScaffoldError, ScaffoldGenerator, ScaffoldRequest, ScaffoldRun};
    pub use scaffold_analysis::{GradientParams, GradientReport, PoreSummary, StatisticsParams};
    pub use scaffold_io::{ExportRecord, StlFormat};
    pub use scaffold_mesh::{FacetStrategy, MeshParams};
    pub use scaffold_types::{Cell, Domain, LayerBand, LayerSpec, LengthUnit, TriangleMesh};
    pub use scaffold_voronoi::{ClipParams, SamplingParams};
}
