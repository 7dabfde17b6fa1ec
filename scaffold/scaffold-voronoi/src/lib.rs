//! Stratified seed sampling and 3D Voronoi tessellation for gradient scaffolds.
//!
//! This crate covers the first three stages of the scaffold pipeline:
//!
//! 1. [`sample_seeds`] - Draw seeds band by band so each layer of the
//!    [`LayerSpec`](scaffold_types::LayerSpec) gets `round(density × volume)`
//!    points
//! 2. [`tessellate`] - Check the seeds span a volume and compute their Voronoi
//!    diagram through a [`VoronoiBackend`]
//! 3. [`extract_interior_cells`] - Keep the finite cells that lie entirely
//!    inside the domain
//!
//! # Backends
//!
//! [`VoronoiBackend`] is the seam to the geometry engine. Backends return a
//! [`RawTessellation`] using signed vertex indices where [`UNBOUNDED_INDEX`]
//! marks a vertex at infinity. [`ClippingVoronoi`] is the built-in backend:
//! each cell is a far box clipped by the bisector planes of its KD-tree
//! neighbours.
//!
//! # Example
//!
//! ```
//! use scaffold_types::{Domain, LayerSpec};
//! use scaffold_voronoi::{
//!     extract_interior_cells, sample_seeds, tessellate, ClippingVoronoi, SamplingParams,
//! };
//!
//! let domain = Domain::micrometers(300.0, 300.0, 300.0);
//! let layers = LayerSpec::uniform(20_000.0);
//!
//! let seeds = sample_seeds(&domain, &layers, &SamplingParams::seeded(1)).unwrap();
//! let tess = tessellate(&seeds.points, &ClippingVoronoi::default()).unwrap();
//! let report = extract_interior_cells(&seeds.points, &tess, &domain);
//!
//! assert!(report.interior_count() > 0);
//! assert_eq!(report.interior_count() + report.discarded(), seeds.len());
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]

mod backend;
mod clip;
mod error;
mod extract;
mod params;
mod sampler;
mod tessellation;

pub use backend::{RawTessellation, VoronoiBackend, UNBOUNDED_INDEX};
pub use clip::ClippingVoronoi;
pub use error::{VoronoiError, VoronoiResult};
pub use extract::{extract_interior_cells, ExtractionReport};
pub use params::{ClipParams, SamplingParams};
pub use sampler::{sample_seeds, sample_seeds_with, validate_inputs, SeedSet};
pub use tessellation::{tessellate, Region, Tessellation, TessellationSummary};
