//! Pore-size statistics and axial gradient analysis for Voronoi scaffolds.
//!
//! Two stages follow cell extraction:
//!
//! - [`compute_cell_statistics`] - pore size, equivalent volume and porosity
//!   for each interior cell, plus an overall [`PoreSummary`]
//! - [`analyze_gradient`] - per-band summaries and the biomimetic ratio
//!
//! # Pore Size
//!
//! A cell's pore size is twice the mean distance from its seed to its
//! vertices, in micrometres. Porosity is the summed volume of spheres with
//! that mean radius over the domain volume; it is an estimate, not the exact
//! polyhedral volume. Set [`StatisticsParams::with_hull_volume`] to also get
//! exact hull volumes.
//!
//! # Example
//!
//! ```
//! use scaffold_analysis::{analyze_gradient, compute_cell_statistics, GradientParams, StatisticsParams};
//! use scaffold_types::{Cell, Domain, LayerSpec, Point3, Vector3};
//!
//! let domain = Domain::micrometers(100.0, 100.0, 100.0);
//! let layers = LayerSpec::from_edges(&[0.5], &[2000.0, 500.0]);
//!
//! let ring = |c: Point3<f64>, r: f64| {
//!     Cell::new(0, c, vec![c + Vector3::new(r, 0.0, 0.0), c - Vector3::new(0.0, r, 0.0)])
//! };
//! let cells = [ring(Point3::new(50.0, 50.0, 20.0), 10.0), ring(Point3::new(50.0, 50.0, 80.0), 25.0)];
//!
//! let stats = compute_cell_statistics(&cells, &domain, &StatisticsParams::default()).unwrap();
//! let report = analyze_gradient(&stats, &layers, &domain, &GradientParams::default()).unwrap();
//!
//! assert_eq!(report.layers.len(), 2);
//! assert!((report.ratio().unwrap() - 2.5).abs() < 1e-12);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]

mod error;
mod gradient;
mod params;
mod stats;

pub use error::{AnalysisError, AnalysisResult};
pub use gradient::{analyze_gradient, BiomimeticAssessment, GradientReport, LayerSummary};
pub use params::{GradientParams, StatisticsParams};
pub use stats::{compute_cell_statistics, CellStatistic, CellStatistics, PoreSummary};
