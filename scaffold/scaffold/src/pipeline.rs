//! The scaffold pipeline as one function returning an immutable run.
//!
//! ```text
//! sample seeds -> tessellate -> extract interior cells -> statistics -> gradient
//! ```
//!
//! Meshing and export are on demand, from the finished run.

use std::path::Path;

use scaffold_analysis::{analyze_gradient, compute_cell_statistics, CellStatistics, GradientReport};
use scaffold_io::{
    export_bundle, BandRecord, DimensionsRecord, ExportOptions, ExportPaths, ExportRecord,
    LayerRecord, PoreRecord, StlFormat,
};
use scaffold_mesh::{build_mesh, MeshBuildResult};
use scaffold_types::Cell;
use scaffold_voronoi::{
    extract_interior_cells, sample_seeds, tessellate, ClippingVoronoi, ExtractionReport, SeedSet,
    TessellationSummary, VoronoiBackend,
};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::{ScaffoldError, ScaffoldResult};
use crate::request::ScaffoldRequest;

/// Producer name written to export sidecars.
pub const GENERATOR_NAME: &str = concat!("scaffold ", env!("CARGO_PKG_VERSION"));

/// Every product of one pipeline run.
///
/// Nothing here is updated after the run; a new request produces a new run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScaffoldRun {
    /// The request that produced the run.
    pub request: ScaffoldRequest,
    /// Sampled seeds.
    pub seeds: SeedSet,
    /// Region counts of the tessellation.
    pub tessellation: TessellationSummary,
    /// Interior cells and discard counts.
    pub extraction: ExtractionReport,
    /// Per-cell and overall pore statistics.
    pub statistics: CellStatistics,
    /// Per-band statistics and biomimetic ratio.
    pub gradient: GradientReport,
}

impl ScaffoldRun {
    /// Interior cells, in seed order.
    #[must_use]
    pub fn cells(&self) -> &[Cell] {
        &self.extraction.cells
    }

    /// Number of interior cells.
    #[must_use]
    pub fn interior_count(&self) -> usize {
        self.extraction.interior_count()
    }

    /// Triangulate the interior cells with the request's mesh parameters.
    #[must_use]
    pub fn build_mesh(&self) -> MeshBuildResult {
        build_mesh(self.cells(), &self.request.mesh)
    }

    /// Snapshot of the run for the metadata sidecar.
    #[must_use]
    pub fn export_record(&self, facet_count: usize) -> ExportRecord {
        let request = &self.request;
        let bands = request
            .layers
            .bands()
            .iter()
            .zip(&self.seeds.band_counts)
            .map(|(band, &seed_count)| BandRecord {
                name: band.name.clone(),
                start: band.start,
                end: band.end,
                density: band.density,
                seed_count,
            })
            .collect();

        ExportRecord {
            generator: GENERATOR_NAME.to_string(),
            dimensions: DimensionsRecord::from(&request.domain),
            unit: request.domain.unit,
            target_porosity: request.target_porosity,
            actual_porosity: self.statistics.actual_porosity,
            hull_porosity: self.statistics.hull_porosity,
            rng_seed: request.sampling.rng_seed,
            n_seeds: self.seeds.len(),
            n_interior_cells: self.interior_count(),
            bands,
            statistics: PoreRecord::from(&self.statistics.summary),
            layers: self.gradient.layers.iter().map(LayerRecord::from).collect(),
            biomimetic_ratio: self.gradient.ratio(),
            biomimetic_plausible: self.gradient.assessment.map(|a| a.plausible),
            facet_count,
        }
    }

    /// Mesh the run and write `<stem>.stl` plus `<stem>.json` into `dir`.
    ///
    /// The returned [`ScaffoldExport`] carries the mesh that was written.
    ///
    /// # Errors
    ///
    /// Returns [`ScaffoldError::Export`] if either file cannot be written.
    pub fn export<P: AsRef<Path>>(
        &self,
        dir: P,
        stem: &str,
        format: StlFormat,
    ) -> ScaffoldResult<ScaffoldExport> {
        let mesh = self.build_mesh();
        let paths = self.export_mesh(&mesh, dir, stem, format)?;
        Ok(ScaffoldExport { paths, mesh })
    }

    /// Write an already built mesh of this run and its sidecar into `dir`.
    ///
    /// # Errors
    ///
    /// Returns [`ScaffoldError::Export`] if either file cannot be written.
    pub fn export_mesh<P: AsRef<Path>>(
        &self,
        mesh: &MeshBuildResult,
        dir: P,
        stem: &str,
        format: StlFormat,
    ) -> ScaffoldResult<ExportPaths> {
        let record = self.export_record(mesh.facet_count());
        let options = ExportOptions::new()
            .with_format(format)
            .with_solid_name(self.request.mesh.solid_name.clone());
        Ok(export_bundle(dir, stem, &mesh.mesh, &record, &options)?)
    }
}

/// Files written by [`ScaffoldRun::export`] and the mesh they hold.
#[derive(Debug, Clone)]
pub struct ScaffoldExport {
    /// Where the STL and sidecar went.
    pub paths: ExportPaths,
    /// The mesh written to the STL.
    pub mesh: MeshBuildResult,
}

impl std::fmt::Display for ScaffoldRun {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = &self.statistics.summary;
        writeln!(
            f,
            "Scaffold: {} seeds, {} interior cells ({} discarded)",
            self.seeds.len(),
            self.interior_count(),
            self.extraction.discarded()
        )?;
        writeln!(
            f,
            "Pores: {:.1} ± {:.1} um (min {:.1}, max {:.1}), porosity {:.3} (target {:.2})",
            s.mean,
            s.std,
            s.min,
            s.max,
            self.statistics.actual_porosity,
            self.request.target_porosity
        )?;
        write!(f, "{}", self.gradient)
    }
}

/// Run every stage with the built-in clipping backend.
///
/// # Errors
///
/// Returns the first failing stage's error; see [`ScaffoldError`].
///
/// # Example
///
/// ```
/// use scaffold::{run_pipeline, ScaffoldRequest};
/// use scaffold::types::{Domain, LayerSpec};
///
/// let request = ScaffoldRequest::new(
///     Domain::micrometers(300.0, 300.0, 300.0),
///     LayerSpec::from_edges(&[0.5], &[30_000.0, 15_000.0]),
/// )
/// .with_rng_seed(5);
///
/// let run = run_pipeline(&request).unwrap();
/// assert_eq!(run.gradient.cell_count(), run.interior_count());
/// assert!(run.interior_count() <= run.seeds.len());
/// ```
pub fn run_pipeline(request: &ScaffoldRequest) -> ScaffoldResult<ScaffoldRun> {
    run_pipeline_with_backend(request, &ClippingVoronoi::new(request.clip))
}

/// Run every stage with a caller-supplied tessellation backend.
///
/// # Errors
///
/// Returns the first failing stage's error; see [`ScaffoldError`].
pub fn run_pipeline_with_backend<B: VoronoiBackend + ?Sized>(
    request: &ScaffoldRequest,
    backend: &B,
) -> ScaffoldResult<ScaffoldRun> {
    request.validate()?;

    let seeds = sample_seeds(&request.domain, &request.layers, &request.sampling)
        .map_err(ScaffoldError::Sampling)?;
    let tessellation =
        tessellate(&seeds.points, backend).map_err(ScaffoldError::Tessellation)?;
    let extraction = extract_interior_cells(&seeds.points, &tessellation, &request.domain);
    let statistics =
        compute_cell_statistics(&extraction.cells, &request.domain, &request.statistics)?;
    let gradient = analyze_gradient(
        &statistics,
        &request.layers,
        &request.domain,
        &request.gradient,
    )?;

    info!(
        seeds = seeds.len(),
        interior = extraction.interior_count(),
        porosity = statistics.actual_porosity,
        ratio = gradient.ratio(),
        "Scaffold run complete"
    );

    Ok(ScaffoldRun {
        request: request.clone(),
        seeds,
        tessellation: tessellation.summary(),
        extraction,
        statistics,
        gradient,
    })
}
