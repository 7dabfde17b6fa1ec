//! Axial gradient analysis.
//!
//! Cells are binned by the height of their generating seed into the bands of
//! a [`LayerSpec`], and each band gets its own [`PoreSummary`]. The ratio of
//! the top band's mean pore size to the bottom band's is compared against the
//! range seen in natural bone (trabecular pores are roughly 1.5 to 6 times
//! larger than cortical ones).

use scaffold_types::{Domain, LayerSpec};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::error::AnalysisResult;
use crate::params::GradientParams;
use crate::stats::{CellStatistics, PoreSummary};

/// Pore statistics for one band that holds at least one cell.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayerSummary {
    /// Index of the band in the [`LayerSpec`].
    pub band_index: usize,
    /// Band name.
    pub name: String,
    /// Lower band edge, domain coordinates.
    pub z_min: f64,
    /// Upper band edge, domain coordinates.
    pub z_max: f64,
    /// Pore statistics of the cells whose seed lies in the band.
    pub pores: PoreSummary,
}

/// Last-to-first band pore ratio and whether it looks like bone.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BiomimeticAssessment {
    /// Mean pore size of the last band divided by that of the first.
    pub ratio: f64,
    /// Whether the ratio lies in the configured plausible range.
    pub plausible: bool,
}

/// Per-band pore statistics and the biomimetic ratio.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GradientReport {
    /// Summaries of non-empty bands, bottom to top.
    pub layers: Vec<LayerSummary>,
    /// Present when both the first and last band hold cells, the layout has at
    /// least two bands, and the first band's mean is non-zero.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assessment: Option<BiomimeticAssessment>,
}

impl GradientReport {
    /// Total number of cells across all layers.
    #[must_use]
    pub fn cell_count(&self) -> usize {
        self.layers.iter().map(|l| l.pores.count).sum()
    }

    /// Summary of band `band_index`, if it holds cells.
    #[must_use]
    pub fn layer(&self, band_index: usize) -> Option<&LayerSummary> {
        self.layers.iter().find(|l| l.band_index == band_index)
    }

    /// The biomimetic ratio, if defined.
    #[must_use]
    pub fn ratio(&self) -> Option<f64> {
        self.assessment.map(|a| a.ratio)
    }
}

impl std::fmt::Display for GradientReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for layer in &self.layers {
            writeln!(
                f,
                "{:<12} z=[{:.1}, {:.1}]  n={:<5} pore={:.1} ± {:.1} um",
                layer.name,
                layer.z_min,
                layer.z_max,
                layer.pores.count,
                layer.pores.mean,
                layer.pores.std
            )?;
        }
        match self.assessment {
            Some(a) => write!(
                f,
                "ratio {:.2} ({})",
                a.ratio,
                if a.plausible { "biomimetic" } else { "outside bone range" }
            ),
            None => write!(f, "ratio undefined"),
        }
    }
}

/// Bin cells into bands and summarise each band.
///
/// Bands are half-open `[z_min, z_max)` except the last, which includes its
/// upper edge, so every cell lands in exactly one band. Bands without cells
/// are omitted.
///
/// # Errors
///
/// Returns [`AnalysisError::InvalidPlausibleRange`](crate::AnalysisError::InvalidPlausibleRange)
/// if `params` fails validation.
pub fn analyze_gradient(
    stats: &CellStatistics,
    layers: &LayerSpec,
    domain: &Domain,
    params: &GradientParams,
) -> AnalysisResult<GradientReport> {
    params.validate()?;

    let mut sizes: Vec<Vec<f64>> = vec![Vec::new(); layers.len()];
    for cell in &stats.cells {
        match layers.band_index_for(cell.center.z, domain) {
            Some(band) => sizes[band].push(cell.pore_size_um),
            None => debug!(
                seed = cell.seed_index,
                z = cell.center.z,
                "Cell seed outside every band"
            ),
        }
    }

    let summaries: Vec<LayerSummary> = layers
        .bands()
        .iter()
        .zip(&sizes)
        .enumerate()
        .filter_map(|(band_index, (band, sizes))| {
            let pores = PoreSummary::from_sizes(sizes)?;
            let (z_min, z_max) = band.z_range(domain);
            Some(LayerSummary {
                band_index,
                name: band.name.clone(),
                z_min,
                z_max,
                pores,
            })
        })
        .collect();

    let assessment = biomimetic_ratio(&summaries, layers.len()).map(|ratio| BiomimeticAssessment {
        ratio,
        plausible: params.is_plausible(ratio),
    });

    let report = GradientReport {
        layers: summaries,
        assessment,
    };

    for layer in &report.layers {
        info!(
            layer = %layer.name,
            cells = layer.pores.count,
            mean_pore_um = layer.pores.mean,
            std_pore_um = layer.pores.std,
            "Layer pore statistics"
        );
    }
    match assessment {
        Some(a) if !a.plausible => warn!(
            ratio = a.ratio,
            min = params.plausible_min,
            max = params.plausible_max,
            "Pore ratio outside the biomimetic range"
        ),
        Some(a) => info!(ratio = a.ratio, "Pore ratio within the biomimetic range"),
        None => debug!("Pore ratio undefined"),
    }

    Ok(report)
}

fn biomimetic_ratio(summaries: &[LayerSummary], band_count: usize) -> Option<f64> {
    if band_count < 2 {
        return None;
    }
    let first = summaries.iter().find(|l| l.band_index == 0)?;
    let last = summaries.iter().find(|l| l.band_index == band_count - 1)?;
    (first.pores.mean > 0.0).then(|| last.pores.mean / first.pores.mean)
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::stats::CellStatistic;
    use crate::AnalysisError;
    use approx::assert_relative_eq;
    use nalgebra::Point3;

    fn stats_from(cells: &[(f64, f64)]) -> CellStatistics {
        let cells: Vec<CellStatistic> = cells
            .iter()
            .enumerate()
            .map(|(i, &(z, pore))| CellStatistic {
                seed_index: i,
                center: Point3::new(400.0, 400.0, z),
                mean_vertex_distance: pore / 2.0,
                pore_size_um: pore,
                equivalent_volume: 0.0,
                hull_volume: None,
            })
            .collect();
        let sizes: Vec<f64> = cells.iter().map(|c| c.pore_size_um).collect();
        CellStatistics {
            summary: PoreSummary::from_sizes(&sizes).unwrap(),
            cells,
            total_equivalent_volume: 0.0,
            actual_porosity: 0.0,
            hull_porosity: None,
        }
    }

    fn bone() -> (LayerSpec, Domain) {
        (
            LayerSpec::bone(25_000.0, 12_000.0, 6_000.0),
            Domain::micrometers(800.0, 800.0, 100.0),
        )
    }

    #[test]
    fn test_partition_edges() {
        let (layers, domain) = bone();
        // 20 belongs to transition, 50 to trabecular, 100 (top face) to trabecular
        let stats = stats_from(&[(0.0, 40.0), (19.9, 40.0), (20.0, 60.0), (50.0, 100.0), (100.0, 80.0)]);
        let report = analyze_gradient(&stats, &layers, &domain, &GradientParams::default()).unwrap();

        assert_eq!(report.layers.len(), 3);
        assert_eq!(report.layer(0).unwrap().pores.count, 2);
        assert_eq!(report.layer(1).unwrap().pores.count, 1);
        assert_eq!(report.layer(2).unwrap().pores.count, 2);
        assert_eq!(report.cell_count(), stats.cells.len());

        let cortical = report.layer(0).unwrap();
        assert_eq!(cortical.name, "cortical");
        assert_relative_eq!(cortical.z_min, 0.0);
        assert_relative_eq!(cortical.z_max, 20.0);
    }

    #[test]
    fn test_ratio_and_plausibility() {
        let (layers, domain) = bone();
        let stats = stats_from(&[(10.0, 40.0), (30.0, 60.0), (80.0, 100.0)]);
        let report = analyze_gradient(&stats, &layers, &domain, &GradientParams::default()).unwrap();
        let a = report.assessment.unwrap();
        assert_relative_eq!(a.ratio, 2.5);
        assert!(a.plausible);

        let strict = GradientParams::new().with_plausible_range(3.0, 4.0);
        let report = analyze_gradient(&stats, &layers, &domain, &strict).unwrap();
        assert!(!report.assessment.unwrap().plausible);
        assert!(report.to_string().contains("outside bone range"));
    }

    #[test]
    fn test_empty_bands_omitted() {
        let (layers, domain) = bone();
        let stats = stats_from(&[(30.0, 60.0), (80.0, 100.0)]);
        let report = analyze_gradient(&stats, &layers, &domain, &GradientParams::default()).unwrap();
        assert_eq!(report.layers.len(), 2);
        assert!(report.layer(0).is_none());
        // No cortical cells, so no ratio
        assert!(report.assessment.is_none());
        assert!(report.ratio().is_none());
    }

    #[test]
    fn test_single_band_has_no_ratio() {
        let domain = Domain::micrometers(100.0, 100.0, 100.0);
        let stats = stats_from(&[(10.0, 40.0), (90.0, 60.0)]);
        let report = analyze_gradient(
            &stats,
            &LayerSpec::uniform(1000.0),
            &domain,
            &GradientParams::default(),
        )
        .unwrap();
        assert_eq!(report.layers.len(), 1);
        assert!(report.assessment.is_none());
    }

    #[test]
    fn test_invalid_params() {
        let (layers, domain) = bone();
        let stats = stats_from(&[(10.0, 40.0)]);
        let params = GradientParams::new().with_plausible_range(5.0, 1.0);
        assert!(matches!(
            analyze_gradient(&stats, &layers, &domain, &params),
            Err(AnalysisError::InvalidPlausibleRange { .. })
        ));
    }
}
