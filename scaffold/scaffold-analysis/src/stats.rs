//! Per-cell pore statistics and porosity.
//!
//! Pore size is twice the mean distance from a cell's seed to its vertices,
//! and each cell's volume is approximated by the sphere of that mean radius.
//! The approximation is the reported porosity; exact hull volumes are an
//! optional side channel.

// Cell counts stay far below 2^52
#![allow(clippy::cast_precision_loss)]

use std::f64::consts::PI;

use nalgebra::Point3;
use scaffold_mesh::ConvexHull;
use scaffold_types::{Cell, Domain};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::{AnalysisError, AnalysisResult};
use crate::params::StatisticsParams;

/// Statistics of one interior cell.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CellStatistic {
    /// Index of the generating seed.
    pub seed_index: usize,
    /// The generating seed.
    pub center: Point3<f64>,
    /// Mean seed-to-vertex distance, native units.
    pub mean_vertex_distance: f64,
    /// Pore size in micrometres: `2 × mean_vertex_distance`.
    pub pore_size_um: f64,
    /// `4/3 π d³` for the mean distance `d`, native units cubed.
    pub equivalent_volume: f64,
    /// Convex-hull volume, native units cubed, when requested and computable.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hull_volume: Option<f64>,
}

/// Mean, population standard deviation and range of a set of pore sizes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PoreSummary {
    /// Mean pore size (µm).
    pub mean: f64,
    /// Population standard deviation (µm).
    pub std: f64,
    /// Smallest pore size (µm).
    pub min: f64,
    /// Largest pore size (µm).
    pub max: f64,
    /// Number of pores.
    pub count: usize,
}

impl PoreSummary {
    /// Summarise `sizes`; `None` if empty.
    ///
    /// # Example
    ///
    /// ```
    /// use scaffold_analysis::PoreSummary;
    ///
    /// let summary = PoreSummary::from_sizes(&[2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0]).unwrap();
    /// assert!((summary.mean - 5.0).abs() < 1e-12);
    /// assert!((summary.std - 2.0).abs() < 1e-12);
    /// assert_eq!(summary.count, 8);
    /// ```
    #[must_use]
    pub fn from_sizes(sizes: &[f64]) -> Option<Self> {
        if sizes.is_empty() {
            return None;
        }
        let n = sizes.len() as f64;
        let mean = sizes.iter().sum::<f64>() / n;
        let variance = sizes.iter().map(|s| (s - mean).powi(2)).sum::<f64>() / n;
        Some(Self {
            mean,
            std: variance.sqrt(),
            min: sizes.iter().copied().fold(f64::INFINITY, f64::min),
            max: sizes.iter().copied().fold(f64::NEG_INFINITY, f64::max),
            count: sizes.len(),
        })
    }
}

/// Statistics for all interior cells of a run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CellStatistics {
    /// Per-cell values, in input order.
    pub cells: Vec<CellStatistic>,
    /// Summary over every cell.
    pub summary: PoreSummary,
    /// Sum of equivalent volumes, native units cubed.
    pub total_equivalent_volume: f64,
    /// `total_equivalent_volume / domain volume`.
    pub actual_porosity: f64,
    /// Sum of hull volumes over the domain volume, when requested.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hull_porosity: Option<f64>,
}

impl CellStatistics {
    /// Pore sizes (µm) in cell order.
    #[must_use]
    pub fn pore_sizes(&self) -> Vec<f64> {
        self.cells.iter().map(|c| c.pore_size_um).collect()
    }
}

/// Compute pore size, equivalent volume and porosity for every cell.
///
/// # Errors
///
/// Returns [`AnalysisError::NoInteriorCells`] if `cells` is empty (or no cell
/// has a vertex), instead of producing NaN statistics.
///
/// # Example
///
/// ```
/// use scaffold_analysis::{compute_cell_statistics, StatisticsParams};
/// use scaffold_types::{Cell, Domain, Point3};
///
/// let cell = Cell::new(
///     0,
///     Point3::new(50.0, 50.0, 50.0),
///     vec![Point3::new(60.0, 50.0, 50.0), Point3::new(50.0, 40.0, 50.0)],
/// );
/// let stats = compute_cell_statistics(
///     &[cell],
///     &Domain::micrometers(100.0, 100.0, 100.0),
///     &StatisticsParams::default(),
/// )
/// .unwrap();
///
/// assert!((stats.summary.mean - 20.0).abs() < 1e-12);
/// ```
pub fn compute_cell_statistics(
    cells: &[Cell],
    domain: &Domain,
    params: &StatisticsParams,
) -> AnalysisResult<CellStatistics> {
    let to_um = domain.unit.to_micrometers();

    let mut hull_failures = 0usize;
    let per_cell: Vec<CellStatistic> = cells
        .iter()
        .filter_map(|cell| {
            let distance = cell.mean_vertex_distance()?;
            let hull_volume = if params.compute_hull_volume {
                match ConvexHull::new(&cell.vertices) {
                    Ok(hull) => Some(hull.volume()),
                    Err(err) => {
                        debug!(seed = cell.seed_index, error = %err, "No hull volume for cell");
                        hull_failures += 1;
                        None
                    }
                }
            } else {
                None
            };
            Some(CellStatistic {
                seed_index: cell.seed_index,
                center: cell.center,
                mean_vertex_distance: distance,
                pore_size_um: 2.0 * distance * to_um,
                equivalent_volume: 4.0 / 3.0 * PI * distance.powi(3),
                hull_volume,
            })
        })
        .collect();

    let sizes: Vec<f64> = per_cell.iter().map(|c| c.pore_size_um).collect();
    let summary = PoreSummary::from_sizes(&sizes).ok_or(AnalysisError::NoInteriorCells)?;

    let domain_volume = domain.volume();
    let total_equivalent_volume: f64 = per_cell.iter().map(|c| c.equivalent_volume).sum();
    let actual_porosity = total_equivalent_volume / domain_volume;
    let hull_porosity = params.compute_hull_volume.then(|| {
        per_cell.iter().filter_map(|c| c.hull_volume).sum::<f64>() / domain_volume
    });

    info!(
        cells = summary.count,
        mean_pore_um = summary.mean,
        std_pore_um = summary.std,
        porosity = actual_porosity,
        hull_failures,
        "Computed cell statistics"
    );

    Ok(CellStatistics {
        cells: per_cell,
        summary,
        total_equivalent_volume,
        actual_porosity,
        hull_porosity,
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use scaffold_types::LengthUnit;

    fn cube_cell(seed_index: usize, center: Point3<f64>, half: f64) -> Cell {
        let mut vertices = Vec::new();
        for dx in [-half, half] {
            for dy in [-half, half] {
                for dz in [-half, half] {
                    vertices.push(center + nalgebra::Vector3::new(dx, dy, dz));
                }
            }
        }
        Cell::new(seed_index, center, vertices)
    }

    #[test]
    fn test_pore_size_and_volume() {
        let domain = Domain::micrometers(100.0, 100.0, 100.0);
        let cell = cube_cell(4, Point3::new(50.0, 50.0, 50.0), 5.0);
        let stats =
            compute_cell_statistics(&[cell], &domain, &StatisticsParams::default()).unwrap();

        let d = 5.0 * 3.0_f64.sqrt();
        let c = &stats.cells[0];
        assert_eq!(c.seed_index, 4);
        assert_relative_eq!(c.mean_vertex_distance, d, max_relative = 1e-12);
        assert_relative_eq!(c.pore_size_um, 2.0 * d, max_relative = 1e-12);
        assert_relative_eq!(c.equivalent_volume, 4.0 / 3.0 * PI * d.powi(3), max_relative = 1e-12);
        assert_relative_eq!(stats.actual_porosity, c.equivalent_volume / 1e6, max_relative = 1e-12);
        assert!(c.hull_volume.is_none());
        assert!(stats.hull_porosity.is_none());
    }

    #[test]
    fn test_millimetre_domain_reports_micrometres() {
        let domain = Domain::new(1.0, 1.0, 1.0, LengthUnit::Millimeter);
        let cell = cube_cell(0, Point3::new(0.5, 0.5, 0.5), 0.01);
        let stats =
            compute_cell_statistics(&[cell], &domain, &StatisticsParams::default()).unwrap();
        assert_relative_eq!(
            stats.summary.mean,
            2.0 * 0.01 * 3.0_f64.sqrt() * 1000.0,
            max_relative = 1e-12
        );
    }

    #[test]
    fn test_summary_population_std() {
        let summary = PoreSummary::from_sizes(&[10.0, 20.0]).unwrap();
        assert_relative_eq!(summary.mean, 15.0);
        assert_relative_eq!(summary.std, 5.0);
        assert_relative_eq!(summary.min, 10.0);
        assert_relative_eq!(summary.max, 20.0);
        assert!(PoreSummary::from_sizes(&[]).is_none());
    }

    #[test]
    fn test_hull_volume_channel() {
        let domain = Domain::micrometers(100.0, 100.0, 100.0);
        let cells = vec![
            cube_cell(0, Point3::new(20.0, 20.0, 20.0), 5.0),
            cube_cell(1, Point3::new(60.0, 60.0, 60.0), 10.0),
        ];
        let params = StatisticsParams::new().with_hull_volume(true);
        let stats = compute_cell_statistics(&cells, &domain, &params).unwrap();

        assert_relative_eq!(stats.cells[0].hull_volume.unwrap(), 1000.0, max_relative = 1e-9);
        assert_relative_eq!(stats.cells[1].hull_volume.unwrap(), 8000.0, max_relative = 1e-9);
        assert_relative_eq!(stats.hull_porosity.unwrap(), 9000.0 / 1e6, max_relative = 1e-9);
        // The sphere estimate is unchanged by the hull channel
        let plain = compute_cell_statistics(&cells, &domain, &StatisticsParams::default()).unwrap();
        assert_relative_eq!(stats.actual_porosity, plain.actual_porosity);
    }

    #[test]
    fn test_no_cells() {
        let err = compute_cell_statistics(&[], &Domain::default(), &StatisticsParams::default())
            .unwrap_err();
        assert!(matches!(err, AnalysisError::NoInteriorCells));
        assert!(err.to_string().contains("enlarge the domain"));

        let hollow = Cell::new(0, Point3::origin(), Vec::new());
        assert!(
            compute_cell_statistics(&[hollow], &Domain::default(), &StatisticsParams::default())
                .is_err()
        );
    }

    #[test]
    fn test_serde_skips_missing_hull_volume() {
        let domain = Domain::micrometers(100.0, 100.0, 100.0);
        let cell = cube_cell(0, Point3::new(50.0, 50.0, 50.0), 5.0);
        let stats =
            compute_cell_statistics(&[cell], &domain, &StatisticsParams::default()).unwrap();
        let json = serde_json::to_string(&stats).unwrap();
        assert!(!json.contains("hull_volume"));
        let back: CellStatistics = serde_json::from_str(&json).unwrap();
        assert_eq!(back.cells.len(), 1);
    }
}
