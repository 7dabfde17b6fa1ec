//! JSON metadata sidecar written next to each exported STL.

use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

use scaffold_analysis::{LayerSummary, PoreSummary};
use scaffold_types::{Domain, LengthUnit};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::{IoError, IoResult};

/// Domain size in micrometres, whatever the native unit.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DimensionsRecord {
    /// Width (µm).
    pub x_size_um: f64,
    /// Depth (µm).
    pub y_size_um: f64,
    /// Height (µm).
    pub z_size_um: f64,
}

impl From<&Domain> for DimensionsRecord {
    fn from(domain: &Domain) -> Self {
        let [x_size_um, y_size_um, z_size_um] = domain.dimensions_um();
        Self {
            x_size_um,
            y_size_um,
            z_size_um,
        }
    }
}

/// Pore statistics as written to the sidecar.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PoreRecord {
    /// Mean pore size (µm).
    pub mean_pore_size_um: f64,
    /// Population standard deviation (µm).
    pub std_pore_size_um: f64,
    /// Smallest pore (µm).
    pub min_pore_size_um: f64,
    /// Largest pore (µm).
    pub max_pore_size_um: f64,
    /// Number of pores.
    pub n_pores: usize,
}

impl From<&PoreSummary> for PoreRecord {
    fn from(s: &PoreSummary) -> Self {
        Self {
            mean_pore_size_um: s.mean,
            std_pore_size_um: s.std,
            min_pore_size_um: s.min,
            max_pore_size_um: s.max,
            n_pores: s.count,
        }
    }
}

/// Requested and realised seeding of one band.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BandRecord {
    /// Band name.
    pub name: String,
    /// Lower edge as a fraction of the height.
    pub start: f64,
    /// Upper edge as a fraction of the height.
    pub end: f64,
    /// Requested density (seeds/mm³).
    pub density: f64,
    /// Seeds placed in the band.
    pub seed_count: usize,
}

/// Pore statistics of one band.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayerRecord {
    /// Band name.
    pub name: String,
    /// Pore statistics of the band's cells.
    #[serde(flatten)]
    pub pores: PoreRecord,
}

impl From<&LayerSummary> for LayerRecord {
    fn from(layer: &LayerSummary) -> Self {
        Self {
            name: layer.name.clone(),
            pores: PoreRecord::from(&layer.pores),
        }
    }
}

/// Everything recorded about one generated scaffold.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportRecord {
    /// Name and version of the producing tool.
    pub generator: String,
    /// Domain size (µm).
    pub dimensions: DimensionsRecord,
    /// Unit of the STL coordinates.
    pub unit: LengthUnit,
    /// Requested porosity; recorded only, never enforced.
    pub target_porosity: f64,
    /// Equivalent-sphere porosity of the interior cells.
    pub actual_porosity: f64,
    /// Hull-volume porosity, when computed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hull_porosity: Option<f64>,
    /// RNG seed, when the run was reproducible.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rng_seed: Option<u64>,
    /// Total seeds placed.
    pub n_seeds: usize,
    /// Cells kept after extraction.
    pub n_interior_cells: usize,
    /// Per-band seeding.
    pub bands: Vec<BandRecord>,
    /// Pore statistics over all interior cells.
    pub statistics: PoreRecord,
    /// Pore statistics per non-empty band.
    pub layers: Vec<LayerRecord>,
    /// Last-to-first band mean pore ratio.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub biomimetic_ratio: Option<f64>,
    /// Whether the ratio is in the plausible bone range.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub biomimetic_plausible: Option<bool>,
    /// Facets in the exported STL.
    pub facet_count: usize,
}

/// Write the record as pretty-printed JSON.
///
/// # Errors
///
/// Returns an error if the file cannot be written.
pub fn save_metadata<P: AsRef<Path>>(record: &ExportRecord, path: P) -> IoResult<()> {
    let path = path.as_ref();
    let mut writer = BufWriter::new(File::create(path)?);
    serde_json::to_writer_pretty(&mut writer, record)?;
    writeln!(writer)?;
    writer.flush()?;
    info!(path = %path.display(), "Wrote metadata sidecar");
    Ok(())
}

/// Read a record written by [`save_metadata`].
///
/// # Errors
///
/// Returns an error if the file is missing or is not a valid record.
pub fn load_metadata<P: AsRef<Path>>(path: P) -> IoResult<ExportRecord> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|e| IoError::from_open(e, path))?;
    Ok(serde_json::from_reader(BufReader::new(file))?)
}
