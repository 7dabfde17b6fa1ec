//! Axial layer bands and their seed densities.

use serde::{Deserialize, Serialize};

use crate::domain::Domain;

/// One axial band of the scaffold.
///
/// The band spans `[start, end)` as fractions of the domain height; the last
/// band of a [`LayerSpec`] also includes its upper edge.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayerBand {
    /// Human-readable band name, used in reports and the metadata sidecar.
    pub name: String,
    /// Lower edge as a fraction of the domain height.
    pub start: f64,
    /// Upper edge as a fraction of the domain height.
    pub end: f64,
    /// Seed density in seeds per cubic millimetre.
    pub density: f64,
}

impl LayerBand {
    /// Create a band.
    #[must_use]
    pub fn new(name: impl Into<String>, start: f64, end: f64, density: f64) -> Self {
        Self {
            name: name.into(),
            start,
            end,
            density,
        }
    }

    /// Band height as a fraction of the domain height.
    #[must_use]
    pub fn height_fraction(&self) -> f64 {
        self.end - self.start
    }

    /// Lower and upper edge in domain coordinates.
    #[must_use]
    pub fn z_range(&self, domain: &Domain) -> (f64, f64) {
        (self.start * domain.z_size, self.end * domain.z_size)
    }

    /// Band volume in cubic millimetres.
    #[must_use]
    pub fn volume_mm3(&self, domain: &Domain) -> f64 {
        let (lo, hi) = self.z_range(domain);
        domain.slab_volume_mm3(lo, hi)
    }

    /// Number of seeds this band receives: `round(density × volume_mm3)`.
    ///
    /// Non-positive densities yield zero seeds.
    #[must_use]
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn seed_count(&self, domain: &Domain) -> usize {
        if self.density <= 0.0 {
            return 0;
        }
        (self.density * self.volume_mm3(domain)).round() as usize
    }
}

/// Ordered list of contiguous axial bands covering the full domain height.
///
/// # Example
///
/// ```
/// use scaffold_types::{Domain, LayerSpec};
///
/// let domain = Domain::micrometers(800.0, 800.0, 100.0);
/// let layers = LayerSpec::bone(25_000.0, 12_000.0, 6_000.0);
///
/// let counts: Vec<usize> = layers.bands().iter().map(|b| b.seed_count(&domain)).collect();
/// assert_eq!(counts, vec![320, 230, 192]);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayerSpec {
    bands: Vec<LayerBand>,
}

impl LayerSpec {
    /// Upper edge of the cortical band in the bone layout.
    pub const CORTICAL_END: f64 = 0.2;

    /// Upper edge of the transition band in the bone layout.
    pub const TRANSITION_END: f64 = 0.5;

    /// Create a layout from explicit bands.
    ///
    /// The bands are not checked here; seed sampling validates them.
    #[must_use]
    pub const fn new(bands: Vec<LayerBand>) -> Self {
        Self { bands }
    }

    /// The three-band bone layout: cortical `[0, 0.2)`, transition
    /// `[0.2, 0.5)`, trabecular `[0.5, 1.0]`.
    #[must_use]
    pub fn bone(cortical: f64, transition: f64, trabecular: f64) -> Self {
        Self::new(vec![
            LayerBand::new("cortical", 0.0, Self::CORTICAL_END, cortical),
            LayerBand::new(
                "transition",
                Self::CORTICAL_END,
                Self::TRANSITION_END,
                transition,
            ),
            LayerBand::new("trabecular", Self::TRANSITION_END, 1.0, trabecular),
        ])
    }

    /// A single band spanning the whole height.
    #[must_use]
    pub fn uniform(density: f64) -> Self {
        Self::new(vec![LayerBand::new("uniform", 0.0, 1.0, density)])
    }

    /// Bands whose edges are given as cumulative fractions.
    ///
    /// `edges` are the upper edges of every band except the last, so `n`
    /// densities need `n - 1` edges. Names default to `layer-<i>`.
    #[must_use]
    pub fn from_edges(edges: &[f64], densities: &[f64]) -> Self {
        let mut bands = Vec::with_capacity(densities.len());
        let mut start = 0.0;
        for (i, &density) in densities.iter().enumerate() {
            let end = edges.get(i).copied().unwrap_or(1.0);
            bands.push(LayerBand::new(format!("layer-{i}"), start, end, density));
            start = end;
        }
        Self::new(bands)
    }

    /// The bands, bottom to top.
    #[must_use]
    pub fn bands(&self) -> &[LayerBand] {
        &self.bands
    }

    /// Number of bands.
    #[must_use]
    pub fn len(&self) -> usize {
        self.bands.len()
    }

    /// Returns true if there are no bands.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bands.is_empty()
    }

    /// Find the band containing height `z` (domain coordinates).
    ///
    /// Bands are half-open `[z_min, z_max)` except the last, which includes
    /// its upper edge. Returns `None` outside `[0, z_size]`.
    #[must_use]
    pub fn band_index_for(&self, z: f64, domain: &Domain) -> Option<usize> {
        let last = self.bands.len().checked_sub(1)?;
        self.bands.iter().enumerate().find_map(|(i, band)| {
            let (lo, hi) = band.z_range(domain);
            let inside = if i == last {
                z >= lo && z <= hi
            } else {
                z >= lo && z < hi
            };
            inside.then_some(i)
        })
    }

    /// Describe the first structural problem with the band list, if any.
    ///
    /// A well-formed layout starts at 0.0, ends at 1.0, and each band is
    /// non-empty and starts where the previous one ended. An empty layout has
    /// no structural problem here; check [`LayerSpec::is_empty`] separately.
    #[must_use]
    pub fn structure_problem(&self) -> Option<String> {
        let first = self.bands.first()?;
        if first.start != 0.0 {
            return Some(format!(
                "first band '{}' starts at {} instead of 0.0",
                first.name, first.start
            ));
        }
        let mut expected_start = 0.0;
        for band in &self.bands {
            if !band.start.is_finite() || !band.end.is_finite() {
                return Some(format!("band '{}' has a non-finite edge", band.name));
            }
            if band.start != expected_start {
                return Some(format!(
                    "band '{}' starts at {} but the previous band ends at {}",
                    band.name, band.start, expected_start
                ));
            }
            if band.end <= band.start {
                return Some(format!(
                    "band '{}' is empty or inverted: [{}, {})",
                    band.name, band.start, band.end
                ));
            }
            expected_start = band.end;
        }
        if expected_start != 1.0 {
            return Some(format!(
                "bands end at {expected_start} instead of covering the full height (1.0)"
            ));
        }
        None
    }
}

impl Default for LayerSpec {
    /// Recommended biomimetic densities: 25000 / 12000 / 6000 seeds/mm³.
    fn default() -> Self {
        Self::bone(25_000.0, 12_000.0, 6_000.0)
    }
}
