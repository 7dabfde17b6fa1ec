//! Stratified seed sampling.
//!
//! Each layer band receives `round(density × band_volume_mm3)` seeds drawn
//! uniformly inside the band's slab of the domain.

// Seed counts stay far below 2^52
#![allow(clippy::cast_precision_loss)]

use nalgebra::Point3;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use scaffold_types::{Domain, LayerSpec};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::{VoronoiError, VoronoiResult};
use crate::params::SamplingParams;

/// Seeds generated for one run, with the per-band counts that produced them.
///
/// Points are stored band by band in [`LayerSpec`] order, but callers should
/// not rely on that ordering.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SeedSet {
    /// Seed coordinates in domain units.
    pub points: Vec<Point3<f64>>,
    /// Number of seeds placed in each band.
    pub band_counts: Vec<usize>,
    /// Volume of each band in cubic millimetres.
    pub band_volumes_mm3: Vec<f64>,
}

impl SeedSet {
    /// Total number of seeds.
    #[must_use]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Returns true if no seeds were placed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Seeds per cubic millimetre actually placed in band `index`.
    ///
    /// Differs from the requested density by the rounding of the count.
    #[must_use]
    pub fn band_density(&self, index: usize) -> Option<f64> {
        let count = *self.band_counts.get(index)?;
        let volume = *self.band_volumes_mm3.get(index)?;
        (volume > 0.0).then(|| count as f64 / volume)
    }
}

/// Check domain and layer spec before any sampling happens.
///
/// # Errors
///
/// - [`VoronoiError::InvalidDimension`] for a non-positive or non-finite size.
/// - [`VoronoiError::InvalidDensity`] for a negative or non-finite density.
/// - [`VoronoiError::InvalidLayerSpec`] for an empty band list, gaps, overlaps
///   or bands that do not cover `[0, 1]`.
pub fn validate_inputs(domain: &Domain, layers: &LayerSpec) -> VoronoiResult<()> {
    for (axis, value) in domain.axes() {
        if !value.is_finite() || value <= 0.0 {
            return Err(VoronoiError::InvalidDimension { axis, value });
        }
    }

    if layers.is_empty() {
        return Err(VoronoiError::InvalidLayerSpec(
            "at least one layer band is required".to_string(),
        ));
    }
    if let Some(problem) = layers.structure_problem() {
        return Err(VoronoiError::InvalidLayerSpec(problem));
    }

    for band in layers.bands() {
        if !band.density.is_finite() || band.density < 0.0 {
            return Err(VoronoiError::InvalidDensity {
                band: band.name.clone(),
                value: band.density,
            });
        }
    }

    Ok(())
}

/// Sample seeds using the generator selected by `params`.
///
/// A fixed `rng_seed` gives a reproducible [`ChaCha8Rng`] stream.
///
/// # Errors
///
/// See [`validate_inputs`].
///
/// # Example
///
/// ```
/// use scaffold_types::{Domain, LayerSpec};
/// use scaffold_voronoi::{sample_seeds, SamplingParams};
///
/// let domain = Domain::micrometers(800.0, 800.0, 100.0);
/// let layers = LayerSpec::bone(25_000.0, 12_000.0, 6_000.0);
///
/// let seeds = sample_seeds(&domain, &layers, &SamplingParams::seeded(7)).unwrap();
/// assert_eq!(seeds.band_counts, vec![320, 230, 192]);
/// assert_eq!(seeds.len(), 742);
/// ```
pub fn sample_seeds(
    domain: &Domain,
    layers: &LayerSpec,
    params: &SamplingParams,
) -> VoronoiResult<SeedSet> {
    let mut rng = match params.rng_seed {
        Some(seed) => ChaCha8Rng::seed_from_u64(seed),
        None => ChaCha8Rng::from_entropy(),
    };
    sample_seeds_with(&mut rng, domain, layers)
}

/// Sample seeds with a caller-owned random number generator.
///
/// # Errors
///
/// See [`validate_inputs`].
pub fn sample_seeds_with<R: Rng>(
    rng: &mut R,
    domain: &Domain,
    layers: &LayerSpec,
) -> VoronoiResult<SeedSet> {
    validate_inputs(domain, layers)?;

    let band_counts: Vec<usize> = layers
        .bands()
        .iter()
        .map(|band| band.seed_count(domain))
        .collect();
    let band_volumes_mm3: Vec<f64> = layers
        .bands()
        .iter()
        .map(|band| band.volume_mm3(domain))
        .collect();

    let total: usize = band_counts.iter().sum();
    let mut points = Vec::with_capacity(total);

    for (band, &count) in layers.bands().iter().zip(&band_counts) {
        let (z_lo, z_hi) = band.z_range(domain);
        debug!(
            band = %band.name,
            count,
            z_lo,
            z_hi,
            "Sampling layer band"
        );
        if count == 0 {
            continue;
        }
        points.extend((0..count).map(|_| {
            Point3::new(
                rng.gen_range(0.0..domain.x_size),
                rng.gen_range(0.0..domain.y_size),
                rng.gen_range(z_lo..z_hi),
            )
        }));
    }

    info!(
        total = points.len(),
        bands = ?band_counts,
        "Sampled seeds"
    );

    Ok(SeedSet {
        points,
        band_counts,
        band_volumes_mm3,
    })
}
