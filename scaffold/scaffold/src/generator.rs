//! Stateful front end for interactive callers.
//!
//! A presentation layer changes a slider, calls [`ScaffoldGenerator::regenerate`],
//! and reads [`ScaffoldGenerator::latest`] to redraw. Regenerations are
//! serialized, and a failed one leaves the previous run in place.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use parking_lot::{Mutex, RwLock};
use tracing::{info, warn};

use crate::error::ScaffoldResult;
use crate::pipeline::{run_pipeline, ScaffoldRun};
use crate::request::ScaffoldRequest;

/// Holds the latest successful run and serializes regenerations.
///
/// # Example
///
/// ```
/// use scaffold::{ScaffoldGenerator, ScaffoldRequest};
/// use scaffold::types::{Domain, LayerSpec};
///
/// let generator = ScaffoldGenerator::new();
/// assert!(generator.latest().is_none());
///
/// let request = ScaffoldRequest::new(
///     Domain::micrometers(250.0, 250.0, 250.0),
///     LayerSpec::uniform(20_000.0),
/// )
/// .with_rng_seed(1);
/// let run = generator.regenerate(&request).unwrap();
///
/// // A bad request fails without replacing the good run
/// assert!(generator.regenerate(&request.clone().with_target_porosity(3.0)).is_err());
/// assert_eq!(generator.latest().unwrap().seeds, run.seeds);
/// ```
#[derive(Debug, Default)]
pub struct ScaffoldGenerator {
    /// Held for the whole of a regeneration.
    active: Mutex<()>,
    latest: RwLock<Option<Arc<ScaffoldRun>>>,
    /// Successful runs; readable while a regeneration is in flight.
    generation: AtomicU64,
}

impl ScaffoldGenerator {
    /// A generator with no run yet.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Run the pipeline for `request` and publish the result.
    ///
    /// Concurrent calls run one after another. Readers keep seeing the
    /// previous run until the new one is complete.
    ///
    /// # Errors
    ///
    /// Returns the pipeline error; the previous run stays published.
    pub fn regenerate(&self, request: &ScaffoldRequest) -> ScaffoldResult<Arc<ScaffoldRun>> {
        let _active = self.active.lock();
        match run_pipeline(request) {
            Ok(run) => {
                let run = Arc::new(run);
                *self.latest.write() = Some(Arc::clone(&run));
                let generation = self.generation.fetch_add(1, Ordering::AcqRel) + 1;
                info!(
                    generation,
                    interior = run.interior_count(),
                    "Published scaffold run"
                );
                Ok(run)
            }
            Err(err) => {
                warn!(
                    stage = err.stage(),
                    error = %err,
                    "Regeneration failed, keeping previous run"
                );
                Err(err)
            }
        }
    }

    /// The latest successful run, if any.
    #[must_use]
    pub fn latest(&self) -> Option<Arc<ScaffoldRun>> {
        self.latest.read().clone()
    }

    /// Number of successful regenerations so far.
    ///
    /// Never waits for a regeneration in progress.
    #[must_use]
    pub fn generation(&self) -> u64 {
        self.generation.load(Ordering::Acquire)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use scaffold_types::{Domain, LayerSpec};

    fn request(seed: u64) -> ScaffoldRequest {
        ScaffoldRequest::new(
            Domain::micrometers(250.0, 250.0, 250.0),
            LayerSpec::uniform(20_000.0),
        )
        .with_rng_seed(seed)
    }

    #[test]
    fn test_failure_keeps_previous_run() {
        let generator = ScaffoldGenerator::new();
        let first = generator.regenerate(&request(1)).unwrap();
        assert_eq!(generator.generation(), 1);

        let empty = ScaffoldRequest::new(request(1).domain, LayerSpec::uniform(0.0));
        assert!(generator.regenerate(&empty).is_err());

        let latest = generator.latest().unwrap();
        assert!(Arc::ptr_eq(&latest, &first));
        assert_eq!(generator.generation(), 1);
    }

    #[test]
    fn test_regenerate_replaces_run() {
        let generator = ScaffoldGenerator::new();
        let first = generator.regenerate(&request(1)).unwrap();
        let second = generator.regenerate(&request(2)).unwrap();
        assert_ne!(first.seeds.points, second.seeds.points);
        assert!(Arc::ptr_eq(&generator.latest().unwrap(), &second));
        // The old run is still valid for whoever holds it
        assert_eq!(first.request.sampling.rng_seed, Some(1));
    }

    #[test]
    fn test_concurrent_regenerations() {
        let generator = ScaffoldGenerator::new();
        std::thread::scope(|scope| {
            for seed in 0..4 {
                let generator = &generator;
                scope.spawn(move || generator.regenerate(&request(seed)).unwrap());
            }
        });
        assert_eq!(generator.generation(), 4);
        let latest = generator.latest().unwrap();
        assert!(latest.request.sampling.rng_seed.unwrap() < 4);
    }

    #[test]
    fn test_generation_readable_during_run() {
        let generator = ScaffoldGenerator::new();
        generator.regenerate(&request(1)).unwrap();

        // Stand in for a regeneration that is still running
        let _running = generator.active.lock();
        assert_eq!(generator.generation(), 1);
        assert!(generator.latest().is_some());
    }
}
