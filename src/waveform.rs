//! Synthetic price-like waveforms and the asynchronous dataset pool builder.
//!
//! Each dataset is a progressive random walk, rescaled into a plausible price
//! band around a random baseline and then loop-extended so it can be streamed
//! forever.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tokio::task::JoinSet;
use tracing::{debug, info};

use crate::config::DashboardConfig;
use crate::dataset::{loop_extend, Dataset};
use crate::error::GenerationError;

/// Baselines are drawn uniformly from `[BASELINE_MIN, BASELINE_MIN + BASELINE_SPAN)`.
pub const BASELINE_MIN: f64 = 10.0;
pub const BASELINE_SPAN: f64 = 2000.0;
/// Amplitude as a fraction of the baseline.
pub const AMPLITUDE_RATIO: f64 = 0.03;
/// Lower bound for the half range of a raw trace; keeps flat traces finite.
pub const MIN_HALF_RANGE: f64 = f64::EPSILON;

// ─────────────────────────────────────────────────────────────────────────────
// TraceGenerator – raw random walk
// ─────────────────────────────────────────────────────────────────────────────

/// Progressive random-walk trace generator.
#[derive(Debug, Clone)]
pub struct TraceGenerator {
    num_points: usize,
    /// Largest absolute step between consecutive samples.
    step: f64,
}

impl Default for TraceGenerator {
    fn default() -> Self {
        Self {
            num_points: 1000,
            step: 0.5,
        }
    }
}

impl TraceGenerator {
    pub fn new(num_points: usize) -> Self {
        Self {
            num_points,
            ..Default::default()
        }
    }

    pub fn with_step(mut self, step: f64) -> Self {
        self.step = step;
        self
    }

    pub fn num_points(&self) -> usize {
        self.num_points
    }

    /// Produce `num_points` raw samples starting at 0.
    pub fn generate<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<Vec<f64>, GenerationError> {
        if self.num_points == 0 {
            return Err(GenerationError::EmptyTrace);
        }
        let mut y = 0.0;
        let mut out = Vec::with_capacity(self.num_points);
        for _ in 0..self.num_points {
            out.push(y);
            y += (rng.gen::<f64>() - 0.5) * 2.0 * self.step;
        }
        Ok(out)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Rescaling
// ─────────────────────────────────────────────────────────────────────────────

/// Map a raw trace into `baseline ± amplitude`.
///
/// The raw minimum maps to `baseline - amplitude` and the maximum to
/// `baseline + amplitude`. A flat trace maps to `baseline`.
pub fn rescale(raw: &[f64], baseline: f64, amplitude: f64) -> Vec<f64> {
    if raw.is_empty() {
        return Vec::new();
    }
    let (min, max) = raw
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| {
            (lo.min(v), hi.max(v))
        });
    let half_range = ((max - min) / 2.0).max(MIN_HALF_RANGE);
    let mid = min + (max - min) / 2.0;
    raw.iter()
        .map(|&v| baseline + ((v - mid) / half_range) * amplitude)
        .collect()
}

/// Draw a baseline and derive its amplitude.
pub fn random_band<R: Rng + ?Sized>(rng: &mut R) -> (f64, f64) {
    let baseline = BASELINE_MIN + rng.gen::<f64>() * BASELINE_SPAN;
    (baseline, baseline * AMPLITUDE_RATIO)
}

/// Generate, rescale and loop-extend one dataset.
pub fn build_dataset<R: Rng + ?Sized>(
    index: usize,
    generator: &TraceGenerator,
    rng: &mut R,
) -> Result<Dataset, GenerationError> {
    let raw = generator.generate(rng)?;
    let (baseline, amplitude) = random_band(rng);
    let scaled = rescale(&raw, baseline, amplitude);
    if let Some(sample) = scaled.iter().position(|v| !v.is_finite()) {
        return Err(GenerationError::NonFinite { index, sample });
    }
    debug!(index, baseline, amplitude, "generated dataset");
    Dataset::new(index, loop_extend(&scaled))
}

// ─────────────────────────────────────────────────────────────────────────────
// Pool generation
// ─────────────────────────────────────────────────────────────────────────────

/// Build the whole dataset pool concurrently and wait for every generation.
///
/// Fails as soon as any generation fails; a partial pool is never returned.
/// Datasets are returned ordered by index.
pub async fn generate_pool(cfg: &DashboardConfig) -> Result<Vec<Dataset>, GenerationError> {
    let generator = TraceGenerator::new(cfg.history_duration_ms);
    let mut master = match cfg.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let seeds: Vec<u64> = (0..cfg.dataset_pool_size).map(|_| master.gen()).collect();
    generate_with(cfg.dataset_pool_size, move |index| {
        let mut rng = StdRng::seed_from_u64(seeds[index]);
        build_dataset(index, &generator, &mut rng)
    })
    .await
}

/// Run `count` generations of `make` on the blocking pool and collect them in index order.
pub async fn generate_with<F>(count: usize, make: F) -> Result<Vec<Dataset>, GenerationError>
where
    F: Fn(usize) -> Result<Dataset, GenerationError> + Send + Sync + 'static,
{
    if count == 0 {
        return Err(GenerationError::EmptyPool);
    }
    let make = std::sync::Arc::new(make);
    let mut set = JoinSet::new();
    for index in 0..count {
        let make = make.clone();
        set.spawn_blocking(move || (index, make(index)));
    }

    let mut slots: Vec<Option<Dataset>> = vec![None; count];
    while let Some(joined) = set.join_next().await {
        let (index, result) = joined?;
        slots[index] = Some(result?);
    }

    let datasets: Vec<Dataset> = slots.into_iter().flatten().collect();
    info!(
        count = datasets.len(),
        len = datasets.first().map(Dataset::len).unwrap_or(0),
        "dataset pool ready"
    );
    Ok(datasets)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rescale_hits_band_edges() {
        let out = rescale(&[-2.0, 0.0, 2.0], 100.0, 3.0);
        assert_eq!(out, vec![97.0, 100.0, 103.0]);
    }

    #[test]
    fn rescale_flat_trace_stays_finite() {
        let out = rescale(&[4.0; 5], 500.0, 15.0);
        assert!(out.iter().all(|v| *v == 500.0));
    }

    #[test]
    fn generator_rejects_zero_points() {
        let mut rng = StdRng::seed_from_u64(1);
        assert!(matches!(
            TraceGenerator::new(0).generate(&mut rng),
            Err(GenerationError::EmptyTrace)
        ));
    }

    #[test]
    fn random_walk_steps_are_bounded() {
        let mut rng = StdRng::seed_from_u64(7);
        let raw = TraceGenerator::new(500).with_step(0.25).generate(&mut rng).unwrap();
        assert_eq!(raw.len(), 500);
        assert_eq!(raw[0], 0.0);
        assert!(raw.windows(2).all(|w| (w[1] - w[0]).abs() <= 0.25 + 1e-12));
    }

    #[test]
    fn built_dataset_is_loop_extended_within_band() {
        let mut rng = StdRng::seed_from_u64(42);
        let ds = build_dataset(3, &TraceGenerator::new(100), &mut rng).unwrap();
        assert_eq!(ds.id(), 3);
        assert_eq!(ds.len(), 200);
        assert_eq!(ds.values()[99], ds.values()[100]);
        let (lo, hi) = ds
            .values()
            .iter()
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| (lo.min(v), hi.max(v)));
        // band is symmetric around a baseline in [10, 2010) with 3% amplitude
        let baseline = (lo + hi) / 2.0;
        assert!((BASELINE_MIN..BASELINE_MIN + BASELINE_SPAN).contains(&baseline));
        assert!(((hi - lo) / 2.0 - baseline * AMPLITUDE_RATIO).abs() < 1e-9);
    }
}
