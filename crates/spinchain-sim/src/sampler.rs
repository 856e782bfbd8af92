//! Shot-based sampling of an amplitude state.
//!
//! Sampling takes `&AmplitudeState`: it never projects, renormalizes or
//! otherwise touches the amplitudes, so the same state keeps evolving
//! afterwards as if it had never been measured.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;
use tracing::debug;

use crate::counts::ShotFrequencies;
use crate::error::{SimError, SimResult};
use crate::state::AmplitudeState;

/// Below this many shots binning stays on the calling thread.
const PARALLEL_SHOT_THRESHOLD: usize = 8192;

/// Draws per rayon work item.
const SHOT_CHUNK: usize = 2048;

/// Multinomial sampler over the outcome distribution |a_k|².
///
/// Uniform variates are pulled from the injected generator on the calling
/// thread in a fixed order, so a seeded sampler is reproducible even when
/// binning runs in parallel.
#[derive(Debug, Clone)]
pub struct ShotSampler<R = StdRng> {
    rng: R,
}

impl ShotSampler<StdRng> {
    /// Sampler with a fixed seed.
    pub fn from_seed(seed: u64) -> Self {
        Self::with_rng(StdRng::seed_from_u64(seed))
    }

    /// Sampler seeded from operating-system entropy.
    pub fn from_entropy() -> Self {
        Self::with_rng(StdRng::from_entropy())
    }

    /// Seeded if `seed` is given, entropy-seeded otherwise.
    pub fn new(seed: Option<u64>) -> Self {
        seed.map_or_else(Self::from_entropy, Self::from_seed)
    }
}

impl<R: Rng> ShotSampler<R> {
    /// Sampler drawing from an explicit generator.
    pub fn with_rng(rng: R) -> Self {
        Self { rng }
    }

    /// Draw `shots` independent outcomes from `state`.
    ///
    /// Probabilities are taken relative to the state's current total mass,
    /// so small normalization drift does not bias the draw.
    pub fn sample(&mut self, state: &AmplitudeState, shots: usize) -> SimResult<ShotFrequencies> {
        if shots == 0 {
            return Err(SimError::InvalidShotCount(shots));
        }

        let cumulative: Vec<f64> = state
            .amplitudes()
            .iter()
            .scan(0.0, |acc, a| {
                *acc += a.norm_sqr();
                Some(*acc)
            })
            .collect();
        let total = cumulative.last().copied().unwrap_or(0.0);
        if !(total > 0.0 && total.is_finite()) {
            return Err(SimError::NonUnitaryStateDetected { norm: total });
        }

        let draws: Vec<f64> = (0..shots)
            .map(|_| self.rng.r#gen::<f64>() * total)
            .collect();

        let num_sites = state.num_sites();
        let freqs = if shots < PARALLEL_SHOT_THRESHOLD {
            bin_draws(&cumulative, &draws, num_sites)
        } else {
            draws
                .par_chunks(SHOT_CHUNK)
                .map(|chunk| bin_draws(&cumulative, chunk, num_sites))
                .reduce(|| ShotFrequencies::empty(num_sites), ShotFrequencies::merge)
        };

        debug!(
            shots,
            num_sites,
            distinct = freqs.len(),
            "sampled outcome frequencies"
        );
        Ok(freqs)
    }
}

/// Map each uniform draw to the basis index whose cumulative interval holds it.
fn bin_draws(cumulative: &[f64], draws: &[f64], num_sites: usize) -> ShotFrequencies {
    let last = cumulative.len() - 1;
    let mut freqs = ShotFrequencies::empty(num_sites);
    for &r in draws {
        let index = cumulative.partition_point(|&c| c <= r).min(last);
        freqs.record(index);
    }
    freqs
}
