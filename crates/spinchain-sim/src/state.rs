//! Amplitude-vector representation of the chain.
//!
//! The joint state of `N` two-level sites is stored densely as `2^N`
//! complex amplitudes. Basis index `k` encodes one configuration, with the
//! site-to-bit mapping fixed by [`SITE_ORDER`]. Bit value `0` is the ground
//! state of a site and `1` the excited state.

use num_complex::Complex64;

use crate::error::{SimError, SimResult};
use crate::magnetization::SITE_ORDER;

/// Largest chain the dense representation accepts (2^24 amplitudes, 256 MiB).
pub const MAX_SITES: usize = 24;

/// The complex amplitude vector of an `N`-site chain.
///
/// Only [`crate::gate`] mutates amplitudes; samplers and estimators take
/// `&AmplitudeState` and never project the state.
#[derive(Debug, Clone, PartialEq)]
pub struct AmplitudeState {
    /// The state amplitudes (2^n complex numbers).
    amplitudes: Vec<Complex64>,
    /// Number of sites.
    num_sites: usize,
}

impl AmplitudeState {
    /// All sites in the ground state, |0...0⟩.
    pub fn ground(num_sites: usize) -> SimResult<Self> {
        Self::with_excited_sites(num_sites, &[])
    }

    /// Site 0 excited and every other site in the ground state.
    ///
    /// This is the starting configuration of every simulation run.
    pub fn initial(num_sites: usize) -> SimResult<Self> {
        Self::with_excited_sites(num_sites, &[0])
    }

    /// A computational basis state with exactly the given sites excited.
    pub fn with_excited_sites(num_sites: usize, excited: &[usize]) -> SimResult<Self> {
        validate_site_count(num_sites)?;
        let mut index = 0usize;
        for &site in excited {
            if site >= num_sites {
                return Err(SimError::InvalidSiteIndex { site, num_sites });
            }
            index |= SITE_ORDER.mask(site, num_sites);
        }

        let mut amplitudes = vec![Complex64::new(0.0, 0.0); 1 << num_sites];
        amplitudes[index] = Complex64::new(1.0, 0.0);
        Ok(Self {
            amplitudes,
            num_sites,
        })
    }

    /// Wrap an explicit amplitude vector.
    ///
    /// The length must be a power of two; the vector is taken as given, so
    /// callers that care about normalization should follow up with
    /// [`check_normalization`](Self::check_normalization).
    pub fn from_amplitudes(amplitudes: Vec<Complex64>) -> SimResult<Self> {
        let len = amplitudes.len();
        if !len.is_power_of_two() || len < 2 {
            return Err(SimError::InvalidConfig(format!(
                "amplitude vector length {len} is not a power of two ≥ 2"
            )));
        }
        let num_sites = len.trailing_zeros() as usize;
        validate_site_count(num_sites)?;
        Ok(Self {
            amplitudes,
            num_sites,
        })
    }

    /// Number of sites in the chain.
    pub fn num_sites(&self) -> usize {
        self.num_sites
    }

    /// Hilbert-space dimension, 2^N.
    pub fn dim(&self) -> usize {
        self.amplitudes.len()
    }

    /// Read-only view of the amplitudes, indexed by basis configuration.
    pub fn amplitudes(&self) -> &[Complex64] {
        &self.amplitudes
    }

    pub(crate) fn amplitudes_mut(&mut self) -> &mut [Complex64] {
        &mut self.amplitudes
    }

    /// Outcome probabilities |a_k|² for every basis configuration.
    pub fn probabilities(&self) -> Vec<f64> {
        self.amplitudes.iter().map(|a| a.norm_sqr()).collect()
    }

    /// Total probability mass Σ|a_k|².
    pub fn norm_sqr(&self) -> f64 {
        self.amplitudes.iter().map(|a| a.norm_sqr()).sum()
    }

    /// Fail with [`SimError::NonUnitaryStateDetected`] if the total
    /// probability differs from 1 by more than `tolerance`.
    pub fn check_normalization(&self, tolerance: f64) -> SimResult<()> {
        let norm = self.norm_sqr();
        if (norm - 1.0).abs() > tolerance {
            return Err(SimError::NonUnitaryStateDetected { norm });
        }
        Ok(())
    }

    /// Rescale the amplitudes so the total probability is exactly 1.
    ///
    /// A zero vector is left untouched.
    pub fn renormalize(&mut self) {
        let norm = self.norm_sqr().sqrt();
        if norm > 0.0 {
            for amp in &mut self.amplitudes {
                *amp /= norm;
            }
        }
    }

    /// Exact expectation value ⟨Z_site⟩ computed from the amplitudes.
    ///
    /// Ground contributes +1 and excited −1, matching the sign convention of
    /// the sampled estimator.
    pub fn expectation_z(&self, site: usize) -> SimResult<f64> {
        self.check_site(site)?;
        let mask = SITE_ORDER.mask(site, self.num_sites);
        Ok(self
            .amplitudes
            .iter()
            .enumerate()
            .map(|(k, a)| {
                if k & mask == 0 {
                    a.norm_sqr()
                } else {
                    -a.norm_sqr()
                }
            })
            .sum())
    }

    /// Reject site indices outside `0..num_sites`.
    pub fn check_site(&self, site: usize) -> SimResult<()> {
        if site >= self.num_sites {
            return Err(SimError::InvalidSiteIndex {
                site,
                num_sites: self.num_sites,
            });
        }
        Ok(())
    }
}

fn validate_site_count(num_sites: usize) -> SimResult<()> {
    if num_sites == 0 || num_sites > MAX_SITES {
        return Err(SimError::InvalidSiteCount(num_sites));
    }
    Ok(())
}
