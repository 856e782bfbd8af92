//! Per-site magnetization estimates.
//!
//! # Bit ordering
//!
//! Every place that turns a basis index into per-site values goes through
//! [`SITE_ORDER`]. With [`BitOrder::SiteZeroLsb`] site `i` is bit `i` of the
//! basis index, so basis index `0b0001` is "site 0 excited". Bitstrings
//! rendered for humans always put site 0 on the left regardless of the
//! internal order.
//!
//! # Sign convention
//!
//! Ground (bit `0`) counts +1, excited (bit `1`) counts −1. The initial
//! chain therefore reads `[-1, +1, +1, ...]`.

use std::ops::Index;

use serde::{Deserialize, Serialize};

use crate::counts::ShotFrequencies;
use crate::error::SimResult;
use crate::state::AmplitudeState;

/// Which end of a basis index encodes site 0.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BitOrder {
    /// Site `i` is bit `i` (site 0 is the least significant bit).
    SiteZeroLsb,
    /// Site `i` is bit `N-1-i` (site 0 is the most significant bit).
    SiteZeroMsb,
}

impl BitOrder {
    /// Bit mask selecting `site` inside a basis index of an `num_sites` chain.
    ///
    /// # Panics
    ///
    /// Panics if `site >= num_sites`.
    #[inline]
    pub fn mask(self, site: usize, num_sites: usize) -> usize {
        assert!(
            site < num_sites,
            "site {site} out of range for a {num_sites}-site chain"
        );
        match self {
            BitOrder::SiteZeroLsb => 1 << site,
            BitOrder::SiteZeroMsb => 1 << (num_sites - 1 - site),
        }
    }

    /// Whether `site` is excited in basis configuration `index`.
    #[inline]
    pub fn is_excited(self, index: usize, site: usize, num_sites: usize) -> bool {
        index & self.mask(site, num_sites) != 0
    }

    /// Render `index` as a bitstring with site 0 as the leftmost character.
    pub fn bitstring(self, index: usize, num_sites: usize) -> String {
        (0..num_sites)
            .map(|site| {
                if self.is_excited(index, site, num_sites) {
                    '1'
                } else {
                    '0'
                }
            })
            .collect()
    }
}

/// The bit ordering used by the whole crate.
pub const SITE_ORDER: BitOrder = BitOrder::SiteZeroLsb;

/// One magnetization value in [-1, 1] per site, for a single frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MagnetizationVector(Vec<f64>);

impl MagnetizationVector {
    /// Wrap per-site values.
    pub fn new(values: Vec<f64>) -> Self {
        Self(values)
    }

    /// Number of sites.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// True for a zero-site vector.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Value for one site.
    pub fn get(&self, site: usize) -> Option<f64> {
        self.0.get(site).copied()
    }

    /// All values, site 0 first.
    pub fn as_slice(&self) -> &[f64] {
        &self.0
    }

    /// Chain average of the per-site values.
    pub fn mean(&self) -> f64 {
        if self.0.is_empty() {
            return 0.0;
        }
        self.0.iter().sum::<f64>() / self.0.len() as f64
    }

    /// Unwrap into the underlying vector.
    pub fn into_inner(self) -> Vec<f64> {
        self.0
    }
}

impl Index<usize> for MagnetizationVector {
    type Output = f64;

    fn index(&self, site: usize) -> &f64 {
        &self.0[site]
    }
}

/// Estimate per-site magnetization from shot frequencies.
///
/// Each observed configuration adds `count / total_shots` to every ground
/// site and subtracts it from every excited site. Counts are accumulated as
/// integers and divided once, so the result does not depend on the order
/// outcomes are visited in. A zero `total_shots` yields an all-zero vector.
pub fn estimate(
    freqs: &ShotFrequencies,
    num_sites: usize,
    total_shots: u64,
) -> MagnetizationVector {
    let mut balance = vec![0i64; num_sites];
    for (index, count) in freqs.iter() {
        let count = count as i64;
        for (site, b) in balance.iter_mut().enumerate() {
            if SITE_ORDER.is_excited(index, site, num_sites) {
                *b -= count;
            } else {
                *b += count;
            }
        }
    }

    if total_shots == 0 {
        return MagnetizationVector(vec![0.0; num_sites]);
    }
    let shots = total_shots as f64;
    MagnetizationVector(balance.into_iter().map(|b| b as f64 / shots).collect())
}

/// Exact magnetization ⟨Z_i⟩ for every site, read from the amplitudes.
pub fn exact_magnetization(state: &AmplitudeState) -> SimResult<MagnetizationVector> {
    (0..state.num_sites())
        .map(|site| state.expectation_z(site))
        .collect::<SimResult<Vec<_>>>()
        .map(MagnetizationVector)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rustc_hash::FxHashMap;

    fn freqs(num_sites: usize, entries: &[(usize, u64)]) -> ShotFrequencies {
        let map: FxHashMap<usize, u64> = entries.iter().copied().collect();
        ShotFrequencies::from_counts(num_sites, map)
    }

    #[test]
    fn test_site_zero_is_least_significant_bit() {
        assert_eq!(SITE_ORDER, BitOrder::SiteZeroLsb);
        assert_eq!(SITE_ORDER.mask(0, 4), 0b0001);
        assert_eq!(SITE_ORDER.mask(3, 4), 0b1000);
        assert_eq!(BitOrder::SiteZeroMsb.mask(0, 4), 0b1000);
    }

    #[test]
    #[should_panic(expected = "out of range")]
    fn test_mask_rejects_site_past_chain_end() {
        BitOrder::SiteZeroMsb.mask(4, 4);
    }

    #[test]
    fn test_bitstring_puts_site_zero_first() {
        assert_eq!(SITE_ORDER.bitstring(0b0001, 4), "1000");
        assert_eq!(SITE_ORDER.bitstring(0b0110, 4), "0110");
        assert_eq!(BitOrder::SiteZeroMsb.bitstring(0b0001, 4), "0001");
    }

    #[test]
    fn test_initial_configuration_sign_convention() {
        // All shots land on "site 0 excited".
        let f = freqs(4, &[(0b0001, 100)]);
        let m = estimate(&f, 4, 100);
        assert_eq!(m.as_slice(), &[-1.0, 1.0, 1.0, 1.0]);
    }

    #[test]
    fn test_mixed_outcomes() {
        // 3/4 of shots in |00⟩, 1/4 in "site 1 excited".
        let f = freqs(2, &[(0b00, 300), (0b10, 100)]);
        let m = estimate(&f, 2, 400);
        assert!((m[0] - 1.0).abs() < 1e-12);
        assert!((m[1] - 0.5).abs() < 1e-12);
        assert!(m.as_slice().iter().all(|v| (-1.0..=1.0).contains(v)));
    }

    #[test]
    fn test_exact_matches_estimate_on_basis_state() {
        let state = AmplitudeState::with_excited_sites(3, &[0, 2]).unwrap();
        let exact = exact_magnetization(&state).unwrap();
        let m = estimate(&freqs(3, &[(0b101, 10)]), 3, 10);
        assert_eq!(exact, m);
    }

    #[test]
    fn test_mean() {
        let m = MagnetizationVector::new(vec![-1.0, 1.0, 1.0, 1.0]);
        assert!((m.mean() - 0.5).abs() < 1e-12);
    }
}
