//! Empirical outcome frequencies from a batch of shots.

use std::collections::BTreeMap;

use rustc_hash::FxHashMap;

use crate::magnetization::{self, MagnetizationVector, SITE_ORDER};

/// Observed counts keyed by basis configuration.
///
/// Configurations that were never drawn are absent. Counts always sum to
/// the number of shots taken.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ShotFrequencies {
    counts: FxHashMap<usize, u64>,
    num_sites: usize,
    shots: u64,
}

impl ShotFrequencies {
    /// Build from a prepared count map; the shot total is derived from it.
    pub fn from_counts(num_sites: usize, counts: FxHashMap<usize, u64>) -> Self {
        let shots = counts.values().sum();
        Self {
            counts,
            num_sites,
            shots,
        }
    }

    /// Number of sites each configuration spans.
    pub fn num_sites(&self) -> usize {
        self.num_sites
    }

    /// Total number of shots (sum of all counts).
    pub fn shots(&self) -> u64 {
        self.shots
    }

    /// Count for one basis configuration (zero if never observed).
    pub fn get(&self, index: usize) -> u64 {
        self.counts.get(&index).copied().unwrap_or(0)
    }

    /// Number of distinct configurations observed.
    pub fn len(&self) -> usize {
        self.counts.len()
    }

    /// True if no shots were recorded.
    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// Iterate over `(basis_index, count)` pairs in unspecified order.
    pub fn iter(&self) -> impl Iterator<Item = (usize, u64)> + '_ {
        self.counts.iter().map(|(&k, &v)| (k, v))
    }

    /// Empirical probability of a configuration.
    pub fn frequency(&self, index: usize) -> f64 {
        if self.shots == 0 {
            return 0.0;
        }
        self.get(index) as f64 / self.shots as f64
    }

    /// The most frequently observed configuration, lowest index on ties.
    pub fn most_frequent(&self) -> Option<(usize, u64)> {
        self.iter()
            .max_by(|a, b| a.1.cmp(&b.1).then_with(|| b.0.cmp(&a.0)))
    }

    /// Counts keyed by bitstring (site 0 leftmost), sorted.
    pub fn to_bitstrings(&self) -> BTreeMap<String, u64> {
        self.iter()
            .map(|(k, v)| (SITE_ORDER.bitstring(k, self.num_sites), v))
            .collect()
    }

    /// Per-site magnetization implied by these counts.
    pub fn magnetization(&self) -> MagnetizationVector {
        magnetization::estimate(self, self.num_sites, self.shots)
    }

    /// Add every count from `other` into `self`.
    pub(crate) fn merge(mut self, other: Self) -> Self {
        for (k, v) in other.counts {
            *self.counts.entry(k).or_insert(0) += v;
        }
        self.shots += other.shots;
        self
    }

    pub(crate) fn record(&mut self, index: usize) {
        *self.counts.entry(index).or_insert(0) += 1;
        self.shots += 1;
    }

    pub(crate) fn empty(num_sites: usize) -> Self {
        Self {
            counts: FxHashMap::default(),
            num_sites,
            shots: 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_and_merge() {
        let mut a = ShotFrequencies::empty(2);
        a.record(0);
        a.record(0);
        let mut b = ShotFrequencies::empty(2);
        b.record(3);
        b.record(0);

        let merged = a.merge(b);
        assert_eq!(merged.shots(), 4);
        assert_eq!(merged.get(0), 3);
        assert_eq!(merged.get(3), 1);
        assert_eq!(merged.get(1), 0);
        assert_eq!(merged.len(), 2);
        assert!((merged.frequency(0) - 0.75).abs() < 1e-12);
    }

    #[test]
    fn test_bitstrings_and_mode() {
        let map: FxHashMap<usize, u64> = [(0b001, 5), (0b100, 7)].into_iter().collect();
        let f = ShotFrequencies::from_counts(3, map);
        let bits = f.to_bitstrings();
        assert_eq!(bits.get("100"), Some(&5));
        assert_eq!(bits.get("001"), Some(&7));
        assert_eq!(f.most_frequent(), Some((0b100, 7)));
    }
}
