//! Transverse-field Ising chain parameters.
//!
//!   H = -J · Σ_i Z_i Z_{i+1}  -  h · Σ_i X_i
//!
//! on an open chain: bonds run `(0,1), (1,2), ..., (N-2, N-1)` with no
//! wraparound bond between the last and first site.
//!
//! # Example
//!
//! ```rust
//! use spinchain_sim::model::IsingChain;
//!
//! let chain = IsingChain::new(4, 1.0, 1.2);
//! assert_eq!(chain.bonds().collect::<Vec<_>>(), vec![(0, 1), (1, 2), (2, 3)]);
//! ```

use serde::{Deserialize, Serialize};

/// An open nearest-neighbour transverse-field Ising chain.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct IsingChain {
    /// Number of sites N.
    pub num_sites: usize,
    /// Coupling strength J.
    pub coupling_j: f64,
    /// Transverse field strength h.
    pub field_h: f64,
}

impl IsingChain {
    /// Create a chain description.
    pub fn new(num_sites: usize, coupling_j: f64, field_h: f64) -> Self {
        Self {
            num_sites,
            coupling_j,
            field_h,
        }
    }

    /// Nearest-neighbour bonds in increasing index order.
    pub fn bonds(&self) -> impl Iterator<Item = (usize, usize)> {
        (0..self.num_sites.saturating_sub(1)).map(|i| (i, i + 1))
    }

    /// Number of bonds, N-1.
    pub fn n_bonds(&self) -> usize {
        self.num_sites.saturating_sub(1)
    }

    /// True if both J and h are zero, i.e. evolution is the identity.
    pub fn is_trivial(&self) -> bool {
        self.coupling_j == 0.0 && self.field_h == 0.0
    }
}
