//! Error types for the sim crate.

use thiserror::Error;

/// Errors produced while evolving, sampling or recording a spin chain.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SimError {
    /// A gate references a site that does not exist in the chain.
    #[error("gate references site {site} but the chain only has {num_sites} sites")]
    InvalidSiteIndex {
        /// The offending site index.
        site: usize,
        /// Number of sites in the state.
        num_sites: usize,
    },

    /// shots must be ≥ 1.
    #[error("shot count must be at least 1, got {0}")]
    InvalidShotCount(usize),

    /// Total probability mass drifted away from 1.
    #[error("state is no longer normalized: total probability {norm}")]
    NonUnitaryStateDetected {
        /// Sum of squared amplitude magnitudes.
        norm: f64,
    },

    /// The chain must hold between 1 and `MAX_SITES` sites.
    #[error("site count must be between 1 and {max}, got {0}", max = crate::state::MAX_SITES)]
    InvalidSiteCount(usize),

    /// Time series samples must arrive in strictly increasing time order.
    #[error("time {next} does not follow previously recorded time {previous}")]
    NonMonotonicTime {
        /// Last recorded time.
        previous: f64,
        /// Rejected time.
        next: f64,
    },

    /// Simulation parameters failed validation.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// `next_frame` was called after the last frame had been produced.
    #[error("simulation already produced all {total_frames} frames")]
    SimulationFinished {
        /// Number of frames in the run.
        total_frames: usize,
    },
}

/// Result type for spin-chain simulation operations.
pub type SimResult<T> = Result<T, SimError>;
