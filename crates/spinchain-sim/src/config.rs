//! Run parameters for a spin-chain simulation.

use serde::{Deserialize, Serialize};

use crate::error::{SimError, SimResult};
use crate::model::IsingChain;
use crate::state::MAX_SITES;
use crate::trotter::TrotterOrder;

/// Everything needed to drive one simulation run.
///
/// Frame count comes from `total_frames` when set, otherwise from
/// `floor(total_time * frames_per_unit_time)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Number of sites N (≥ 2).
    pub num_sites: usize,
    /// Coupling strength J.
    pub coupling_j: f64,
    /// Transverse field strength h.
    pub field_h: f64,
    /// Simulated duration T.
    pub total_time: f64,
    /// Frames per unit of simulated time.
    pub frames_per_unit_time: Option<u32>,
    /// Explicit frame count; takes precedence over the rate.
    pub total_frames: Option<usize>,
    /// Shots drawn per frame.
    pub shots_per_frame: usize,
    /// Seed for the measurement sampler; entropy-seeded when absent.
    pub random_seed: Option<u64>,
    /// Product-formula order.
    pub trotter_order: TrotterOrder,
    /// Allowed drift of the total probability before renormalizing.
    pub normalization_tolerance: f64,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            num_sites: 4,
            coupling_j: 1.0,
            field_h: 1.2,
            total_time: 10.0,
            frames_per_unit_time: Some(15),
            total_frames: None,
            shots_per_frame: 1024,
            random_seed: None,
            trotter_order: TrotterOrder::First,
            normalization_tolerance: 1e-9,
        }
    }
}

impl SimulationConfig {
    /// Check every parameter, returning the first problem found.
    pub fn validate(&self) -> SimResult<()> {
        if self.num_sites < 2 || self.num_sites > MAX_SITES {
            return invalid(format!(
                "num_sites must be between 2 and {MAX_SITES}, got {}",
                self.num_sites
            ));
        }
        if !self.coupling_j.is_finite() || !self.field_h.is_finite() {
            return invalid(format!(
                "coupling_j and field_h must be finite, got J={} h={}",
                self.coupling_j, self.field_h
            ));
        }
        if !(self.total_time.is_finite() && self.total_time > 0.0) {
            return invalid(format!(
                "total_time must be positive, got {}",
                self.total_time
            ));
        }
        if self.shots_per_frame == 0 {
            return Err(SimError::InvalidShotCount(0));
        }
        if !(self.normalization_tolerance > 0.0) {
            return invalid(format!(
                "normalization_tolerance must be positive, got {}",
                self.normalization_tolerance
            ));
        }
        self.frame_count()?;
        Ok(())
    }

    /// Number of frames (and Trotter steps) in the run.
    pub fn frame_count(&self) -> SimResult<usize> {
        let frames = match (self.total_frames, self.frames_per_unit_time) {
            (Some(n), _) => n,
            (None, Some(rate)) => (self.total_time * f64::from(rate)).floor() as usize,
            (None, None) => {
                return invalid("either total_frames or frames_per_unit_time must be set".into());
            }
        };
        if frames == 0 {
            return invalid(format!(
                "run has no frames (total_time={}, total_frames={:?}, frames_per_unit_time={:?})",
                self.total_time, self.total_frames, self.frames_per_unit_time
            ));
        }
        Ok(frames)
    }

    /// Time increment per frame, `total_time / total_frames`.
    pub fn dt(&self) -> SimResult<f64> {
        Ok(self.total_time / self.frame_count()? as f64)
    }

    /// The Ising chain described by these parameters.
    pub fn chain(&self) -> IsingChain {
        IsingChain::new(self.num_sites, self.coupling_j, self.field_h)
    }
}

fn invalid<T>(msg: String) -> SimResult<T> {
    Err(SimError::InvalidConfig(msg))
}
