//! Append-only magnetization time series.

use serde::{Deserialize, Serialize};

use crate::error::{SimError, SimResult};
use crate::magnetization::MagnetizationVector;

/// Upper bound on frames reserved up front; longer runs grow on demand.
pub const MAX_RESERVED_FRAMES: usize = 4096;

/// Recorded frame times with the full magnetization vector of each frame.
///
/// Times are strictly increasing. The site-0 series used by the running
/// plot is `points(0)`; other sites are kept for richer consumers.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TimeSeriesRecorder {
    times: Vec<f64>,
    values: Vec<MagnetizationVector>,
}

impl TimeSeriesRecorder {
    /// Empty recorder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Empty recorder with room for `frames` entries, capped at
    /// [`MAX_RESERVED_FRAMES`].
    pub fn with_capacity(frames: usize) -> Self {
        let frames = frames.min(MAX_RESERVED_FRAMES);
        Self {
            times: Vec::with_capacity(frames),
            values: Vec::with_capacity(frames),
        }
    }

    /// Append one frame. `time` must exceed the last recorded time.
    pub fn append(&mut self, time: f64, values: MagnetizationVector) -> SimResult<()> {
        if let Some(&previous) = self.times.last() {
            if !(time > previous) {
                return Err(SimError::NonMonotonicTime {
                    previous,
                    next: time,
                });
            }
        }
        self.times.push(time);
        self.values.push(values);
        Ok(())
    }

    /// Number of recorded frames.
    pub fn len(&self) -> usize {
        self.times.len()
    }

    /// True before the first frame is recorded.
    pub fn is_empty(&self) -> bool {
        self.times.is_empty()
    }

    /// Recorded times.
    pub fn times(&self) -> &[f64] {
        &self.times
    }

    /// Magnetization vectors, one per recorded time.
    pub fn values(&self) -> &[MagnetizationVector] {
        &self.values
    }

    /// Magnetization of one site across all frames.
    ///
    /// Frames that do not cover `site` are skipped.
    pub fn site_series(&self, site: usize) -> Vec<f64> {
        self.values.iter().filter_map(|m| m.get(site)).collect()
    }

    /// `(time, value)` pairs for one site.
    pub fn points(&self, site: usize) -> Vec<(f64, f64)> {
        self.times
            .iter()
            .zip(&self.values)
            .filter_map(|(&t, m)| m.get(site).map(|v| (t, v)))
            .collect()
    }

    /// The most recent `(time, vector)` entry.
    pub fn latest(&self) -> Option<(f64, &MagnetizationVector)> {
        self.times.last().copied().zip(self.values.last())
    }
}
