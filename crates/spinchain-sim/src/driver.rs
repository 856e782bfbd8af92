//! Frame-by-frame orchestration of a simulation run.
//!
//! The driver owns the single evolving [`AmplitudeState`]. Each call to
//! [`SimulationDriver::next_frame`] applies exactly one Trotter step to it,
//! samples the advanced state without disturbing it, and records the
//! estimate. Work per frame is constant; history is never replayed.

use rand::Rng;
use rand::rngs::StdRng;
use serde::Serialize;
use tracing::{info, instrument, warn};

use crate::config::SimulationConfig;
use crate::error::{SimError, SimResult};
use crate::magnetization::{self, MagnetizationVector};
use crate::recorder::TimeSeriesRecorder;
use crate::sampler::ShotSampler;
use crate::state::AmplitudeState;
use crate::trotter::TrotterStepper;

/// What a renderer receives for one frame.
#[derive(Debug, Clone, Serialize)]
pub struct Frame<'a> {
    /// 1-based frame index.
    pub index: usize,
    /// Simulated time `index * dt`.
    pub time: f64,
    /// Sampled per-site magnetization.
    pub magnetization: MagnetizationVector,
    /// Everything recorded so far, this frame included.
    #[serde(skip)]
    pub series: &'a TimeSeriesRecorder,
}

/// Drives a run of `total_frames` sequential frames.
#[derive(Debug)]
pub struct SimulationDriver<R = StdRng> {
    stepper: TrotterStepper,
    sampler: ShotSampler<R>,
    state: AmplitudeState,
    recorder: TimeSeriesRecorder,
    /// Frames produced so far.
    frame: usize,
    total_frames: usize,
    shots: usize,
    tolerance: f64,
    /// Steps after which the state had to be rescaled.
    renormalizations: usize,
}

impl SimulationDriver<StdRng> {
    /// Driver using the configured seed (or entropy if none is set).
    pub fn new(config: &SimulationConfig) -> SimResult<Self> {
        Self::with_sampler(config, ShotSampler::new(config.random_seed))
    }
}

impl<R: Rng> SimulationDriver<R> {
    /// Driver with an explicit random generator for the sampler.
    ///
    /// `config.random_seed` is ignored.
    pub fn with_rng(config: &SimulationConfig, rng: R) -> SimResult<Self> {
        Self::with_sampler(config, ShotSampler::with_rng(rng))
    }

    fn with_sampler(config: &SimulationConfig, sampler: ShotSampler<R>) -> SimResult<Self> {
        config.validate()?;
        let total_frames = config.frame_count()?;
        let stepper =
            TrotterStepper::with_order(config.chain(), config.dt()?, config.trotter_order)?;
        Ok(Self {
            stepper,
            sampler,
            state: AmplitudeState::initial(config.num_sites)?,
            recorder: TimeSeriesRecorder::with_capacity(total_frames),
            frame: 0,
            total_frames,
            shots: config.shots_per_frame,
            tolerance: config.normalization_tolerance,
            renormalizations: 0,
        })
    }

    /// Compute the next frame.
    ///
    /// Fails with [`SimError::SimulationFinished`] once all frames have been
    /// produced. The step is committed as soon as it is applied: if sampling
    /// fails afterwards, the frame is skipped and the next call moves on to
    /// the following step.
    #[instrument(level = "debug", skip(self), fields(frame = self.frame + 1))]
    pub fn next_frame(&mut self) -> SimResult<Frame<'_>> {
        if self.is_finished() {
            return Err(SimError::SimulationFinished {
                total_frames: self.total_frames,
            });
        }

        self.stepper.advance(&mut self.state)?;
        self.frame += 1;
        let time = self.frame as f64 * self.stepper.dt();

        let norm = self.state.norm_sqr();
        if (norm - 1.0).abs() > self.tolerance {
            warn!(norm, "probability mass drifted, renormalizing");
            self.state.renormalize();
            self.renormalizations += 1;
        }

        let freqs = self.sampler.sample(&self.state, self.shots)?;
        let magnetization =
            magnetization::estimate(&freqs, self.state.num_sites(), freqs.shots());

        self.recorder.append(time, magnetization.clone())?;

        info!(
            frame = self.frame,
            total_frames = self.total_frames,
            time,
            m0 = magnetization[0],
            "processed frame"
        );

        Ok(Frame {
            index: self.frame,
            time,
            magnetization,
            series: &self.recorder,
        })
    }

    /// Run every remaining frame, handing each to `on_frame`.
    pub fn run(&mut self, mut on_frame: impl FnMut(&Frame<'_>)) -> SimResult<&TimeSeriesRecorder> {
        while !self.is_finished() {
            let frame = self.next_frame()?;
            on_frame(&frame);
        }
        Ok(&self.recorder)
    }

    /// True once `total_frames` frames have been produced.
    pub fn is_finished(&self) -> bool {
        self.frame >= self.total_frames
    }

    /// Frames produced so far (equals Trotter steps applied).
    pub fn frames_done(&self) -> usize {
        self.frame
    }

    /// Number of steps after which the state was renormalized.
    pub fn renormalizations(&self) -> usize {
        self.renormalizations
    }

    /// Frames in the whole run.
    pub fn total_frames(&self) -> usize {
        self.total_frames
    }

    /// Simulated time of the most recent frame (0 before the first).
    pub fn current_time(&self) -> f64 {
        self.frame as f64 * self.stepper.dt()
    }

    /// Time increment per frame.
    pub fn dt(&self) -> f64 {
        self.stepper.dt()
    }

    /// Read-only view of the evolving state.
    pub fn state(&self) -> &AmplitudeState {
        &self.state
    }

    /// The recorded time series.
    pub fn recorder(&self) -> &TimeSeriesRecorder {
        &self.recorder
    }

    /// Consume the driver, keeping only the time series.
    pub fn into_recorder(self) -> TimeSeriesRecorder {
        self.recorder
    }
}
