//! `spinchain-sim` — Trotterized dynamics of a transverse-field Ising chain.
//!
//! Evolves the amplitude vector of an `N`-site chain under
//!
//!   H = -J · Σ Z_i Z_{i+1}  -  h · Σ X_i
//!
//! one Trotter step per frame, and estimates per-site magnetization from a
//! finite number of measurement shots taken on a read-only view of the
//! state:
//!
//! - [`state`] — dense amplitude vector ([`AmplitudeState`])
//! - [`gate`] — coupling / field rotations applied in place
//! - [`trotter`] — first- and second-order product-formula steps
//! - [`sampler`] — seeded multinomial shot sampling
//! - [`magnetization`] — per-site estimates and the bit-ordering convention
//! - [`recorder`] — append-only time series
//! - [`driver`] — per-frame orchestration
//!
//! # Quick start
//!
//! ```rust
//! use spinchain_sim::{SimulationConfig, SimulationDriver};
//!
//! let config = SimulationConfig {
//!     num_sites: 3,
//!     total_time: 1.0,
//!     total_frames: Some(10),
//!     shots_per_frame: 256,
//!     random_seed: Some(42),
//!     ..SimulationConfig::default()
//! };
//!
//! let mut driver = SimulationDriver::new(&config).unwrap();
//! let series = driver.run(|_frame| {}).unwrap();
//! assert_eq!(series.len(), 10);
//! ```

pub mod config;
pub mod counts;
pub mod driver;
pub mod error;
pub mod gate;
pub mod magnetization;
pub mod model;
pub mod recorder;
pub mod sampler;
pub mod state;
pub mod trotter;

pub use config::SimulationConfig;
pub use counts::ShotFrequencies;
pub use driver::{Frame, SimulationDriver};
pub use error::{SimError, SimResult};
pub use gate::GateSpec;
pub use magnetization::{BitOrder, MagnetizationVector, SITE_ORDER, exact_magnetization};
pub use model::IsingChain;
pub use recorder::TimeSeriesRecorder;
pub use sampler::ShotSampler;
pub use state::{AmplitudeState, MAX_SITES};
pub use trotter::{TrotterOrder, TrotterStepper};
