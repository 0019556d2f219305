//! # maze_engine: Monte Carlo Simulation Engine
//!
//! ## Role
//!
//! maze_engine is the computational kernel of the Maze Runner workspace:
//! - Seedable random variate generation (`rng`)
//! - Antithetic variance reduction (`variance`)
//! - Outcome estimators for π and European calls under GBM (`estimator`)
//! - Streaming Welford convergence statistics (`convergence`)
//! - A lazy, cancellable simulation run producing one snapshot per batch (`runner`)
//!
//! Everything outside the engine (parameter entry, chart rendering, run
//! persistence) lives in collaborator crates and only consumes the types
//! exported here.
//!
//! ## Architecture
//!
//! ```text
//! SimulationRunner
//! ├── SimulationConfig    (validated, immutable)
//! ├── RandomSource        (per-run, seeded or entropy)
//! ├── VarianceReducer     (Standard | Antithetic)
//! ├── ChallengeEstimator  (Pi | OptionPrice)
//! └── ConvergenceTracker  (running mean, variance, 95% band)
//! ```
//!
//! ## Usage Example
//!
//! ```rust
//! use maze_engine::{run, SimulationConfig};
//!
//! let config = SimulationConfig::builder()
//!     .pi()
//!     .sample_budget(10_000)
//!     .seed(42)
//!     .build()
//!     .unwrap();
//!
//! let mut runner = run(config).unwrap();
//! for snapshot in runner.by_ref() {
//!     // one snapshot per batch, live-chart friendly
//!     assert!(snapshot.sample_count <= 10_000);
//! }
//!
//! let result = runner.into_result().unwrap();
//! assert_eq!(result.sample_count, 10_000);
//! assert!((result.estimate - std::f64::consts::PI).abs() < 0.1);
//! ```
//!
//! ## Non-interactive callers
//!
//! ```rust
//! use maze_engine::{price_option, OptionParams};
//!
//! let params = OptionParams::new(100.0, 100.0, 0.2, 0.05, 1.0);
//! let result = price_option(params, 50_000, true, Some(7)).unwrap();
//! assert_eq!(result.sample_count, 100_000);
//! ```

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(rustdoc::private_intra_doc_links)]
#![allow(unknown_lints)]

pub mod analytical;
pub mod config;
pub mod convergence;
pub mod error;
pub mod estimator;
pub mod rng;
pub mod runner;
pub mod variance;

pub use config::{
    Challenge, OptionParams, SimulationConfig, SimulationConfigBuilder, Technique,
    DEFAULT_BATCH_SIZE, MAX_SAMPLE_BUDGET,
};
pub use convergence::{ConvergenceSnapshot, ConvergenceTracker, Z_95};
pub use error::{EngineError, Result};
pub use estimator::{ChallengeEstimator, DrawKind, Estimator, OptionEstimator, PiEstimator};
pub use rng::RandomSource;
pub use runner::{
    estimate_pi, price_option, run, simulate, RunResult, RunState, RunStatus, SimulationRunner,
};
pub use variance::VarianceReducer;
