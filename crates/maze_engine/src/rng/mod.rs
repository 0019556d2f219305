//! # Random Number Generation
//!
//! Per-run random variate generation for the simulation engine.
//!
//! ## Design
//!
//! - **Reproducibility**: an explicit seed yields the same sequence across runs
//!   and process restarts
//! - **Entropy fallback**: without a seed, one is drawn from the OS-seeded
//!   thread generator and retained so the run can be replayed
//! - **Isolation**: every run owns its own [`RandomSource`]; nothing is shared
//!
//! ## Usage Example
//!
//! ```rust
//! use maze_engine::rng::RandomSource;
//!
//! let mut rng = RandomSource::from_seed(12345);
//!
//! let normals = rng.next_normal(1000).unwrap();
//! let uniforms = rng.next_uniform(1000).unwrap();
//! assert_eq!(normals.len(), 1000);
//! assert!(uniforms.iter().all(|&u| (0.0..1.0).contains(&u)));
//!
//! // Zero-allocation form used by the runner
//! let mut buffer = vec![0.0; 256];
//! rng.fill_normal(&mut buffer);
//! ```
//!
//! Normal variates use the Ziggurat method via `rand_distr::StandardNormal`.
//! Draws are consumed strictly in order, so splitting a request into several
//! smaller fills produces the same stream as one large fill.

mod source;

pub use source::RandomSource;
