//! Command-line runner for the Monte Carlo maze engine
//!
//! This crate wraps [`maze_engine`] with everything a run needs outside the
//! engine itself: layered configuration, a live convergence display, a JSON
//! Lines ledger of past runs, and a parallel comparison of the standard and
//! antithetic techniques.
//!
//! # Commands
//!
//! - `maze-runner pi` - Estimate π
//! - `maze-runner option` - Price a European call
//! - `maze-runner compare` - Compare techniques over repeated trials
//! - `maze-runner leaderboard` - Show recent runs

#![warn(missing_docs)]

pub mod commands;
pub mod compare;
pub mod config;
pub mod error;
pub mod ledger;
pub mod progress;
pub mod summary;

pub use error::{CliError, Result};

/// Runner version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
