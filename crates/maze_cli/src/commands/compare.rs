//! `compare` command implementation
//!
//! Runs standard and antithetic trials side by side and prints the table.

use std::io::Write;

use maze_engine::Challenge;

use crate::compare::{render_comparison, run_comparison, Comparison, ComparisonConfig};
use crate::config::RunnerConfig;
use crate::summary::OutputFormat;
use crate::Result;

/// Run the compare command
pub fn run<W: Write>(
    config: &RunnerConfig,
    challenge: Challenge,
    samples: Option<usize>,
    trials: usize,
    seed: u64,
    format: OutputFormat,
    out: &mut W,
) -> Result<Comparison> {
    let comparison = run_comparison(&ComparisonConfig {
        challenge,
        pairs: samples.unwrap_or(config.default_samples),
        trials,
        base_seed: seed,
        batch_size: config.batch_size,
    })?;

    match format {
        OutputFormat::Table => writeln!(out, "{}", render_comparison(&comparison))?,
        OutputFormat::Json => writeln!(out, "{}", serde_json::to_string_pretty(&comparison)?)?,
    }
    Ok(comparison)
}
