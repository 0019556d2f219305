//! `pi` and `option` command implementation
//!
//! Runs one simulation, printing convergence as batches complete, then the
//! result, then appends the run to the ledger.

use std::io::Write;
use std::time::Instant;

use maze_engine::{Challenge, SimulationConfig};
use tracing::info;

use crate::config::RunnerConfig;
use crate::ledger::{Ledger, RunRecord};
use crate::progress::{render_header, render_snapshot, render_summary, ProgressThrottle};
use crate::summary::{reference_value, OutputFormat, RunSummary};
use crate::Result;

/// Options shared by the `pi` and `option` commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SimulateOptions {
    /// Sample budget; the configured default when `None`.
    pub samples: Option<usize>,
    /// Pair every draw with its mirror.
    pub antithetic: bool,
    /// Fixed seed; fresh entropy when `None`.
    pub seed: Option<u64>,
    /// Output format.
    pub format: OutputFormat,
    /// Append the run to the ledger.
    pub record: bool,
}

/// Run one challenge, writing output to `out`.
pub fn run<W: Write>(
    config: &RunnerConfig,
    challenge: Challenge,
    options: &SimulateOptions,
    out: &mut W,
) -> Result<RunSummary> {
    let budget = options.samples.unwrap_or(config.default_samples);
    let sim_config = SimulationConfig::builder()
        .challenge(challenge)
        .sample_budget(budget)
        .antithetic(options.antithetic)
        .maybe_seed(options.seed)
        .batch_size(config.batch_size)
        .build()?;

    let true_value = reference_value(&challenge);
    let live = options.format == OutputFormat::Table;

    let start = Instant::now();
    let mut runner = maze_engine::run(sim_config)?;
    let (total_batches, _) = runner.size_hint();
    let mut throttle = ProgressThrottle::new(total_batches, config.progress_lines);

    if live {
        writeln!(out, "{}", render_header(&sim_config, runner.seed(), true_value))?;
    }
    for snapshot in &mut runner {
        let is_last = snapshot.elapsed_samples == budget;
        if live && throttle.should_render(is_last) {
            writeln!(out, "{}", render_snapshot(&snapshot, true_value))?;
        }
    }

    let result = runner.into_result()?;
    let summary = RunSummary::new(&result, true_value, start.elapsed());

    match options.format {
        OutputFormat::Table => writeln!(out, "{}", render_summary(&summary))?,
        OutputFormat::Json => writeln!(out, "{}", serde_json::to_string_pretty(&summary)?)?,
    }

    if options.record {
        let ledger = Ledger::new(&config.ledger_path);
        ledger.append(&RunRecord::from_summary(&summary))?;
    }

    info!(
        challenge = %summary.challenge,
        technique = %summary.technique,
        estimate = summary.estimate,
        absolute_error = summary.absolute_error,
        elapsed_secs = summary.elapsed_secs,
        "Run finished"
    );
    Ok(summary)
}
