//! Run summaries and reference values.

use std::f64::consts::PI;
use std::time::Duration;

use clap::ValueEnum;
use maze_engine::analytical::black_scholes_call;
use maze_engine::{Challenge, RunResult, RunStatus, Technique};
use serde::Serialize;

/// Output format of the `pi` and `option` commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// Live convergence lines followed by a result table.
    #[default]
    Table,
    /// The run summary as a JSON document, nothing else on stdout.
    Json,
}

/// Exact value a challenge converges to.
///
/// π for the π challenge and the Black-Scholes price for the option.
pub fn reference_value(challenge: &Challenge) -> f64 {
    match challenge {
        Challenge::Pi => PI,
        Challenge::OptionPrice(params) => black_scholes_call(params),
    }
}

/// Reported outcome of one run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunSummary {
    /// Challenge and its parameters.
    pub challenge: Challenge,
    /// Sampling technique.
    pub technique: Technique,
    /// Seed that replays the run.
    pub seed: u64,
    /// Whether the budget was fully drawn.
    pub status: RunStatus,
    /// Final estimate.
    pub estimate: f64,
    /// Standard error of the estimate.
    pub standard_error: f64,
    /// Lower bound of the 95% band.
    pub confidence_low: f64,
    /// Upper bound of the 95% band.
    pub confidence_high: f64,
    /// Outcomes behind the estimate.
    pub sample_count: usize,
    /// Raw samples drawn.
    pub raw_samples: usize,
    /// Exact value.
    pub true_value: f64,
    /// `|estimate - true_value|`
    pub absolute_error: f64,
    /// Wall-clock time in seconds.
    pub elapsed_secs: f64,
}

impl RunSummary {
    /// Summarises a finished run.
    pub fn new(result: &RunResult, true_value: f64, elapsed: Duration) -> Self {
        Self {
            challenge: result.challenge,
            technique: result.technique,
            seed: result.seed,
            status: result.status,
            estimate: result.estimate,
            standard_error: result.standard_error,
            confidence_low: result.confidence_low,
            confidence_high: result.confidence_high,
            sample_count: result.sample_count,
            raw_samples: result
                .final_snapshot()
                .map(|s| s.elapsed_samples)
                .unwrap_or_default(),
            true_value,
            absolute_error: result.absolute_error(true_value),
            elapsed_secs: elapsed.as_secs_f64(),
        }
    }

    /// Returns `true` if the 95% band contains the exact value.
    pub fn covers_true_value(&self) -> bool {
        self.confidence_low <= self.true_value && self.true_value <= self.confidence_high
    }
}
