//! Simulation orchestration.
//!
//! [`SimulationRunner`] owns every piece of per-run state (random source,
//! variance reducer, estimator, convergence tracker) and yields one
//! [`ConvergenceSnapshot`] per processed batch through the [`Iterator`]
//! interface. Nothing is computed ahead of the consumer: stopping iteration is
//! cancellation, and the snapshots already yielded remain a valid partial
//! result.
//!
//! # State machine
//!
//! ```text
//! Idle ──next()──▶ Running ──budget drawn──▶ Completed
//!                    │  ▲
//!                    └──┘ one batch per next()
//! Running ──cancel()──▶ Cancelled
//! Running ──primitive error──▶ Failed
//! ```
//!
//! # Batch size
//!
//! Draws are consumed from the random source strictly in order and outcomes
//! are folded into the tracker one at a time, so the batch size only changes
//! how many snapshots are produced, never the final estimate or error.

use std::iter::FusedIterator;

use tracing::{debug, info, warn};

use crate::config::{Challenge, OptionParams, SimulationConfig, Technique};
use crate::convergence::{ConvergenceSnapshot, ConvergenceTracker};
use crate::error::{EngineError, Result};
use crate::estimator::{ChallengeEstimator, DrawKind, Estimator};
use crate::rng::RandomSource;
use crate::variance::VarianceReducer;

/// Lifecycle state of a run.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RunState {
    /// Constructed, nothing sampled yet.
    Idle,
    /// At least one batch processed and budget remaining.
    Running,
    /// Sample budget fully drawn.
    Completed,
    /// Stopped by the consumer before the budget was drawn.
    Cancelled,
    /// A primitive reported an error mid-run.
    Failed,
}

impl RunState {
    /// Returns `true` for `Completed`, `Cancelled` and `Failed`.
    #[inline]
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            RunState::Completed | RunState::Cancelled | RunState::Failed
        )
    }
}

/// How a reported run ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum RunStatus {
    /// The full sample budget was drawn.
    Completed,
    /// The run stopped early; statistics cover the samples drawn so far.
    Cancelled,
}

/// Terminal record of a run.
///
/// This is the artifact handed to persistence and reporting collaborators.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RunResult {
    /// Quantity estimated.
    pub challenge: Challenge,
    /// Sampling technique.
    pub technique: Technique,
    /// Seed that reproduces this run.
    pub seed: u64,
    /// Whether the budget was fully drawn.
    pub status: RunStatus,
    /// Final estimate.
    pub estimate: f64,
    /// Standard error of the final estimate.
    pub standard_error: f64,
    /// Lower bound of the final 95% band.
    pub confidence_low: f64,
    /// Upper bound of the final 95% band.
    pub confidence_high: f64,
    /// Number of outcomes behind the estimate.
    pub sample_count: usize,
    /// Every snapshot, in order, for charting.
    pub snapshots: Vec<ConvergenceSnapshot>,
}

impl RunResult {
    /// Last snapshot of the run.
    pub fn final_snapshot(&self) -> Option<&ConvergenceSnapshot> {
        self.snapshots.last()
    }

    /// Absolute distance from a reference value.
    #[inline]
    pub fn absolute_error(&self, reference: f64) -> f64 {
        (self.estimate - reference).abs()
    }

    /// Returns `true` if the final 95% band contains `reference`.
    #[inline]
    pub fn covers(&self, reference: f64) -> bool {
        self.confidence_low <= reference && reference <= self.confidence_high
    }
}

/// Lazy, cancellable Monte Carlo run.
///
/// # Examples
///
/// ```rust
/// use maze_engine::{RunState, SimulationConfig, SimulationRunner};
///
/// let config = SimulationConfig::builder()
///     .pi()
///     .sample_budget(5_000)
///     .batch_size(1_000)
///     .seed(1)
///     .build()
///     .unwrap();
///
/// let mut runner = SimulationRunner::new(config).unwrap();
/// assert_eq!(runner.state(), RunState::Idle);
///
/// // Take two snapshots, then stop
/// let first_two: Vec<_> = runner.by_ref().take(2).collect();
/// assert_eq!(first_two[1].sample_count, 2_000);
///
/// runner.cancel();
/// let partial = runner.into_result().unwrap();
/// assert_eq!(partial.sample_count, 2_000);
/// ```
#[derive(Debug)]
pub struct SimulationRunner {
    config: SimulationConfig,
    rng: RandomSource,
    reducer: VarianceReducer,
    estimator: ChallengeEstimator,
    tracker: ConvergenceTracker,
    state: RunState,
    /// Raw samples drawn so far.
    drawn: usize,
    draws: Vec<f64>,
    outcomes: Vec<f64>,
    history: Vec<ConvergenceSnapshot>,
    error: Option<EngineError>,
}

impl SimulationRunner {
    /// Creates a run from a configuration.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::InvalidConfiguration`] if the configuration
    /// violates an invariant. No sampling has happened in that case.
    pub fn new(config: SimulationConfig) -> Result<Self> {
        config.validate()?;

        let technique = config.technique();
        let reducer = VarianceReducer::for_technique(technique);
        let tracker = match technique {
            Technique::Standard => ConvergenceTracker::new(),
            Technique::Antithetic => ConvergenceTracker::paired(),
        };
        let estimator = ChallengeEstimator::for_challenge(&config.challenge);
        let rng = RandomSource::from_optional_seed(config.seed);

        let batch_draws = config.batch_size.min(config.sample_budget) * estimator.draws_per_sample();

        Ok(Self {
            config,
            rng,
            reducer,
            estimator,
            tracker,
            state: RunState::Idle,
            drawn: 0,
            draws: Vec::with_capacity(batch_draws),
            outcomes: Vec::with_capacity(batch_draws * reducer.outcomes_per_sample()),
            history: Vec::new(),
            error: None,
        })
    }

    /// Returns the configuration.
    #[inline]
    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    /// Returns the current state.
    #[inline]
    pub fn state(&self) -> RunState {
        self.state
    }

    /// Returns the seed driving this run.
    #[inline]
    pub fn seed(&self) -> u64 {
        self.rng.seed()
    }

    /// Raw samples drawn so far.
    #[inline]
    pub fn elapsed_samples(&self) -> usize {
        self.drawn
    }

    /// Fraction of the sample budget drawn, in `[0, 1]`.
    #[inline]
    pub fn progress(&self) -> f64 {
        self.drawn as f64 / self.config.sample_budget as f64
    }

    /// Snapshots yielded so far.
    #[inline]
    pub fn snapshots(&self) -> &[ConvergenceSnapshot] {
        &self.history
    }

    /// Error that moved the run to `Failed`, if any.
    #[inline]
    pub fn error(&self) -> Option<&EngineError> {
        self.error.as_ref()
    }

    /// Stops the run. Statistics keep covering the samples drawn so far.
    ///
    /// Has no effect on a run that already reached a terminal state.
    pub fn cancel(&mut self) {
        if self.state.is_terminal() {
            return;
        }
        info!(
            elapsed_samples = self.drawn,
            sample_budget = self.config.sample_budget,
            "Simulation cancelled"
        );
        self.state = RunState::Cancelled;
    }

    /// Drains the remaining batches and returns the result.
    ///
    /// # Errors
    ///
    /// Returns the error that failed the run, if any.
    pub fn finish(mut self) -> Result<RunResult> {
        for _ in self.by_ref() {}
        self.into_result()
    }

    /// Builds the result from the snapshots yielded so far.
    ///
    /// A run that has not completed is reported as [`RunStatus::Cancelled`].
    ///
    /// # Errors
    ///
    /// - the error that failed the run, if any
    /// - [`EngineError::InvalidParameter`] if no batch was processed yet
    pub fn into_result(self) -> Result<RunResult> {
        if let Some(err) = self.error {
            return Err(err);
        }

        let last = self.history.last().copied().ok_or_else(|| {
            EngineError::parameter("run", "no batch processed; nothing to report")
        })?;

        let status = if self.state == RunState::Completed {
            RunStatus::Completed
        } else {
            RunStatus::Cancelled
        };

        Ok(RunResult {
            challenge: self.config.challenge,
            technique: self.config.technique(),
            seed: self.rng.seed(),
            status,
            estimate: last.estimate,
            standard_error: last.standard_error,
            confidence_low: last.confidence_low,
            confidence_high: last.confidence_high,
            sample_count: last.sample_count,
            snapshots: self.history,
        })
    }

    fn remaining(&self) -> usize {
        self.config.sample_budget - self.drawn
    }

    fn fail(&mut self, err: EngineError) {
        warn!(error = %err, elapsed_samples = self.drawn, "Simulation failed");
        self.error = Some(err);
        self.state = RunState::Failed;
    }

    fn step(&mut self) -> Result<ConvergenceSnapshot> {
        let take = self.config.batch_size.min(self.remaining());
        let n_draws = take * self.estimator.draws_per_sample();

        self.draws.clear();
        self.draws.resize(n_draws, 0.0);
        match self.estimator.draw_kind() {
            DrawKind::Uniform => self.rng.fill_uniform(&mut self.draws),
            DrawKind::Normal => self.rng.fill_normal(&mut self.draws),
        }

        self.outcomes.clear();
        self.reducer
            .reduce(&self.estimator, &self.draws, &mut self.outcomes)?;
        let raw = self.tracker.update(&self.outcomes)?;
        self.drawn += take;

        Ok(raw.scaled(self.estimator.scale()))
    }
}

impl Iterator for SimulationRunner {
    type Item = ConvergenceSnapshot;

    fn next(&mut self) -> Option<Self::Item> {
        match self.state {
            RunState::Completed | RunState::Cancelled | RunState::Failed => return None,
            RunState::Idle => {
                info!(
                    challenge = %self.config.challenge,
                    technique = %self.config.technique(),
                    sample_budget = self.config.sample_budget,
                    batch_size = self.config.batch_size,
                    seed = self.rng.seed(),
                    "Simulation started"
                );
                self.state = RunState::Running;
            }
            RunState::Running => {}
        }

        let snapshot = match self.step() {
            Ok(snapshot) => snapshot,
            Err(err) => {
                self.fail(err);
                return None;
            }
        };

        debug!(
            sample_count = snapshot.sample_count,
            estimate = snapshot.estimate,
            standard_error = snapshot.standard_error,
            "Batch processed"
        );
        self.history.push(snapshot);

        if self.remaining() == 0 {
            self.state = RunState::Completed;
            info!(
                sample_count = snapshot.sample_count,
                estimate = snapshot.estimate,
                standard_error = snapshot.standard_error,
                "Simulation completed"
            );
        }

        Some(snapshot)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        if self.state.is_terminal() {
            return (0, Some(0));
        }
        let batches = self.remaining().div_ceil(self.config.batch_size);
        (batches, Some(batches))
    }
}

impl FusedIterator for SimulationRunner {}

/// Starts a run. Equivalent to [`SimulationRunner::new`].
///
/// # Errors
///
/// Returns [`EngineError::InvalidConfiguration`] for an invalid configuration.
pub fn run(config: SimulationConfig) -> Result<SimulationRunner> {
    SimulationRunner::new(config)
}

/// Runs a configuration to completion and returns its result.
///
/// # Errors
///
/// Returns [`EngineError::InvalidConfiguration`] for an invalid configuration.
pub fn simulate(config: SimulationConfig) -> Result<RunResult> {
    run(config)?.finish()
}

/// Estimates π with the given sample budget.
///
/// # Examples
///
/// ```rust
/// use maze_engine::estimate_pi;
///
/// let result = estimate_pi(100_000, false, Some(42)).unwrap();
/// assert!((result.estimate - std::f64::consts::PI).abs() < 0.05);
/// ```
///
/// # Errors
///
/// Returns [`EngineError::InvalidConfiguration`] if `sample_budget` is invalid.
pub fn estimate_pi(
    sample_budget: usize,
    use_antithetic: bool,
    seed: Option<u64>,
) -> Result<RunResult> {
    simulate(SimulationConfig::new(
        Challenge::Pi,
        sample_budget,
        use_antithetic,
        seed,
    ))
}

/// Prices a European call with the given sample budget.
///
/// # Errors
///
/// Returns [`EngineError::InvalidConfiguration`] if the parameters or
/// `sample_budget` are invalid.
pub fn price_option(
    params: OptionParams,
    sample_budget: usize,
    use_antithetic: bool,
    seed: Option<u64>,
) -> Result<RunResult> {
    simulate(SimulationConfig::new(
        Challenge::OptionPrice(params),
        sample_budget,
        use_antithetic,
        seed,
    ))
}
