//! Outcome estimators.
//!
//! An estimator maps the raw draws of one sample to a single outcome value.
//! The running mean of outcomes, multiplied by [`Estimator::scale`], is the
//! Monte Carlo estimate.
//!
//! | Estimator | Draws/sample | Draw kind | Outcome | Scale |
//! |-----------|--------------|-----------|---------|-------|
//! | [`PiEstimator`] | 2 | Uniform | hit indicator in unit disc | 4 |
//! | [`OptionEstimator`] | 1 | Normal | discounted call payoff | 1 |
//!
//! [`ChallengeEstimator`] wraps both for static dispatch; the variant is
//! selected once from the [`Challenge`](crate::Challenge) when a run is built.

mod option;
mod pi;

pub use option::OptionEstimator;
pub use pi::PiEstimator;

use crate::config::Challenge;
use crate::error::{EngineError, Result};

/// Distribution the estimator consumes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DrawKind {
    /// Uniform on `[0, 1)`.
    Uniform,
    /// Standard normal.
    Normal,
}

/// Maps raw draws to per-sample outcomes.
pub trait Estimator {
    /// Distribution of the raw draws.
    fn draw_kind(&self) -> DrawKind;

    /// Number of raw draws consumed per sample.
    fn draws_per_sample(&self) -> usize;

    /// Factor applied to the running statistics to obtain the estimate.
    fn scale(&self) -> f64 {
        1.0
    }

    /// Outcome of one sample. `sample.len() == draws_per_sample()`.
    fn outcome(&self, sample: &[f64]) -> f64;

    /// Outcome of the antithetic mirror of one sample.
    fn antithetic_outcome(&self, sample: &[f64]) -> f64;

    /// Appends one outcome per sample in `draws` to `out`.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::InvalidParameter`] if `draws` is empty or its
    /// length is not a multiple of [`Estimator::draws_per_sample`].
    fn evaluate(&self, draws: &[f64], out: &mut Vec<f64>) -> Result<()> {
        let per_sample = check_draws(draws, self.draws_per_sample())?;
        out.reserve(draws.len() / per_sample);
        out.extend(draws.chunks_exact(per_sample).map(|s| self.outcome(s)));
        Ok(())
    }
}

/// Validates a draw batch, returning the per-sample stride.
pub(crate) fn check_draws(draws: &[f64], per_sample: usize) -> Result<usize> {
    if draws.is_empty() {
        return Err(EngineError::parameter("draws", "batch must not be empty"));
    }
    if draws.len() % per_sample != 0 {
        return Err(EngineError::parameter(
            "draws",
            format!(
                "batch length {} is not a multiple of {} draws per sample",
                draws.len(),
                per_sample
            ),
        ));
    }
    Ok(per_sample)
}

/// Static dispatch over the supported estimators.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ChallengeEstimator {
    /// π estimation.
    Pi(PiEstimator),
    /// European call pricing.
    Option(OptionEstimator),
}

impl ChallengeEstimator {
    /// Selects the estimator for a challenge.
    pub fn for_challenge(challenge: &Challenge) -> Self {
        match challenge {
            Challenge::Pi => ChallengeEstimator::Pi(PiEstimator),
            Challenge::OptionPrice(params) => {
                ChallengeEstimator::Option(OptionEstimator::new(*params))
            }
        }
    }
}

impl Estimator for ChallengeEstimator {
    #[inline]
    fn draw_kind(&self) -> DrawKind {
        match self {
            ChallengeEstimator::Pi(e) => e.draw_kind(),
            ChallengeEstimator::Option(e) => e.draw_kind(),
        }
    }

    #[inline]
    fn draws_per_sample(&self) -> usize {
        match self {
            ChallengeEstimator::Pi(e) => e.draws_per_sample(),
            ChallengeEstimator::Option(e) => e.draws_per_sample(),
        }
    }

    #[inline]
    fn scale(&self) -> f64 {
        match self {
            ChallengeEstimator::Pi(e) => e.scale(),
            ChallengeEstimator::Option(e) => e.scale(),
        }
    }

    #[inline]
    fn outcome(&self, sample: &[f64]) -> f64 {
        match self {
            ChallengeEstimator::Pi(e) => e.outcome(sample),
            ChallengeEstimator::Option(e) => e.outcome(sample),
        }
    }

    #[inline]
    fn antithetic_outcome(&self, sample: &[f64]) -> f64 {
        match self {
            ChallengeEstimator::Pi(e) => e.antithetic_outcome(sample),
            ChallengeEstimator::Option(e) => e.antithetic_outcome(sample),
        }
    }
}
