//! Antithetic variance reduction.
//!
//! For a draw `Z` the antithetic technique also evaluates its mirror (`-Z`
//! for normals; see [`PiEstimator`](crate::PiEstimator) for the uniform
//! mirror). When the outcome is monotone in the draw, `f(Z)` and `f(-Z)` are
//! negatively correlated and the pair mean has lower variance than two
//! independent samples.
//!
//! Pairing happens by construction: a batch of `b` raw samples yields exactly
//! `2b` outcomes, interleaved as `f(Z₁), f(-Z₁), f(Z₂), f(-Z₂), ...`. No odd
//! leftover can occur.

use crate::config::Technique;
use crate::error::Result;
use crate::estimator::{check_draws, Estimator};

/// Outcome-stream transform applied between draws and statistics.
///
/// # Examples
///
/// ```rust
/// use maze_engine::{OptionEstimator, OptionParams, VarianceReducer};
///
/// let estimator = OptionEstimator::new(OptionParams::default());
/// let mut outcomes = Vec::new();
///
/// VarianceReducer::Antithetic
///     .reduce(&estimator, &[0.3, -1.2, 0.8], &mut outcomes)
///     .unwrap();
/// assert_eq!(outcomes.len(), 6);
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum VarianceReducer {
    /// Identity: one outcome per sample.
    #[default]
    Standard,
    /// Each sample contributes its outcome and its mirror's outcome.
    Antithetic,
}

impl VarianceReducer {
    /// Selects the reducer for a technique.
    #[inline]
    pub fn for_technique(technique: Technique) -> Self {
        match technique {
            Technique::Standard => VarianceReducer::Standard,
            Technique::Antithetic => VarianceReducer::Antithetic,
        }
    }

    /// Technique implemented by this reducer.
    #[inline]
    pub fn technique(&self) -> Technique {
        match self {
            VarianceReducer::Standard => Technique::Standard,
            VarianceReducer::Antithetic => Technique::Antithetic,
        }
    }

    /// Outcomes emitted per raw sample.
    #[inline]
    pub fn outcomes_per_sample(&self) -> usize {
        match self {
            VarianceReducer::Standard => 1,
            VarianceReducer::Antithetic => 2,
        }
    }

    /// Appends the outcomes for `draws` to `out`.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::InvalidParameter`](crate::EngineError::InvalidParameter)
    /// if `draws` is empty or not a whole number of samples.
    pub fn reduce<E: Estimator>(
        &self,
        estimator: &E,
        draws: &[f64],
        out: &mut Vec<f64>,
    ) -> Result<()> {
        match self {
            VarianceReducer::Standard => estimator.evaluate(draws, out),
            VarianceReducer::Antithetic => {
                let per_sample = check_draws(draws, estimator.draws_per_sample())?;
                out.reserve(2 * draws.len() / per_sample);
                for sample in draws.chunks_exact(per_sample) {
                    out.push(estimator.outcome(sample));
                    out.push(estimator.antithetic_outcome(sample));
                }
                Ok(())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::OptionParams;
    use crate::error::EngineError;
    use crate::estimator::{OptionEstimator, PiEstimator};

    #[test]
    fn test_standard_is_identity_map() {
        let est = OptionEstimator::new(OptionParams::default());
        let draws = [0.1, -0.4, 2.0];
        let mut reduced = Vec::new();
        let mut direct = Vec::new();

        VarianceReducer::Standard
            .reduce(&est, &draws, &mut reduced)
            .unwrap();
        est.evaluate(&draws, &mut direct).unwrap();

        assert_eq!(reduced, direct);
        assert_eq!(reduced.len(), draws.len());
    }

    #[test]
    fn test_antithetic_interleaves_mirror() {
        let est = OptionEstimator::new(OptionParams::default());
        let draws = [0.5, -1.5];
        let mut out = Vec::new();

        VarianceReducer::Antithetic
            .reduce(&est, &draws, &mut out)
            .unwrap();

        assert_eq!(
            out,
            vec![
                est.outcome(&[0.5]),
                est.outcome(&[-0.5]),
                est.outcome(&[-1.5]),
                est.outcome(&[1.5]),
            ]
        );
    }

    #[test]
    fn test_antithetic_doubles_pi_samples() {
        let draws = [0.1, 0.2, 0.3, 0.4, 0.5, 0.6];
        let mut out = Vec::new();

        VarianceReducer::Antithetic
            .reduce(&PiEstimator, &draws, &mut out)
            .unwrap();

        assert_eq!(out.len(), 6);
    }

    #[test]
    fn test_empty_batch_rejected() {
        let mut out = Vec::new();
        for reducer in [VarianceReducer::Standard, VarianceReducer::Antithetic] {
            let result = reducer.reduce(&PiEstimator, &[], &mut out);
            assert!(matches!(result, Err(EngineError::InvalidParameter { .. })));
        }
    }

    #[test]
    fn test_technique_mapping() {
        for technique in [Technique::Standard, Technique::Antithetic] {
            assert_eq!(VarianceReducer::for_technique(technique).technique(), technique);
        }
        assert_eq!(VarianceReducer::Standard.outcomes_per_sample(), 1);
        assert_eq!(VarianceReducer::Antithetic.outcomes_per_sample(), 2);
    }
}
