//! Standard versus antithetic comparison over repeated trials.
//!
//! Both techniques see the same number of outcomes per trial: the standard run
//! draws `2N` samples while the antithetic run draws `N` pairs. Trials are
//! independent runs with consecutive seeds and execute in parallel on the
//! rayon pool.

use maze_engine::{simulate, Challenge, RunResult, SimulationConfig, Technique};
use rayon::prelude::*;
use serde::Serialize;
use tracing::info;

use crate::summary::reference_value;
use crate::{CliError, Result};

/// Parameters of a comparison.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ComparisonConfig {
    /// Challenge to run.
    pub challenge: Challenge,
    /// Antithetic pairs per trial; the standard run draws twice as many samples.
    pub pairs: usize,
    /// Independent trials per technique.
    pub trials: usize,
    /// Seed of the first trial; trial `i` uses `base_seed + i`.
    pub base_seed: u64,
    /// Runner batch size.
    pub batch_size: usize,
}

/// Aggregate statistics of one technique across trials.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TechniqueStats {
    /// Technique measured.
    pub technique: Technique,
    /// Mean of the trial estimates.
    pub mean_estimate: f64,
    /// Mean of the reported standard errors.
    pub mean_standard_error: f64,
    /// Root mean squared error against the exact value.
    pub rmse: f64,
    /// Fraction of trials whose 95% band covers the exact value.
    pub coverage: f64,
}

impl TechniqueStats {
    fn from_results(technique: Technique, results: &[RunResult], reference: f64) -> Self {
        let n = results.len() as f64;
        let mean_estimate = results.iter().map(|r| r.estimate).sum::<f64>() / n;
        let mean_standard_error = results.iter().map(|r| r.standard_error).sum::<f64>() / n;
        let mse = results
            .iter()
            .map(|r| (r.estimate - reference).powi(2))
            .sum::<f64>()
            / n;
        let covered = results.iter().filter(|r| r.covers(reference)).count();

        Self {
            technique,
            mean_estimate,
            mean_standard_error,
            rmse: mse.sqrt(),
            coverage: covered as f64 / n,
        }
    }
}

/// Outcome of a comparison.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Comparison {
    /// Challenge name.
    pub scenario: String,
    /// Exact value.
    pub true_value: f64,
    /// Outcomes per trial for either technique.
    pub sample_count: usize,
    /// Trials per technique.
    pub trials: usize,
    /// Plain Monte Carlo statistics.
    pub standard: TechniqueStats,
    /// Antithetic statistics.
    pub antithetic: TechniqueStats,
}

impl Comparison {
    /// Ratio of standard to antithetic estimator variance.
    ///
    /// Above 1 when pairing helps; `None` if the antithetic error is zero.
    pub fn variance_reduction_ratio(&self) -> Option<f64> {
        let antithetic = self.antithetic.mean_standard_error.powi(2);
        if antithetic == 0.0 {
            return None;
        }
        Some(self.standard.mean_standard_error.powi(2) / antithetic)
    }
}

fn run_trials(config: &ComparisonConfig, technique: Technique) -> Result<Vec<RunResult>> {
    let (budget, antithetic) = match technique {
        Technique::Standard => (2 * config.pairs, false),
        Technique::Antithetic => (config.pairs, true),
    };

    let results = (0..config.trials as u64)
        .into_par_iter()
        .map(|trial| {
            let seed = config.base_seed.wrapping_add(trial);
            simulate(
                SimulationConfig::new(config.challenge, budget, antithetic, Some(seed))
                    .with_batch_size(config.batch_size),
            )
        })
        .collect::<maze_engine::Result<Vec<_>>>()?;

    Ok(results)
}

/// Runs the comparison.
///
/// # Errors
///
/// - [`CliError::InvalidArgument`] for zero pairs or zero trials
/// - [`CliError::Engine`] if the engine rejects the configuration
pub fn run_comparison(config: &ComparisonConfig) -> Result<Comparison> {
    if config.pairs == 0 {
        return Err(CliError::InvalidArgument(
            "comparison needs at least one sample".to_string(),
        ));
    }
    if config.trials == 0 {
        return Err(CliError::InvalidArgument(
            "comparison needs at least one trial".to_string(),
        ));
    }

    info!(
        challenge = %config.challenge,
        pairs = config.pairs,
        trials = config.trials,
        base_seed = config.base_seed,
        "Comparison started"
    );

    let reference = reference_value(&config.challenge);
    let standard = run_trials(config, Technique::Standard)?;
    let antithetic = run_trials(config, Technique::Antithetic)?;

    let comparison = Comparison {
        scenario: config.challenge.name().to_string(),
        true_value: reference,
        sample_count: 2 * config.pairs,
        trials: config.trials,
        standard: TechniqueStats::from_results(Technique::Standard, &standard, reference),
        antithetic: TechniqueStats::from_results(Technique::Antithetic, &antithetic, reference),
    };

    info!(
        standard_se = comparison.standard.mean_standard_error,
        antithetic_se = comparison.antithetic.mean_standard_error,
        "Comparison completed"
    );
    Ok(comparison)
}

/// Comparison as a table.
pub fn render_comparison(comparison: &Comparison) -> String {
    let mut lines = vec![
        format!(
            "{} | {} outcomes per trial | {} trials | true value {:.6}",
            comparison.scenario, comparison.sample_count, comparison.trials, comparison.true_value
        ),
        format!(
            "{:<12} {:>14} {:>14} {:>12} {:>10}",
            "Method", "Mean Estimate", "Mean SE", "RMSE", "Coverage"
        ),
    ];
    for stats in [&comparison.standard, &comparison.antithetic] {
        lines.push(format!(
            "{:<12} {:>14.6} {:>14.6} {:>12.6} {:>9.1}%",
            stats.technique.name(),
            stats.mean_estimate,
            stats.mean_standard_error,
            stats.rmse,
            100.0 * stats.coverage
        ));
    }
    match comparison.variance_reduction_ratio() {
        Some(ratio) => lines.push(format!("Variance reduction ratio: {:.2}x", ratio)),
        None => lines.push("Variance reduction ratio: n/a (zero antithetic error)".to_string()),
    }
    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use maze_engine::OptionParams;

    fn config(challenge: Challenge) -> ComparisonConfig {
        ComparisonConfig {
            challenge,
            pairs: 5_000,
            trials: 8,
            base_seed: 100,
            batch_size: 1_000,
        }
    }

    #[test]
    fn test_option_comparison_favours_antithetic() {
        let comparison = run_comparison(&config(Challenge::OptionPrice(OptionParams::default()))).unwrap();

        assert_eq!(comparison.sample_count, 10_000);
        assert_eq!(comparison.trials, 8);
        assert!(comparison.variance_reduction_ratio().unwrap() > 1.0);
        assert_eq!(comparison.standard.technique, Technique::Standard);
        assert_eq!(comparison.antithetic.technique, Technique::Antithetic);
    }

    #[test]
    fn test_comparison_is_reproducible() {
        let cfg = config(Challenge::Pi);
        assert_eq!(run_comparison(&cfg).unwrap(), run_comparison(&cfg).unwrap());
    }

    #[test]
    fn test_rejects_empty_comparison() {
        let mut cfg = config(Challenge::Pi);
        cfg.trials = 0;
        assert!(matches!(run_comparison(&cfg), Err(CliError::InvalidArgument(_))));

        let mut cfg = config(Challenge::Pi);
        cfg.pairs = 0;
        assert!(run_comparison(&cfg).is_err());
    }

    #[test]
    fn test_zero_volatility_ratio_is_undefined() {
        let params = OptionParams::new(100.0, 90.0, 0.0, 0.05, 1.0);
        let comparison = run_comparison(&config(Challenge::OptionPrice(params))).unwrap();
        assert_eq!(comparison.variance_reduction_ratio(), None);
        assert!(render_comparison(&comparison).contains("n/a"));
    }

    #[test]
    fn test_render_comparison() {
        let comparison = run_comparison(&config(Challenge::Pi)).unwrap();
        let table = render_comparison(&comparison);
        assert!(table.contains("Standard"));
        assert!(table.contains("Antithetic"));
        assert!(table.contains("Variance reduction ratio"));
    }
}
