//! Live convergence display.
//!
//! Snapshots arrive one per batch; [`ProgressThrottle`] thins them to a fixed
//! number of printed lines so a long run does not flood the terminal. The
//! final snapshot is always printed.

use maze_engine::{ConvergenceSnapshot, SimulationConfig, Technique};

use crate::summary::RunSummary;

/// Decides which snapshots of a run are printed.
#[derive(Debug, Clone)]
pub struct ProgressThrottle {
    stride: usize,
    seen: usize,
}

impl ProgressThrottle {
    /// Throttle for a run of `total_batches` printing at most `max_lines`.
    pub fn new(total_batches: usize, max_lines: usize) -> Self {
        let stride = total_batches.div_ceil(max_lines.max(1)).max(1);
        Self { stride, seen: 0 }
    }

    /// Registers one snapshot and returns whether to print it.
    pub fn should_render(&mut self, is_last: bool) -> bool {
        self.seen += 1;
        is_last || self.seen % self.stride == 0
    }
}

/// Opening line of a run.
pub fn render_header(config: &SimulationConfig, seed: u64, true_value: f64) -> String {
    format!(
        "{} | {} | budget {} | seed {} | true value {:.6}\n{:>12}  {:>12}  {:>27}  {:>10}",
        config.challenge,
        config.technique(),
        config.sample_budget,
        seed,
        true_value,
        "samples",
        "estimate",
        "95% band",
        "error"
    )
}

/// One convergence line.
pub fn render_snapshot(snapshot: &ConvergenceSnapshot, true_value: f64) -> String {
    let band = format!(
        "[{:.6}, {:.6}]",
        snapshot.confidence_low, snapshot.confidence_high
    );
    format!(
        "{:>12}  {:>12.6}  {:>27}  {:>10.6}",
        snapshot.sample_count,
        snapshot.estimate,
        band,
        (snapshot.estimate - true_value).abs()
    )
}

/// Final result table.
pub fn render_summary(summary: &RunSummary) -> String {
    let mut lines = vec![
        String::new(),
        format!("Status:          {:?}", summary.status),
        format!("Final Estimate:  {:.6}", summary.estimate),
        format!("True Value:      {:.6}", summary.true_value),
        format!("Absolute Error:  {:.6}", summary.absolute_error),
        format!(
            "Standard Error:  {:.6}  (95% band [{:.6}, {:.6}])",
            summary.standard_error, summary.confidence_low, summary.confidence_high
        ),
        format!(
            "Samples:         {} outcomes from {} draws",
            summary.sample_count, summary.raw_samples
        ),
        format!("Seed:            {}", summary.seed),
        format!("Time:            {:.4}s", summary.elapsed_secs),
    ];

    if summary.raw_samples < 2 {
        lines.push("Note: a single observation carries no error estimate.".to_string());
    }
    if summary.technique == Technique::Antithetic {
        lines.push(
            "Variance reduction active: each draw is paired with its mirror.".to_string(),
        );
    }

    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use maze_engine::{estimate_pi, simulate, Challenge};
    use std::f64::consts::PI;
    use std::time::Duration;

    #[test]
    fn test_throttle_prints_every_batch_when_few() {
        let mut throttle = ProgressThrottle::new(5, 20);
        let printed = (0..5).filter(|&i| throttle.should_render(i == 4)).count();
        assert_eq!(printed, 5);
    }

    #[test]
    fn test_throttle_limits_lines() {
        let total = 1_000;
        let mut throttle = ProgressThrottle::new(total, 20);
        let printed = (0..total)
            .filter(|&i| throttle.should_render(i == total - 1))
            .count();
        assert_eq!(printed, 20);
    }

    #[test]
    fn test_throttle_always_prints_last() {
        let total = 7;
        let mut throttle = ProgressThrottle::new(total, 3);
        let printed: Vec<usize> = (0..total)
            .filter(|&i| throttle.should_render(i == total - 1))
            .collect();
        assert_eq!(printed, vec![2, 5, 6]);
    }

    #[test]
    fn test_render_snapshot_columns() {
        let config = SimulationConfig::new(Challenge::Pi, 1_000, false, Some(1));
        let result = simulate(config).unwrap();
        let line = render_snapshot(result.final_snapshot().unwrap(), PI);

        assert!(line.trim_start().starts_with("1000"));
        assert!(line.contains('['));
        assert!(line.contains(&format!("{:.6}", result.estimate)));
    }

    #[test]
    fn test_render_summary_antithetic_note() {
        let result = estimate_pi(500, true, Some(2)).unwrap();
        let summary = RunSummary::new(&result, PI, Duration::from_millis(1));
        let text = render_summary(&summary);

        assert!(text.contains("Final Estimate"));
        assert!(text.contains("Variance reduction active"));
        assert!(text.contains("1000 outcomes from 500 draws"));
    }

    #[test]
    fn test_render_summary_single_sample_note() {
        let result = estimate_pi(1, false, Some(2)).unwrap();
        let summary = RunSummary::new(&result, PI, Duration::ZERO);
        assert!(render_summary(&summary).contains("no error estimate"));
    }
}
