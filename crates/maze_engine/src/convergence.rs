//! Streaming convergence statistics.
//!
//! [`ConvergenceTracker`] maintains count, mean and variance of an outcome
//! stream in one pass using Welford's update:
//!
//! ```text
//! n    ← n + 1
//! δ    ← x - mean
//! mean ← mean + δ / n
//! M2   ← M2 + δ (x - mean)
//! ```
//!
//! Outcomes are folded in one at a time, in order, so how a stream is split
//! into batches never changes the result. No history and no raw sums are
//! retained.
//!
//! # Confidence band
//!
//! `standard_error = sqrt(M2 / (n - 1) / n)` and the 95% band is
//! `estimate ± 1.96 × standard_error`. The band is a normal approximation and
//! is only asymptotically valid; treat it as indicative for small counts.
//!
//! With a single observation the variance is undefined. The tracker then
//! reports `standard_error = 0.0` and collapses both bounds onto the estimate
//! (see [`ConvergenceSnapshot::has_defined_variance`]). It never reports NaN.

use crate::error::{EngineError, Result};

/// Two-sided 95% quantile of the standard normal distribution.
pub const Z_95: f64 = 1.96;

/// Convergence state after a batch.
///
/// # Examples
///
/// ```rust
/// use maze_engine::ConvergenceTracker;
///
/// let mut tracker = ConvergenceTracker::new();
/// let snapshot = tracker.update(&[1.0, 2.0, 3.0, 4.0]).unwrap();
///
/// assert_eq!(snapshot.sample_count, 4);
/// assert_eq!(snapshot.estimate, 2.5);
/// assert!(snapshot.confidence_low < 2.5 && 2.5 < snapshot.confidence_high);
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ConvergenceSnapshot {
    /// Cumulative number of outcomes (twice the raw samples when antithetic).
    pub sample_count: usize,
    /// Running mean of all outcomes so far.
    pub estimate: f64,
    /// Standard error of the estimate.
    pub standard_error: f64,
    /// Lower bound of the 95% confidence band.
    pub confidence_low: f64,
    /// Upper bound of the 95% confidence band.
    pub confidence_high: f64,
    /// Raw samples drawn so far.
    pub elapsed_samples: usize,
}

impl ConvergenceSnapshot {
    fn new(
        sample_count: usize,
        estimate: f64,
        standard_error: f64,
        elapsed_samples: usize,
    ) -> Self {
        let half_width = Z_95 * standard_error;
        Self {
            sample_count,
            estimate,
            standard_error,
            confidence_low: estimate - half_width,
            confidence_high: estimate + half_width,
            elapsed_samples,
        }
    }

    /// Returns a copy with estimate, error and band multiplied by `factor`.
    pub fn scaled(&self, factor: f64) -> Self {
        Self::new(
            self.sample_count,
            self.estimate * factor,
            self.standard_error * factor.abs(),
            self.elapsed_samples,
        )
    }

    /// Half-width of the 95% confidence band.
    #[inline]
    pub fn half_width(&self) -> f64 {
        Z_95 * self.standard_error
    }

    /// Returns `true` once at least two observations back the error estimate.
    ///
    /// When `false`, `standard_error` is the `0.0` sentinel.
    #[inline]
    pub fn has_defined_variance(&self) -> bool {
        self.elapsed_samples >= 2
    }

    /// Returns `true` if `value` lies inside the 95% band.
    #[inline]
    pub fn covers(&self, value: f64) -> bool {
        self.confidence_low <= value && value <= self.confidence_high
    }
}

/// One-pass running statistics over an outcome stream.
///
/// In paired mode (antithetic runs) each consecutive outcome pair is averaged
/// into one observation before the update, the reported `sample_count` counts
/// both members of each pair, and the standard error is that of the pair
/// means.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ConvergenceTracker {
    observations: usize,
    mean: f64,
    m2: f64,
    paired: bool,
}

impl ConvergenceTracker {
    /// Creates a tracker treating each outcome as one observation.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a tracker folding consecutive outcome pairs into one observation.
    pub fn paired() -> Self {
        Self {
            paired: true,
            ..Self::default()
        }
    }

    /// Returns `true` in paired mode.
    #[inline]
    pub fn is_paired(&self) -> bool {
        self.paired
    }

    /// Number of observations (pairs count once in paired mode).
    #[inline]
    pub fn observations(&self) -> usize {
        self.observations
    }

    /// Number of outcomes consumed.
    #[inline]
    pub fn sample_count(&self) -> usize {
        if self.paired {
            2 * self.observations
        } else {
            self.observations
        }
    }

    /// Running mean.
    #[inline]
    pub fn mean(&self) -> f64 {
        self.mean
    }

    /// Unbiased sample variance of the observations, `None` below two.
    pub fn variance(&self) -> Option<f64> {
        if self.observations < 2 {
            return None;
        }
        Some((self.m2 / (self.observations - 1) as f64).max(0.0))
    }

    /// Standard error of the mean, `0.0` below two observations.
    pub fn standard_error(&self) -> f64 {
        match self.variance() {
            Some(variance) => (variance / self.observations as f64).sqrt(),
            None => 0.0,
        }
    }

    /// Folds a batch of outcomes into the statistics.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::InvalidParameter`] if the batch is empty, or has
    /// odd length in paired mode. The tracker is unchanged on error.
    pub fn update(&mut self, outcomes: &[f64]) -> Result<ConvergenceSnapshot> {
        if outcomes.is_empty() {
            return Err(EngineError::parameter("outcomes", "batch must not be empty"));
        }

        if self.paired {
            if outcomes.len() % 2 != 0 {
                return Err(EngineError::parameter(
                    "outcomes",
                    format!("paired batch has odd length {}", outcomes.len()),
                ));
            }
            for pair in outcomes.chunks_exact(2) {
                self.push(0.5 * (pair[0] + pair[1]));
            }
        } else {
            for &outcome in outcomes {
                self.push(outcome);
            }
        }

        Ok(self.snapshot())
    }

    #[inline]
    fn push(&mut self, x: f64) {
        self.observations += 1;
        let delta = x - self.mean;
        self.mean += delta / self.observations as f64;
        self.m2 += delta * (x - self.mean);
    }

    /// Current state as a snapshot.
    pub fn snapshot(&self) -> ConvergenceSnapshot {
        ConvergenceSnapshot::new(
            self.sample_count(),
            self.mean,
            self.standard_error(),
            self.observations,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use proptest::prelude::*;

    fn two_pass(values: &[f64]) -> (f64, f64) {
        let n = values.len() as f64;
        let mean = values.iter().sum::<f64>() / n;
        let var = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (n - 1.0);
        (mean, var)
    }

    #[test]
    fn test_empty_batch_rejected() {
        let mut tracker = ConvergenceTracker::new();
        let err = tracker.update(&[]).unwrap_err();
        assert!(matches!(
            err,
            EngineError::InvalidParameter {
                name: "outcomes",
                ..
            }
        ));
        assert_eq!(tracker.observations(), 0);
    }

    #[test]
    fn test_single_observation_sentinel() {
        let mut tracker = ConvergenceTracker::new();
        let snapshot = tracker.update(&[3.5]).unwrap();

        assert_eq!(snapshot.sample_count, 1);
        assert_eq!(snapshot.estimate, 3.5);
        assert_eq!(snapshot.standard_error, 0.0);
        assert_eq!(snapshot.confidence_low, 3.5);
        assert_eq!(snapshot.confidence_high, 3.5);
        assert!(!snapshot.has_defined_variance());
        assert!(tracker.variance().is_none());
    }

    #[test]
    fn test_known_statistics() {
        let mut tracker = ConvergenceTracker::new();
        tracker.update(&[2.0, 4.0, 4.0, 4.0]).unwrap();
        let snapshot = tracker.update(&[5.0, 5.0, 7.0, 9.0]).unwrap();

        // mean 5, sample variance 32/7
        assert_relative_eq!(snapshot.estimate, 5.0, epsilon = 1e-14);
        assert_relative_eq!(tracker.variance().unwrap(), 32.0 / 7.0, epsilon = 1e-12);
        assert_relative_eq!(
            snapshot.standard_error,
            (32.0 / 7.0 / 8.0_f64).sqrt(),
            epsilon = 1e-12
        );
        assert_relative_eq!(
            snapshot.confidence_high - snapshot.confidence_low,
            2.0 * Z_95 * snapshot.standard_error,
            epsilon = 1e-12
        );
        assert!(snapshot.has_defined_variance());
    }

    #[test]
    fn test_constant_stream_has_exact_zero_error() {
        let mut tracker = ConvergenceTracker::new();
        for _ in 0..10 {
            tracker.update(&[10.0; 97]).unwrap();
        }
        let snapshot = tracker.snapshot();
        assert_eq!(snapshot.estimate, 10.0);
        assert_eq!(snapshot.standard_error, 0.0);
        assert_eq!(snapshot.confidence_low, 10.0);
    }

    #[test]
    fn test_large_offset_is_stable() {
        // Naive sum-of-squares loses all precision here
        let offset = 1e9;
        let values: Vec<f64> = (0..10_000).map(|i| offset + (i % 10) as f64).collect();
        let mut tracker = ConvergenceTracker::new();
        tracker.update(&values).unwrap();

        let (_, expected_var) = two_pass(&values);
        assert_relative_eq!(tracker.variance().unwrap(), expected_var, max_relative = 1e-6);
    }

    #[test]
    fn test_paired_mode() {
        let mut tracker = ConvergenceTracker::paired();
        let snapshot = tracker.update(&[1.0, 3.0, 5.0, 7.0]).unwrap();

        // Pair means 2 and 6
        assert_eq!(snapshot.sample_count, 4);
        assert_eq!(snapshot.elapsed_samples, 2);
        assert_eq!(snapshot.estimate, 4.0);
        assert_relative_eq!(tracker.variance().unwrap(), 8.0, epsilon = 1e-12);
        assert_relative_eq!(snapshot.standard_error, 2.0, epsilon = 1e-12);
    }

    #[test]
    fn test_paired_rejects_odd_batch() {
        let mut tracker = ConvergenceTracker::paired();
        assert!(tracker.update(&[1.0, 2.0, 3.0]).is_err());
        assert_eq!(tracker.observations(), 0);
    }

    #[test]
    fn test_scaled_snapshot() {
        let mut tracker = ConvergenceTracker::new();
        let snapshot = tracker.update(&[0.0, 1.0, 1.0, 1.0]).unwrap();
        let scaled = snapshot.scaled(4.0);

        assert_eq!(scaled.estimate, 3.0);
        assert_eq!(scaled.standard_error, 4.0 * snapshot.standard_error);
        assert_eq!(scaled.sample_count, snapshot.sample_count);
        assert!(scaled.covers(3.0));
    }

    proptest! {
        #[test]
        fn prop_matches_two_pass(values in prop::collection::vec(-1e3f64..1e3, 2..200)) {
            let mut tracker = ConvergenceTracker::new();
            tracker.update(&values).unwrap();
            let (mean, var) = two_pass(&values);

            prop_assert!((tracker.mean() - mean).abs() <= 1e-9 * (1.0 + mean.abs()));
            prop_assert!((tracker.variance().unwrap() - var).abs() <= 1e-7 * (1.0 + var));
        }

        #[test]
        fn prop_batch_split_is_bitwise_invariant(
            values in prop::collection::vec(-50f64..50.0, 1..300),
            split in 1usize..64,
        ) {
            let mut whole = ConvergenceTracker::new();
            whole.update(&values).unwrap();

            let mut chunked = ConvergenceTracker::new();
            for chunk in values.chunks(split) {
                chunked.update(chunk).unwrap();
            }

            prop_assert_eq!(whole.snapshot(), chunked.snapshot());
        }
    }
}
