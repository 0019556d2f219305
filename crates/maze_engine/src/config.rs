//! Simulation configuration.
//!
//! This module provides the immutable [`SimulationConfig`] record consumed by
//! the runner, the challenge and technique enums, and a fluent builder that
//! validates at build time.

use std::fmt;

use crate::error::{EngineError, Result};

/// Maximum number of samples a single run may draw.
pub const MAX_SAMPLE_BUDGET: usize = 100_000_000;

/// Default number of raw samples drawn per batch.
///
/// Batch size only controls snapshot cadence; it never changes the estimate.
pub const DEFAULT_BATCH_SIZE: usize = 1_000;

/// Market and contract parameters for a European call under GBM.
///
/// # Examples
///
/// ```rust
/// use maze_engine::OptionParams;
///
/// let params = OptionParams::new(100.0, 95.0, 0.2, 0.05, 0.5);
/// assert!(params.validate().is_ok());
/// ```
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct OptionParams {
    /// Initial spot price (S₀).
    pub spot: f64,
    /// Strike price (K).
    pub strike: f64,
    /// Volatility (σ) - annualised.
    pub volatility: f64,
    /// Risk-free rate (r) - annualised, continuously compounded.
    pub risk_free_rate: f64,
    /// Time to maturity (T) - in years.
    pub time_to_maturity: f64,
}

impl OptionParams {
    /// Creates new option parameters.
    #[inline]
    pub fn new(
        spot: f64,
        strike: f64,
        volatility: f64,
        risk_free_rate: f64,
        time_to_maturity: f64,
    ) -> Self {
        Self {
            spot,
            strike,
            volatility,
            risk_free_rate,
            time_to_maturity,
        }
    }

    /// Validates the parameters.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::InvalidConfiguration`] if:
    /// - any value is non-finite
    /// - `spot` or `strike` is not strictly positive
    /// - `volatility`, `risk_free_rate` or `time_to_maturity` is negative
    pub fn validate(&self) -> Result<()> {
        check_finite("spot", self.spot)?;
        check_finite("strike", self.strike)?;
        check_finite("volatility", self.volatility)?;
        check_finite("risk_free_rate", self.risk_free_rate)?;
        check_finite("time_to_maturity", self.time_to_maturity)?;

        if self.spot <= 0.0 {
            return Err(EngineError::config("spot", format!("{} must be positive", self.spot)));
        }
        if self.strike <= 0.0 {
            return Err(EngineError::config(
                "strike",
                format!("{} must be positive", self.strike),
            ));
        }
        if self.volatility < 0.0 {
            return Err(EngineError::config(
                "volatility",
                format!("{} must be non-negative", self.volatility),
            ));
        }
        if self.risk_free_rate < 0.0 {
            return Err(EngineError::config(
                "risk_free_rate",
                format!("{} must be non-negative", self.risk_free_rate),
            ));
        }
        if self.time_to_maturity < 0.0 {
            return Err(EngineError::config(
                "time_to_maturity",
                format!("{} must be non-negative", self.time_to_maturity),
            ));
        }
        Ok(())
    }
}

impl Default for OptionParams {
    fn default() -> Self {
        Self {
            spot: 100.0,
            strike: 100.0,
            volatility: 0.2,
            risk_free_rate: 0.05,
            time_to_maturity: 1.0,
        }
    }
}

fn check_finite(field: &'static str, value: f64) -> Result<()> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(EngineError::config(field, format!("{} is not finite", value)))
    }
}

/// Quantity being estimated.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Challenge {
    /// π via the hit rate of uniform points in the unit disc.
    Pi,
    /// European call price under Geometric Brownian Motion.
    OptionPrice(OptionParams),
}

impl Challenge {
    /// Human-readable scenario name.
    pub fn name(&self) -> &'static str {
        match self {
            Challenge::Pi => "Pi Estimation",
            Challenge::OptionPrice(_) => "European Call Option",
        }
    }
}

impl fmt::Display for Challenge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Sampling technique.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Technique {
    /// Plain Monte Carlo: one outcome per draw.
    #[default]
    Standard,
    /// Antithetic variates: every draw is paired with its mirror.
    Antithetic,
}

impl Technique {
    /// Human-readable technique name.
    pub fn name(&self) -> &'static str {
        match self {
            Technique::Standard => "Standard",
            Technique::Antithetic => "Antithetic",
        }
    }
}

impl fmt::Display for Technique {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Immutable simulation configuration.
///
/// Construct via [`SimulationConfig::builder`], or with [`SimulationConfig::new`]
/// followed by the runner's own validation.
///
/// # Examples
///
/// ```rust
/// use maze_engine::{Challenge, OptionParams, SimulationConfig, Technique};
///
/// let config = SimulationConfig::builder()
///     .option_price(OptionParams::default())
///     .sample_budget(20_000)
///     .antithetic(true)
///     .seed(42)
///     .build()
///     .expect("valid configuration");
///
/// assert_eq!(config.sample_budget, 20_000);
/// assert_eq!(config.technique(), Technique::Antithetic);
/// ```
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SimulationConfig {
    /// Quantity to estimate, with its parameters.
    pub challenge: Challenge,
    /// Number of raw samples to draw.
    pub sample_budget: usize,
    /// Whether to pair each draw with its antithetic mirror.
    pub use_antithetic: bool,
    /// Seed for reproducibility; `None` draws one from entropy.
    pub seed: Option<u64>,
    /// Raw samples per batch (one snapshot per batch).
    pub batch_size: usize,
}

impl SimulationConfig {
    /// Creates a configuration with the default batch size.
    pub fn new(
        challenge: Challenge,
        sample_budget: usize,
        use_antithetic: bool,
        seed: Option<u64>,
    ) -> Self {
        Self {
            challenge,
            sample_budget,
            use_antithetic,
            seed,
            batch_size: DEFAULT_BATCH_SIZE,
        }
    }

    /// Creates a new configuration builder.
    #[inline]
    pub fn builder() -> SimulationConfigBuilder {
        SimulationConfigBuilder::default()
    }

    /// Returns the sampling technique.
    #[inline]
    pub fn technique(&self) -> Technique {
        if self.use_antithetic {
            Technique::Antithetic
        } else {
            Technique::Standard
        }
    }

    /// Returns the number of outcomes a completed run reports.
    #[inline]
    pub fn expected_sample_count(&self) -> usize {
        match self.technique() {
            Technique::Standard => self.sample_budget,
            Technique::Antithetic => 2 * self.sample_budget,
        }
    }

    /// Returns a copy with a different batch size.
    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size;
        self
    }

    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::InvalidConfiguration`] if:
    /// - `sample_budget` is 0 or greater than [`MAX_SAMPLE_BUDGET`]
    /// - `batch_size` is 0
    /// - option parameters are invalid
    pub fn validate(&self) -> Result<()> {
        if self.sample_budget == 0 || self.sample_budget > MAX_SAMPLE_BUDGET {
            return Err(EngineError::config(
                "sample_budget",
                format!(
                    "{} must be in range [1, {}]",
                    self.sample_budget, MAX_SAMPLE_BUDGET
                ),
            ));
        }
        if self.batch_size == 0 {
            return Err(EngineError::config("batch_size", "must be at least 1"));
        }
        if let Challenge::OptionPrice(params) = &self.challenge {
            params.validate()?;
        }
        Ok(())
    }
}

/// Builder for [`SimulationConfig`].
///
/// # Examples
///
/// ```rust
/// use maze_engine::SimulationConfig;
///
/// let config = SimulationConfig::builder()
///     .pi()
///     .sample_budget(1_000)
///     .batch_size(100)
///     .build()
///     .unwrap();
///
/// assert_eq!(config.batch_size, 100);
/// assert_eq!(config.seed, None);
/// ```
#[derive(Clone, Debug, Default)]
pub struct SimulationConfigBuilder {
    challenge: Option<Challenge>,
    sample_budget: Option<usize>,
    use_antithetic: bool,
    seed: Option<u64>,
    batch_size: Option<usize>,
}

impl SimulationConfigBuilder {
    /// Sets the challenge.
    #[inline]
    pub fn challenge(mut self, challenge: Challenge) -> Self {
        self.challenge = Some(challenge);
        self
    }

    /// Selects π estimation.
    #[inline]
    pub fn pi(self) -> Self {
        self.challenge(Challenge::Pi)
    }

    /// Selects option pricing with the given parameters.
    #[inline]
    pub fn option_price(self, params: OptionParams) -> Self {
        self.challenge(Challenge::OptionPrice(params))
    }

    /// Sets the sample budget.
    #[inline]
    pub fn sample_budget(mut self, sample_budget: usize) -> Self {
        self.sample_budget = Some(sample_budget);
        self
    }

    /// Enables or disables antithetic pairing.
    #[inline]
    pub fn antithetic(mut self, use_antithetic: bool) -> Self {
        self.use_antithetic = use_antithetic;
        self
    }

    /// Sets the seed for reproducibility.
    #[inline]
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Sets an optional seed.
    #[inline]
    pub fn maybe_seed(mut self, seed: Option<u64>) -> Self {
        self.seed = seed;
        self
    }

    /// Sets the batch size.
    #[inline]
    pub fn batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = Some(batch_size);
        self
    }

    /// Builds the configuration.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::InvalidConfiguration`] if the challenge or
    /// sample budget is missing, or any invariant is violated.
    pub fn build(self) -> Result<SimulationConfig> {
        let challenge = self
            .challenge
            .ok_or_else(|| EngineError::config("challenge", "must be specified"))?;
        let sample_budget = self
            .sample_budget
            .ok_or_else(|| EngineError::config("sample_budget", "must be specified"))?;

        let config = SimulationConfig {
            challenge,
            sample_budget,
            use_antithetic: self.use_antithetic,
            seed: self.seed,
            batch_size: self.batch_size.unwrap_or(DEFAULT_BATCH_SIZE),
        };

        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_valid() {
        let config = SimulationConfig::builder()
            .pi()
            .sample_budget(5_000)
            .build()
            .unwrap();

        assert_eq!(config.challenge, Challenge::Pi);
        assert_eq!(config.sample_budget, 5_000);
        assert!(!config.use_antithetic);
        assert_eq!(config.seed, None);
        assert_eq!(config.batch_size, DEFAULT_BATCH_SIZE);
    }

    #[test]
    fn test_zero_budget_rejected() {
        let result = SimulationConfig::builder().pi().sample_budget(0).build();
        assert!(matches!(
            result,
            Err(EngineError::InvalidConfiguration {
                field: "sample_budget",
                ..
            })
        ));
    }

    #[test]
    fn test_budget_above_max_rejected() {
        let result = SimulationConfig::builder()
            .pi()
            .sample_budget(MAX_SAMPLE_BUDGET + 1)
            .build();
        assert!(result.is_err());
    }

    #[test]
    fn test_zero_batch_size_rejected() {
        let result = SimulationConfig::builder()
            .pi()
            .sample_budget(10)
            .batch_size(0)
            .build();
        assert!(matches!(
            result,
            Err(EngineError::InvalidConfiguration {
                field: "batch_size",
                ..
            })
        ));
    }

    #[test]
    fn test_missing_fields() {
        let result = SimulationConfig::builder().sample_budget(10).build();
        assert!(matches!(
            result,
            Err(EngineError::InvalidConfiguration {
                field: "challenge",
                ..
            })
        ));

        let result = SimulationConfig::builder().pi().build();
        assert!(matches!(
            result,
            Err(EngineError::InvalidConfiguration {
                field: "sample_budget",
                ..
            })
        ));
    }

    #[test]
    fn test_option_params_validation() {
        assert!(OptionParams::default().validate().is_ok());
        assert!(OptionParams::new(100.0, 90.0, 0.2, 0.05, 0.0)
            .validate()
            .is_ok());
        assert!(OptionParams::new(100.0, 90.0, 0.0, 0.05, 1.0)
            .validate()
            .is_ok());

        let bad = [
            OptionParams::new(0.0, 100.0, 0.2, 0.05, 1.0),
            OptionParams::new(100.0, -1.0, 0.2, 0.05, 1.0),
            OptionParams::new(100.0, 100.0, -0.2, 0.05, 1.0),
            OptionParams::new(100.0, 100.0, 0.2, -0.01, 1.0),
            OptionParams::new(100.0, 100.0, 0.2, 0.05, -1.0),
            OptionParams::new(f64::NAN, 100.0, 0.2, 0.05, 1.0),
            OptionParams::new(100.0, 100.0, f64::INFINITY, 0.05, 1.0),
        ];
        for params in bad {
            let err = params.validate().unwrap_err();
            assert!(err.is_configuration(), "{:?} should be rejected", params);
        }
    }

    #[test]
    fn test_invalid_option_rejected_by_builder() {
        let result = SimulationConfig::builder()
            .option_price(OptionParams::new(100.0, 100.0, 0.2, 0.05, -1.0))
            .sample_budget(100)
            .build();
        assert!(matches!(
            result,
            Err(EngineError::InvalidConfiguration {
                field: "time_to_maturity",
                ..
            })
        ));
    }

    #[test]
    fn test_technique_and_expected_count() {
        let config = SimulationConfig::new(Challenge::Pi, 500, true, Some(1));
        assert_eq!(config.technique(), Technique::Antithetic);
        assert_eq!(config.expected_sample_count(), 1_000);

        let config = SimulationConfig::new(Challenge::Pi, 500, false, Some(1));
        assert_eq!(config.technique(), Technique::Standard);
        assert_eq!(config.expected_sample_count(), 500);
    }

    #[test]
    fn test_display_names() {
        assert_eq!(Challenge::Pi.to_string(), "Pi Estimation");
        assert_eq!(
            Challenge::OptionPrice(OptionParams::default()).to_string(),
            "European Call Option"
        );
        assert_eq!(Technique::Antithetic.to_string(), "Antithetic");
        assert_eq!(Technique::default(), Technique::Standard);
    }
}
