//! European call pricing under Geometric Brownian Motion.
//!
//! The terminal price is simulated exactly in log space:
//! ```text
//! S_T = S₀ × exp((r - σ²/2) T + σ √T × Z)
//! ```
//! and each outcome is the discounted payoff `e^(-rT) × max(S_T - K, 0)`.
//!
//! Drift, diffusion and discount factor are precomputed at construction.

use super::{DrawKind, Estimator};
use crate::config::OptionParams;

/// Discounted-payoff estimator for a European call.
///
/// # Edge cases
///
/// - `T = 0`: every outcome is the intrinsic value `max(S₀ - K, 0)` and `Z`
///   is ignored.
/// - `σ = 0`: `S_T = S₀ e^(rT)` for every draw, so all outcomes are identical.
///
/// # Examples
///
/// ```rust
/// use maze_engine::{Estimator, OptionEstimator, OptionParams};
///
/// let expired = OptionEstimator::new(OptionParams::new(100.0, 90.0, 0.2, 0.05, 0.0));
/// assert_eq!(expired.outcome(&[1.5]), 10.0);
/// assert_eq!(expired.outcome(&[-3.0]), 10.0);
/// ```
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct OptionEstimator {
    params: OptionParams,
    /// `(r - σ²/2) T`
    drift: f64,
    /// `σ √T`
    diffusion: f64,
    /// `e^(-rT)`
    discount_factor: f64,
    /// `max(S₀ - K, 0)`, used when `T = 0`.
    intrinsic: f64,
}

impl OptionEstimator {
    /// Creates an estimator, precomputing the GBM constants.
    pub fn new(params: OptionParams) -> Self {
        let OptionParams {
            spot,
            strike,
            volatility,
            risk_free_rate,
            time_to_maturity,
        } = params;

        Self {
            params,
            drift: (risk_free_rate - 0.5 * volatility * volatility) * time_to_maturity,
            diffusion: volatility * time_to_maturity.sqrt(),
            discount_factor: (-risk_free_rate * time_to_maturity).exp(),
            intrinsic: (spot - strike).max(0.0),
        }
    }

    /// Returns the option parameters.
    #[inline]
    pub fn params(&self) -> &OptionParams {
        &self.params
    }

    /// Returns the discount factor `e^(-rT)`.
    #[inline]
    pub fn discount_factor(&self) -> f64 {
        self.discount_factor
    }

    /// Simulated terminal price for a standard normal draw.
    #[inline]
    pub fn terminal_price(&self, z: f64) -> f64 {
        if self.params.time_to_maturity == 0.0 {
            return self.params.spot;
        }
        self.params.spot * (self.drift + self.diffusion * z).exp()
    }

    /// Discounted call payoff for a standard normal draw.
    #[inline]
    pub fn discounted_payoff(&self, z: f64) -> f64 {
        if self.params.time_to_maturity == 0.0 {
            return self.intrinsic;
        }
        self.discount_factor * (self.terminal_price(z) - self.params.strike).max(0.0)
    }
}

impl Estimator for OptionEstimator {
    #[inline]
    fn draw_kind(&self) -> DrawKind {
        DrawKind::Normal
    }

    #[inline]
    fn draws_per_sample(&self) -> usize {
        1
    }

    #[inline]
    fn outcome(&self, sample: &[f64]) -> f64 {
        self.discounted_payoff(sample[0])
    }

    #[inline]
    fn antithetic_outcome(&self, sample: &[f64]) -> f64 {
        self.discounted_payoff(-sample[0])
    }
}
