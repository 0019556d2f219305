//! Closed-form reference prices.
//!
//! The Black-Scholes price of a European call is the value the Monte Carlo
//! option estimate converges to. It is used to report estimation error and to
//! verify the engine; the runner itself never calls it.

use crate::config::OptionParams;

/// 1 / sqrt(2π)
const FRAC_1_SQRT_2PI: f64 = 0.398_942_280_401_432_7;

/// Complementary error function, Abramowitz and Stegun 7.1.26.
///
/// Maximum absolute error 1.5e-7.
#[inline]
fn erfc_approx(x: f64) -> f64 {
    const A1: f64 = 0.254829592;
    const A2: f64 = -0.284496736;
    const A3: f64 = 1.421413741;
    const A4: f64 = -1.453152027;
    const A5: f64 = 1.061405429;
    const P: f64 = 0.3275911;

    let abs_x = x.abs();
    let t = 1.0 / (1.0 + P * abs_x);
    let poly = A1 + t * (A2 + t * (A3 + t * (A4 + t * A5)));
    let erfc_abs = t * poly * (-abs_x * abs_x).exp();

    if x < 0.0 {
        2.0 - erfc_abs
    } else {
        erfc_abs
    }
}

/// Standard normal cumulative distribution function.
///
/// # Examples
/// ```
/// use maze_engine::analytical::norm_cdf;
///
/// assert!((norm_cdf(0.0) - 0.5).abs() < 1e-7);
/// assert!(norm_cdf(-3.0) < 0.01);
/// assert!(norm_cdf(3.0) > 0.99);
/// ```
#[inline]
pub fn norm_cdf(x: f64) -> f64 {
    0.5 * erfc_approx(-x / std::f64::consts::SQRT_2)
}

/// Standard normal probability density function.
#[inline]
pub fn norm_pdf(x: f64) -> f64 {
    FRAC_1_SQRT_2PI * (-0.5 * x * x).exp()
}

/// Black-Scholes price of a European call.
///
/// Degenerate inputs take their limits:
/// - `T = 0`: intrinsic value `max(S - K, 0)`
/// - `σ = 0`: `e^(-rT) max(S e^(rT) - K, 0)`
///
/// # Examples
/// ```
/// use maze_engine::analytical::black_scholes_call;
/// use maze_engine::OptionParams;
///
/// let price = black_scholes_call(&OptionParams::new(100.0, 100.0, 0.2, 0.05, 1.0));
/// assert!((price - 10.4506).abs() < 1e-3);
/// ```
pub fn black_scholes_call(params: &OptionParams) -> f64 {
    let OptionParams {
        spot,
        strike,
        volatility,
        risk_free_rate,
        time_to_maturity,
    } = *params;

    if time_to_maturity == 0.0 {
        return (spot - strike).max(0.0);
    }

    let discount = (-risk_free_rate * time_to_maturity).exp();
    let vol_sqrt_t = volatility * time_to_maturity.sqrt();

    if vol_sqrt_t == 0.0 {
        let forward = spot * (risk_free_rate * time_to_maturity).exp();
        return discount * (forward - strike).max(0.0);
    }

    let d1 = ((spot / strike).ln() + (risk_free_rate + 0.5 * volatility * volatility) * time_to_maturity)
        / vol_sqrt_t;
    let d2 = d1 - vol_sqrt_t;

    spot * norm_cdf(d1) - strike * discount * norm_cdf(d2)
}
