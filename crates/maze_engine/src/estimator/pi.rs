//! π estimation by rejection sampling.
//!
//! Points are drawn uniformly in the square `[-1, 1] × [-1, 1]`; the fraction
//! landing in the inscribed unit disc tends to `π / 4`.
//!
//! ```text
//!  A_disc     π r²     π
//! -------- = ------ = ---
//!  A_square   4 r²     4
//! ```

use super::{DrawKind, Estimator};

/// Hit-or-miss estimator for π.
///
/// # Examples
///
/// ```rust
/// use maze_engine::{Estimator, PiEstimator};
///
/// let pi = PiEstimator;
/// assert_eq!(pi.outcome(&[0.5, 0.5]), 1.0); // centre of the square
/// assert_eq!(pi.outcome(&[0.0, 0.0]), 0.0); // corner (-1, -1)
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PiEstimator;

impl PiEstimator {
    /// Maps a uniform draw in `[0, 1)` to a coordinate in `[-1, 1)`.
    #[inline]
    fn coordinate(u: f64) -> f64 {
        2.0 * u - 1.0
    }

    /// Antithetic mirror of a coordinate: `sign(x) * (1 - |x|)`.
    ///
    /// Preserves the uniform law on `[-1, 1]` and reverses the order of `|x|`,
    /// so the hit indicators of a point and its mirror are negatively
    /// correlated.
    #[inline]
    fn mirror(x: f64) -> f64 {
        (1.0 - x.abs()).copysign(x)
    }

    #[inline]
    fn hit(x: f64, y: f64) -> f64 {
        if x * x + y * y <= 1.0 {
            1.0
        } else {
            0.0
        }
    }
}

impl Estimator for PiEstimator {
    #[inline]
    fn draw_kind(&self) -> DrawKind {
        DrawKind::Uniform
    }

    #[inline]
    fn draws_per_sample(&self) -> usize {
        2
    }

    #[inline]
    fn scale(&self) -> f64 {
        4.0
    }

    #[inline]
    fn outcome(&self, sample: &[f64]) -> f64 {
        Self::hit(Self::coordinate(sample[0]), Self::coordinate(sample[1]))
    }

    #[inline]
    fn antithetic_outcome(&self, sample: &[f64]) -> f64 {
        let x = Self::mirror(Self::coordinate(sample[0]));
        let y = Self::mirror(Self::coordinate(sample[1]));
        Self::hit(x, y)
    }
}
