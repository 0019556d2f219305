//! Error types for the simulation engine.
//!
//! Two failure classes exist:
//! - [`EngineError::InvalidConfiguration`]: a [`SimulationConfig`](crate::SimulationConfig)
//!   violates an invariant. Raised before any sampling takes place.
//! - [`EngineError::InvalidParameter`]: a primitive was called with a bad
//!   argument (zero-length batch, odd paired batch). Indicates a caller bug.
//!
//! Numeric edge cases (zero maturity, zero volatility, a single observation)
//! are defined outputs, never errors.

use thiserror::Error;

/// Simulation engine error.
///
/// # Examples
/// ```
/// use maze_engine::EngineError;
///
/// let err = EngineError::InvalidConfiguration {
///     field: "sample_budget",
///     reason: "must be at least 1".to_string(),
/// };
/// assert!(err.to_string().contains("sample_budget"));
/// ```
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum EngineError {
    /// Simulation configuration violates an invariant.
    #[error("Invalid configuration '{field}': {reason}")]
    InvalidConfiguration {
        /// Offending configuration field.
        field: &'static str,
        /// Why the value was rejected.
        reason: String,
    },

    /// Bad argument passed to an engine primitive.
    #[error("Invalid parameter '{name}': {reason}")]
    InvalidParameter {
        /// Parameter name.
        name: &'static str,
        /// Why the value was rejected.
        reason: String,
    },
}

impl EngineError {
    /// Shorthand for [`EngineError::InvalidConfiguration`].
    pub fn config(field: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidConfiguration {
            field,
            reason: reason.into(),
        }
    }

    /// Shorthand for [`EngineError::InvalidParameter`].
    pub fn parameter(name: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidParameter {
            name,
            reason: reason.into(),
        }
    }

    /// Returns `true` for configuration errors.
    pub fn is_configuration(&self) -> bool {
        matches!(self, Self::InvalidConfiguration { .. })
    }
}

/// Result alias for engine operations.
pub type Result<T> = std::result::Result<T, EngineError>;
