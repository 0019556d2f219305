//! CLI error types

use maze_engine::EngineError;
use thiserror::Error;

use crate::config::ConfigError;
use crate::ledger::LedgerError;

/// Errors surfaced by the runner commands.
#[derive(Debug, Error)]
pub enum CliError {
    /// Configuration could not be built.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// The engine rejected the run.
    #[error("Simulation error: {0}")]
    Engine(#[from] EngineError),

    /// Run records could not be read or written.
    #[error("Ledger error: {0}")]
    Ledger(#[from] LedgerError),

    /// Command argument outside its valid range.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// JSON output could not be produced.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Writing to the terminal failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for CLI operations.
pub type Result<T> = std::result::Result<T, CliError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_engine_error_conversion() {
        let err: CliError = EngineError::config("sample_budget", "must be at least 1").into();
        assert!(matches!(err, CliError::Engine(_)));
        assert!(err.to_string().contains("sample_budget"));
    }

    #[test]
    fn test_config_error_display() {
        let err: CliError = ConfigError::InvalidLogLevel("loud".to_string()).into();
        assert!(err.to_string().starts_with("Configuration error"));
        assert!(err.to_string().contains("loud"));
    }
}
