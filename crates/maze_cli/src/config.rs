//! Runner configuration management
//!
//! Handles loading configuration from environment variables, TOML files, and CLI arguments.

use maze_engine::{OptionParams, DEFAULT_BATCH_SIZE, MAX_SAMPLE_BUDGET};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use thiserror::Error;

/// Environment variable overriding the log level.
pub const ENV_LOG_LEVEL: &str = "MAZE_LOG_LEVEL";
/// Environment variable overriding the batch size.
pub const ENV_BATCH_SIZE: &str = "MAZE_BATCH_SIZE";
/// Environment variable overriding the default sample budget.
pub const ENV_SAMPLES: &str = "MAZE_SAMPLES";
/// Environment variable overriding the ledger path.
pub const ENV_LEDGER: &str = "MAZE_LEDGER";

/// Configuration error types
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Unknown log level name.
    #[error("Invalid log level: {0}. Must be one of: trace, debug, info, warn, error")]
    InvalidLogLevel(String),

    /// A setting holds a value outside its valid range.
    #[error("Invalid value for {key}: {reason}")]
    InvalidValue {
        /// Setting name.
        key: &'static str,
        /// What is wrong with it.
        reason: String,
    },

    /// Configuration file could not be read or parsed.
    #[error("Configuration file error: {0}")]
    FileError(String),

    /// Environment variable could not be parsed.
    #[error("Environment variable error: {0}")]
    EnvError(String),
}

/// Log levels supported by the runner
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogLevel {
    /// Every batch.
    Trace,
    /// Per-batch statistics.
    Debug,
    /// Run start and finish.
    #[default]
    Info,
    /// Cancellations and failures.
    Warn,
    /// Failures only.
    Error,
}

impl FromStr for LogLevel {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "trace" => Ok(LogLevel::Trace),
            "debug" => Ok(LogLevel::Debug),
            "info" => Ok(LogLevel::Info),
            "warn" => Ok(LogLevel::Warn),
            "error" => Ok(LogLevel::Error),
            _ => Err(ConfigError::InvalidLogLevel(s.to_string())),
        }
    }
}

impl LogLevel {
    /// Convert log level to tracing filter string
    pub fn as_filter_str(&self) -> &'static str {
        match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }
}

impl std::fmt::Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_filter_str())
    }
}

/// Default contract for the `option` command, the `[option]` table in TOML.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct OptionDefaults {
    /// Initial underlying price.
    pub spot: f64,
    /// Strike price.
    pub strike: f64,
    /// Time to maturity in years.
    pub time: f64,
    /// Continuously compounded risk-free rate.
    pub rate: f64,
    /// Annualised volatility.
    pub volatility: f64,
}

impl Default for OptionDefaults {
    fn default() -> Self {
        Self {
            spot: 100.0,
            strike: 100.0,
            time: 1.0,
            rate: 0.05,
            volatility: 0.2,
        }
    }
}

impl OptionDefaults {
    /// Engine parameters for these defaults.
    pub fn to_params(&self) -> OptionParams {
        OptionParams::new(self.spot, self.strike, self.volatility, self.rate, self.time)
    }
}

/// Runner configuration structure
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RunnerConfig {
    /// Log level
    #[serde(deserialize_with = "deserialize_log_level")]
    pub log_level: LogLevel,
    /// Raw samples per batch (one snapshot per batch)
    pub batch_size: usize,
    /// Sample budget when `--samples` is not given
    pub default_samples: usize,
    /// JSON Lines file holding run records
    pub ledger_path: PathBuf,
    /// Rows shown by the leaderboard when `--limit` is not given
    pub leaderboard_size: usize,
    /// Maximum convergence lines printed during a run
    pub progress_lines: usize,
    /// Option contract defaults
    pub option: OptionDefaults,
}

fn deserialize_log_level<'de, D>(deserializer: D) -> Result<LogLevel, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let s = String::deserialize(deserializer)?;
    LogLevel::from_str(&s).map_err(serde::de::Error::custom)
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            log_level: LogLevel::Info,
            batch_size: DEFAULT_BATCH_SIZE,
            default_samples: 5_000,
            ledger_path: PathBuf::from("maze_runner.jsonl"),
            leaderboard_size: 5,
            progress_lines: 20,
            option: OptionDefaults::default(),
        }
    }
}

fn parse_env<T: FromStr>(key: &str, value: &str) -> Result<T, ConfigError> {
    value
        .trim()
        .parse()
        .map_err(|_| ConfigError::EnvError(format!("{}={} is not a valid number", key, value)))
}

impl RunnerConfig {
    /// Create a new RunnerConfig with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut config = Self::default();
        config.apply_env(|key| std::env::var(key).ok())?;
        config.validate()?;
        Ok(config)
    }

    /// Overrides the fields whose variable `lookup` resolves.
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(level) = lookup(ENV_LOG_LEVEL) {
            self.log_level = LogLevel::from_str(&level)?;
        }
        if let Some(batch) = lookup(ENV_BATCH_SIZE) {
            self.batch_size = parse_env(ENV_BATCH_SIZE, &batch)?;
        }
        if let Some(samples) = lookup(ENV_SAMPLES) {
            self.default_samples = parse_env(ENV_SAMPLES, &samples)?;
        }
        if let Some(path) = lookup(ENV_LEDGER) {
            self.ledger_path = PathBuf::from(path);
        }
        Ok(())
    }

    /// Load configuration from a TOML file
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::FileError(format!("Failed to read config file: {}", e)))?;

        let config: RunnerConfig = toml::from_str(&content)
            .map_err(|e| ConfigError::FileError(format!("Failed to parse TOML: {}", e)))?;

        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.batch_size == 0 {
            return Err(ConfigError::InvalidValue {
                key: "batch_size",
                reason: "must be at least 1".to_string(),
            });
        }
        if self.default_samples == 0 || self.default_samples > MAX_SAMPLE_BUDGET {
            return Err(ConfigError::InvalidValue {
                key: "default_samples",
                reason: format!("must be in [1, {}], got {}", MAX_SAMPLE_BUDGET, self.default_samples),
            });
        }
        if self.leaderboard_size == 0 {
            return Err(ConfigError::InvalidValue {
                key: "leaderboard_size",
                reason: "must be at least 1".to_string(),
            });
        }
        if self.progress_lines == 0 {
            return Err(ConfigError::InvalidValue {
                key: "progress_lines",
                reason: "must be at least 1".to_string(),
            });
        }
        self.option
            .to_params()
            .validate()
            .map_err(|e| ConfigError::InvalidValue {
                key: "option",
                reason: e.to_string(),
            })?;

        Ok(())
    }

    /// Merge with CLI arguments (CLI takes precedence)
    pub fn merge_with_cli(&mut self, cli: &CliArgs) -> Result<(), ConfigError> {
        if let Some(log_level) = &cli.log_level {
            self.log_level = LogLevel::from_str(log_level)?;
        }
        if let Some(batch_size) = cli.batch_size {
            self.batch_size = batch_size;
        }
        if let Some(ledger) = &cli.ledger {
            self.ledger_path = ledger.clone();
        }
        Ok(())
    }
}

/// CLI arguments structure
#[derive(Debug, Clone, Default)]
pub struct CliArgs {
    /// Config file path
    pub config_file: Option<PathBuf>,
    /// Log level override
    pub log_level: Option<String>,
    /// Batch size override
    pub batch_size: Option<usize>,
    /// Ledger path override
    pub ledger: Option<PathBuf>,
}

/// Build configuration from all sources
///
/// Priority (highest to lowest):
/// 1. CLI arguments
/// 2. Environment variables
/// 3. Config file
/// 4. Default values
pub fn build_config(cli: &CliArgs) -> Result<RunnerConfig, ConfigError> {
    build_config_with(cli, |key| std::env::var(key).ok())
}

/// [`build_config`] with an explicit environment lookup.
pub fn build_config_with<F>(cli: &CliArgs, lookup: F) -> Result<RunnerConfig, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let mut config = if let Some(config_path) = &cli.config_file {
        RunnerConfig::from_file(config_path)?
    } else {
        RunnerConfig::default()
    };

    config.apply_env(lookup)?;
    config.merge_with_cli(cli)?;

    // Final validation
    config.validate()?;

    Ok(config)
}
