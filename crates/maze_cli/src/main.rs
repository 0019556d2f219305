//! Monte Carlo Maze Runner
//!
//! Estimates π and prices European calls by Monte Carlo sampling, printing
//! convergence as it happens.
//!
//! # Commands
//!
//! - `maze-runner pi` - Estimate π from random points in the unit square
//! - `maze-runner option` - Price a European call under Geometric Brownian Motion
//! - `maze-runner compare` - Standard versus antithetic over repeated trials
//! - `maze-runner leaderboard` - Most recent recorded runs

use std::io;
use std::path::PathBuf;

use anyhow::Context;
use clap::{Args as ClapArgs, Parser, Subcommand, ValueEnum};
use maze_cli::commands;
use maze_cli::commands::simulate::SimulateOptions;
use maze_cli::config::{build_config, CliArgs as ConfigCliArgs, OptionDefaults, RunnerConfig};
use maze_cli::summary::OutputFormat;
use maze_engine::Challenge;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Monte Carlo Maze Runner - converge on the truth by random sampling
#[derive(Parser, Debug)]
#[command(name = "maze-runner")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Configuration file path (TOML format)
    #[arg(short, long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, global = true)]
    log_level: Option<String>,

    /// Raw samples per batch
    #[arg(long, global = true)]
    batch_size: Option<usize>,

    /// Run ledger file (JSON Lines)
    #[arg(long, global = true, value_name = "FILE")]
    ledger: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

/// Flags shared by single-run commands
#[derive(ClapArgs, Debug)]
struct RunArgs {
    /// Sample budget
    #[arg(short = 'n', long)]
    samples: Option<usize>,

    /// Use antithetic variates
    #[arg(short, long)]
    antithetic: bool,

    /// Seed for a reproducible run
    #[arg(short, long)]
    seed: Option<u64>,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Table)]
    format: OutputFormat,

    /// Do not append the run to the ledger
    #[arg(long)]
    no_record: bool,
}

impl From<&RunArgs> for SimulateOptions {
    fn from(args: &RunArgs) -> Self {
        SimulateOptions {
            samples: args.samples,
            antithetic: args.antithetic,
            seed: args.seed,
            format: args.format,
            record: !args.no_record,
        }
    }
}

/// Option contract overrides
#[derive(ClapArgs, Debug)]
struct ContractArgs {
    /// Initial underlying price
    #[arg(long)]
    spot: Option<f64>,

    /// Strike price
    #[arg(long)]
    strike: Option<f64>,

    /// Time to maturity in years
    #[arg(long)]
    time: Option<f64>,

    /// Risk-free rate
    #[arg(long)]
    rate: Option<f64>,

    /// Volatility
    #[arg(long)]
    volatility: Option<f64>,
}

impl ContractArgs {
    fn apply(&self, defaults: OptionDefaults) -> OptionDefaults {
        OptionDefaults {
            spot: self.spot.unwrap_or(defaults.spot),
            strike: self.strike.unwrap_or(defaults.strike),
            time: self.time.unwrap_or(defaults.time),
            rate: self.rate.unwrap_or(defaults.rate),
            volatility: self.volatility.unwrap_or(defaults.volatility),
        }
    }
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum ChallengeKind {
    /// π estimation
    Pi,
    /// European call with the configured contract
    Option,
}

impl ChallengeKind {
    fn to_challenge(self, config: &RunnerConfig) -> Challenge {
        match self {
            ChallengeKind::Pi => Challenge::Pi,
            ChallengeKind::Option => Challenge::OptionPrice(config.option.to_params()),
        }
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Estimate π
    Pi {
        #[command(flatten)]
        run: RunArgs,
    },

    /// Price a European call option
    Option {
        #[command(flatten)]
        contract: ContractArgs,

        #[command(flatten)]
        run: RunArgs,
    },

    /// Compare standard and antithetic sampling over repeated trials
    Compare {
        /// Challenge to compare on
        #[arg(long, value_enum, default_value_t = ChallengeKind::Option)]
        challenge: ChallengeKind,

        /// Antithetic pairs per trial (standard runs draw twice as many)
        #[arg(short = 'n', long)]
        samples: Option<usize>,

        /// Trials per technique
        #[arg(short, long, default_value_t = 20)]
        trials: usize,

        /// Seed of the first trial
        #[arg(short, long, default_value_t = 0)]
        seed: u64,

        /// Output format
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Table)]
        format: OutputFormat,
    },

    /// Show the most recent runs
    Leaderboard {
        /// Number of runs to show
        #[arg(short, long)]
        limit: Option<usize>,

        /// Output format
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Table)]
        format: OutputFormat,
    },
}

impl From<&Cli> for ConfigCliArgs {
    fn from(cli: &Cli) -> Self {
        ConfigCliArgs {
            config_file: cli.config.clone(),
            log_level: cli.log_level.clone(),
            batch_size: cli.batch_size,
            ledger: cli.ledger.clone(),
        }
    }
}

fn init_tracing(log_level: &str) {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(log_level)),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let mut config =
        build_config(&ConfigCliArgs::from(&cli)).context("Failed to load configuration")?;

    // Logs go to stderr so JSON output on stdout stays parseable
    init_tracing(config.log_level.as_filter_str());

    tracing::debug!(
        version = maze_cli::VERSION,
        log_level = %config.log_level,
        batch_size = config.batch_size,
        ledger = %config.ledger_path.display(),
        "Configuration loaded"
    );

    let stdout = io::stdout();
    let mut out = stdout.lock();

    match &cli.command {
        Commands::Pi { run } => {
            commands::simulate::run(&config, Challenge::Pi, &SimulateOptions::from(run), &mut out)
                .context("Pi estimation failed")?;
        }
        Commands::Option { contract, run } => {
            config.option = contract.apply(config.option);
            config.validate().context("Invalid option parameters")?;
            let challenge = ChallengeKind::Option.to_challenge(&config);
            commands::simulate::run(&config, challenge, &SimulateOptions::from(run), &mut out)
                .context("Option pricing failed")?;
        }
        Commands::Compare {
            challenge,
            samples,
            trials,
            seed,
            format,
        } => {
            let challenge = challenge.to_challenge(&config);
            commands::compare::run(
                &config, challenge, *samples, *trials, *seed, *format, &mut out,
            )
            .context("Comparison failed")?;
        }
        Commands::Leaderboard { limit, format } => {
            commands::leaderboard::run(&config, *limit, *format, &mut out)
                .context("Failed to read the leaderboard")?;
        }
    }

    Ok(())
}
