// Lint configuration for this crate
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

//! `VibeMeter` CLI - AI spending display state from the command line.
//!
//! Reads a provider snapshot (sessions, spending records, refresh flags and
//! exchange rates) and prints what the status bar would show.
//!
//! # Examples
//!
//! ```bash
//! # Menu text for the default snapshot
//! vibemeter
//!
//! # Display state with a gauge bar
//! vibemeter state --snapshot snapshot.json
//!
//! # Summary in euros, JSON output
//! vibemeter --currency EUR summary --format json --pretty
//!
//! # Convert a USD amount with the snapshot's rates
//! vibemeter convert 42.5 --to GBP
//!
//! # Follow a snapshot file as it is rewritten
//! vibemeter watch --interval 5
//! ```

mod commands;
mod output;

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use tracing_subscriber::{EnvFilter, filter::LevelFilter, fmt, prelude::*};
use vibemeter_store::{GeneralConfig, MeterConfig};

use commands::{convert, providers, state, summary, watch};

// ============================================================================
// CLI Definition
// ============================================================================

/// `VibeMeter` CLI - AI spending display state.
#[derive(Parser)]
#[command(name = "vibemeter")]
#[command(about = "AI spending meter CLI")]
#[command(long_about = r#"
VibeMeter aggregates spending across AI providers and derives the status bar
display state and menu text from a snapshot of provider data.

Supported providers:
  • Cursor (cursor)
  • Claude (claude)

Examples:
  vibemeter                          # Summary for the default snapshot
  vibemeter state -s snapshot.json   # Display state and gauge
  vibemeter --currency EUR summary   # Menu text in euros
  vibemeter convert 42.5 --to GBP    # Convert a USD amount
"#)]
#[command(version)]
#[command(author = "VibeMeter Contributors")]
pub struct Cli {
    /// Subcommand to run. If none, runs 'summary' by default.
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Configuration file (defaults to the platform config directory).
    #[arg(long, short, global = true)]
    pub config: Option<PathBuf>,

    /// Output format (text or json).
    #[arg(long, short = 'f', default_value = "text", global = true)]
    pub format: OutputFormat,

    /// Pretty-print JSON output.
    #[arg(long, global = true)]
    pub pretty: bool,

    /// Display currency, overriding the config file.
    #[arg(long, global = true)]
    pub currency: Option<String>,

    /// Upper spending limit in USD, overriding the config file.
    #[arg(long, global = true)]
    pub upper_limit: Option<f64>,

    /// Warning limit in USD, overriding the config file.
    #[arg(long, global = true)]
    pub warning_limit: Option<f64>,

    /// Verbose output (show debug info).
    #[arg(long, short, global = true)]
    pub verbose: bool,

    /// Disable colored output.
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Quiet mode (minimal output).
    #[arg(long, short, global = true)]
    pub quiet: bool,
}

/// CLI commands.
#[derive(Subcommand)]
pub enum Commands {
    /// Show the display state and gauge.
    #[command(visible_alias = "st")]
    State(commands::SnapshotArgs),

    /// Show the menu text (default if no command specified).
    #[command(visible_alias = "s")]
    Summary(commands::SnapshotArgs),

    /// Convert a USD amount into the display currency.
    #[command(visible_alias = "c")]
    Convert(convert::ConvertArgs),

    /// List supported providers.
    #[command(visible_alias = "p")]
    Providers(commands::SnapshotArgs),

    /// Reload a snapshot periodically and print published changes.
    #[command(visible_alias = "w")]
    Watch(watch::WatchArgs),
}

/// Output format options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Default)]
pub enum OutputFormat {
    /// Human-readable text with colors.
    #[default]
    Text,
    /// JSON output for scripting.
    Json,
}

/// CLI exit codes.
#[repr(i32)]
pub enum ExitCode {
    /// Success.
    Success = 0,
    /// General error.
    Error = 1,
    /// Configuration could not be loaded or is invalid.
    ConfigError = 2,
    /// Snapshot could not be read or parsed.
    SnapshotError = 3,
}

impl ExitCode {
    fn for_error(error: &anyhow::Error) -> Self {
        match error.downcast_ref::<commands::CommandError>() {
            Some(commands::CommandError::Config(_)) => Self::ConfigError,
            Some(commands::CommandError::Snapshot { .. }) => Self::SnapshotError,
            None => Self::Error,
        }
    }
}

// ============================================================================
// Logging Setup
// ============================================================================

/// Filter used when the configured level is not a valid level.
const FALLBACK_FILTER: &str = "vibemeter=warn";

/// Builds the filter directive from `--verbose` and the configured level.
fn filter_directive(verbose: bool, config_level: &str) -> String {
    if verbose {
        return "vibemeter=debug,info".to_string();
    }

    let level = config_level.trim().to_ascii_lowercase();
    match level.parse::<LevelFilter>() {
        Ok(_) => format!("vibemeter={level}"),
        Err(_) => FALLBACK_FILTER.to_string(),
    }
}

/// Reads the log level from the config file; the command reports load
/// errors itself, so they are ignored here.
fn configured_log_level(cli: &Cli) -> String {
    let config = match &cli.config {
        Some(path) => MeterConfig::load_from(path),
        None => MeterConfig::load(),
    };
    config.map_or_else(
        |_| GeneralConfig::default().log_level,
        |c| c.general.log_level,
    )
}

fn setup_logging(verbose: bool, quiet: bool, config_level: &str) {
    if quiet {
        return;
    }

    let filter = EnvFilter::try_new(filter_directive(verbose, config_level))
        .unwrap_or_else(|_| EnvFilter::new(FALLBACK_FILTER));

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_target(false)
                .without_time()
                .with_writer(std::io::stderr),
        )
        .with(filter)
        .init();
}

// ============================================================================
// Main Entry Point
// ============================================================================

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet, &configured_log_level(&cli));

    let result = match &cli.command {
        Some(Commands::State(args)) => state::run(args, &cli).await,
        Some(Commands::Summary(args)) => summary::run(args, &cli).await,
        Some(Commands::Convert(args)) => convert::run(args, &cli).await,
        Some(Commands::Providers(args)) => providers::run(args, &cli).await,
        Some(Commands::Watch(args)) => watch::run(args, &cli).await,
        None => summary::run(&commands::SnapshotArgs::default(), &cli).await,
    };

    if let Err(e) = result {
        if !cli.quiet {
            eprintln!("Error: {e:#}");
        }
        std::process::exit(ExitCode::for_error(&e) as i32);
    }

    std::process::exit(ExitCode::Success as i32);
}
