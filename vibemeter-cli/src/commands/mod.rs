//! CLI command implementations.

pub mod convert;
pub mod providers;
pub mod state;
pub mod summary;
pub mod watch;

use clap::Args;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;
use vibemeter_core::{MeterSettings, StatusSummaryBuilder};
use vibemeter_store::{MeterConfig, MeterSnapshot, StoreError, default_config_dir};

use crate::Cli;

/// File name of the snapshot read when `--snapshot` is not given.
const DEFAULT_SNAPSHOT_FILE: &str = "snapshot.json";

/// Failures mapped to dedicated exit codes.
#[derive(Debug, Error)]
pub enum CommandError {
    /// Config file unreadable or settings invalid.
    #[error("Invalid configuration")]
    Config(#[source] StoreError),

    /// Snapshot file unreadable or malformed.
    #[error("Cannot read snapshot {}", path.display())]
    Snapshot {
        /// Path that was read.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: StoreError,
    },
}

/// Arguments shared by commands that read a snapshot.
#[derive(Args, Default)]
pub struct SnapshotArgs {
    /// Snapshot JSON file (defaults to snapshot.json in the config directory).
    #[arg(long, short)]
    pub snapshot: Option<PathBuf>,
}

impl SnapshotArgs {
    /// Returns the snapshot path to read.
    pub fn path(&self) -> PathBuf {
        self.snapshot
            .clone()
            .unwrap_or_else(|| default_config_dir().join(DEFAULT_SNAPSHOT_FILE))
    }

    /// Loads the snapshot.
    pub async fn load(&self) -> Result<MeterSnapshot, CommandError> {
        load_snapshot(&self.path()).await
    }
}

/// Loads a snapshot, tagging failures with the path.
pub async fn load_snapshot(path: &Path) -> Result<MeterSnapshot, CommandError> {
    MeterSnapshot::load(path)
        .await
        .map_err(|source| CommandError::Snapshot {
            path: path.to_path_buf(),
            source,
        })
}

// ============================================================================
// Settings Resolution
// ============================================================================

/// Configuration plus the settings derived from it and the CLI flags.
pub struct MeterContext {
    /// Loaded configuration, overrides applied.
    pub config: MeterConfig,
    /// Validated settings.
    pub settings: MeterSettings,
}

impl MeterContext {
    /// Loads the config file and applies the global flags.
    pub fn load(cli: &Cli) -> Result<Self, CommandError> {
        let mut config = match &cli.config {
            Some(path) => MeterConfig::load_from(path),
            None => MeterConfig::load(),
        }
        .map_err(CommandError::Config)?;

        apply_overrides(
            &mut config,
            cli.currency.as_deref(),
            cli.upper_limit,
            cli.warning_limit,
        );
        let settings = config.to_settings().map_err(CommandError::Config)?;

        debug!(
            currency = %settings.selected_currency_code,
            upper_limit = settings.upper_limit_usd,
            warning_limit = settings.warning_limit_usd,
            "Resolved settings"
        );
        Ok(Self { config, settings })
    }

    /// Summary builder configured from the config file.
    pub fn builder(&self) -> StatusSummaryBuilder {
        StatusSummaryBuilder::new().with_max_invoice_items(self.config.general.max_invoice_items)
    }
}

/// Overwrites config values with any flags given on the command line.
pub fn apply_overrides(
    config: &mut MeterConfig,
    currency: Option<&str>,
    upper_limit: Option<f64>,
    warning_limit: Option<f64>,
) {
    if let Some(currency) = currency {
        config.spending.currency = currency.to_string();
    }
    if let Some(upper) = upper_limit {
        config.spending.upper_limit_usd = upper;
    }
    if let Some(warning) = warning_limit {
        config.spending.warning_limit_usd = warning;
    }
}
