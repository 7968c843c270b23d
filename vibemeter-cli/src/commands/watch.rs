//! Watch command - follow a snapshot file through a live `MeterStore`.
//!
//! The snapshot is re-read on every tick and committed to the store. Only
//! changes the store actually publishes are printed, so small spending
//! movements absorbed by the gauge hysteresis produce no output.

use anyhow::Result;
use clap::Args;
use std::sync::Arc;
use tokio::time::{Duration, interval};
use tracing::{info, warn};
use vibemeter_core::{DisplayState, StatusObserver, StatusSummary};
use vibemeter_store::MeterStore;

use super::{MeterContext, SnapshotArgs, load_snapshot};
use crate::output::{JsonFormatter, TextFormatter};
use crate::{Cli, OutputFormat};

/// Arguments for watch command.
#[derive(Args)]
pub struct WatchArgs {
    /// Reload interval in seconds.
    #[arg(long, short, default_value = "30")]
    pub interval: u64,

    /// Minimum interval to use.
    #[arg(long, default_value = "1")]
    pub min_interval: u64,

    #[command(flatten)]
    pub snapshot: SnapshotArgs,
}

// ============================================================================
// Printing Observer
// ============================================================================

/// Prints every published change to stdout.
struct PrintingObserver {
    format: OutputFormat,
    text: TextFormatter,
    json: JsonFormatter,
}

impl PrintingObserver {
    fn timestamp() -> String {
        chrono::Local::now().format("%H:%M:%S").to_string()
    }
}

impl StatusObserver for PrintingObserver {
    fn on_display_state_changed(&self, state: DisplayState) {
        match self.format {
            OutputFormat::Text => {
                println!("[{}] {}", Self::timestamp(), self.text.format_state(state, None));
            }
            OutputFormat::Json => match self.json.format(&serde_json::json!({ "display": state })) {
                Ok(line) => println!("{line}"),
                Err(e) => warn!(error = %e, "Failed to encode display state"),
            },
        }
    }

    fn on_summary_changed(&self, summary: &StatusSummary) {
        match self.format {
            OutputFormat::Text => {
                println!("[{}] Summary:", Self::timestamp());
                println!("{}", self.text.format_summary(summary));
                println!();
            }
            OutputFormat::Json => match self.json.format(&serde_json::json!({ "summary": summary })) {
                Ok(line) => println!("{line}"),
                Err(e) => warn!(error = %e, "Failed to encode summary"),
            },
        }
    }
}

// ============================================================================
// Watch Loop
// ============================================================================

/// Runs the watch command until interrupted.
pub async fn run(args: &WatchArgs, cli: &Cli) -> Result<()> {
    let ctx = MeterContext::load(cli)?;
    let refresh_interval = args.interval.max(args.min_interval).max(1);
    let path = args.snapshot.path();

    info!(interval = refresh_interval, path = %path.display(), "Starting watch mode");

    let store = MeterStore::with_builder(ctx.settings.clone(), ctx.builder())
        .with_rates_max_age(ctx.config.rates_max_age());
    store
        .add_observer(Arc::new(PrintingObserver {
            format: cli.format,
            text: TextFormatter::new(!cli.no_color),
            json: JsonFormatter::new(cli.pretty),
        }))
        .await;

    if cli.format == OutputFormat::Text {
        println!(
            "VibeMeter Watch Mode - {} (reload: {}s, Ctrl+C to exit)",
            path.display(),
            refresh_interval
        );
        println!("{}", "─".repeat(50));
    }

    let mut ticker = interval(Duration::from_secs(refresh_interval));

    loop {
        tokio::select! {
            _ = ticker.tick() => {}
            _ = tokio::signal::ctrl_c() => {
                info!("Stopping watch mode");
                return Ok(());
            }
        }

        match load_snapshot(&path).await {
            Ok(snapshot) => {
                if let Some(rates) = &snapshot.rates {
                    if rates.is_stale(ctx.config.rates_max_age(), chrono::Utc::now()) {
                        warn!(as_of = %rates.as_of, "Exchange rates are stale");
                    }
                }
                store.replace_snapshot(snapshot).await;
            }
            Err(e) => warn!(error = %e, "Skipping reload"),
        }
    }
}
