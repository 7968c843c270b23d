//! Convert command - USD amount in another currency.

use anyhow::Result;
use clap::Args;
use tracing::{info, warn};
use vibemeter_core::format_money;

use super::{MeterContext, SnapshotArgs};
use crate::output::{JsonFormatter, TextFormatter};
use crate::{Cli, OutputFormat};

/// Arguments for convert command.
#[derive(Args)]
pub struct ConvertArgs {
    /// Amount in US dollars.
    #[arg(allow_negative_numbers = true)]
    pub amount: f64,

    /// Target currency (defaults to the display currency).
    #[arg(long, short)]
    pub to: Option<String>,

    #[command(flatten)]
    pub snapshot: SnapshotArgs,
}

/// Runs the convert command.
pub async fn run(args: &ConvertArgs, cli: &Cli) -> Result<()> {
    if !args.amount.is_finite() {
        anyhow::bail!("Amount must be a finite number: {}", args.amount);
    }

    let ctx = MeterContext::load(cli)?;
    let snapshot = args.snapshot.load().await?;

    let currency = args
        .to
        .as_deref()
        .unwrap_or(&ctx.settings.selected_currency_code)
        .trim()
        .to_ascii_uppercase();

    let converted = format_money(args.amount, &currency, snapshot.rates.as_ref());
    if converted.fell_back {
        warn!(currency = %currency, "No exchange rate, showing USD");
    } else {
        info!(currency = %currency, amount = args.amount, "Converted amount");
    }

    match cli.format {
        OutputFormat::Text => {
            let formatter = TextFormatter::new(!cli.no_color);
            println!("{}", formatter.format_conversion(args.amount, &converted));
        }
        OutputFormat::Json => {
            let formatter = JsonFormatter::new(cli.pretty);
            println!("{}", formatter.format_conversion(args.amount, &currency, &converted)?);
        }
    }

    Ok(())
}
