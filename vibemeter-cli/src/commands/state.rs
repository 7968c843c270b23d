//! State command - display state and gauge for a snapshot.

use anyhow::Result;
use tracing::info;
use vibemeter_core::format_money;

use super::{MeterContext, SnapshotArgs};
use crate::output::{JsonFormatter, TextFormatter};
use crate::{Cli, OutputFormat};

/// Runs the state command.
pub async fn run(args: &SnapshotArgs, cli: &Cli) -> Result<()> {
    let ctx = MeterContext::load(cli)?;
    let snapshot = args.load().await?;

    let totals = snapshot.aggregate();
    let state = snapshot.display_state(&ctx.settings);
    info!(state = %state, total_cents = totals.total_usd_cents, "Derived display state");

    let spending = totals.total_usd_if_known().map(|usd| {
        format_money(usd, &ctx.settings.selected_currency_code, snapshot.rates.as_ref())
    });

    match cli.format {
        OutputFormat::Text => {
            let formatter = TextFormatter::new(!cli.no_color);
            println!("{}", formatter.format_state(state, spending.as_ref()));
        }
        OutputFormat::Json => {
            let formatter = JsonFormatter::new(cli.pretty);
            let output = formatter.format_state(
                state,
                &totals,
                ctx.settings.upper_limit_usd,
                spending.as_ref(),
            )?;
            println!("{output}");
        }
    }

    Ok(())
}
