//! Summary command - menu text for a snapshot.

use anyhow::Result;
use tracing::info;

use super::{MeterContext, SnapshotArgs};
use crate::output::{JsonFormatter, TextFormatter};
use crate::{Cli, OutputFormat};

/// Runs the summary command.
pub async fn run(args: &SnapshotArgs, cli: &Cli) -> Result<()> {
    let ctx = MeterContext::load(cli)?;
    let snapshot = args.load().await?;

    let summary = snapshot.summary(&ctx.builder(), &ctx.settings);
    let state = snapshot.display_state(&ctx.settings);
    info!(lines = summary.lines.len(), has_debug_section = summary.has_debug_section, "Built summary");

    match cli.format {
        OutputFormat::Text => {
            let formatter = TextFormatter::new(!cli.no_color);
            println!("{}", formatter.format_summary(&summary));
        }
        OutputFormat::Json => {
            let formatter = JsonFormatter::new(cli.pretty);
            println!("{}", formatter.format_summary(state, &summary)?);
        }
    }

    Ok(())
}
