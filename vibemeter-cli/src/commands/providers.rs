//! Providers command - list supported providers.

use anyhow::Result;
use tracing::info;
use vibemeter_core::ProviderId;
use vibemeter_store::MeterSnapshot;

use super::SnapshotArgs;
use crate::output::{JsonFormatter, TextFormatter};
use crate::{Cli, OutputFormat};

/// Runs the providers command.
///
/// An explicit `--snapshot` must be readable. The default snapshot is
/// optional and lists every provider as logged out when absent.
pub async fn run(args: &SnapshotArgs, cli: &Cli) -> Result<()> {
    info!("Listing providers");

    let sessions = if args.snapshot.is_some() {
        args.load().await?.sessions
    } else {
        MeterSnapshot::load_or_default(&args.path()).await.sessions
    };

    match cli.format {
        OutputFormat::Text => {
            let formatter = TextFormatter::new(!cli.no_color);

            println!("{}", formatter.format_providers_header());
            println!("{}", "─".repeat(40));

            for &provider in ProviderId::all() {
                let session = sessions.session(provider);
                println!("{}", formatter.format_provider_line(provider, &session));
            }

            println!();
            println!(
                "Total: {} providers ({} logged in)",
                ProviderId::all().len(),
                sessions.logged_in_providers().len()
            );
        }
        OutputFormat::Json => {
            let formatter = JsonFormatter::new(cli.pretty);
            println!("{}", formatter.format_providers(&sessions)?);
        }
    }

    Ok(())
}
