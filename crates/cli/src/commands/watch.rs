//! `watch` command implementation.

use anyhow::Result;
use contracts::{DestinationConfig, DestinationKind};
use tracing::{info, warn};

use super::{expand_storage, finalize, resolve_source};
use crate::cli::WatchArgs;
use crate::error::CliError;
use crate::pipeline::WatchPipeline;

/// Execute the `watch` command
pub async fn run_watch(args: &WatchArgs) -> Result<()> {
    let mut config = resolve_source(&args.source)?;

    let webhooks = [
        (DestinationKind::Slack, &args.slack_webhook),
        (DestinationKind::Discord, &args.discord_webhook),
    ];
    for (kind, url) in webhooks {
        if let Some(url) = url.as_deref().filter(|u| !u.is_empty()) {
            config.set_webhook(kind, url.to_string());
        }
    }
    if args.log_notifications && config.destination_mut(DestinationKind::Log).is_none() {
        config
            .destinations
            .push(DestinationConfig::new(DestinationKind::Log));
    }
    if let Some(storage) = &args.storage {
        config.storage_dir = storage.clone();
    }
    config.storage_dir = expand_storage(&config.storage_dir);

    let config = finalize(config)?;
    let enabled = config.destinations.iter().filter(|d| d.is_enabled()).count();
    if enabled == 0 {
        warn!("No destinations configured; new postings will only be printed");
    }

    let stats = WatchPipeline::new(config).run().await?;

    if stats.new_postings == 0 {
        println!("No new jobs found.");
        return Ok(());
    }

    println!("Found {} new job(s)!", stats.new_postings);
    stats.print_summary();

    let failed = stats.failed_destinations();
    if !failed.is_empty() {
        return Err(CliError::destinations_failed(failed).into());
    }

    info!(
        messages = stats.delivery.message_count,
        already_delivered = stats.delivery.deduplicated_count,
        "Notifications sent"
    );
    Ok(())
}
