//! `history` command implementation.

use std::path::PathBuf;

use anyhow::{Context, Result};
use config_loader::ConfigLoader;
use state_store::{DeliveryHistory, HistoryFile};
use tracing::debug;

use super::expand_storage;
use crate::cli::{HistoryAction, HistoryArgs};
use crate::error::CliError;

/// Execute the `history` command
pub fn run_history(args: &HistoryArgs) -> Result<()> {
    let storage = resolve_storage(args)?;
    debug!(storage = %storage.display(), "History storage resolved");
    let history = DeliveryHistory::new(storage);

    match &args.action {
        HistoryAction::Show { destination, json } => {
            let sent_ids = history.delivered_ids(destination);
            if *json {
                let json = serde_json::to_string_pretty(&HistoryFile { sent_ids })
                    .context("Failed to serialize history")?;
                println!("{json}");
            } else {
                println!(
                    "{} delivered posting(s) for '{}' ({})",
                    sent_ids.len(),
                    destination,
                    history.history_path(destination).display()
                );
                for id in &sent_ids {
                    println!("  {id}");
                }
            }
        }
        HistoryAction::Reset { destination } => {
            let existed = history
                .reset(destination)
                .with_context(|| format!("Failed to reset history for '{destination}'"))?;
            if existed {
                println!("History for '{destination}' cleared.");
            } else {
                println!("No history recorded for '{destination}'.");
            }
        }
    }

    Ok(())
}

/// `--storage`, else the config file's `storage_dir`, else the default
fn resolve_storage(args: &HistoryArgs) -> Result<PathBuf> {
    let storage = match (&args.storage, &args.config) {
        (Some(storage), _) => storage.clone(),
        (None, Some(path)) => {
            if !path.exists() {
                return Err(CliError::config_not_found(path.display().to_string()).into());
            }
            ConfigLoader::load_from_path(path)
                .with_context(|| format!("Failed to load config from {}", path.display()))?
                .storage_dir
        }
        (None, None) => PathBuf::from(contracts::DEFAULT_STORAGE_DIR),
    };
    Ok(expand_storage(&storage))
}
