//! Command implementations.

mod history;
mod list;
mod validate;
mod watch;

pub use history::run_history;
pub use list::run_list;
pub use validate::run_validate;
pub use watch::run_watch;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use config_loader::ConfigLoader;
use contracts::WatchConfig;
use tracing::info;

use crate::cli::SourceArgs;
use crate::error::CliError;

/// Build the base config: file values first, then positional/flag overrides
///
/// Not validated yet; callers apply their own overrides and then validate.
pub(crate) fn resolve_source(args: &SourceArgs) -> Result<WatchConfig> {
    let mut config = match &args.config {
        Some(path) => {
            if !path.exists() {
                return Err(CliError::config_not_found(path.display().to_string()).into());
            }
            info!(config = %path.display(), "Loading configuration");
            ConfigLoader::load_from_path(path)
                .with_context(|| format!("Failed to load config from {}", path.display()))?
        }
        None => {
            let organization = args
                .company_id
                .as_deref()
                .ok_or(CliError::MissingOrganization)?;
            WatchConfig::for_organization(organization)
        }
    };

    if let Some(company_id) = &args.company_id {
        config.organization = company_id.clone();
    }
    if let Some(pattern) = &args.pattern {
        config.pattern = Some(pattern.clone());
    }
    if let Some(query) = &args.query {
        config.query = Some(query.clone());
    }

    Ok(config)
}

/// Expand a leading `~` in a storage path
pub(crate) fn expand_storage(path: &Path) -> PathBuf {
    PathBuf::from(shellexpand::tilde(&path.to_string_lossy()).into_owned())
}

/// Validate the final merged config
pub(crate) fn finalize(config: WatchConfig) -> Result<WatchConfig> {
    ConfigLoader::validate(&config).context("Invalid configuration")?;
    Ok(config)
}
