//! Config validation
//!
//! Rules:
//! - organization is a safe file stem (it names the snapshot file)
//! - destination names are unique and safe file stems (they name history files)
//! - batch_limit >= 1
//! - webhook URLs are http(s)
//! - filter pattern compiles
//! - request_timeout_secs > 0

use std::collections::HashSet;

use contracts::{is_safe_file_stem, ContractError, WatchConfig};
use regex::RegexBuilder;

/// Validate a WatchConfig
///
/// Returns the first error encountered, or Ok(()).
pub fn validate(config: &WatchConfig) -> Result<(), ContractError> {
    validate_organization(config)?;
    validate_pattern(config)?;
    validate_timeout(config)?;
    validate_destinations(config)?;
    Ok(())
}

fn validate_organization(config: &WatchConfig) -> Result<(), ContractError> {
    if !is_safe_file_stem(&config.organization) {
        return Err(ContractError::config_validation(
            "organization",
            format!(
                "organization '{}' must be non-empty and use only [A-Za-z0-9._-]",
                config.organization
            ),
        ));
    }
    Ok(())
}

fn validate_pattern(config: &WatchConfig) -> Result<(), ContractError> {
    if let Some(pattern) = &config.pattern {
        RegexBuilder::new(pattern)
            .case_insensitive(true)
            .build()
            .map_err(|e| ContractError::InvalidPattern {
                pattern: pattern.clone(),
                message: e.to_string(),
            })?;
    }
    Ok(())
}

fn validate_timeout(config: &WatchConfig) -> Result<(), ContractError> {
    if config.request_timeout_secs == 0 {
        return Err(ContractError::config_validation(
            "request_timeout_secs",
            "request_timeout_secs must be > 0",
        ));
    }
    Ok(())
}

fn validate_destinations(config: &WatchConfig) -> Result<(), ContractError> {
    let mut seen = HashSet::new();
    for (idx, dest) in config.destinations.iter().enumerate() {
        let name = dest.name();
        if !is_safe_file_stem(name) {
            return Err(ContractError::config_validation(
                format!("destinations[{idx}].name"),
                format!("destination name '{name}' must use only [A-Za-z0-9._-]"),
            ));
        }
        if !seen.insert(name) {
            return Err(ContractError::config_validation(
                format!("destinations[{idx}].name"),
                format!("duplicate destination name '{name}'"),
            ));
        }
        if dest.batch_limit == Some(0) {
            return Err(ContractError::config_validation(
                format!("destinations[{idx}].batch_limit"),
                "batch_limit must be >= 1",
            ));
        }
        if let Some(url) = dest.webhook_url.as_deref().filter(|u| !u.is_empty()) {
            if !(url.starts_with("https://") || url.starts_with("http://")) {
                return Err(ContractError::config_validation(
                    format!("destinations[{idx}].webhook_url"),
                    "webhook_url must start with http:// or https://",
                ));
            }
        }
    }
    Ok(())
}
