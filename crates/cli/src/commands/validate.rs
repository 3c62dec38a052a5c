//! `validate` command implementation.

use anyhow::{Context, Result};
use contracts::{DestinationKind, WatchConfig};
use serde::Serialize;
use tracing::info;

use crate::cli::ValidateArgs;

/// Validation result for JSON output
#[derive(Serialize)]
struct ValidationResult {
    valid: bool,
    config_path: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    warnings: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    summary: Option<ConfigSummary>,
}

#[derive(Serialize)]
struct ConfigSummary {
    organization: String,
    pattern: Option<String>,
    query: Option<String>,
    storage_dir: String,
    destinations: Vec<DestinationSummary>,
}

#[derive(Serialize)]
struct DestinationSummary {
    name: String,
    kind: DestinationKind,
    enabled: bool,
    batch_limit: Option<usize>,
    uses_history: bool,
}

/// Execute the `validate` command
pub fn run_validate(args: &ValidateArgs) -> Result<()> {
    info!(config = %args.config.display(), "Validating configuration");

    let result = validate_config(args);

    if args.json {
        let json = serde_json::to_string_pretty(&result)
            .context("Failed to serialize validation result")?;
        println!("{}", json);
    } else {
        print_validation_result(&result);
    }

    if result.valid {
        Ok(())
    } else {
        anyhow::bail!("Configuration validation failed")
    }
}

fn validate_config(args: &ValidateArgs) -> ValidationResult {
    let config_path = args.config.display().to_string();

    if !args.config.exists() {
        return ValidationResult {
            valid: false,
            config_path,
            error: Some(format!("File not found: {}", args.config.display())),
            warnings: None,
            summary: None,
        };
    }

    match config_loader::ConfigLoader::load_from_path(&args.config) {
        Ok(config) => {
            let warnings = collect_warnings(&config);
            ValidationResult {
                valid: true,
                config_path,
                error: None,
                warnings: (!warnings.is_empty()).then_some(warnings),
                summary: Some(summarize(&config)),
            }
        }
        Err(e) => ValidationResult {
            valid: false,
            config_path,
            error: Some(e.to_string()),
            warnings: None,
            summary: None,
        },
    }
}

fn summarize(config: &WatchConfig) -> ConfigSummary {
    ConfigSummary {
        organization: config.organization.clone(),
        pattern: config.pattern.clone(),
        query: config.query.clone(),
        storage_dir: config.storage_dir.display().to_string(),
        destinations: config
            .destinations
            .iter()
            .map(|d| {
                let policy = d.policy();
                DestinationSummary {
                    name: d.name().to_string(),
                    kind: d.kind,
                    enabled: d.is_enabled(),
                    batch_limit: policy.batch_limit,
                    uses_history: policy.uses_history,
                }
            })
            .collect(),
    }
}

/// Collect configuration warnings (non-fatal issues)
fn collect_warnings(config: &WatchConfig) -> Vec<String> {
    let mut warnings = Vec::new();

    if config.destinations.is_empty() {
        warnings.push(
            "No destinations configured - webhooks must come from flags or environment"
                .to_string(),
        );
    }

    for dest in &config.destinations {
        if !dest.is_enabled() {
            warnings.push(format!(
                "Destination '{}' has no webhook_url and will be skipped unless one is supplied",
                dest.name()
            ));
        }

        let vendor_max = dest.kind.default_policy().batch_limit;
        if let (Some(limit), Some(max)) = (dest.batch_limit, vendor_max) {
            if limit > max {
                warnings.push(format!(
                    "Destination '{}' batch_limit {} exceeds the {} per-message maximum of {}",
                    dest.name(),
                    limit,
                    dest.kind.as_str(),
                    max
                ));
            }
        }
    }

    warnings
}

fn print_validation_result(result: &ValidationResult) {
    if result.valid {
        println!("✓ Configuration is valid: {}", result.config_path);

        if let Some(ref summary) = result.summary {
            println!("\n  Organization: {}", summary.organization);
            if let Some(ref pattern) = summary.pattern {
                println!("  Pattern: {}", pattern);
            }
            if let Some(ref query) = summary.query {
                println!("  Query: {}", query);
            }
            println!("  Storage: {}", summary.storage_dir);
            println!("  Destinations: {}", summary.destinations.len());
            for dest in &summary.destinations {
                let limit = dest
                    .batch_limit
                    .map_or_else(|| "unbounded".to_string(), |n| n.to_string());
                println!(
                    "    - {} ({}, batch {}, history {}{})",
                    dest.name,
                    dest.kind.as_str(),
                    limit,
                    if dest.uses_history { "on" } else { "off" },
                    if dest.enabled { "" } else { ", disabled" }
                );
            }
        }

        if let Some(ref warnings) = result.warnings {
            println!("\n⚠ Warnings:");
            for warning in warnings {
                println!("  - {}", warning);
            }
        }
    } else {
        println!("✗ Configuration is invalid: {}", result.config_path);
        if let Some(ref error) = result.error {
            println!("\n  Error: {}", error);
        }
    }
}
