//! Error types for CLI operations.

use thiserror::Error;

/// CLI-specific error types
#[derive(Error, Debug)]
pub enum CliError {
    /// Neither a positional organization nor a config file was given
    #[error("No organization given: pass COMPANY_ID or --config")]
    MissingOrganization,

    /// Configuration file not found
    #[error("Configuration file not found: {path}")]
    ConfigNotFound { path: String },

    /// One or more destinations failed; the others were still attempted
    #[error("Delivery failed for destination(s): {}", .destinations.join(", "))]
    DestinationsFailed { destinations: Vec<String> },
}

impl CliError {
    pub fn config_not_found(path: impl Into<String>) -> Self {
        Self::ConfigNotFound { path: path.into() }
    }

    pub fn destinations_failed(destinations: Vec<String>) -> Self {
        Self::DestinationsFailed { destinations }
    }
}
