//! Layered error definitions
//!
//! Categorized by source: config / fetch / storage / delivery

use thiserror::Error;

/// Unified error type
#[derive(Debug, Error)]
pub enum ContractError {
    // ===== Configuration Errors =====
    /// Configuration parse error
    #[error("config parse error: {message}")]
    ConfigParse {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Configuration validation error
    #[error("config validation error at '{field}': {message}")]
    ConfigValidation { field: String, message: String },

    /// Filter pattern does not compile
    #[error("invalid filter pattern '{pattern}': {message}")]
    InvalidPattern { pattern: String, message: String },

    // ===== Fetch Errors =====
    /// Network or decode failure talking to the postings API
    #[error("fetch failed for organization '{organization}': {message}")]
    Fetch {
        organization: String,
        message: String,
    },

    /// Postings API answered with a non-success status
    #[error("postings API returned {status} for organization '{organization}': {body}")]
    UpstreamStatus {
        organization: String,
        status: u16,
        body: String,
    },

    // ===== Storage Errors =====
    /// Snapshot or history file could not be read or written
    #[error("storage {operation} failed for '{path}': {message}")]
    Storage {
        operation: &'static str,
        path: String,
        message: String,
    },

    /// Snapshot file exists but does not hold a snapshot
    #[error("snapshot for organization '{organization}' at '{path}' is corrupt: {message}")]
    CorruptSnapshot {
        organization: String,
        path: String,
        message: String,
    },

    // ===== Delivery Errors =====
    /// Webhook transport failure (connect, timeout, TLS)
    #[error("destination '{destination}' transport error: {message}")]
    Transport {
        destination: String,
        message: String,
    },

    /// Webhook answered with a non-success status
    #[error("destination '{destination}' rejected message with {status}: {body}")]
    WebhookStatus {
        destination: String,
        status: u16,
        body: String,
    },
}

impl ContractError {
    /// Create configuration parse error
    pub fn config_parse(message: impl Into<String>) -> Self {
        Self::ConfigParse {
            message: message.into(),
            source: None,
        }
    }

    /// Create configuration validation error
    pub fn config_validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ConfigValidation {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Create fetch error
    pub fn fetch(organization: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Fetch {
            organization: organization.into(),
            message: message.into(),
        }
    }

    /// Create storage error
    pub fn storage(
        operation: &'static str,
        path: impl AsRef<std::path::Path>,
        message: impl Into<String>,
    ) -> Self {
        Self::Storage {
            operation,
            path: path.as_ref().display().to_string(),
            message: message.into(),
        }
    }

    /// Create transport error
    pub fn transport(destination: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Transport {
            destination: destination.into(),
            message: message.into(),
        }
    }
}
