//! Dispatcher error types

use contracts::{BatchRange, ContractError};
use thiserror::Error;

/// Dispatcher-specific errors
///
/// Always scoped to a single destination; siblings keep running.
#[derive(Debug, Error)]
pub enum DispatcherError {
    /// Destination creation error
    #[error("failed to create destination '{name}': {message}")]
    DestinationCreation { name: String, message: String },

    /// A batch was rejected or never reached the destination
    #[error(
        "delivery to '{destination}' failed at batch {}: {source} ({sent_before_failure} posting(s) sent before the failure)",
        .range.map(|r| r.to_string()).unwrap_or_else(|| "1".to_string())
    )]
    Delivery {
        destination: String,
        range: Option<BatchRange>,
        sent_before_failure: usize,
        #[source]
        source: ContractError,
    },

    /// Messages went out but the history could not be updated
    #[error("delivered to '{destination}' but history update failed: {source}")]
    History {
        destination: String,
        #[source]
        source: ContractError,
    },
}

impl DispatcherError {
    /// Create a destination creation error
    pub fn destination_creation(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::DestinationCreation {
            name: name.into(),
            message: message.into(),
        }
    }

    /// Destination the error belongs to
    pub fn destination(&self) -> &str {
        match self {
            Self::DestinationCreation { name, .. } => name,
            Self::Delivery { destination, .. } | Self::History { destination, .. } => destination,
        }
    }
}
