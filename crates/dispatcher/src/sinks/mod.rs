//! Sink implementations
//!
//! Contains SlackSink, DiscordSink, LogSink, and MemorySink, plus the
//! config-built `Destination` that wraps the first three.

mod discord;
mod log;
mod memory;
mod slack;

pub use self::discord::DiscordSink;
pub use self::log::LogSink;
pub use self::memory::MemorySink;
pub use self::slack::SlackSink;

use std::time::Duration;

use contracts::{
    ContractError, DeliveryPolicy, DestinationConfig, DestinationKind, NotificationBatch, Notifier,
};
use serde_json::Value;

use crate::error::DispatcherError;
use crate::webhook::WebhookClient;

/// A configured destination
pub enum Destination {
    Slack(SlackSink),
    Discord(DiscordSink),
    Log(LogSink),
}

impl Destination {
    /// Build a destination from configuration
    ///
    /// Returns `Ok(None)` for a webhook destination without a URL.
    pub fn from_config(
        config: &DestinationConfig,
        timeout: Duration,
    ) -> Result<Option<Self>, DispatcherError> {
        if !config.is_enabled() {
            return Ok(None);
        }

        let name = config.name();
        let policy = config.policy();

        let destination = match config.kind {
            DestinationKind::Log => Self::Log(LogSink::with_policy(name, policy)),
            DestinationKind::Slack => {
                Self::Slack(SlackSink::new(name, policy, webhook_client(config, timeout)?))
            }
            DestinationKind::Discord => {
                Self::Discord(DiscordSink::new(name, policy, webhook_client(config, timeout)?))
            }
        };
        Ok(Some(destination))
    }

    pub fn kind(&self) -> DestinationKind {
        match self {
            Self::Slack(_) => DestinationKind::Slack,
            Self::Discord(_) => DestinationKind::Discord,
            Self::Log(_) => DestinationKind::Log,
        }
    }
}

fn webhook_client(
    config: &DestinationConfig,
    timeout: Duration,
) -> Result<WebhookClient, DispatcherError> {
    let url = config.webhook_url.as_deref().unwrap_or_default();
    WebhookClient::new(url, timeout)
        .map_err(|e| DispatcherError::destination_creation(config.name(), e.to_string()))
}

impl Notifier for Destination {
    fn name(&self) -> &str {
        match self {
            Self::Slack(s) => s.name(),
            Self::Discord(s) => s.name(),
            Self::Log(s) => s.name(),
        }
    }

    fn policy(&self) -> DeliveryPolicy {
        match self {
            Self::Slack(s) => s.policy(),
            Self::Discord(s) => s.policy(),
            Self::Log(s) => s.policy(),
        }
    }

    fn render(&self, batch: &NotificationBatch<'_>) -> Value {
        match self {
            Self::Slack(s) => s.render(batch),
            Self::Discord(s) => s.render(batch),
            Self::Log(s) => s.render(batch),
        }
    }

    async fn send(&mut self, payload: &Value) -> Result<(), ContractError> {
        match self {
            Self::Slack(s) => s.send(payload).await,
            Self::Discord(s) => s.send(payload).await,
            Self::Log(s) => s.send(payload).await,
        }
    }
}
