//! LogSink - logs notifications via tracing

use contracts::{ContractError, DeliveryPolicy, DestinationKind, NotificationBatch, Notifier};
use serde_json::{json, Value};
use tracing::{info, instrument};

/// Sink that writes notifications to the log, for dry runs and debugging
pub struct LogSink {
    name: String,
    policy: DeliveryPolicy,
}

impl LogSink {
    /// Create a new LogSink with the given name and default policy
    pub fn new(name: impl Into<String>) -> Self {
        Self::with_policy(name, DestinationKind::Log.default_policy())
    }

    pub fn with_policy(name: impl Into<String>, policy: DeliveryPolicy) -> Self {
        Self {
            name: name.into(),
            policy,
        }
    }
}

impl Notifier for LogSink {
    fn name(&self) -> &str {
        &self.name
    }

    fn policy(&self) -> DeliveryPolicy {
        self.policy
    }

    fn render(&self, batch: &NotificationBatch<'_>) -> Value {
        let lines: Vec<String> = batch
            .postings
            .iter()
            .map(|p| {
                format!(
                    "[{}] {} - {} <{}>",
                    p.team_or_placeholder(),
                    p.title,
                    p.location,
                    p.apply_url
                )
            })
            .collect();
        json!({ "headline": batch.headline(), "lines": lines })
    }

    #[instrument(name = "log_sink_send", skip(self, payload), fields(sink = %self.name))]
    async fn send(&mut self, payload: &Value) -> Result<(), ContractError> {
        info!(sink = %self.name, "{}", payload["headline"].as_str().unwrap_or_default());
        if let Some(lines) = payload["lines"].as_array() {
            for line in lines {
                info!(sink = %self.name, "  {}", line.as_str().unwrap_or_default());
            }
        }
        Ok(())
    }
}
