//! SlackSink - incoming webhook with block layout

use contracts::{ContractError, DeliveryPolicy, NotificationBatch, Notifier, Posting};
use serde_json::{json, Value};
use tracing::instrument;

use crate::webhook::WebhookClient;

/// Sink that posts Block Kit messages to a Slack incoming webhook
pub struct SlackSink {
    name: String,
    policy: DeliveryPolicy,
    client: WebhookClient,
}

impl SlackSink {
    /// Create a new SlackSink
    pub fn new(name: impl Into<String>, policy: DeliveryPolicy, client: WebhookClient) -> Self {
        Self {
            name: name.into(),
            policy,
            client,
        }
    }

    fn posting_block(posting: &Posting) -> Value {
        let mut text = format!(
            "*<{}|{}>*\n📍 {} | 👥 {}",
            posting.apply_url,
            escape_mrkdwn(&posting.title),
            escape_mrkdwn(&posting.location),
            escape_mrkdwn(posting.team_or_placeholder()),
        );
        if let Some(commitment) = &posting.commitment {
            text.push_str(&format!(" | 🕒 {}", escape_mrkdwn(commitment)));
        }

        json!({
            "type": "section",
            "text": { "type": "mrkdwn", "text": text }
        })
    }
}

/// Slack control characters in mrkdwn text
fn escape_mrkdwn(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

impl Notifier for SlackSink {
    fn name(&self) -> &str {
        &self.name
    }

    fn policy(&self) -> DeliveryPolicy {
        self.policy
    }

    fn render(&self, batch: &NotificationBatch<'_>) -> Value {
        let headline = format!("🚨 {}", batch.headline());

        let mut blocks = Vec::with_capacity(batch.postings.len() + 1);
        blocks.push(json!({
            "type": "header",
            "text": { "type": "plain_text", "text": headline, "emoji": true }
        }));
        blocks.extend(batch.postings.iter().map(Self::posting_block));

        json!({ "text": headline, "blocks": blocks })
    }

    #[instrument(name = "slack_sink_send", skip(self, payload), fields(sink = %self.name))]
    async fn send(&mut self, payload: &Value) -> Result<(), ContractError> {
        self.client.post_json(&self.name, payload).await
    }
}
