//! DiscordSink - webhook with embed list

use chrono::SecondsFormat;
use contracts::{ContractError, DeliveryPolicy, NotificationBatch, Notifier, Posting};
use serde_json::{json, Value};
use tracing::instrument;

use crate::webhook::WebhookClient;

/// Embed accent color
const EMBED_COLOR: u32 = 0x00ff00;

/// Discord rejects embed titles above this many characters
const MAX_TITLE_CHARS: usize = 256;

/// Sink that posts embed messages to a Discord webhook
pub struct DiscordSink {
    name: String,
    policy: DeliveryPolicy,
    client: WebhookClient,
}

impl DiscordSink {
    /// Create a new DiscordSink
    pub fn new(name: impl Into<String>, policy: DeliveryPolicy, client: WebhookClient) -> Self {
        Self {
            name: name.into(),
            policy,
            client,
        }
    }

    fn embed(posting: &Posting) -> Value {
        let mut fields = vec![
            json!({ "name": "Location", "value": non_blank(&posting.location), "inline": true }),
            json!({ "name": "Team", "value": posting.team_or_placeholder(), "inline": true }),
        ];
        if let Some(commitment) = posting.commitment.as_deref().filter(|c| !c.is_empty()) {
            fields.push(json!({ "name": "Commitment", "value": commitment, "inline": true }));
        }

        let mut embed = json!({
            "title": truncate_chars(&posting.title, MAX_TITLE_CHARS),
            "url": posting.apply_url,
            "fields": fields,
            "color": EMBED_COLOR,
        });
        if let Some(ts) = posting.created_at_utc() {
            embed["timestamp"] = json!(ts.to_rfc3339_opts(SecondsFormat::Secs, true));
        }
        embed
    }
}

/// Discord rejects empty field values
fn non_blank(value: &str) -> &str {
    if value.trim().is_empty() {
        contracts::MISSING_PLACEHOLDER
    } else {
        value
    }
}

fn truncate_chars(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    let mut out: String = text.chars().take(max - 1).collect();
    out.push('…');
    out
}

impl Notifier for DiscordSink {
    fn name(&self) -> &str {
        &self.name
    }

    fn policy(&self) -> DeliveryPolicy {
        self.policy
    }

    fn render(&self, batch: &NotificationBatch<'_>) -> Value {
        let embeds: Vec<Value> = batch.postings.iter().map(Self::embed).collect();
        json!({
            "content": format!("🚨 **{}**", batch.headline()),
            "embeds": embeds,
        })
    }

    #[instrument(name = "discord_sink_send", skip(self, payload), fields(sink = %self.name))]
    async fn send(&mut self, payload: &Value) -> Result<(), ContractError> {
        self.client.post_json(&self.name, payload).await
    }
}
