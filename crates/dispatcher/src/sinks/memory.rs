//! MemorySink - records payloads in memory
//!
//! Used for tests without network access.

use contracts::{ContractError, DeliveryPolicy, NotificationBatch, Notifier};
use serde_json::{json, Value};

/// Sink that keeps every accepted payload
///
/// Can be told to reject the n-th send call (0-based) to exercise failure paths.
pub struct MemorySink {
    name: String,
    policy: DeliveryPolicy,
    sent: Vec<Value>,
    attempts: usize,
    fail_on_attempt: Option<usize>,
}

impl MemorySink {
    pub fn new(name: impl Into<String>, policy: DeliveryPolicy) -> Self {
        Self {
            name: name.into(),
            policy,
            sent: Vec::new(),
            attempts: 0,
            fail_on_attempt: None,
        }
    }

    /// Reject the send call with this 0-based attempt index
    pub fn fail_on_attempt(mut self, attempt: usize) -> Self {
        self.fail_on_attempt = Some(attempt);
        self
    }

    /// Payloads accepted so far
    pub fn sent(&self) -> &[Value] {
        &self.sent
    }

    /// Headlines of accepted payloads
    pub fn headlines(&self) -> Vec<String> {
        self.sent
            .iter()
            .filter_map(|p| p["headline"].as_str().map(str::to_string))
            .collect()
    }

    /// Posting IDs of accepted payloads, in send order
    pub fn sent_ids(&self) -> Vec<String> {
        self.sent
            .iter()
            .filter_map(|p| p["ids"].as_array())
            .flatten()
            .filter_map(|id| id.as_str().map(str::to_string))
            .collect()
    }
}

impl Notifier for MemorySink {
    fn name(&self) -> &str {
        &self.name
    }

    fn policy(&self) -> DeliveryPolicy {
        self.policy
    }

    fn render(&self, batch: &NotificationBatch<'_>) -> Value {
        let ids: Vec<&str> = batch.postings.iter().map(|p| p.id.as_str()).collect();
        json!({ "headline": batch.headline(), "ids": ids })
    }

    async fn send(&mut self, payload: &Value) -> Result<(), ContractError> {
        let attempt = self.attempts;
        self.attempts += 1;
        if self.fail_on_attempt == Some(attempt) {
            return Err(ContractError::WebhookStatus {
                destination: self.name.clone(),
                status: 500,
                body: "injected failure".to_string(),
            });
        }
        self.sent.push(payload.clone());
        Ok(())
    }
}
