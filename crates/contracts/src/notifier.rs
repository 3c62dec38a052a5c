//! Notifier trait - Dispatcher output interface
//!
//! A destination is a capability set: a name, a delivery policy, a renderer
//! and a transport. Implementations are tagged variants, not a class tree.

use std::fmt;

use crate::{ContractError, Posting};

/// How the dispatcher treats a destination
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeliveryPolicy {
    /// Max postings per outbound message (None = unbounded)
    pub batch_limit: Option<usize>,

    /// Filter against and record into the delivery history
    pub uses_history: bool,
}

/// 1-based inclusive item range covered by one message
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BatchRange {
    pub start: usize,
    pub end: usize,
}

impl fmt::Display for BatchRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.start, self.end)
    }
}

/// One outbound message worth of postings
#[derive(Debug, Clone, Copy)]
pub struct NotificationBatch<'a> {
    /// Organization the postings belong to
    pub organization_id: &'a str,

    /// Total postings being delivered across all batches
    pub total: usize,

    /// Range of this batch; None when everything fits in one message
    pub range: Option<BatchRange>,

    /// Postings in this batch, in delivery order
    pub postings: &'a [Posting],
}

impl NotificationBatch<'_> {
    /// Human-readable summary line, e.g. `23 new job(s) at acme! (11-20)`
    pub fn headline(&self) -> String {
        match self.range {
            Some(range) => format!(
                "{} new job(s) at {}! ({})",
                self.total, self.organization_id, range
            ),
            None => format!("{} new job(s) at {}!", self.total, self.organization_id),
        }
    }
}

/// Notification destination trait
///
/// All destinations (webhooks, log, in-memory) implement this trait.
#[trait_variant::make(Notifier: Send)]
pub trait LocalNotifier {
    /// Destination name (keys the delivery history, used in logs)
    fn name(&self) -> &str;

    /// Batching and deduplication policy
    fn policy(&self) -> DeliveryPolicy;

    /// Build the outbound payload for one batch
    fn render(&self, batch: &NotificationBatch<'_>) -> serde_json::Value;

    /// Hand a rendered payload to the transport
    ///
    /// # Errors
    /// Returns transport error (should include destination name)
    async fn send(&mut self, payload: &serde_json::Value) -> Result<(), ContractError>;
}
