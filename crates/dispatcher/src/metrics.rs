//! Dispatch metrics for observability

use std::sync::atomic::{AtomicU64, Ordering};

/// Counters aggregated across all destinations of a run
#[derive(Debug, Default)]
pub struct DispatchMetrics {
    /// Outbound messages accepted by a transport
    message_count: AtomicU64,
    /// Postings carried by those messages
    posting_count: AtomicU64,
    /// Postings skipped because the destination already had them
    deduplicated_count: AtomicU64,
    /// Destinations that failed
    failure_count: AtomicU64,
}

impl DispatchMetrics {
    /// Create new metrics instance
    pub fn new() -> Self {
        Self::default()
    }

    pub fn message_count(&self) -> u64 {
        self.message_count.load(Ordering::Relaxed)
    }

    /// Record one accepted message carrying `postings` postings
    pub fn record_message(&self, postings: usize) {
        self.message_count.fetch_add(1, Ordering::Relaxed);
        self.posting_count
            .fetch_add(postings as u64, Ordering::Relaxed);
    }

    pub fn posting_count(&self) -> u64 {
        self.posting_count.load(Ordering::Relaxed)
    }

    pub fn deduplicated_count(&self) -> u64 {
        self.deduplicated_count.load(Ordering::Relaxed)
    }

    pub fn add_deduplicated(&self, n: usize) {
        self.deduplicated_count
            .fetch_add(n as u64, Ordering::Relaxed);
    }

    pub fn failure_count(&self) -> u64 {
        self.failure_count.load(Ordering::Relaxed)
    }

    pub fn inc_failure_count(&self) {
        self.failure_count.fetch_add(1, Ordering::Relaxed);
    }

    /// Get snapshot of all metrics
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            message_count: self.message_count(),
            posting_count: self.posting_count(),
            deduplicated_count: self.deduplicated_count(),
            failure_count: self.failure_count(),
        }
    }
}

/// Snapshot of dispatch metrics (for reporting)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MetricsSnapshot {
    pub message_count: u64,
    pub posting_count: u64,
    pub deduplicated_count: u64,
    pub failure_count: u64,
}
