//! # Dispatcher
//!
//! Notification delivery module.
//!
//! Responsibilities:
//! - Filter postings against each destination's delivery history
//! - Split postings into per-message batches and render them per vendor
//! - Send to each destination in turn, isolating failures per destination
//! - Record delivered IDs only after the transport accepted them

pub mod batch;
pub mod dispatcher;
pub mod error;
pub mod metrics;
pub mod sinks;
pub mod webhook;

pub use batch::{plan_batches, PlannedBatch};
pub use contracts::{Notifier, Posting};
pub use dispatcher::{create_destinations, DestinationOutcome, DispatchReport, Dispatcher};
pub use error::DispatcherError;
pub use metrics::{DispatchMetrics, MetricsSnapshot};
pub use sinks::{Destination, DiscordSink, LogSink, MemorySink, SlackSink};
pub use webhook::WebhookClient;
