//! # State Store
//!
//! Durable state kept between watch invocations.
//!
//! Two independent stores with deliberately different failure semantics:
//! - [`ChangeDetector`]: per-organization snapshot, the diffing baseline.
//!   Unreadable or unparseable snapshots are fatal.
//! - [`DeliveryHistory`]: per-destination set of delivered posting IDs.
//!   Missing or corrupt files read as empty; the worst outcome is a duplicate
//!   notification.
//!
//! Neither store takes a lock. Overlapping invocations against the same
//! organization or destination can lose updates.

mod fs;
mod history;
mod snapshot;

pub use history::{DeliveryHistory, HistoryFile};
pub use snapshot::{ChangeDetector, Detection, Snapshot};
