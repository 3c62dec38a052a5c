//! # Contracts
//!
//! Frozen interface contracts shared by every crate in the watcher workspace.
//! Business crates depend on this crate only; reverse dependencies are prohibited.
//!
//! ## Identity Model
//! - A posting is identified by its upstream `id` alone; every other field is payload
//! - Posting sequences are ordered `Vec`s, never keyed maps, so upstream order survives diffing

mod config;
mod error;
mod notifier;
mod posting;
mod posting_source;

pub use config::*;
pub use error::*;
pub use notifier::*;
pub use posting::*;
pub use posting_source::{LocalPostingSource, PostingSource};
