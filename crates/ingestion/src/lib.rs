//! # Ingestion
//!
//! Posting fetch module.
//!
//! Responsibilities:
//! - Fetch the current posting set for an organization from the Lever postings API
//! - Map the upstream JSON shape onto `Posting`
//! - Optional case-insensitive regex filtering on title and description
//!
//! ## Usage Example
//!
//! ```ignore
//! use contracts::{PostingSource, WatchConfig};
//! use ingestion::{LeverClient, PostingFilter};
//!
//! let client = LeverClient::from_config(&config)?;
//! let filter = PostingFilter::from_pattern(config.pattern.as_deref())?;
//! let postings = filter.apply(client.fetch().await?);
//! ```
//!
//! ## Mock Testing
//!
//! ```ignore
//! use ingestion::MockPostingSource;
//!
//! let source = MockPostingSource::new("acme", postings);
//! ```

mod filter;
mod lever;
mod mock;

// Re-exports
pub use contracts::Posting;
pub use filter::PostingFilter;
pub use lever::{trim_apply_suffix, LeverClient, LeverPosting};
pub use mock::MockPostingSource;
