//! PostingSource trait - Posting supplier abstraction
//!
//! Decouples the watch pipeline from the concrete postings API so the
//! real HTTP client and in-memory mocks are interchangeable.

use crate::{ContractError, Posting};

/// Supplier of the current posting set for one organization
///
/// # Example
///
/// ```ignore
/// let postings = source.fetch().await?;
/// println!("{} postings at {}", postings.len(), source.organization_id());
/// ```
#[trait_variant::make(PostingSource: Send)]
pub trait LocalPostingSource {
    /// Organization the source fetches for
    fn organization_id(&self) -> &str;

    /// Fetch the full current posting set, in upstream order
    ///
    /// # Errors
    /// Network, HTTP status or decode failure; always fatal for the run
    async fn fetch(&self) -> Result<Vec<Posting>, ContractError>;
}
