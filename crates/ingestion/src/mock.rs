//! Mock posting source
//!
//! For tests without network access.

use std::sync::Mutex;

use contracts::{ContractError, Posting, PostingSource};
use tracing::debug;

/// In-memory posting source
///
/// Returns whatever posting set was last installed; can be switched to
/// failing mode to exercise fetch-error paths.
pub struct MockPostingSource {
    organization: String,
    postings: Mutex<Vec<Posting>>,
    fail: Mutex<Option<String>>,
}

impl MockPostingSource {
    /// Create a source serving `postings`
    pub fn new(organization: impl Into<String>, postings: Vec<Posting>) -> Self {
        Self {
            organization: organization.into(),
            postings: Mutex::new(postings),
            fail: Mutex::new(None),
        }
    }

    /// Replace the served posting set (next poll)
    pub fn set_postings(&self, postings: Vec<Posting>) {
        *self.postings.lock().unwrap_or_else(|e| e.into_inner()) = postings;
    }

    /// Make subsequent fetches fail with `message` (None restores normal operation)
    pub fn set_failure(&self, message: Option<String>) {
        *self.fail.lock().unwrap_or_else(|e| e.into_inner()) = message;
    }

    /// Build a posting with generated payload fields
    pub fn posting(id: &str, title: &str) -> Posting {
        Posting {
            id: id.to_string(),
            title: title.to_string(),
            team: None,
            location: "Remote".to_string(),
            commitment: Some("Full-time".to_string()),
            description: format!("{title} description"),
            apply_url: format!("https://jobs.lever.co/mock/{id}"),
            created_at: 1_700_000_000_000,
        }
    }
}

impl PostingSource for MockPostingSource {
    fn organization_id(&self) -> &str {
        &self.organization
    }

    async fn fetch(&self) -> Result<Vec<Posting>, ContractError> {
        if let Some(message) = self.fail.lock().unwrap_or_else(|e| e.into_inner()).clone() {
            return Err(ContractError::fetch(&self.organization, message));
        }
        let postings = self.postings.lock().unwrap_or_else(|e| e.into_inner()).clone();
        debug!(organization = %self.organization, count = postings.len(), "Mock fetch");
        Ok(postings)
    }
}
