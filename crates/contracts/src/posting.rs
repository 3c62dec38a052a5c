//! Posting - Fetcher output, Change Detector / Dispatcher input

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Rendered in place of a missing team, never left blank
pub const MISSING_PLACEHOLDER: &str = "N/A";

/// A single job posting
///
/// `id` is the only identity; two postings with the same `id` are the same
/// posting even if every other field changed between polls.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Posting {
    /// Upstream identifier, stable across polls
    pub id: String,

    /// Job title
    pub title: String,

    /// Team / department
    #[serde(default)]
    pub team: Option<String>,

    /// Location as published
    pub location: String,

    /// Full-time, Part-time, ...
    #[serde(default)]
    pub commitment: Option<String>,

    /// Plain-text description
    #[serde(default)]
    pub description: String,

    /// Link to the posting (apply page parent)
    pub apply_url: String,

    /// Creation time, Unix epoch milliseconds
    pub created_at: i64,
}

impl Posting {
    /// Team name, or the placeholder when the posting has none
    pub fn team_or_placeholder(&self) -> &str {
        self.team
            .as_deref()
            .filter(|t| !t.trim().is_empty())
            .unwrap_or(MISSING_PLACEHOLDER)
    }

    /// Creation time as UTC datetime (None if out of range)
    pub fn created_at_utc(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp_millis(self.created_at)
    }
}
