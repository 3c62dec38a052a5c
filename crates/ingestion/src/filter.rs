//! Regex posting filter

use contracts::{ContractError, Posting};
use regex::{Regex, RegexBuilder};
use tracing::debug;

/// Case-insensitive pattern tested against title and description
///
/// An absent pattern matches everything.
#[derive(Debug, Clone, Default)]
pub struct PostingFilter {
    regex: Option<Regex>,
}

impl PostingFilter {
    /// Compile an optional pattern
    ///
    /// # Errors
    /// `ContractError::InvalidPattern` if the pattern does not compile
    pub fn from_pattern(pattern: Option<&str>) -> Result<Self, ContractError> {
        let regex = pattern
            .map(|p| {
                RegexBuilder::new(p)
                    .case_insensitive(true)
                    .build()
                    .map_err(|e| ContractError::InvalidPattern {
                        pattern: p.to_string(),
                        message: e.to_string(),
                    })
            })
            .transpose()?;
        Ok(Self { regex })
    }

    pub fn matches(&self, posting: &Posting) -> bool {
        match &self.regex {
            Some(re) => re.is_match(&posting.title) || re.is_match(&posting.description),
            None => true,
        }
    }

    /// Keep matching postings, preserving order
    pub fn apply(&self, postings: Vec<Posting>) -> Vec<Posting> {
        if self.regex.is_none() {
            return postings;
        }
        let before = postings.len();
        let kept: Vec<Posting> = postings.into_iter().filter(|p| self.matches(p)).collect();
        debug!(before, after = kept.len(), "Filter applied");
        kept
    }
}
