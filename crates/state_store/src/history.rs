//! Delivery History - per-destination record of delivered posting IDs
//!
//! Independent of the snapshot: a destination that failed or was added
//! later keeps its own view of what it has already received.

use std::collections::BTreeSet;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use contracts::{ContractError, Posting};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, warn};

use crate::fs::write_atomic;

const HISTORY_DIR: &str = "history";

/// On-disk shape: `{"sent_ids": [...]}`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryFile {
    pub sent_ids: BTreeSet<String>,
}

/// Delivery history store rooted at a storage directory
#[derive(Debug, Clone)]
pub struct DeliveryHistory {
    storage_dir: PathBuf,
}

impl DeliveryHistory {
    /// Create a store; files and directory are created lazily on first write
    pub fn new(storage_dir: impl Into<PathBuf>) -> Self {
        Self {
            storage_dir: storage_dir.into(),
        }
    }

    /// History file for a destination
    ///
    /// Lives under `history/` so no organization snapshot can share its name.
    pub fn history_path(&self, destination_id: &str) -> PathBuf {
        let stem: String = destination_id
            .chars()
            .map(|c| {
                if c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.') {
                    c
                } else {
                    '_'
                }
            })
            .collect();
        self.storage_dir.join(HISTORY_DIR).join(format!("{stem}.json"))
    }

    /// Delivered IDs; absent, unreadable or corrupt files read as empty
    pub fn delivered_ids(&self, destination_id: &str) -> BTreeSet<String> {
        let path = self.history_path(destination_id);
        load_tolerant(destination_id, &path).sent_ids
    }

    /// Postings not yet delivered to `destination_id`, in input order
    #[instrument(
        name = "history_filter_undelivered",
        skip(self, postings),
        fields(destination = %destination_id, input = postings.len())
    )]
    pub fn filter_undelivered(&self, destination_id: &str, postings: &[Posting]) -> Vec<Posting> {
        let delivered = self.delivered_ids(destination_id);
        let undelivered: Vec<Posting> = postings
            .iter()
            .filter(|p| !delivered.contains(&p.id))
            .cloned()
            .collect();

        debug!(
            already_delivered = postings.len() - undelivered.len(),
            undelivered = undelivered.len(),
            "History filter applied"
        );
        undelivered
    }

    /// Union `posting_ids` into the destination's history
    ///
    /// Call only after the transport accepted the message. Returns how many
    /// IDs were newly recorded.
    ///
    /// # Errors
    /// `ContractError::Storage` if the history file cannot be written
    #[instrument(name = "history_mark_delivered", skip(self, posting_ids), fields(destination = %destination_id))]
    pub fn mark_delivered<'a, I>(
        &self,
        destination_id: &str,
        posting_ids: I,
    ) -> Result<usize, ContractError>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let path = self.history_path(destination_id);
        let mut history = load_tolerant(destination_id, &path);

        let before = history.sent_ids.len();
        history
            .sent_ids
            .extend(posting_ids.into_iter().map(str::to_string));
        let added = history.sent_ids.len() - before;

        let json = serde_json::to_vec_pretty(&history)
            .map_err(|e| ContractError::storage("serialize", &path, e.to_string()))?;
        write_atomic(&path, &json)?;

        debug!(added, total = history.sent_ids.len(), "History updated");
        Ok(added)
    }

    /// Clear the destination's history (explicit operator action)
    ///
    /// Returns whether a history file existed.
    pub fn reset(&self, destination_id: &str) -> Result<bool, ContractError> {
        let path = self.history_path(destination_id);
        match fs::remove_file(&path) {
            Ok(()) => {
                info!(destination = %destination_id, path = %path.display(), "History reset");
                Ok(true)
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
            Err(e) => Err(ContractError::storage("remove", &path, e.to_string())),
        }
    }
}

fn load_tolerant(destination_id: &str, path: &Path) -> HistoryFile {
    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == ErrorKind::NotFound => return HistoryFile::default(),
        Err(e) => {
            warn!(
                destination = %destination_id,
                path = %path.display(),
                error = %e,
                "History unreadable, treating as empty"
            );
            return HistoryFile::default();
        }
    };

    serde_json::from_str(&content).unwrap_or_else(|e| {
        warn!(
            destination = %destination_id,
            path = %path.display(),
            error = %e,
            "History corrupt, treating as empty"
        );
        HistoryFile::default()
    })
}
