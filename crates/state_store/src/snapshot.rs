//! Change Detector - per-organization snapshot diffing
//!
//! The snapshot is overwritten wholesale on every detection so it always
//! mirrors the most recent fetch; it is not an append-only log.

use std::collections::{BTreeMap, HashSet};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use contracts::{is_safe_file_stem, ContractError, Posting};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, warn};

use crate::fs::write_atomic;

/// Persisted posting set: ID -> full posting
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Snapshot {
    postings: BTreeMap<String, Posting>,
}

impl Snapshot {
    /// Build from a posting sequence; the first occurrence of a duplicate ID wins
    pub fn from_postings(postings: &[Posting]) -> Self {
        let mut map = BTreeMap::new();
        for posting in postings {
            map.entry(posting.id.clone())
                .or_insert_with(|| posting.clone());
        }
        Self { postings: map }
    }

    pub fn len(&self) -> usize {
        self.postings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.postings.is_empty()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.postings.contains_key(id)
    }

    pub fn get(&self, id: &str) -> Option<&Posting> {
        self.postings.get(id)
    }

    /// Posting IDs in sorted order
    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.postings.keys().map(String::as_str)
    }
}

/// Diffs current postings against the persisted per-organization snapshot
#[derive(Debug, Clone)]
pub struct ChangeDetector {
    storage_dir: PathBuf,
}

impl ChangeDetector {
    /// Create a detector rooted at `storage_dir`, creating the directory if needed
    ///
    /// # Errors
    /// `ContractError::Storage` if the directory cannot be created
    pub fn new(storage_dir: impl Into<PathBuf>) -> Result<Self, ContractError> {
        let storage_dir = storage_dir.into();
        fs::create_dir_all(&storage_dir)
            .map_err(|e| ContractError::storage("create_dir", &storage_dir, e.to_string()))?;
        Ok(Self { storage_dir })
    }

    pub fn storage_dir(&self) -> &Path {
        &self.storage_dir
    }

    /// Snapshot file for an organization
    pub fn snapshot_path(&self, organization_id: &str) -> Result<PathBuf, ContractError> {
        if !is_safe_file_stem(organization_id) {
            return Err(ContractError::config_validation(
                "organization",
                format!("'{organization_id}' cannot be used as a snapshot file name"),
            ));
        }
        Ok(self.storage_dir.join(format!("{organization_id}.json")))
    }

    /// Load the persisted snapshot
    ///
    /// Returns `Ok(None)` when no snapshot exists, or when the file is empty
    /// (the one recoverable malformation: an interrupted first write).
    ///
    /// # Errors
    /// - `ContractError::Storage` if the file exists but cannot be read
    /// - `ContractError::CorruptSnapshot` if the content is not a snapshot
    pub fn load_snapshot(&self, organization_id: &str) -> Result<Option<Snapshot>, ContractError> {
        let path = self.snapshot_path(organization_id)?;

        let content = match fs::read_to_string(&path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) if e.kind() == ErrorKind::InvalidData => {
                return Err(corrupt(organization_id, &path, e.to_string()));
            }
            Err(e) => return Err(ContractError::storage("read", &path, e.to_string())),
        };

        if content.trim().is_empty() {
            warn!(
                organization = %organization_id,
                path = %path.display(),
                "Snapshot file is empty, treating as first run"
            );
            return Ok(None);
        }

        serde_json::from_str(&content)
            .map(Some)
            .map_err(|e| corrupt(organization_id, &path, e.to_string()))
    }

    /// Persist `snapshot` for the organization (full replace)
    pub fn save_snapshot(
        &self,
        organization_id: &str,
        snapshot: &Snapshot,
    ) -> Result<(), ContractError> {
        let path = self.snapshot_path(organization_id)?;
        let json = serde_json::to_vec_pretty(snapshot)
            .map_err(|e| ContractError::storage("serialize", &path, e.to_string()))?;
        write_atomic(&path, &json)?;
        debug!(
            organization = %organization_id,
            postings = snapshot.len(),
            "Snapshot written"
        );
        Ok(())
    }

    /// Return postings unseen in the prior snapshot and replace the snapshot
    ///
    /// First run (no snapshot) records the baseline and reports nothing.
    /// Result order follows `current`; duplicate IDs collapse to their first occurrence.
    ///
    /// # Errors
    /// Any storage failure or corrupt snapshot; the run must stop.
    pub fn detect_new(
        &self,
        organization_id: &str,
        current: &[Posting],
    ) -> Result<Vec<Posting>, ContractError> {
        self.detect(organization_id, current)
            .map(|detection| detection.new_postings)
    }

    /// [`detect_new`](Self::detect_new), also reporting whether this run
    /// recorded the baseline
    #[instrument(
        name = "change_detector_detect",
        skip(self, current),
        fields(organization = %organization_id, current = current.len())
    )]
    pub fn detect(
        &self,
        organization_id: &str,
        current: &[Posting],
    ) -> Result<Detection, ContractError> {
        let prior = self.load_snapshot(organization_id)?;
        let next = Snapshot::from_postings(current);

        let new_postings = match &prior {
            None => {
                info!(
                    baseline = next.len(),
                    "No prior snapshot, recording baseline"
                );
                Vec::new()
            }
            Some(prior) => {
                let mut seen = HashSet::new();
                let mut fresh = Vec::new();
                for posting in current {
                    if seen.insert(posting.id.as_str()) && !prior.contains(&posting.id) {
                        fresh.push(posting.clone());
                    }
                }
                fresh
            }
        };

        self.save_snapshot(organization_id, &next)?;

        if let Some(prior) = &prior {
            let removed = prior.ids().filter(|id| !next.contains(id)).count();
            info!(
                new = new_postings.len(),
                removed,
                total = next.len(),
                "Change detection complete"
            );
        }

        Ok(Detection {
            new_postings,
            baseline: prior.is_none(),
        })
    }
}

/// Outcome of one [`ChangeDetector::detect`] call
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Detection {
    pub new_postings: Vec<Posting>,
    /// No prior snapshot existed; `new_postings` is empty
    pub baseline: bool,
}

fn corrupt(organization_id: &str, path: &Path, message: String) -> ContractError {
    ContractError::CorruptSnapshot {
        organization: organization_id.to_string(),
        path: path.display().to_string(),
        message,
    }
}
