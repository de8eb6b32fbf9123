//! Diff engine: classify every path as modified, removed or added between the
//! accepted baseline and the latest scan.

use crate::error::ApiError;
use crate::store::{meta_keys, SnapshotStore};
use crate::types::{FileRecord, Generation};
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;
use tracing::{debug, warn};

/// Change category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ChangeKind {
    Modified,
    Removed,
    Added,
}

/// A single changed path
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Change {
    pub kind: ChangeKind,
    pub path: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub baseline_hash: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_hash: Option<String>,
}

impl fmt::Display for Change {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let verb = match self.kind {
            ChangeKind::Modified => "modified",
            ChangeKind::Removed => "deleted",
            ChangeKind::Added => "added",
        };
        write!(f, "File: {} has been {}", self.path, verb)
    }
}

/// Ordered changes: all modified, then removed, then added.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ChangeSet {
    pub changes: Vec<Change>,
}

impl ChangeSet {
    pub fn is_empty(&self) -> bool {
        self.changes.is_empty()
    }

    pub fn len(&self) -> usize {
        self.changes.len()
    }

    pub fn of_kind(&self, kind: ChangeKind) -> impl Iterator<Item = &Change> {
        self.changes.iter().filter(move |c| c.kind == kind)
    }

    /// One human-readable line per change
    pub fn lines(&self) -> Vec<String> {
        self.changes.iter().map(|c| c.to_string()).collect()
    }
}

/// Compare two generations by path.
///
/// Within each category changes are in ascending path order.
pub fn compute_changes(baseline: &[FileRecord], current: &[FileRecord]) -> ChangeSet {
    let baseline: BTreeMap<&str, &str> = baseline
        .iter()
        .map(|r| (r.path.as_str(), r.hash.as_str()))
        .collect();
    let current: BTreeMap<&str, &str> = current
        .iter()
        .map(|r| (r.path.as_str(), r.hash.as_str()))
        .collect();

    let mut changes = Vec::new();

    for (path, old_hash) in &baseline {
        if let Some(new_hash) = current.get(path) {
            if new_hash != old_hash {
                changes.push(Change {
                    kind: ChangeKind::Modified,
                    path: path.to_string(),
                    baseline_hash: Some(old_hash.to_string()),
                    current_hash: Some(new_hash.to_string()),
                });
            }
        }
    }

    for (path, old_hash) in &baseline {
        if !current.contains_key(path) {
            changes.push(Change {
                kind: ChangeKind::Removed,
                path: path.to_string(),
                baseline_hash: Some(old_hash.to_string()),
                current_hash: None,
            });
        }
    }

    for (path, new_hash) in &current {
        if !baseline.contains_key(path) {
            changes.push(Change {
                kind: ChangeKind::Added,
                path: path.to_string(),
                baseline_hash: None,
                current_hash: Some(new_hash.to_string()),
            });
        }
    }

    ChangeSet { changes }
}

/// Diff the stored baseline against the stored current generation
pub fn diff(store: &dyn SnapshotStore) -> Result<ChangeSet, ApiError> {
    let baseline_algorithm = store.meta(meta_keys::BASELINE_ALGORITHM)?;
    let current_algorithm = store.meta(meta_keys::CURRENT_ALGORITHM)?;
    if let (Some(baseline), Some(current)) = (&baseline_algorithm, &current_algorithm) {
        if baseline != current {
            warn!(
                baseline = %baseline,
                current = %current,
                "Baseline and current were hashed with different algorithms; every file will differ"
            );
        }
    }

    let baseline = store.records(Generation::Baseline)?;
    let current = store.records(Generation::Current)?;
    let changes = compute_changes(&baseline, &current);

    debug!(
        baseline = baseline.len(),
        current = current.len(),
        modified = changes.of_kind(ChangeKind::Modified).count(),
        removed = changes.of_kind(ChangeKind::Removed).count(),
        added = changes.of_kind(ChangeKind::Added).count(),
        "Diff computed"
    );
    Ok(changes)
}
