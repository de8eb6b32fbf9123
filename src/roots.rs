//! Watched root registry.

use crate::error::ApiError;
use crate::store::{AddRootOutcome, RemoveRootOutcome, SnapshotStore};
use crate::tree::path::{normalize_path_string, roots_overlap};
use crate::types::WatchedRoot;
use tracing::{info, warn};

fn normalized(path: &str) -> Result<String, ApiError> {
    let normalized = normalize_path_string(path);
    if normalized.trim().is_empty() {
        return Err(ApiError::Input("Root path cannot be empty".to_string()));
    }
    Ok(normalized)
}

/// Register a root. Adding a registered path again is a no-op.
///
/// Overlap with an existing root is accepted but logged: files under both
/// roots are recorded once and reported as duplicates at scan time.
pub fn add_root(store: &dyn SnapshotStore, path: &str) -> Result<AddRootOutcome, ApiError> {
    let path = normalized(path)?;
    let existing = store.list_roots()?;
    let outcome = store.add_root(&path)?;

    if let AddRootOutcome::Added(ref root) = outcome {
        for other in existing.iter().filter(|r| roots_overlap(&r.path, &root.path)) {
            warn!(
                root = %root.path,
                overlaps = %other.path,
                "Watched roots overlap; shared files will be scanned once"
            );
        }
        info!(root = %root.path, id = root.id, "Added watched root");
    }
    Ok(outcome)
}

/// Unregister a root. Removing an unknown path succeeds as a no-op.
pub fn remove_root(store: &dyn SnapshotStore, path: &str) -> Result<RemoveRootOutcome, ApiError> {
    let path = normalized(path)?;
    let outcome = store.remove_root(&path)?;
    match outcome {
        RemoveRootOutcome::Removed => info!(root = %path, "Removed watched root"),
        RemoveRootOutcome::NotPresent => info!(root = %path, "Root was not registered"),
    }
    Ok(outcome)
}

pub fn list_roots(store: &dyn SnapshotStore) -> Result<Vec<WatchedRoot>, ApiError> {
    Ok(store.list_roots()?)
}

/// Pairs of registered roots where one contains the other
pub fn overlapping_roots(roots: &[WatchedRoot]) -> Vec<(String, String)> {
    let mut pairs = Vec::new();
    for (i, a) in roots.iter().enumerate() {
        for b in &roots[i + 1..] {
            if roots_overlap(&a.path, &b.path) {
                pairs.push((a.path.clone(), b.path.clone()));
            }
        }
    }
    pairs
}
