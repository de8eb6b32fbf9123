//! Scan orchestration: rebuild the `current` generation from every watched root.
//!
//! Records from all roots are buffered in memory and committed to the store in
//! one atomic replace once every root has been walked. A missing root aborts
//! the scan before anything is written, so the previous `current` generation
//! survives a failed scan intact.

use crate::error::ApiError;
use crate::store::{meta_keys, SnapshotStore};
use crate::tree::walker::{Walker, WalkerConfig};
use crate::types::{FileRecord, Generation};
use chrono::Utc;
use serde::Serialize;
use std::collections::HashSet;
use std::path::PathBuf;
use tracing::{debug, info, warn};

/// Summary of a completed scan
#[derive(Debug, Clone, Default, Serialize)]
pub struct ScanReport {
    /// Watched roots walked
    pub roots: usize,
    /// Records committed to `current`
    pub files: usize,
    /// Directories encountered across all roots
    pub folders: usize,
    /// Paths dropped because an earlier root already produced them
    pub duplicates: Vec<String>,
    /// Paths left out under the skip policy
    pub skipped: Vec<String>,
    pub scanned_at: String,
}

/// Accumulates walk output while enforcing path uniqueness
#[derive(Default)]
struct ScanBuffer {
    records: Vec<FileRecord>,
    seen: HashSet<String>,
    duplicates: Vec<String>,
}

impl ScanBuffer {
    fn push(&mut self, record: FileRecord) {
        if self.seen.insert(record.path.clone()) {
            self.records.push(record);
        } else {
            warn!(path = %record.path, "Duplicate path in scan, record skipped");
            self.duplicates.push(record.path);
        }
    }
}

/// Walk every watched root and replace the `current` generation.
///
/// Holding a store handle implies the store was initialized. Fails with
/// [`ApiError::MissingRoot`] naming the first root absent from disk.
pub fn rescan(store: &dyn SnapshotStore, config: &WalkerConfig) -> Result<ScanReport, ApiError> {
    let roots = store.list_roots()?;
    info!(
        roots = roots.len(),
        algorithm = %config.algorithm,
        "Starting scan"
    );

    let mut buffer = ScanBuffer::default();
    let mut folders = 0;
    let mut skipped = Vec::new();

    for root in &roots {
        let root_path = PathBuf::from(&root.path);
        if !root_path.exists() {
            warn!(root = %root.path, "Watched root does not exist, aborting scan");
            return Err(ApiError::MissingRoot(root.path.clone()));
        }

        debug!(root = %root.path, id = root.id, "Scanning root");
        let walk = Walker::with_config(root_path, config.clone()).walk()?;
        debug!(
            root = %root.path,
            files = walk.files.len(),
            folders = walk.folders.len(),
            "Root scanned"
        );

        folders += walk.folders.len();
        skipped.extend(walk.skipped);
        for record in walk.files {
            buffer.push(record);
        }
    }

    store.replace_generation_with(Generation::Current, &buffer.records)?;

    let scanned_at = Utc::now().to_rfc3339();
    store.set_meta(meta_keys::LAST_SCAN_AT, &scanned_at)?;
    store.set_meta(meta_keys::CURRENT_ALGORITHM, config.algorithm.as_str())?;
    store.flush()?;

    let report = ScanReport {
        roots: roots.len(),
        files: buffer.records.len(),
        folders,
        duplicates: buffer.duplicates,
        skipped,
        scanned_at,
    };
    info!(
        files = report.files,
        duplicates = report.duplicates.len(),
        skipped = report.skipped.len(),
        "Scan committed"
    );
    Ok(report)
}
