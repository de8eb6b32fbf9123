//! Snapshot Store
//!
//! Durable home of the two file-record generations, the watched root set and
//! a small metadata table. Core operations only see the [`SnapshotStore`]
//! trait; [`SledSnapshotStore`] is the on-disk implementation.

pub mod persistence;

pub use persistence::SledSnapshotStore;

use crate::error::StoreError;
use crate::types::{FileRecord, Generation, WatchedRoot};

/// Metadata keys written by scan and accept
pub mod meta_keys {
    pub const SCHEMA_VERSION: &str = "schema_version";
    pub const LAST_SCAN_AT: &str = "last_scan_at";
    pub const LAST_ACCEPT_AT: &str = "last_accept_at";
    pub const CURRENT_ALGORITHM: &str = "current_algorithm";
    pub const BASELINE_ALGORITHM: &str = "baseline_algorithm";
}

/// Result of store initialization
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InitOutcome {
    Created,
    AlreadyExists,
}

/// Result of registering a watched root
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AddRootOutcome {
    Added(WatchedRoot),
    AlreadyPresent,
}

/// Result of unregistering a watched root
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemoveRootOutcome {
    Removed,
    NotPresent,
}

/// Snapshot store interface
pub trait SnapshotStore {
    /// Watched roots in registration order
    fn list_roots(&self) -> Result<Vec<WatchedRoot>, StoreError>;
    fn add_root(&self, path: &str) -> Result<AddRootOutcome, StoreError>;
    fn remove_root(&self, path: &str) -> Result<RemoveRootOutcome, StoreError>;

    fn clear_generation(&self, generation: Generation) -> Result<(), StoreError>;

    /// Insert one record; fails with [`StoreError::DuplicateKey`] if the path exists
    fn insert_record(&self, generation: Generation, record: &FileRecord)
        -> Result<(), StoreError>;

    /// Atomically replace a generation's contents with `records`
    fn replace_generation_with(
        &self,
        generation: Generation,
        records: &[FileRecord],
    ) -> Result<(), StoreError>;

    /// Atomically replace `dest` with a copy of `src`; returns records copied
    fn replace_generation(&self, dest: Generation, src: Generation) -> Result<usize, StoreError>;

    /// Returns whether a record was removed
    fn delete_record(&self, generation: Generation, path: &str) -> Result<bool, StoreError>;

    /// Remove `path` from `dest`, then copy it from `src` if present there.
    ///
    /// Returns whether `src` held the path.
    fn copy_record(
        &self,
        src: Generation,
        dest: Generation,
        path: &str,
    ) -> Result<bool, StoreError>;

    fn record(&self, generation: Generation, path: &str)
        -> Result<Option<FileRecord>, StoreError>;

    /// All records of a generation, sorted by path
    fn records(&self, generation: Generation) -> Result<Vec<FileRecord>, StoreError>;

    fn record_count(&self, generation: Generation) -> Result<usize, StoreError>;

    fn set_meta(&self, key: &str, value: &str) -> Result<(), StoreError>;
    fn meta(&self, key: &str) -> Result<Option<String>, StoreError>;

    /// Flush pending writes to disk
    fn flush(&self) -> Result<(), StoreError>;
}
