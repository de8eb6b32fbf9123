//! Persistence layer for the Snapshot Store

use crate::error::StoreError;
use crate::store::{meta_keys, AddRootOutcome, InitOutcome, RemoveRootOutcome, SnapshotStore};
use crate::types::{FileRecord, Generation, WatchedRoot};
use sled::transaction::TransactionError;
use sled::Transactional;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

const SCHEMA_VERSION: &str = "1";

/// Sled-based implementation of SnapshotStore
///
/// Each generation, the root set and metadata live in their own sled tree.
/// Generation keys are the UTF-8 file path, values the hex digest.
pub struct SledSnapshotStore {
    db: sled::Db,
    path: PathBuf,
    baseline: sled::Tree,
    current: sled::Tree,
    roots: sled::Tree,
    meta: sled::Tree,
}

impl SledSnapshotStore {
    /// Create the store at `path`, or open it if one is already there.
    ///
    /// An existing store is never overwritten.
    pub fn initialize<P: AsRef<Path>>(path: P) -> Result<(Self, InitOutcome), StoreError> {
        let path = path.as_ref();
        let store = Self::open_db(path)?;
        if store.meta(meta_keys::SCHEMA_VERSION)?.is_some() {
            debug!(store = %path.display(), "Snapshot store already exists");
            return Ok((store, InitOutcome::AlreadyExists));
        }

        store.set_meta(meta_keys::SCHEMA_VERSION, SCHEMA_VERSION)?;
        store.flush()?;
        info!(store = %path.display(), "Created snapshot store");
        Ok((store, InitOutcome::Created))
    }

    /// Open an existing store
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, StoreError> {
        let path = path.as_ref();
        if !Self::looks_like_store(path) {
            return Err(StoreError::NotInitialized(path.to_path_buf()));
        }

        let store = Self::open_db(path)?;
        if store.meta(meta_keys::SCHEMA_VERSION)?.is_none() {
            return Err(StoreError::NotInitialized(path.to_path_buf()));
        }
        Ok(store)
    }

    /// Every sled directory carries `conf` and `db`; `open` never creates them.
    fn looks_like_store(path: &Path) -> bool {
        path.is_dir() && path.join("conf").is_file() && path.join("db").is_file()
    }

    fn open_db(path: &Path) -> Result<Self, StoreError> {
        let db = sled::open(path)
            .map_err(|e| StoreError::Backend(format!("Failed to open sled database: {}", e)))?;
        Ok(Self {
            baseline: db.open_tree(Generation::Baseline.tree_name())?,
            current: db.open_tree(Generation::Current.tree_name())?,
            roots: db.open_tree("roots")?,
            meta: db.open_tree("meta")?,
            path: path.to_path_buf(),
            db,
        })
    }

    /// Location of the store on disk
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn tree(&self, generation: Generation) -> &sled::Tree {
        match generation {
            Generation::Baseline => &self.baseline,
            Generation::Current => &self.current,
        }
    }

    fn decode_record(key: &[u8], value: &[u8]) -> Result<FileRecord, StoreError> {
        Ok(FileRecord {
            path: decode_utf8(key)?,
            hash: decode_utf8(value)?,
        })
    }

    /// Batch that empties `tree` when applied
    fn clearing_batch(tree: &sled::Tree) -> Result<sled::Batch, StoreError> {
        let mut batch = sled::Batch::default();
        for key in tree.iter().keys() {
            batch.remove(key?);
        }
        Ok(batch)
    }
}

fn decode_utf8(bytes: &[u8]) -> Result<String, StoreError> {
    String::from_utf8(bytes.to_vec())
        .map_err(|e| StoreError::Codec(format!("Stored value is not UTF-8: {}", e)))
}

impl SnapshotStore for SledSnapshotStore {
    fn list_roots(&self) -> Result<Vec<WatchedRoot>, StoreError> {
        let mut roots = Vec::new();
        for item in self.roots.iter() {
            let (_, value) = item?;
            let root: WatchedRoot = bincode::deserialize(&value)?;
            roots.push(root);
        }
        roots.sort_by_key(|r| r.id);
        Ok(roots)
    }

    fn add_root(&self, path: &str) -> Result<AddRootOutcome, StoreError> {
        if self.roots.contains_key(path.as_bytes())? {
            return Ok(AddRootOutcome::AlreadyPresent);
        }

        let root = WatchedRoot {
            id: self.db.generate_id()?,
            path: path.to_string(),
        };
        let value = bincode::serialize(&root)?;

        match self
            .roots
            .compare_and_swap(path.as_bytes(), None as Option<&[u8]>, Some(value))?
        {
            Ok(()) => Ok(AddRootOutcome::Added(root)),
            Err(_) => Ok(AddRootOutcome::AlreadyPresent),
        }
    }

    fn remove_root(&self, path: &str) -> Result<RemoveRootOutcome, StoreError> {
        match self.roots.remove(path.as_bytes())? {
            Some(_) => Ok(RemoveRootOutcome::Removed),
            None => Ok(RemoveRootOutcome::NotPresent),
        }
    }

    fn clear_generation(&self, generation: Generation) -> Result<(), StoreError> {
        self.tree(generation).clear()?;
        Ok(())
    }

    fn insert_record(
        &self,
        generation: Generation,
        record: &FileRecord,
    ) -> Result<(), StoreError> {
        let swapped = self.tree(generation).compare_and_swap(
            record.path.as_bytes(),
            None as Option<&[u8]>,
            Some(record.hash.as_bytes()),
        )?;
        swapped.map_err(|_| StoreError::DuplicateKey(record.path.clone()))
    }

    fn replace_generation_with(
        &self,
        generation: Generation,
        records: &[FileRecord],
    ) -> Result<(), StoreError> {
        let tree = self.tree(generation);
        let mut batch = Self::clearing_batch(tree)?;
        for record in records {
            batch.insert(record.path.as_bytes(), record.hash.as_bytes());
        }
        tree.apply_batch(batch)?;
        Ok(())
    }

    fn replace_generation(&self, dest: Generation, src: Generation) -> Result<usize, StoreError> {
        if dest == src {
            return self.record_count(src);
        }

        let dest_tree = self.tree(dest);
        let mut batch = Self::clearing_batch(dest_tree)?;
        let mut copied = 0;
        for item in self.tree(src).iter() {
            let (key, value) = item?;
            batch.insert(key, value);
            copied += 1;
        }
        dest_tree.apply_batch(batch)?;
        Ok(copied)
    }

    fn delete_record(&self, generation: Generation, path: &str) -> Result<bool, StoreError> {
        Ok(self.tree(generation).remove(path.as_bytes())?.is_some())
    }

    fn copy_record(
        &self,
        src: Generation,
        dest: Generation,
        path: &str,
    ) -> Result<bool, StoreError> {
        if src == dest {
            return Ok(self.tree(src).contains_key(path.as_bytes())?);
        }

        let key = path.as_bytes();
        (self.tree(src), self.tree(dest))
            .transaction(|(src_tx, dest_tx)| {
                dest_tx.remove(key)?;
                match src_tx.get(key)? {
                    Some(hash) => {
                        dest_tx.insert(key, hash)?;
                        Ok(true)
                    }
                    None => Ok(false),
                }
            })
            .map_err(|e: TransactionError<()>| match e {
                TransactionError::Storage(err) => StoreError::from(err),
                TransactionError::Abort(()) => {
                    StoreError::Backend(format!("Copy of {} was aborted", path))
                }
            })
    }

    fn record(
        &self,
        generation: Generation,
        path: &str,
    ) -> Result<Option<FileRecord>, StoreError> {
        match self.tree(generation).get(path.as_bytes())? {
            Some(hash) => Ok(Some(FileRecord {
                path: path.to_string(),
                hash: decode_utf8(&hash)?,
            })),
            None => Ok(None),
        }
    }

    fn records(&self, generation: Generation) -> Result<Vec<FileRecord>, StoreError> {
        let mut records = Vec::new();
        for item in self.tree(generation).iter() {
            let (key, value) = item?;
            records.push(Self::decode_record(&key, &value)?);
        }
        Ok(records)
    }

    fn record_count(&self, generation: Generation) -> Result<usize, StoreError> {
        Ok(self.tree(generation).len())
    }

    fn set_meta(&self, key: &str, value: &str) -> Result<(), StoreError> {
        self.meta.insert(key.as_bytes(), value.as_bytes())?;
        Ok(())
    }

    fn meta(&self, key: &str) -> Result<Option<String>, StoreError> {
        match self.meta.get(key.as_bytes())? {
            Some(value) => Ok(Some(decode_utf8(&value)?)),
            None => Ok(None),
        }
    }

    fn flush(&self) -> Result<(), StoreError> {
        self.db
            .flush()
            .map_err(|e| StoreError::Backend(format!("Failed to flush database: {}", e)))?;
        Ok(())
    }
}
