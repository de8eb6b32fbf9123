//! Filesystem walker that hashes every regular file beneath a root

use crate::error::ScanError;
use crate::tree::hasher::{self, DEFAULT_CHUNK_SIZE};
use crate::types::{FileRecord, HashAlgorithm};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::{debug, warn};
use walkdir::WalkDir;

/// Default bound on traversal depth below a root
pub const DEFAULT_MAX_DEPTH: usize = 256;

/// What to do when a file or directory cannot be read mid-walk
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnreadablePolicy {
    /// Fail the whole walk on the first unreadable entry
    #[default]
    Abort,
    /// Log the entry, record it as skipped and keep going
    Skip,
}

impl FromStr for UnreadablePolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "abort" => Ok(UnreadablePolicy::Abort),
            "skip" => Ok(UnreadablePolicy::Skip),
            other => Err(format!(
                "Invalid unreadable-file policy: {} (must be 'abort' or 'skip')",
                other
            )),
        }
    }
}

impl fmt::Display for UnreadablePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UnreadablePolicy::Abort => f.write_str("abort"),
            UnreadablePolicy::Skip => f.write_str("skip"),
        }
    }
}

/// Filesystem walker configuration
#[derive(Debug, Clone)]
pub struct WalkerConfig {
    /// Digest used for every file
    pub algorithm: HashAlgorithm,
    /// Read block size for hashing
    pub chunk_size: usize,
    /// Treat symbolic links as the entry they point to
    pub follow_symlinks: bool,
    /// Maximum depth below the root to traverse
    pub max_depth: usize,
    pub on_unreadable: UnreadablePolicy,
}

impl Default for WalkerConfig {
    fn default() -> Self {
        Self {
            algorithm: HashAlgorithm::default(),
            chunk_size: DEFAULT_CHUNK_SIZE,
            follow_symlinks: true,
            max_depth: DEFAULT_MAX_DEPTH,
            on_unreadable: UnreadablePolicy::default(),
        }
    }
}

/// Everything found beneath one root
#[derive(Debug, Clone, Default)]
pub struct WalkResult {
    pub files: Vec<FileRecord>,
    /// Names of every directory encountered (not paths)
    pub folders: Vec<String>,
    /// Paths that could not be read under [`UnreadablePolicy::Skip`]
    pub skipped: Vec<String>,
}

/// Filesystem walker
pub struct Walker {
    root: PathBuf,
    config: WalkerConfig,
}

impl Walker {
    /// Create a new walker for the given root path
    pub fn new(root: PathBuf) -> Self {
        Self {
            root,
            config: WalkerConfig::default(),
        }
    }

    /// Create a walker with custom configuration
    pub fn with_config(root: PathBuf, config: WalkerConfig) -> Self {
        Self { root, config }
    }

    /// Walk the tree, hashing each regular file.
    ///
    /// Recorded paths are the root joined with the traversed segments.
    /// Siblings are visited in file-name order.
    pub fn walk(&self) -> Result<WalkResult, ScanError> {
        if !self.root.is_dir() {
            return Err(ScanError::Walk(format!(
                "{} is not a directory",
                self.root.display()
            )));
        }

        let mut result = WalkResult::default();
        let mut depth_warned = false;

        let walker = WalkDir::new(&self.root)
            .follow_links(self.config.follow_symlinks)
            .min_depth(1)
            .max_depth(self.config.max_depth)
            .sort_by_file_name();

        for entry in walker {
            let entry = match entry {
                Ok(entry) => entry,
                Err(err) => {
                    self.handle_walk_error(err, &mut result)?;
                    continue;
                }
            };

            let file_type = entry.file_type();
            if file_type.is_dir() {
                result
                    .folders
                    .push(entry.file_name().to_string_lossy().into_owned());
                if entry.depth() == self.config.max_depth && !depth_warned {
                    warn!(
                        root = %self.root.display(),
                        path = %entry.path().display(),
                        max_depth = self.config.max_depth,
                        "Depth limit reached; deeper entries are not scanned"
                    );
                    depth_warned = true;
                }
            } else if file_type.is_file() {
                match hasher::hash_file_chunked(
                    entry.path(),
                    self.config.algorithm,
                    self.config.chunk_size,
                ) {
                    Ok(hash) => result.files.push(FileRecord::new(
                        entry.path().to_string_lossy().into_owned(),
                        hash,
                    )),
                    Err(err) => self.handle_unreadable(err, &mut result)?,
                }
            } else {
                // Unfollowed symlinks, sockets, fifos, devices
                debug!(path = %entry.path().display(), "Skipping non-regular entry");
            }
        }

        Ok(result)
    }

    fn handle_walk_error(
        &self,
        err: walkdir::Error,
        result: &mut WalkResult,
    ) -> Result<(), ScanError> {
        let path = err.path().map(Path::to_path_buf);

        if let Some(ancestor) = err.loop_ancestor() {
            return Err(ScanError::SymlinkLoop(
                path.unwrap_or_else(|| ancestor.to_path_buf()),
            ));
        }

        // A dangling link cannot be followed; there is no content to hash
        if let Some(ref p) = path {
            let dangling = std::fs::symlink_metadata(p)
                .map(|m| m.file_type().is_symlink())
                .unwrap_or(false)
                && !p.exists();
            if dangling {
                debug!(path = %p.display(), "Skipping dangling symbolic link");
                return Ok(());
            }
        }

        let message = err.to_string();
        match (path, err.into_io_error()) {
            (Some(path), Some(source)) => {
                self.handle_unreadable(ScanError::IoFailure { path, source }, result)
            }
            _ => Err(ScanError::Walk(message)),
        }
    }

    fn handle_unreadable(&self, err: ScanError, result: &mut WalkResult) -> Result<(), ScanError> {
        match (self.config.on_unreadable, err) {
            (UnreadablePolicy::Skip, ScanError::IoFailure { path, source }) => {
                warn!(path = %path.display(), error = %source, "Skipping unreadable entry");
                result.skipped.push(path.to_string_lossy().into_owned());
                Ok(())
            }
            (_, err) => Err(err),
        }
    }
}
