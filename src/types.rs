//! Core data model: file records, generations, watched roots, hash algorithms.

use crate::error::ScanError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// One file at one point in time. `path` is the key within a generation.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct FileRecord {
    pub path: String,
    /// Lowercase hex digest
    pub hash: String,
}

impl FileRecord {
    pub fn new(path: impl Into<String>, hash: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            hash: hash.into(),
        }
    }
}

/// The two snapshot generations held by the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Generation {
    /// Last accepted state
    Baseline,
    /// Most recent scan result
    Current,
}

impl Generation {
    /// Name of the store tree holding this generation
    pub fn tree_name(&self) -> &'static str {
        match self {
            Generation::Baseline => "baseline",
            Generation::Current => "current",
        }
    }
}

impl fmt::Display for Generation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tree_name())
    }
}

/// A directory the audit is responsible for scanning.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WatchedRoot {
    pub id: u64,
    pub path: String,
}

/// Supported content digest functions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum HashAlgorithm {
    #[default]
    Sha256,
    Sha512,
    Blake3,
}

impl HashAlgorithm {
    pub fn as_str(&self) -> &'static str {
        match self {
            HashAlgorithm::Sha256 => "sha256",
            HashAlgorithm::Sha512 => "sha512",
            HashAlgorithm::Blake3 => "blake3",
        }
    }

    /// Length of the hex-encoded digest
    pub fn hex_len(&self) -> usize {
        match self {
            HashAlgorithm::Sha256 | HashAlgorithm::Blake3 => 64,
            HashAlgorithm::Sha512 => 128,
        }
    }
}

impl fmt::Display for HashAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for HashAlgorithm {
    type Err = ScanError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('-', "").as_str() {
            "sha256" => Ok(HashAlgorithm::Sha256),
            "sha512" => Ok(HashAlgorithm::Sha512),
            "blake3" => Ok(HashAlgorithm::Blake3),
            _ => Err(ScanError::UnsupportedAlgorithm(s.to_string())),
        }
    }
}
