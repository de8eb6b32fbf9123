//! Error types for the hashaudit change-audit system.

use std::path::PathBuf;
use thiserror::Error;

/// Snapshot store errors
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Snapshot store not initialized at {0}")]
    NotInitialized(PathBuf),

    #[error("Duplicate record for path: {0}")]
    DuplicateKey(String),

    #[error("Store operation failed: {0}")]
    Backend(String),

    #[error("Failed to encode or decode stored value: {0}")]
    Codec(String),

    #[error("Storage I/O error: {0}")]
    IoError(#[from] std::io::Error),
}

impl From<sled::Error> for StoreError {
    fn from(err: sled::Error) -> Self {
        StoreError::Backend(err.to_string())
    }
}

impl From<bincode::Error> for StoreError {
    fn from(err: bincode::Error) -> Self {
        StoreError::Codec(err.to_string())
    }
}

/// Filesystem walk and hashing errors
#[derive(Debug, Error)]
pub enum ScanError {
    #[error("Hash method not supported: {0}")]
    UnsupportedAlgorithm(String),

    #[error("Failed to read {path:?}: {source}")]
    IoFailure {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Symbolic link loop detected at {0:?}")]
    SymlinkLoop(PathBuf),

    #[error("Failed to walk directory: {0}")]
    Walk(String),
}

/// Operation-level errors surfaced to the command line
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("create database first")]
    StoreNotInitialized,

    #[error("path {0} does not exist")]
    MissingRoot(String),

    #[error(transparent)]
    Scan(#[from] ScanError),

    #[error(transparent)]
    Store(StoreError),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Input error: {0}")]
    Input(String),
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotInitialized(_) => ApiError::StoreNotInitialized,
            other => ApiError::Store(other),
        }
    }
}

impl From<config::ConfigError> for ApiError {
    fn from(err: config::ConfigError) -> Self {
        ApiError::ConfigError(err.to_string())
    }
}
