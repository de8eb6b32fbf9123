//! Configuration System
//!
//! Layered configuration: built-in defaults, then the global config file (or
//! an explicit `--config` file), then `HASHAUDIT__*` environment variables.

use crate::error::ApiError;
use crate::logging::LoggingConfig;
use crate::tree::hasher::DEFAULT_CHUNK_SIZE;
use crate::tree::walker::{UnreadablePolicy, WalkerConfig, DEFAULT_MAX_DEPTH};
use crate::types::HashAlgorithm;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

mod merge;
mod sources;

pub use sources::global_file::global_config_path;

/// Root configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AuditConfig {
    #[serde(default)]
    pub store: StoreConfig,

    #[serde(default)]
    pub scan: ScanSettings,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Snapshot store location
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    #[serde(default = "default_store_path")]
    pub path: PathBuf,
}

fn default_store_path() -> PathBuf {
    PathBuf::from("hashaudit.db")
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            path: default_store_path(),
        }
    }
}

/// Scan behavior
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanSettings {
    /// sha256, sha512 or blake3
    #[serde(default = "default_algorithm")]
    pub algorithm: String,

    #[serde(default = "default_chunk_size")]
    pub chunk_size: usize,

    #[serde(default = "default_max_depth")]
    pub max_depth: usize,

    #[serde(default = "default_follow_symlinks")]
    pub follow_symlinks: bool,

    #[serde(default)]
    pub on_unreadable: UnreadablePolicy,
}

fn default_algorithm() -> String {
    HashAlgorithm::default().as_str().to_string()
}

fn default_chunk_size() -> usize {
    DEFAULT_CHUNK_SIZE
}

fn default_max_depth() -> usize {
    DEFAULT_MAX_DEPTH
}

fn default_follow_symlinks() -> bool {
    true
}

impl Default for ScanSettings {
    fn default() -> Self {
        Self {
            algorithm: default_algorithm(),
            chunk_size: default_chunk_size(),
            max_depth: default_max_depth(),
            follow_symlinks: default_follow_symlinks(),
            on_unreadable: UnreadablePolicy::default(),
        }
    }
}

impl ScanSettings {
    /// Resolve into a walker configuration; fails on an unknown algorithm
    pub fn walker_config(&self) -> Result<WalkerConfig, ApiError> {
        let algorithm: HashAlgorithm = self.algorithm.parse()?;
        Ok(WalkerConfig {
            algorithm,
            chunk_size: self.chunk_size,
            follow_symlinks: self.follow_symlinks,
            max_depth: self.max_depth,
            on_unreadable: self.on_unreadable,
        })
    }

    pub fn validate(&self) -> Result<(), String> {
        self.algorithm
            .parse::<HashAlgorithm>()
            .map_err(|e| e.to_string())?;
        if self.chunk_size == 0 {
            return Err("chunk_size must be greater than zero".to_string());
        }
        if self.max_depth == 0 {
            return Err("max_depth must be greater than zero".to_string());
        }
        Ok(())
    }
}

/// Configuration validation errors
#[derive(Debug, Clone)]
pub enum ValidationError {
    Store(String),
    Scan(String),
    Logging(String),
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ValidationError::Store(msg) => write!(f, "Store: {}", msg),
            ValidationError::Scan(msg) => write!(f, "Scan: {}", msg),
            ValidationError::Logging(msg) => write!(f, "Logging: {}", msg),
        }
    }
}

impl std::error::Error for ValidationError {}

impl AuditConfig {
    /// Validate the entire configuration
    pub fn validate(&self) -> Result<(), Vec<ValidationError>> {
        let mut errors = Vec::new();

        if self.store.path.as_os_str().is_empty() {
            errors.push(ValidationError::Store(
                "Store path cannot be empty".to_string(),
            ));
        }
        if let Err(e) = self.scan.validate() {
            errors.push(ValidationError::Scan(e));
        }
        if let Err(e) = self.logging.validate() {
            errors.push(ValidationError::Logging(e));
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    /// Validate and fold every problem into one error
    pub fn validated(self) -> Result<Self, ApiError> {
        self.validate().map_err(|errors| {
            let error_msgs: Vec<String> = errors.iter().map(|e| e.to_string()).collect();
            ApiError::ConfigError(format!(
                "Configuration validation failed:\n{}",
                error_msgs.join("\n")
            ))
        })?;
        Ok(self)
    }
}

/// Loads [`AuditConfig`] from layered sources
pub struct ConfigLoader;

impl ConfigLoader {
    /// Defaults, then the global config file, then environment
    pub fn load() -> Result<AuditConfig, ApiError> {
        let builder = merge::merge_policy::builder_with_defaults()?;
        let builder = sources::global_file::add_to_builder(builder)?;
        let builder = merge::merge_policy::add_environment(builder);
        Ok(builder.build()?.try_deserialize()?)
    }

    /// Defaults, then the given file, then environment
    pub fn load_from_file(path: &Path) -> Result<AuditConfig, ApiError> {
        let builder = merge::merge_policy::builder_with_defaults()?;
        let builder = sources::explicit_file::add_to_builder(builder, path)?;
        let builder = merge::merge_policy::add_environment(builder);
        Ok(builder.build()?.try_deserialize()?)
    }

    /// `load_from_file` when a path is given, `load` otherwise
    pub fn resolve(path: Option<&Path>) -> Result<AuditConfig, ApiError> {
        match path {
            Some(path) => Self::load_from_file(path),
            None => Self::load(),
        }
    }
}
