//! Merge rules: defaults, override order, conflict handling.

use crate::tree::hasher::DEFAULT_CHUNK_SIZE;
use crate::tree::walker::DEFAULT_MAX_DEPTH;
use config::builder::DefaultState;
use config::Config;
use config::ConfigBuilder;
use config::ConfigError;
use config::Environment;

/// Prefix for environment overrides, e.g. `HASHAUDIT__SCAN__ALGORITHM=sha512`
pub const ENV_PREFIX: &str = "HASHAUDIT";

/// Create a Config builder with merge policy defaults applied.
pub fn builder_with_defaults() -> Result<ConfigBuilder<DefaultState>, ConfigError> {
    Config::builder()
        .set_default("store.path", "hashaudit.db")?
        .set_default("scan.algorithm", "sha256")?
        .set_default("scan.chunk_size", DEFAULT_CHUNK_SIZE as i64)?
        .set_default("scan.max_depth", DEFAULT_MAX_DEPTH as i64)?
        .set_default("scan.follow_symlinks", true)?
        .set_default("scan.on_unreadable", "abort")
}

/// Environment variables override every file source, so they are added last.
pub fn add_environment(builder: ConfigBuilder<DefaultState>) -> ConfigBuilder<DefaultState> {
    builder.add_source(
        Environment::with_prefix(ENV_PREFIX)
            .separator("__")
            .try_parsing(true),
    )
}
