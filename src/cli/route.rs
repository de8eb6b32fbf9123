//! CLI route: single route table and run context. Dispatches to domain services and presentation.

use crate::accept::accept;
use crate::config::{AuditConfig, ConfigLoader};
use crate::diff::diff;
use crate::error::ApiError;
use crate::roots;
use crate::scan::rescan;
use crate::status::{build_store_status, format_store_status_text};
use crate::store::{AddRootOutcome, InitOutcome, SledSnapshotStore};
use std::io::IsTerminal;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::cli::parse::Commands;
use crate::cli::presentation::{
    format_changes_json, format_changes_text, format_roots_json, format_roots_text,
    format_scan_json,
};

/// Runtime context for CLI execution: resolved configuration and store location.
pub struct RunContext {
    config: AuditConfig,
    store_path: PathBuf,
    color: bool,
}

impl RunContext {
    /// Create run context from an optional config path and store override.
    pub fn new(
        config_path: Option<&Path>,
        store_override: Option<PathBuf>,
        color: bool,
    ) -> Result<Self, ApiError> {
        let config = ConfigLoader::resolve(config_path)?.validated()?;
        Ok(Self::from_config(config, store_override, color))
    }

    /// Create run context from an already loaded configuration
    pub fn from_config(config: AuditConfig, store_override: Option<PathBuf>, color: bool) -> Self {
        let store_path = store_override.unwrap_or_else(|| config.store.path.clone());
        Self {
            config,
            store_path,
            color,
        }
    }

    fn open_store(&self) -> Result<SledSnapshotStore, ApiError> {
        debug!(store = %self.store_path.display(), "Opening snapshot store");
        Ok(SledSnapshotStore::open(&self.store_path)?)
    }

    /// Execute a CLI command via the single route table.
    pub fn execute(&self, command: &Commands) -> Result<String, ApiError> {
        match command {
            Commands::Init => self.handle_init(),
            Commands::Accept { path, yes } => self.handle_accept(path.as_deref(), *yes),
            Commands::Scan { format } => self.handle_scan(format),
            Commands::Diff { format } => self.handle_diff(format),
            Commands::AddRoot { path } => self.handle_add_root(path),
            Commands::RemoveRoot { path } => self.handle_remove_root(path),
            Commands::Roots { format } => self.handle_roots(format),
            Commands::Status { format } => self.handle_status(format),
        }
    }

    fn handle_init(&self) -> Result<String, ApiError> {
        let (_store, outcome) = SledSnapshotStore::initialize(&self.store_path)?;
        Ok(match outcome {
            InitOutcome::Created => "new database created".to_string(),
            InitOutcome::AlreadyExists => "database already exist".to_string(),
        })
    }

    fn handle_accept(&self, path: Option<&str>, yes: bool) -> Result<String, ApiError> {
        let store = self.open_store()?;

        if path.is_none() && !yes && std::io::stdin().is_terminal() {
            use dialoguer::Confirm;
            let pending = diff(&store)?.len();
            let confirmed = Confirm::new()
                .with_prompt(format!(
                    "Accept {} pending change(s) into the baseline?",
                    pending
                ))
                .interact()
                .map_err(|e| ApiError::Input(format!("Failed to get user input: {}", e)))?;

            if !confirmed {
                return Ok("Acceptance cancelled".to_string());
            }
        }

        accept(&store, path)?;
        Ok("OK".to_string())
    }

    fn handle_scan(&self, format: &str) -> Result<String, ApiError> {
        check_format(format)?;
        let walker_config = self.config.scan.walker_config()?;
        let store = self.open_store()?;

        let report = rescan(&store, &walker_config)?;
        let changes = diff(&store)?;

        if format == "json" {
            return format_scan_json(&report, &changes);
        }
        Ok(format_changes_text(&changes, self.color))
    }

    fn handle_diff(&self, format: &str) -> Result<String, ApiError> {
        check_format(format)?;
        let store = self.open_store()?;
        let changes = diff(&store)?;

        if format == "json" {
            return format_changes_json(&changes);
        }
        Ok(format_changes_text(&changes, self.color))
    }

    fn handle_add_root(&self, path: &str) -> Result<String, ApiError> {
        let store = self.open_store()?;
        Ok(match roots::add_root(&store, path)? {
            AddRootOutcome::Added(_) => "New path added".to_string(),
            AddRootOutcome::AlreadyPresent => "Path already in db".to_string(),
        })
    }

    fn handle_remove_root(&self, path: &str) -> Result<String, ApiError> {
        let store = self.open_store()?;
        roots::remove_root(&store, path)?;
        Ok("OK".to_string())
    }

    fn handle_roots(&self, format: &str) -> Result<String, ApiError> {
        check_format(format)?;
        let store = self.open_store()?;
        let roots = roots::list_roots(&store)?;

        if format == "json" {
            return format_roots_json(&roots);
        }
        Ok(format_roots_text(&roots))
    }

    fn handle_status(&self, format: &str) -> Result<String, ApiError> {
        check_format(format)?;
        let store = self.open_store()?;
        let status = build_store_status(&store, &self.store_path)?;

        if format == "json" {
            return serde_json::to_string_pretty(&status)
                .map_err(|e| ApiError::Input(format!("Failed to render JSON: {}", e)));
        }
        Ok(format_store_status_text(&status, self.color))
    }
}

fn check_format(format: &str) -> Result<(), ApiError> {
    match format {
        "text" | "json" => Ok(()),
        other => Err(ApiError::Input(format!(
            "Invalid format: {} (must be 'text' or 'json')",
            other
        ))),
    }
}
