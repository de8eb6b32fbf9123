//! CLI presentation: text and json formatters per command.

use crate::diff::{ChangeKind, ChangeSet};
use crate::error::ApiError;
use crate::scan::ScanReport;
use crate::types::WatchedRoot;
use comfy_table::Table;
use owo_colors::OwoColorize;
use serde_json::json;

/// Printed by `scan` and `diff` when nothing changed
pub const NO_CHANGES: &str = "No errors found";

fn to_json<T: serde::Serialize>(value: &T) -> Result<String, ApiError> {
    serde_json::to_string_pretty(value)
        .map_err(|e| ApiError::Input(format!("Failed to render JSON: {}", e)))
}

/// One line per change, or the no-changes message
pub fn format_changes_text(changes: &ChangeSet, color: bool) -> String {
    if changes.is_empty() {
        return NO_CHANGES.to_string();
    }
    changes
        .changes
        .iter()
        .map(|change| {
            let line = change.to_string();
            if !color {
                return line;
            }
            match change.kind {
                ChangeKind::Modified => line.yellow().to_string(),
                ChangeKind::Removed => line.red().to_string(),
                ChangeKind::Added => line.green().to_string(),
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn format_changes_json(changes: &ChangeSet) -> Result<String, ApiError> {
    to_json(changes)
}

pub fn format_scan_json(report: &ScanReport, changes: &ChangeSet) -> Result<String, ApiError> {
    to_json(&json!({
        "scan": report,
        "changes": changes.changes,
    }))
}

pub fn format_roots_text(roots: &[WatchedRoot]) -> String {
    if roots.is_empty() {
        return "No watched roots".to_string();
    }
    let mut table = Table::new();
    table.load_preset(comfy_table::presets::UTF8_FULL);
    table.set_header(vec!["ID", "Path"]);
    for root in roots {
        table.add_row(vec![root.id.to_string(), root.path.clone()]);
    }
    table.to_string()
}

pub fn format_roots_json(roots: &[WatchedRoot]) -> Result<String, ApiError> {
    to_json(&roots)
}
