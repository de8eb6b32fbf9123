//! Store status data and formatting for `hashaudit status`.
//!
//! Reports generation sizes, pending changes, root count and the timestamps
//! and algorithms recorded by the last scan and acceptance.

use crate::diff;
use crate::error::ApiError;
use crate::roots::overlapping_roots;
use crate::store::{meta_keys, SnapshotStore};
use crate::types::Generation;
use comfy_table::presets::UTF8_BORDERS_ONLY;
use comfy_table::Table;
use owo_colors::OwoColorize;
use serde::Serialize;
use std::path::Path;

#[derive(Debug, Clone, Serialize)]
pub struct StoreStatus {
    pub store_path: String,
    pub roots: usize,
    pub baseline_records: usize,
    pub current_records: usize,
    pub pending_changes: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_scan_at: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_accept_at: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_algorithm: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub baseline_algorithm: Option<String>,
    /// Pairs of roots where one contains the other
    pub overlapping_roots: Vec<(String, String)>,
}

pub fn build_store_status(
    store: &dyn SnapshotStore,
    store_path: &Path,
) -> Result<StoreStatus, ApiError> {
    let roots = store.list_roots()?;
    Ok(StoreStatus {
        store_path: store_path.display().to_string(),
        roots: roots.len(),
        baseline_records: store.record_count(Generation::Baseline)?,
        current_records: store.record_count(Generation::Current)?,
        pending_changes: diff::diff(store)?.len(),
        last_scan_at: store.meta(meta_keys::LAST_SCAN_AT)?,
        last_accept_at: store.meta(meta_keys::LAST_ACCEPT_AT)?,
        current_algorithm: store.meta(meta_keys::CURRENT_ALGORITHM)?,
        baseline_algorithm: store.meta(meta_keys::BASELINE_ALGORITHM)?,
        overlapping_roots: overlapping_roots(&roots),
    })
}

pub fn format_store_status_text(status: &StoreStatus, color: bool) -> String {
    let or_never = |v: &Option<String>| v.clone().unwrap_or_else(|| "never".to_string());
    let or_dash = |v: &Option<String>| v.clone().unwrap_or_else(|| "-".to_string());

    let mut table = Table::new();
    table.load_preset(UTF8_BORDERS_ONLY);
    table.add_row(vec!["Store".to_string(), status.store_path.clone()]);
    table.add_row(vec!["Watched roots".to_string(), status.roots.to_string()]);
    table.add_row(vec![
        "Baseline records".to_string(),
        status.baseline_records.to_string(),
    ]);
    table.add_row(vec![
        "Current records".to_string(),
        status.current_records.to_string(),
    ]);
    table.add_row(vec!["Last scan".to_string(), or_never(&status.last_scan_at)]);
    table.add_row(vec!["Last accept".to_string(), or_never(&status.last_accept_at)]);
    table.add_row(vec![
        "Algorithm (current / baseline)".to_string(),
        format!(
            "{} / {}",
            or_dash(&status.current_algorithm),
            or_dash(&status.baseline_algorithm)
        ),
    ]);

    let pending = if status.pending_changes == 0 {
        "No pending changes".to_string()
    } else {
        format!("{} pending change(s)", status.pending_changes)
    };
    let pending = match (color, status.pending_changes) {
        (false, _) => pending,
        (true, 0) => pending.green().to_string(),
        (true, _) => pending.yellow().to_string(),
    };

    let mut out = format!("{}\n{}", table, pending);
    for (outer, inner) in &status.overlapping_roots {
        out.push_str(&format!("\nOverlapping roots: {} and {}", outer, inner));
    }
    out
}
