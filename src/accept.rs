//! Acceptance: promote the latest scan into the baseline, wholesale or per path.

use crate::error::ApiError;
use crate::store::{meta_keys, SnapshotStore};
use crate::types::Generation;
use chrono::Utc;
use serde::Serialize;
use tracing::info;

/// What an acceptance wrote into the baseline
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AcceptOutcome {
    /// `None` for whole acceptance
    pub path: Option<String>,
    /// Records now taken from `current`
    pub records: usize,
}

/// Make `current` the new baseline.
///
/// With `selected_path`, only that path is reconciled: its baseline record is
/// dropped and replaced by the current one if it still exists, which accepts
/// a deletion when it does not.
pub fn accept(
    store: &dyn SnapshotStore,
    selected_path: Option<&str>,
) -> Result<AcceptOutcome, ApiError> {
    let current_algorithm = store.meta(meta_keys::CURRENT_ALGORITHM)?;

    let outcome = match selected_path {
        None => {
            let records = store.replace_generation(Generation::Baseline, Generation::Current)?;
            if let Some(algorithm) = &current_algorithm {
                store.set_meta(meta_keys::BASELINE_ALGORITHM, algorithm)?;
            }
            info!(records, "Accepted current generation as baseline");
            AcceptOutcome {
                path: None,
                records,
            }
        }
        Some(path) => {
            let present = store.copy_record(Generation::Current, Generation::Baseline, path)?;
            if store.meta(meta_keys::BASELINE_ALGORITHM)?.is_none() {
                if let Some(algorithm) = &current_algorithm {
                    store.set_meta(meta_keys::BASELINE_ALGORITHM, algorithm)?;
                }
            }
            if present {
                info!(path, "Accepted current record into baseline");
            } else {
                info!(path, "Path absent from current scan; removed from baseline");
            }
            AcceptOutcome {
                path: Some(path.to_string()),
                records: usize::from(present),
            }
        }
    };

    store.set_meta(meta_keys::LAST_ACCEPT_AT, &Utc::now().to_rfc3339())?;
    store.flush()?;
    Ok(outcome)
}
