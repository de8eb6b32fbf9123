//! Snapshot store persistence across process-like reopen cycles

use hashaudit::error::StoreError;
use hashaudit::store::{meta_keys, InitOutcome, SledSnapshotStore, SnapshotStore};
use hashaudit::types::{FileRecord, Generation};
use tempfile::TempDir;

use crate::integration::AuditFixture;

#[test]
fn test_open_before_initialize_fails() {
    let temp_dir = TempDir::new().unwrap();
    let result = SledSnapshotStore::open(temp_dir.path().join("files.db"));
    assert!(matches!(result, Err(StoreError::NotInitialized(_))));
}

#[test]
fn test_initialize_twice_reports_existing() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("files.db");

    {
        let (_store, outcome) = SledSnapshotStore::initialize(&path).unwrap();
        assert_eq!(outcome, InitOutcome::Created);
    }
    let (_store, outcome) = SledSnapshotStore::initialize(&path).unwrap();
    assert_eq!(outcome, InitOutcome::AlreadyExists);
}

#[test]
fn test_state_survives_reopen() {
    let fx = AuditFixture::watching_data();
    fx.write("a.txt", "x");
    fx.scan();
    fx.accept_all();
    fx.write("a.txt", "y");
    fx.scan();

    let store_path = fx.store_path().to_path_buf();
    let expected_lines = fx.diff_lines();
    let AuditFixture { temp, store, .. } = fx;
    drop(store);

    let reopened = SledSnapshotStore::open(&store_path).unwrap();
    assert_eq!(reopened.list_roots().unwrap().len(), 1);
    assert_eq!(reopened.record_count(Generation::Baseline).unwrap(), 1);
    assert_eq!(reopened.record_count(Generation::Current).unwrap(), 1);
    assert!(reopened.meta(meta_keys::LAST_SCAN_AT).unwrap().is_some());
    assert_eq!(
        hashaudit::diff::diff(&reopened).unwrap().lines(),
        expected_lines
    );
    drop(temp);
}

#[test]
fn test_generations_are_independent() {
    let fx = AuditFixture::new();
    let record = FileRecord::new("/data/a.txt", "aa");

    fx.store.insert_record(Generation::Current, &record).unwrap();
    assert_eq!(fx.store.record(Generation::Current, "/data/a.txt").unwrap(), Some(record));
    assert_eq!(fx.store.record(Generation::Baseline, "/data/a.txt").unwrap(), None);

    fx.store.clear_generation(Generation::Current).unwrap();
    assert_eq!(fx.store.record_count(Generation::Current).unwrap(), 0);
}

#[test]
fn test_duplicate_record_rejected() {
    let fx = AuditFixture::new();
    let record = FileRecord::new("/data/a.txt", "aa");

    fx.store.insert_record(Generation::Baseline, &record).unwrap();
    let err = fx
        .store
        .insert_record(Generation::Baseline, &FileRecord::new("/data/a.txt", "bb"))
        .unwrap_err();
    assert!(matches!(err, StoreError::DuplicateKey(_)));
    assert_eq!(
        fx.store.record(Generation::Baseline, "/data/a.txt").unwrap(),
        Some(record)
    );
}

#[test]
fn test_replace_generation_copies_all_records() {
    let fx = AuditFixture::new();
    fx.store
        .replace_generation_with(
            Generation::Current,
            &[FileRecord::new("/b", "2"), FileRecord::new("/a", "1")],
        )
        .unwrap();
    fx.store
        .insert_record(Generation::Baseline, &FileRecord::new("/stale", "0"))
        .unwrap();

    let copied = fx
        .store
        .replace_generation(Generation::Baseline, Generation::Current)
        .unwrap();
    assert_eq!(copied, 2);
    assert_eq!(
        fx.store.records(Generation::Baseline).unwrap(),
        vec![FileRecord::new("/a", "1"), FileRecord::new("/b", "2")]
    );
}
