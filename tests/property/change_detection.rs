//! Property-based tests for change detection between generations

use hashaudit::diff::{compute_changes, ChangeKind};
use hashaudit::types::FileRecord;
use proptest::prelude::*;
use std::collections::BTreeMap;

fn generation() -> impl Strategy<Value = Vec<FileRecord>> {
    proptest::collection::btree_map("/[a-e]{1,3}", "[0-9a-f]{2}", 0..12).prop_map(|map| {
        map.into_iter()
            .map(|(path, hash)| FileRecord::new(path, hash))
            .collect()
    })
}

fn rank(kind: ChangeKind) -> u8 {
    match kind {
        ChangeKind::Modified => 0,
        ChangeKind::Removed => 1,
        ChangeKind::Added => 2,
    }
}

proptest! {
    /// A generation compared with itself has no changes
    #[test]
    fn test_identical_generations_yield_nothing(records in generation()) {
        prop_assert!(compute_changes(&records, &records).is_empty());
    }

    /// Every path is reported at most once, under the right kind
    #[test]
    fn test_changes_classify_each_path(baseline in generation(), current in generation()) {
        let before: BTreeMap<_, _> = baseline.iter().map(|r| (r.path.clone(), r.hash.clone())).collect();
        let after: BTreeMap<_, _> = current.iter().map(|r| (r.path.clone(), r.hash.clone())).collect();
        let changes = compute_changes(&baseline, &current);

        let mut seen = std::collections::HashSet::new();
        for change in &changes.changes {
            prop_assert!(seen.insert(change.path.clone()));
            let expected = match (before.get(&change.path), after.get(&change.path)) {
                (Some(b), Some(a)) if b != a => Some(ChangeKind::Modified),
                (Some(_), None) => Some(ChangeKind::Removed),
                (None, Some(_)) => Some(ChangeKind::Added),
                _ => None,
            };
            prop_assert_eq!(Some(change.kind), expected);
        }

        let expected_count = before
            .keys()
            .chain(after.keys())
            .collect::<std::collections::BTreeSet<_>>()
            .into_iter()
            .filter(|p| before.get(*p) != after.get(*p))
            .count();
        prop_assert_eq!(changes.len(), expected_count);
    }

    /// Modified before removed before added, ascending path within each group
    #[test]
    fn test_changes_are_ordered(baseline in generation(), current in generation()) {
        let changes = compute_changes(&baseline, &current);
        let keys: Vec<(u8, &str)> = changes
            .changes
            .iter()
            .map(|c| (rank(c.kind), c.path.as_str()))
            .collect();
        let mut sorted = keys.clone();
        sorted.sort();
        prop_assert_eq!(keys, sorted);
    }
}
