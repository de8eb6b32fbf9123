//! Property-based tests for hashing determinism

use hashaudit::tree::hasher;
use hashaudit::types::HashAlgorithm;
use proptest::prelude::*;
use tempfile::TempDir;

fn algorithms() -> impl Strategy<Value = HashAlgorithm> {
    prop_oneof![
        Just(HashAlgorithm::Sha256),
        Just(HashAlgorithm::Sha512),
        Just(HashAlgorithm::Blake3),
    ]
}

/// Same bytes always yield the same digest
#[test]
fn test_content_hash_determinism_property() {
    let mut runner = proptest::test_runner::TestRunner::default();

    runner
        .run(
            &(any::<Vec<u8>>(), any::<Vec<u8>>(), algorithms()),
            |(content1, content2, algorithm)| {
                let hash1 = hasher::hash_bytes(&content1, algorithm);
                let hash2 = hasher::hash_bytes(&content2, algorithm);

                if content1 == content2 {
                    prop_assert_eq!(&hash1, &hash2);
                } else {
                    // Collisions are astronomically unlikely
                    prop_assume!(hash1 != hash2);
                }

                prop_assert_eq!(hash1.len(), algorithm.hex_len());
                prop_assert!(hash1
                    .chars()
                    .all(|c| c.is_ascii_digit() || ('a'..='f').contains(&c)));
                Ok(())
            },
        )
        .unwrap();
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    /// Streaming a file in any chunk size matches hashing its bytes at once
    #[test]
    fn test_file_hash_independent_of_chunk_size(
        content in proptest::collection::vec(any::<u8>(), 0..20_000),
        chunk_size in 1usize..9_000,
        algorithm in algorithms(),
    ) {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("payload");
        std::fs::write(&path, &content).unwrap();

        let streamed = hasher::hash_file_chunked(&path, algorithm, chunk_size).unwrap();
        prop_assert_eq!(streamed, hasher::hash_bytes(&content, algorithm));
    }
}
