//! Path normalization utilities for watched roots

use std::path::Path;
use unicode_normalization::UnicodeNormalization;

/// Normalize a path string without filesystem access
///
/// Only trailing separators are removed (except for the root). Names are
/// compared byte for byte by the filesystem, so whitespace and Unicode form
/// are kept exactly as given.
pub fn normalize_path_string(path: &str) -> String {
    let mut result = path.to_string();
    if result.len() > 1 {
        while result.len() > 1 && (result.ends_with('/') || result.ends_with('\\')) {
            result.pop();
        }
    }
    result
}

/// Whether two roots overlap: one equals or contains the other.
///
/// Compares whole path components, so `/data` does not overlap `/database`.
/// Both sides are compared in NFC so composed and decomposed spellings of
/// the same name still count as overlapping.
pub fn roots_overlap(a: &str, b: &str) -> bool {
    let a: String = a.nfc().collect();
    let b: String = b.nfc().collect();
    let (a, b) = (Path::new(&a), Path::new(&b));
    a.starts_with(b) || b.starts_with(a)
}
