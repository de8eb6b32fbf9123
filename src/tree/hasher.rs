//! Content hashing for files using a selectable digest algorithm
//!
//! Files are streamed through the digest in fixed-size blocks so memory use
//! stays bounded regardless of file size.

use crate::error::ScanError;
use crate::types::HashAlgorithm;
use sha2::{Digest, Sha256, Sha512};
use std::fs::File;
use std::io::{ErrorKind, Read};
use std::path::Path;

/// Block size used when reading file content
pub const DEFAULT_CHUNK_SIZE: usize = 4096;

/// Running digest state for one of the supported algorithms
enum DigestState {
    Sha256(Sha256),
    Sha512(Sha512),
    Blake3(Box<blake3::Hasher>),
}

impl DigestState {
    fn new(algorithm: HashAlgorithm) -> Self {
        match algorithm {
            HashAlgorithm::Sha256 => DigestState::Sha256(Sha256::new()),
            HashAlgorithm::Sha512 => DigestState::Sha512(Sha512::new()),
            HashAlgorithm::Blake3 => DigestState::Blake3(Box::new(blake3::Hasher::new())),
        }
    }

    fn update(&mut self, bytes: &[u8]) {
        match self {
            DigestState::Sha256(h) => h.update(bytes),
            DigestState::Sha512(h) => h.update(bytes),
            DigestState::Blake3(h) => {
                h.update(bytes);
            }
        }
    }

    fn finalize_hex(self) -> String {
        match self {
            DigestState::Sha256(h) => hex::encode(h.finalize()),
            DigestState::Sha512(h) => hex::encode(h.finalize()),
            DigestState::Blake3(h) => hex::encode(h.finalize().as_bytes()),
        }
    }
}

/// Hash a file with the default block size
pub fn hash_file(path: &Path, algorithm: HashAlgorithm) -> Result<String, ScanError> {
    hash_file_chunked(path, algorithm, DEFAULT_CHUNK_SIZE)
}

/// Hash a file given the algorithm by name.
///
/// The name is resolved before the file is opened, so an unsupported
/// algorithm never touches the filesystem.
pub fn hash_file_by_name(path: &Path, algorithm: &str) -> Result<String, ScanError> {
    let algorithm: HashAlgorithm = algorithm.parse()?;
    hash_file(path, algorithm)
}

/// Hash a file reading `chunk_size` bytes at a time.
///
/// Returns the lowercase hex digest.
pub fn hash_file_chunked(
    path: &Path,
    algorithm: HashAlgorithm,
    chunk_size: usize,
) -> Result<String, ScanError> {
    let io_failure = |source: std::io::Error| ScanError::IoFailure {
        path: path.to_path_buf(),
        source,
    };

    let mut file = File::open(path).map_err(io_failure)?;
    let mut state = DigestState::new(algorithm);
    let mut buffer = vec![0u8; chunk_size.max(1)];

    loop {
        let read = match file.read(&mut buffer) {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e) => return Err(io_failure(e)),
        };
        state.update(&buffer[..read]);
    }

    Ok(state.finalize_hex())
}

/// Hash in-memory content
pub fn hash_bytes(content: &[u8], algorithm: HashAlgorithm) -> String {
    let mut state = DigestState::new(algorithm);
    state.update(content);
    state.finalize_hex()
}
