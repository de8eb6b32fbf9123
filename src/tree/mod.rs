//! Filesystem traversal and content hashing
//!
//! The walker enumerates every regular file beneath a watched root and the
//! hasher turns each one into a digest, producing the records a scan stores.

pub mod hasher;
pub mod path;
pub mod walker;
