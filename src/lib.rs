//! hashaudit: File Change Auditing
//!
//! Detects added, deleted and modified files under watched directories by
//! comparing content hashes from the latest scan against an accepted baseline.

pub mod accept;
pub mod cli;
pub mod config;
pub mod diff;
pub mod error;
pub mod logging;
pub mod roots;
pub mod scan;
pub mod status;
pub mod store;
pub mod tree;
pub mod types;
