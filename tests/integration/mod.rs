//! Integration tests for the hashaudit file change auditor

mod cli_commands;
mod config_integration;
mod store_integration;

pub use test_utils::AuditFixture;
