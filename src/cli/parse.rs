//! CLI parse: clap types for hashaudit. No behavior; definitions only.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// hashaudit - detect added, deleted and modified files against an accepted baseline
#[derive(Parser)]
#[command(name = "hashaudit")]
#[command(about = "Detect file changes by comparing content hashes against an accepted baseline")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Snapshot store location (overrides config)
    #[arg(long, global = true)]
    pub store: Option<PathBuf>,

    /// Configuration file path (overrides default config loading)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(long, global = true)]
    pub verbose: bool,

    /// Disable all logging
    #[arg(long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Log level (trace, debug, info, warn, error, off)
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    /// Log format (json, text)
    #[arg(long, global = true)]
    pub log_format: Option<String>,

    /// Log output (stdout, stderr, file)
    #[arg(long, global = true)]
    pub log_output: Option<String>,

    /// Log file path (if output is "file")
    #[arg(long, global = true)]
    pub log_file: Option<PathBuf>,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Create a new snapshot store
    Init,
    /// Accept scanned state as the new baseline
    Accept {
        /// Accept only this file path
        #[arg(long, visible_alias = "one")]
        path: Option<String>,
        /// Skip the confirmation prompt
        #[arg(long, short = 'y')]
        yes: bool,
    },
    /// Rescan all watched roots and report changes
    Scan {
        /// Output format (text or json)
        #[arg(long, default_value = "text")]
        format: String,
    },
    /// Report changes from the last scan without rescanning
    Diff {
        /// Output format (text or json)
        #[arg(long, default_value = "text")]
        format: String,
    },
    /// Add a directory to the watched roots
    AddRoot {
        /// Directory path
        path: String,
    },
    /// Remove a directory from the watched roots
    RemoveRoot {
        /// Directory path
        path: String,
    },
    /// List watched roots
    Roots {
        /// Output format (text or json)
        #[arg(long, default_value = "text")]
        format: String,
    },
    /// Show store status
    Status {
        /// Output format (text or json)
        #[arg(long, default_value = "text")]
        format: String,
    },
}
