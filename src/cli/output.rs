//! CLI output: decides where a failed command's message goes and how the process exits.

use crate::error::ApiError;

/// How a command failure reaches the user
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureReport {
    /// Operation outcome printed on stdout as the command's result line; exit 0
    ResultLine(String),
    /// Configuration or usage problem printed on stderr; exit 1
    Fatal(String),
}

impl FailureReport {
    pub fn message(&self) -> &str {
        match self {
            FailureReport::ResultLine(msg) | FailureReport::Fatal(msg) => msg,
        }
    }

    pub fn exit_code(&self) -> i32 {
        match self {
            FailureReport::ResultLine(_) => 0,
            FailureReport::Fatal(_) => 1,
        }
    }
}

/// Classify an error from a command run.
///
/// Store and scan failures become the command's result line. Only bad
/// configuration or arguments fail the process.
pub fn map_error(e: &ApiError) -> FailureReport {
    match e {
        ApiError::StoreNotInitialized
        | ApiError::MissingRoot(_)
        | ApiError::Store(_)
        | ApiError::Scan(_) => FailureReport::ResultLine(e.to_string()),
        ApiError::ConfigError(_) | ApiError::Input(_) => FailureReport::Fatal(e.to_string()),
    }
}
