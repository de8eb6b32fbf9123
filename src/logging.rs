//! Logging System
//!
//! Structured logging built on `tracing`. Level, format and destination come
//! from [`LoggingConfig`], with environment variables taking precedence.
//! Logs default to stderr so stdout carries only command results.

use crate::error::ApiError;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Mutex;
use tracing_subscriber::fmt::time::ChronoUtc;
use tracing_subscriber::fmt::writer::BoxMakeWriter;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Registry};

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Install a subscriber at all
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Log level: trace, debug, info, warn, error, off
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Output format: json, text
    #[serde(default = "default_format")]
    pub format: String,

    /// Output destination: stdout, stderr, file
    #[serde(default = "default_output")]
    pub output: String,

    /// Log file path when output is "file"
    #[serde(default)]
    pub file: Option<PathBuf>,

    /// Enable colored output (text format, terminal destinations only)
    #[serde(default = "default_true")]
    pub color: bool,

    /// Module-specific log levels
    #[serde(default)]
    pub modules: HashMap<String, String>,
}

fn default_log_level() -> String {
    "warn".to_string()
}

fn default_format() -> String {
    "text".to_string()
}

fn default_output() -> String {
    "stderr".to_string()
}

fn default_true() -> bool {
    true
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            level: default_log_level(),
            format: default_format(),
            output: default_output(),
            file: None,
            color: true,
            modules: HashMap::new(),
        }
    }
}

impl LoggingConfig {
    pub fn validate(&self) -> Result<(), String> {
        parse_format(&self.format)?;
        parse_output(&self.output)?;
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LogFormat {
    Text,
    Json,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LogOutput {
    Stdout,
    Stderr,
    File,
}

fn parse_format(format: &str) -> Result<LogFormat, String> {
    match format {
        "text" => Ok(LogFormat::Text),
        "json" => Ok(LogFormat::Json),
        other => Err(format!(
            "Invalid log format: {} (must be 'json' or 'text')",
            other
        )),
    }
}

fn parse_output(output: &str) -> Result<LogOutput, String> {
    match output {
        "stdout" => Ok(LogOutput::Stdout),
        "stderr" => Ok(LogOutput::Stderr),
        "file" => Ok(LogOutput::File),
        other => Err(format!(
            "Invalid log output: {} (must be 'stdout', 'stderr' or 'file')",
            other
        )),
    }
}

/// Default log file under the platform state (or data) directory
pub fn default_log_file_path() -> PathBuf {
    ProjectDirs::from("", "", "hashaudit")
        .map(|dirs| {
            dirs.state_dir()
                .unwrap_or_else(|| dirs.data_local_dir())
                .join("hashaudit.log")
        })
        .unwrap_or_else(|| PathBuf::from("hashaudit.log"))
}

/// Pick the log file: CLI flag, then config, then the platform default
pub fn resolve_log_file_path(cli_file: Option<PathBuf>, config_file: Option<PathBuf>) -> PathBuf {
    cli_file
        .or(config_file)
        .unwrap_or_else(default_log_file_path)
}

/// Initialize the logging system
///
/// Priority order (highest to lowest):
/// 1. Environment variables (HASHAUDIT_LOG, HASHAUDIT_LOG_FORMAT, HASHAUDIT_LOG_OUTPUT)
/// 2. The given configuration (already merged with CLI flags by the caller)
/// 3. Defaults
pub fn init_logging(config: Option<&LoggingConfig>) -> Result<(), ApiError> {
    let default_config = LoggingConfig::default();
    let config = config.unwrap_or(&default_config);
    if !config.enabled {
        return Ok(());
    }

    let filter = build_env_filter(config)?;
    let format = determine_format(config)?;
    let output = determine_output(config)?;

    let writer = match output {
        LogOutput::Stdout => BoxMakeWriter::new(std::io::stdout),
        LogOutput::Stderr => BoxMakeWriter::new(std::io::stderr),
        LogOutput::File => {
            let log_file = resolve_log_file_path(None, config.file.clone());
            if let Some(parent) = log_file.parent() {
                std::fs::create_dir_all(parent).map_err(|e| {
                    ApiError::ConfigError(format!("Failed to create log directory: {}", e))
                })?;
            }
            let file = std::fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(&log_file)
                .map_err(|e| {
                    ApiError::ConfigError(format!("Failed to open log file {:?}: {}", log_file, e))
                })?;
            BoxMakeWriter::new(Mutex::new(file))
        }
    };

    let base_subscriber = Registry::default().with(filter);

    let installed = match format {
        LogFormat::Json => base_subscriber
            .with(
                fmt::layer()
                    .json()
                    .with_target(true)
                    .with_timer(ChronoUtc::rfc_3339())
                    .with_writer(writer),
            )
            .try_init(),
        LogFormat::Text => base_subscriber
            .with(
                fmt::layer()
                    .with_target(true)
                    .with_timer(ChronoUtc::rfc_3339())
                    .with_ansi(config.color && output != LogOutput::File)
                    .with_writer(writer),
            )
            .try_init(),
    };

    installed.map_err(|e| ApiError::ConfigError(format!("Failed to install logger: {}", e)))
}

/// Build environment filter from config or environment variables
fn build_env_filter(config: &LoggingConfig) -> Result<EnvFilter, ApiError> {
    if let Ok(filter) = EnvFilter::try_from_env("HASHAUDIT_LOG") {
        return Ok(filter);
    }

    if config.level == "off" {
        return Ok(EnvFilter::new("off"));
    }

    let mut filter = EnvFilter::new(&config.level);
    for (module, module_level) in &config.modules {
        let directive = format!("{}={}", module, module_level);
        filter = filter.add_directive(
            directive
                .parse()
                .map_err(|e| ApiError::ConfigError(format!("Invalid log directive: {}", e)))?,
        );
    }

    Ok(filter)
}

fn determine_format(config: &LoggingConfig) -> Result<LogFormat, ApiError> {
    if let Ok(format) = std::env::var("HASHAUDIT_LOG_FORMAT") {
        if let Ok(format) = parse_format(&format) {
            return Ok(format);
        }
    }
    parse_format(&config.format).map_err(ApiError::ConfigError)
}

fn determine_output(config: &LoggingConfig) -> Result<LogOutput, ApiError> {
    if let Ok(output) = std::env::var("HASHAUDIT_LOG_OUTPUT") {
        return parse_output(&output).map_err(ApiError::ConfigError);
    }
    parse_output(&config.output).map_err(ApiError::ConfigError)
}
