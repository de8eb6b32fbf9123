//! hashaudit CLI Binary
//!
//! Command-line interface for the hashaudit file change auditor.

use clap::Parser;
use hashaudit::cli::{map_error, Cli, FailureReport, RunContext};
use hashaudit::config::ConfigLoader;
use hashaudit::error::ApiError;
use hashaudit::logging::{init_logging, resolve_log_file_path, LoggingConfig};
use std::io::IsTerminal;
use std::process;
use tracing::{error, info, warn};

fn main() {
    let cli = Cli::parse();

    // Build logging config from CLI args, env vars, and config file
    let logging_config = build_logging_config(&cli);

    if let Err(e) = init_logging(Some(&logging_config)) {
        eprintln!("Failed to initialize logging: {}", e);
        process::exit(1);
    }

    info!("hashaudit starting");

    let color = !cli.no_color && std::io::stdout().is_terminal();
    let context = match RunContext::new(cli.config.as_deref(), cli.store.clone(), color) {
        Ok(ctx) => ctx,
        Err(e) => report_failure(&e),
    };

    match context.execute(&cli.command) {
        Ok(output) => {
            info!("Command completed successfully");
            println!("{}", output);
        }
        Err(e) => report_failure(&e),
    }
}

/// Print a failed command's message where it belongs and exit accordingly
fn report_failure(e: &ApiError) -> ! {
    let report = map_error(e);
    match &report {
        FailureReport::ResultLine(message) => {
            warn!("Command did not complete: {}", e);
            println!("{}", message);
        }
        FailureReport::Fatal(message) => {
            error!("Command failed: {}", e);
            eprintln!("{}", message);
        }
    }
    process::exit(report.exit_code());
}

/// Build logging configuration from CLI args and config file.
/// Precedence: CLI flags override config file override defaults.
fn build_logging_config(cli: &Cli) -> LoggingConfig {
    let mut config = ConfigLoader::resolve(cli.config.as_deref())
        .map(|c| c.logging)
        .unwrap_or_default();

    if cli.quiet {
        config.enabled = false;
    }
    if cli.verbose {
        config.level = "debug".to_string();
    }
    if let Some(ref level) = cli.log_level {
        config.level = level.clone();
    }
    if let Some(ref format) = cli.log_format {
        config.format = format.clone();
    }
    if let Some(ref output) = cli.log_output {
        config.output = output.clone();
    }
    if cli.no_color {
        config.color = false;
    }

    if config.enabled && config.output == "file" {
        config.file = Some(resolve_log_file_path(
            cli.log_file.clone(),
            config.file.clone(),
        ));
    } else if let Some(ref file) = cli.log_file {
        config.file = Some(file.clone());
    }

    config
}
