//! CLI entry point and dispatch logic
//!
//! This module owns the `run()` function which:
//! - Parses CLI arguments
//! - Discovers Config
//! - Builds the Gemini backends (reads the API key once)
//! - Creates the single-threaded tokio runtime
//! - Dispatches to command handlers
//! - Handles all error output

use std::io::{self, Write};

use anyhow::Result;
use clap::Parser;
use tracing::debug;

use super::args::{Cli, Commands};
use super::commands;

use crate::error::ConfigError;
use crate::logging::init_tracing;
use crate::redaction::redact_secrets;
use crate::{AdOrchestrator, AdcraftError, Config, ExitCode};

/// Main CLI execution function.
///
/// This function handles ALL output including errors. It returns `Result<(), ExitCode>`:
/// - On success: returns `Ok(())` after printing any output
/// - On error: prints a user-facing report, returns `Err(ExitCode)`
///
/// main.rs only calls `std::process::exit(code.as_i32())` on error - it does NOT print.
pub fn run() -> Result<(), ExitCode> {
    let cli = Cli::parse();
    let cli_args = cli.config_overrides();
    let command = cli.command.unwrap_or(Commands::Wizard);
    let operation = command.operation();

    let config = match Config::discover(&cli_args) {
        Ok(config) => config,
        Err(err) => return Err(report_config_error(err)),
    };

    if let Err(e) = init_tracing(config.verbose()) {
        eprintln!("✗ Failed to initialize logging: {e}");
    }
    debug!(operation, text_model = config.text_model(), "Configuration loaded");

    match command {
        Commands::Config { json } => finish(
            commands::execute_config_command(&config, json, &mut io::stdout().lock()),
            operation,
        ),
        Commands::Generate(args) => {
            let form = commands::form_from_args(&args).map_err(|err| report(&err, operation))?;
            let orchestrator = build_orchestrator(&config, operation)?;
            let runtime = build_runtime()?;
            let result = runtime.block_on(async {
                let mut stdout = io::stdout().lock();
                commands::execute_generate_command(&orchestrator, form, &args, &config, &mut stdout)
                    .await
            });
            finish(result, operation)
        }
        Commands::Wizard => {
            let orchestrator = build_orchestrator(&config, operation)?;
            let runtime = build_runtime()?;
            let result = runtime.block_on(commands::execute_wizard_command(orchestrator));
            finish(result, operation)
        }
    }
}

/// The API key is read here, once, before any stage is shown.
fn build_orchestrator(config: &Config, operation: &str) -> Result<AdOrchestrator, ExitCode> {
    AdOrchestrator::from_config(config).map_err(|err| report(&AdcraftError::from(err), operation))
}

fn build_runtime() -> Result<tokio::runtime::Runtime, ExitCode> {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(|e| {
            eprintln!("✗ Failed to create async runtime: {e}");
            ExitCode::INTERNAL
        })
}

fn report_config_error(err: anyhow::Error) -> ExitCode {
    match err.downcast::<ConfigError>() {
        Ok(config_err) => report(&AdcraftError::Config(config_err), "config"),
        Err(other) => {
            eprintln!("✗ Failed to load configuration: {}", redact_secrets(&format!("{other:#}")));
            ExitCode::CLI_ARGS
        }
    }
}

fn report(err: &AdcraftError, operation: &str) -> ExitCode {
    let mut stderr = io::stderr().lock();
    let _ = writeln!(stderr, "✗ adcraft {operation} failed");
    let _ = write!(stderr, "{}", err.display_for_user());
    err.to_exit_code()
}

/// Handle command errors with structured reporting.
fn finish(result: Result<()>, operation: &str) -> Result<(), ExitCode> {
    let Err(error) = result else {
        return Ok(());
    };

    if let Some(adcraft_error) = error.downcast_ref::<AdcraftError>() {
        return Err(report(adcraft_error, operation));
    }

    // Output closed early, e.g. piped into `head`.
    if let Some(io_error) = error.downcast_ref::<io::Error>()
        && io_error.kind() == io::ErrorKind::BrokenPipe
    {
        return Ok(());
    }

    let redacted = redact_secrets(&format!("{error:#}"));
    eprintln!("✗ Unexpected error: {redacted}");
    eprintln!("\n  General troubleshooting:");
    eprintln!("    - Run with --verbose for more detailed output");
    eprintln!("    - Check that the {operation} command's input and output are available");
    Err(ExitCode::INTERNAL)
}
