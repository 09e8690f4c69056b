//! netcall: send one HTTP request with timeout, retry, and logging policy.
//!
//! Entry point for the netcall application.

use netcall::config::{Cli, Command, ValidatedConfig, write_default_config};
use std::process::ExitCode;

mod app;
mod run;

use app::{exit_code, print_config_hint, setup_tracing};

/// Main entry point.
///
/// Excluded from coverage as it's the thin wrapper around testable components.
#[cfg(not(tarpaulin_include))]
fn main() -> ExitCode {
    let cli = Cli::parse_args();

    let args = match &cli.command {
        Command::Init { output } => return handle_init(output),
        Command::Send(args) => args,
    };

    // Load and validate configuration
    let config = match ValidatedConfig::load(&cli, args) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Configuration error: {e}");
            print_config_hint(&e);
            return exit_code::CONFIG_ERROR;
        }
    };

    // Setup logging and run
    setup_tracing(config.verbose);
    tracing::debug!("{config}");

    run_request(config)
}

/// Handles the `init` subcommand.
fn handle_init(output: &std::path::Path) -> ExitCode {
    match write_default_config(output) {
        Ok(()) => {
            println!("Configuration template written to: {}", output.display());
            exit_code::SUCCESS
        }
        Err(e) => {
            eprintln!("Error: {e}");
            exit_code::CONFIG_ERROR
        }
    }
}

/// Sends the request and prints the response body.
///
/// Excluded from coverage - requires async runtime.
#[cfg(not(tarpaulin_include))]
fn run_request(config: ValidatedConfig) -> ExitCode {
    let runtime = match tokio::runtime::Runtime::new() {
        Ok(runtime) => runtime,
        Err(e) => {
            eprintln!("Error: failed to create Tokio runtime: {e}");
            return exit_code::request_error();
        }
    };

    match runtime.block_on(run::execute(config)) {
        Ok(body) => {
            println!("{body}");
            exit_code::SUCCESS
        }
        Err(e) => {
            tracing::error!("Request failed: {e}");
            if let Some(body) = e.body().filter(|b| !b.is_empty()) {
                println!("{body}");
            }
            exit_code::request_error()
        }
    }
}
