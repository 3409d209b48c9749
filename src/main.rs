//! Tactful CLI entrypoint for rewriting feedback.

use std::io::{self, Write};
use std::process::ExitCode;

use ortho_config::OrthoConfig;
use tactful::{OperationMode, RewriteError, TactfulConfig};
use tracing_subscriber::EnvFilter;

mod cli;

const LOG_ENV_VAR: &str = "TACTFUL_LOG";
const DEFAULT_LOG_FILTER: &str = "warn";

fn main() -> ExitCode {
    init_tracing();

    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            if writeln!(io::stderr().lock(), "{error}").is_err() {
                return ExitCode::FAILURE;
            }
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<(), RewriteError> {
    let config = load_config()?;
    config.validate()?;

    match config.operation_mode() {
        OperationMode::SingleRewrite => cli::rewrite::run(&config),
        OperationMode::BatchRewrite => cli::batch::run(&config),
        OperationMode::MissingInput => Err(RewriteError::EmptyInput),
    }
}

/// Loads configuration from CLI, environment, and files.
///
/// # Errors
///
/// Returns [`RewriteError::Configuration`] when ortho-config fails to parse
/// arguments or load configuration files.
fn load_config() -> Result<TactfulConfig, RewriteError> {
    TactfulConfig::load().map_err(|error| RewriteError::Configuration {
        message: error.to_string(),
    })
}

/// Installs the stderr log subscriber, filtered by `TACTFUL_LOG`.
fn init_tracing() {
    let filter = EnvFilter::try_from_env(LOG_ENV_VAR)
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}
