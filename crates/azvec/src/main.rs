use std::process::ExitCode;

use azure_vector_store_rs::azure::AzureVectorStore;
use azure_vector_store_rs::error::{ErrorCategory, VectorStoreError};
use clap::Parser;
use tracing_subscriber::EnvFilter;

mod cli;
mod commands;
mod dispatch;
mod output;

use cli::Cli;
use commands::config::resolve_store_config;
use commands::{CommandContext, CommandError};
use dispatch::{LocalCommand, LocalDispatch, ServiceCommand, ServiceDispatch};

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(&cli);

    match run(&cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            if cli.json {
                let error_json = serde_json::json!({
                    "error": {
                        "code": error_code(&e),
                        "message": e.to_string(),
                    }
                });
                match serde_json::to_string_pretty(&error_json) {
                    Ok(text) => eprintln!("{text}"),
                    Err(_) => eprintln!("{error_json}"),
                }
            } else {
                eprintln!("Error: {e}");
            }
            ExitCode::from(exit_status(&e))
        }
    }
}

/// Logs go to stderr so stdout stays machine-readable.
fn init_tracing(cli: &Cli) {
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else if cli.quiet {
        EnvFilter::new("error")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

async fn run(cli: &Cli) -> commands::Result<()> {
    let ctx = CommandContext::from_cli(cli);

    if let Some(dispatch) = LocalDispatch::try_from_cli(cli) {
        return dispatch.execute(&ctx);
    }

    let Some(dispatch) = ServiceDispatch::from_cli(cli) else {
        return Ok(());
    };
    let config = resolve_store_config(cli)?;
    let store = AzureVectorStore::from_config(&config)?;
    dispatch.execute(&ctx, &store).await
}

/// Returns the error code string for JSON output.
fn error_code(e: &CommandError) -> &'static str {
    match e {
        CommandError::Store(VectorStoreError::Config(_)) => "CONFIG_ERROR",
        CommandError::Store(err) => match err.category() {
            ErrorCategory::User => "VALIDATION_ERROR",
            ErrorCategory::ThirdParty => "STORE_ERROR",
        },
        CommandError::Input(_) => "INPUT_ERROR",
        CommandError::Config(_) => "CONFIG_ERROR",
        CommandError::Io(_) => "IO_ERROR",
        CommandError::Json(_) => "JSON_ERROR",
    }
}

/// Returns the process exit status for an error.
fn exit_status(e: &CommandError) -> u8 {
    match e {
        CommandError::Config(_) | CommandError::Store(VectorStoreError::Config(_)) => 5,
        CommandError::Store(err) => match err.category() {
            ErrorCategory::User => 4,
            ErrorCategory::ThirdParty => 2,
        },
        CommandError::Input(_) | CommandError::Json(_) => 1,
        CommandError::Io(_) => 3,
    }
}
