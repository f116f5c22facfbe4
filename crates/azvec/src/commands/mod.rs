//! Command implementations for the azvec CLI.

pub mod completions;
pub mod config;
pub mod filter;
pub mod indexes;
pub mod query;
pub mod upsert;

use azure_vector_store_rs::error::VectorStoreError;

use crate::cli::Cli;

/// Error type for command execution.
#[derive(Debug, thiserror::Error)]
pub enum CommandError {
    /// Vector store error.
    #[error("{0}")]
    Store(#[from] VectorStoreError),

    /// Invalid command input.
    #[error("invalid input: {0}")]
    Input(String),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error.
    #[error("serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type for command execution.
pub type Result<T> = std::result::Result<T, CommandError>;

/// Context for command execution, containing common dependencies.
pub struct CommandContext {
    /// Whether to output JSON.
    pub json_output: bool,
    /// Whether to use colors.
    pub use_colors: bool,
    /// Whether to be quiet (errors only).
    pub quiet: bool,
    /// Whether to be verbose.
    pub verbose: bool,
}

impl CommandContext {
    /// Creates a new command context from CLI arguments.
    pub fn from_cli(cli: &Cli) -> Self {
        Self {
            json_output: cli.json,
            use_colors: !cli.no_color && std::env::var_os("NO_COLOR").is_none(),
            quiet: cli.quiet,
            verbose: cli.verbose,
        }
    }

    /// Prints a line unless quiet or in JSON mode.
    pub fn status(&self, message: impl std::fmt::Display) {
        if !self.quiet && !self.json_output {
            println!("{message}");
        }
    }
}
