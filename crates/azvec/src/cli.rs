//! CLI argument parsing using clap derive macros.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

/// azvec - Manage and query Azure AI Search vector indexes
#[derive(Parser, Debug)]
#[command(name = "azvec")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Verbose output (debug logging)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Quiet mode (errors only)
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Output JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Disable colors in output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Search service endpoint (default: from config)
    #[arg(long, global = true, env = "AZURE_SEARCH_ENDPOINT")]
    pub endpoint: Option<String>,

    /// Admin or query key (default: from config)
    #[arg(long, global = true, env = "AZURE_SEARCH_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Translate a JSON filter expression to an OData filter string
    Filter {
        /// Filter expression, e.g. '{"eq": {"category": "books"}}'
        expression: String,
    },

    /// Manage indexes
    #[command(alias = "idx")]
    Indexes {
        #[command(subcommand)]
        command: IndexesCommands,
    },

    /// Find the nearest neighbours of a vector
    #[command(alias = "q")]
    Query {
        /// Index name
        #[arg(short, long)]
        index: String,

        /// Query vector as a JSON array, e.g. '[0.1, 0.2, 0.3]'
        #[arg(long)]
        vector: String,

        /// Number of results
        #[arg(short = 'k', long, default_value = "10")]
        top_k: usize,

        /// Filter: a JSON filter expression or a raw OData filter
        #[arg(short, long)]
        filter: Option<String>,

        /// Text for hybrid search
        #[arg(long)]
        text: Option<String>,

        /// Semantic configuration for reranking
        #[arg(long)]
        semantic_configuration: Option<String>,
    },

    /// Upsert vectors from a JSON Lines file
    Upsert {
        /// Index name
        #[arg(short, long)]
        index: String,

        /// File with one {"id", "vector", "metadata"} object per line
        #[arg(long)]
        file: PathBuf,
    },

    /// Delete a vector by id
    DeleteVector {
        /// Index name
        #[arg(short, long)]
        index: String,

        /// Vector id
        id: String,
    },

    /// Show configuration
    Config {
        #[command(subcommand)]
        command: Option<ConfigCommands>,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        shell: Shell,
    },
}

/// Index subcommands
#[derive(Subcommand, Debug)]
pub enum IndexesCommands {
    /// List index names
    #[command(alias = "ls")]
    List,

    /// Show dimension, document count, and metric of an index
    Describe {
        /// Index name
        name: String,
    },

    /// Create a vector index
    Create {
        /// Index name
        name: String,

        /// Vector dimension
        #[arg(short, long)]
        dimension: usize,

        /// Similarity metric
        #[arg(short, long, value_enum, default_value = "cosine")]
        metric: MetricArg,

        /// Filterable field projected from metadata, as name:type (repeatable)
        #[arg(long = "filterable", action = clap::ArgAction::Append)]
        filterable: Vec<String>,

        /// Add a semantic configuration over the content field
        #[arg(long)]
        semantic: bool,
    },

    /// Delete an index
    #[command(alias = "rm")]
    Delete {
        /// Index name
        name: String,
    },
}

/// Config subcommands
#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show current configuration
    Show,

    /// Show config file path
    Path,
}

/// Similarity metrics accepted on the command line
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum MetricArg {
    Cosine,
    Euclidean,
    DotProduct,
}

/// Shell types for completions
#[derive(ValueEnum, Clone, Debug)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
    Powershell,
}
