//! Routes parsed CLI commands to their handlers.
//!
//! Local commands run without contacting the search service. Service commands
//! need a store built from the resolved endpoint and key.

use azure_vector_store_rs::azure::AzureVectorStore;

use crate::cli::{Cli, Commands, ConfigCommands, IndexesCommands, MetricArg, Shell};
use crate::commands::indexes::IndexCreateOptions;
use crate::commands::query::QueryOptions;
use crate::commands::{self, CommandContext, CommandError, Result};

/// Trait for commands that run without a search service.
pub trait LocalCommand {
    /// Execute the command locally.
    fn execute(&self, ctx: &CommandContext) -> Result<()>;
}

/// Trait for commands that talk to the search service.
#[allow(async_fn_in_trait)]
pub trait ServiceCommand {
    /// Execute the command against the given store.
    async fn execute(&self, ctx: &CommandContext, store: &AzureVectorStore) -> Result<()>;
}

/// Commands that don't need credentials.
pub enum LocalDispatch<'a> {
    Filter(&'a str),
    Config(&'a Option<ConfigCommands>),
    Completions(&'a Shell),
    Help,
}

impl<'a> LocalDispatch<'a> {
    /// Returns None if the command needs the search service.
    pub fn try_from_cli(cli: &'a Cli) -> Option<Self> {
        match &cli.command {
            Some(Commands::Filter { expression }) => Some(Self::Filter(expression)),
            Some(Commands::Config { command }) => Some(Self::Config(command)),
            Some(Commands::Completions { shell }) => Some(Self::Completions(shell)),
            None => Some(Self::Help),
            _ => None,
        }
    }
}

impl LocalCommand for LocalDispatch<'_> {
    fn execute(&self, ctx: &CommandContext) -> Result<()> {
        match self {
            Self::Filter(expression) => commands::filter::execute(ctx, expression),
            Self::Config(Some(ConfigCommands::Path)) => commands::config::execute_path(ctx),
            Self::Config(Some(ConfigCommands::Show) | None) => commands::config::execute_show(ctx),
            Self::Completions(shell) => {
                commands::completions::execute(shell).map_err(CommandError::Io)
            }
            Self::Help => {
                if !ctx.quiet {
                    println!("azvec - Azure AI Search vector CLI");
                    println!("Use --help for usage information");
                }
                Ok(())
            }
        }
    }
}

/// Commands that need the search service.
pub enum ServiceDispatch<'a> {
    ListIndexes,
    DescribeIndex(&'a str),
    CreateIndex {
        name: &'a str,
        dimension: usize,
        metric: MetricArg,
        filterable: &'a [String],
        semantic: bool,
    },
    DeleteIndex(&'a str),
    Query {
        index: &'a str,
        vector: &'a str,
        top_k: usize,
        filter: &'a Option<String>,
        text: &'a Option<String>,
        semantic_configuration: &'a Option<String>,
    },
    Upsert {
        index: &'a str,
        file: &'a std::path::Path,
    },
    DeleteVector {
        index: &'a str,
        id: &'a str,
    },
}

impl<'a> ServiceDispatch<'a> {
    /// Returns None for local commands.
    pub fn from_cli(cli: &'a Cli) -> Option<Self> {
        let dispatch = match cli.command.as_ref()? {
            Commands::Indexes { command } => match command {
                IndexesCommands::List => Self::ListIndexes,
                IndexesCommands::Describe { name } => Self::DescribeIndex(name),
                IndexesCommands::Create {
                    name,
                    dimension,
                    metric,
                    filterable,
                    semantic,
                } => Self::CreateIndex {
                    name,
                    dimension: *dimension,
                    metric: *metric,
                    filterable,
                    semantic: *semantic,
                },
                IndexesCommands::Delete { name } => Self::DeleteIndex(name),
            },
            Commands::Query {
                index,
                vector,
                top_k,
                filter,
                text,
                semantic_configuration,
            } => Self::Query {
                index,
                vector,
                top_k: *top_k,
                filter,
                text,
                semantic_configuration,
            },
            Commands::Upsert { index, file } => Self::Upsert { index, file },
            Commands::DeleteVector { index, id } => Self::DeleteVector { index, id },
            Commands::Filter { .. } | Commands::Config { .. } | Commands::Completions { .. } => {
                return None
            }
        };
        Some(dispatch)
    }
}

impl ServiceCommand for ServiceDispatch<'_> {
    async fn execute(&self, ctx: &CommandContext, store: &AzureVectorStore) -> Result<()> {
        match self {
            Self::ListIndexes => commands::indexes::execute_list(ctx, store).await,
            Self::DescribeIndex(name) => commands::indexes::execute_describe(ctx, store, name).await,
            Self::CreateIndex {
                name,
                dimension,
                metric,
                filterable,
                semantic,
            } => {
                let opts = IndexCreateOptions {
                    name: name.to_string(),
                    dimension: *dimension,
                    metric: *metric,
                    filterable: filterable.to_vec(),
                    semantic: *semantic,
                };
                commands::indexes::execute_create(ctx, store, &opts).await
            }
            Self::DeleteIndex(name) => commands::indexes::execute_delete(ctx, store, name).await,
            Self::Query {
                index,
                vector,
                top_k,
                filter,
                text,
                semantic_configuration,
            } => {
                let opts = QueryOptions {
                    index: index.to_string(),
                    vector: vector.to_string(),
                    top_k: *top_k,
                    filter: (*filter).clone(),
                    text: (*text).clone(),
                    semantic_configuration: (*semantic_configuration).clone(),
                };
                commands::query::execute(ctx, store, &opts).await
            }
            Self::Upsert { index, file } => commands::upsert::execute(ctx, store, index, file).await,
            Self::DeleteVector { index, id } => {
                commands::upsert::execute_delete(ctx, store, index, id).await
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    fn parse(args: &[&str]) -> Cli {
        let mut full = vec!["azvec"];
        full.extend_from_slice(args);
        Cli::try_parse_from(full).unwrap()
    }

    #[test]
    fn test_local_commands() {
        let cli = parse(&["filter", "{}"]);
        assert!(matches!(LocalDispatch::try_from_cli(&cli), Some(LocalDispatch::Filter("{}"))));
        assert!(ServiceDispatch::from_cli(&cli).is_none());

        let cli = parse(&["config", "path"]);
        assert!(matches!(
            LocalDispatch::try_from_cli(&cli),
            Some(LocalDispatch::Config(Some(ConfigCommands::Path)))
        ));

        let cli = parse(&[]);
        assert!(matches!(LocalDispatch::try_from_cli(&cli), Some(LocalDispatch::Help)));
    }

    #[test]
    fn test_service_commands() {
        let cli = parse(&["indexes", "describe", "docs"]);
        assert!(LocalDispatch::try_from_cli(&cli).is_none());
        assert!(matches!(
            ServiceDispatch::from_cli(&cli),
            Some(ServiceDispatch::DescribeIndex("docs"))
        ));

        let cli = parse(&["query", "-i", "docs", "--vector", "[1]", "-k", "3"]);
        match ServiceDispatch::from_cli(&cli) {
            Some(ServiceDispatch::Query { index, top_k, .. }) => {
                assert_eq!(index, "docs");
                assert_eq!(top_k, 3);
            }
            _ => panic!("Expected Query dispatch"),
        }

        let cli = parse(&["delete-vector", "-i", "docs", "doc-1"]);
        assert!(matches!(
            ServiceDispatch::from_cli(&cli),
            Some(ServiceDispatch::DeleteVector { index: "docs", id: "doc-1" })
        ));
    }
}
