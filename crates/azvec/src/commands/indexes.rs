//! Index management commands.

use azure_vector_store_rs::azure::{AzureIndexOptions, AzureVectorStore, FieldSpec, FieldType};
use azure_vector_store_rs::store::{CreateIndexParams, Metric, VectorStore};

use super::{CommandContext, CommandError, Result};
use crate::cli::MetricArg;
use crate::output::{
    format_index_names_json, format_index_names_table, format_index_stats_json,
    format_index_stats_table,
};

/// Options for the indexes create command.
#[derive(Debug)]
pub struct IndexCreateOptions {
    pub name: String,
    pub dimension: usize,
    pub metric: MetricArg,
    /// Filterable fields as `name:type`.
    pub filterable: Vec<String>,
    pub semantic: bool,
}

impl From<MetricArg> for Metric {
    fn from(arg: MetricArg) -> Self {
        match arg {
            MetricArg::Cosine => Metric::Cosine,
            MetricArg::Euclidean => Metric::Euclidean,
            MetricArg::DotProduct => Metric::DotProduct,
        }
    }
}

/// Parses a `name:type` filterable field declaration.
pub fn parse_field_spec(spec: &str) -> Result<FieldSpec> {
    let (name, field_type) = spec.split_once(':').unwrap_or((spec, "string"));
    if name.is_empty() {
        return Err(CommandError::Input(format!("field '{spec}' has no name")));
    }
    let field_type = match field_type.to_lowercase().as_str() {
        "string" => FieldType::String,
        "int32" | "int" => FieldType::Int32,
        "int64" | "long" => FieldType::Int64,
        "double" | "float" => FieldType::Double,
        "boolean" | "bool" => FieldType::Boolean,
        "datetime" | "datetimeoffset" => FieldType::DateTimeOffset,
        "strings" | "string-collection" => FieldType::StringCollection,
        other => {
            return Err(CommandError::Input(format!(
                "unknown field type '{other}' for '{name}'. Valid types: string, int32, int64, \
                 double, boolean, datetime, strings"
            )))
        }
    };
    Ok(FieldSpec::new(name, field_type))
}

/// Executes the indexes list command.
pub async fn execute_list(ctx: &CommandContext, store: &AzureVectorStore) -> Result<()> {
    let names = store.list_indexes().await?;

    if ctx.json_output {
        println!("{}", format_index_names_json(&names)?);
    } else if !ctx.quiet {
        print!("{}", format_index_names_table(&names, ctx.use_colors));
    }
    Ok(())
}

/// Executes the indexes describe command.
pub async fn execute_describe(
    ctx: &CommandContext,
    store: &AzureVectorStore,
    name: &str,
) -> Result<()> {
    let stats = store.describe_index(name).await?;

    if ctx.json_output {
        println!("{}", format_index_stats_json(name, &stats)?);
    } else if !ctx.quiet {
        print!("{}", format_index_stats_table(name, &stats, ctx.use_colors));
    }
    Ok(())
}

/// Executes the indexes create command.
pub async fn execute_create(
    ctx: &CommandContext,
    store: &AzureVectorStore,
    opts: &IndexCreateOptions,
) -> Result<()> {
    let filterable_fields = opts
        .filterable
        .iter()
        .map(|spec| parse_field_spec(spec))
        .collect::<Result<Vec<_>>>()?;
    let options = AzureIndexOptions {
        filterable_fields,
        semantic: opts.semantic,
        ..Default::default()
    };

    store
        .create_index(
            CreateIndexParams::new(&opts.name, opts.dimension)
                .metric(opts.metric.into())
                .options(options),
        )
        .await?;

    if ctx.json_output {
        let output = serde_json::json!({
            "status": "success",
            "index": opts.name,
            "dimension": opts.dimension,
            "metric": Metric::from(opts.metric).service_name(),
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else {
        ctx.status(format!("Index {} is ready.", opts.name));
    }
    Ok(())
}

/// Executes the indexes delete command.
pub async fn execute_delete(ctx: &CommandContext, store: &AzureVectorStore, name: &str) -> Result<()> {
    store.delete_index(name).await?;

    if ctx.json_output {
        let output = serde_json::json!({ "status": "success", "deleted": name });
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else {
        ctx.status(format!("Deleted index {name}."));
    }
    Ok(())
}
