//! Query command implementation.

use azure_vector_store_rs::azure::{AzureQueryOptions, AzureVectorStore};
use azure_vector_store_rs::store::{QueryFilter, QueryParams, VectorStore};
use tracing::debug;

use super::filter::parse_filter_expression;
use super::{CommandContext, CommandError, Result};
use crate::output::{format_query_results_json, format_query_results_table};

/// Options for the query command.
#[derive(Debug)]
pub struct QueryOptions {
    pub index: String,
    /// JSON array of numbers.
    pub vector: String,
    pub top_k: usize,
    pub filter: Option<String>,
    pub text: Option<String>,
    pub semantic_configuration: Option<String>,
}

/// Parses a JSON array of numbers.
pub fn parse_vector(input: &str) -> Result<Vec<f32>> {
    serde_json::from_str(input)
        .map_err(|e| CommandError::Input(format!("vector must be a JSON array of numbers: {e}")))
}

/// Reads `--filter`: a JSON object is a filter expression, anything else is
/// passed through as a native filter.
pub fn parse_query_filter(input: &str) -> Result<QueryFilter> {
    if input.trim_start().starts_with('{') {
        Ok(QueryFilter::Expression(parse_filter_expression(input)?))
    } else {
        Ok(QueryFilter::Raw(input.to_string()))
    }
}

/// Executes the query command.
pub async fn execute(ctx: &CommandContext, store: &AzureVectorStore, opts: &QueryOptions) -> Result<()> {
    let vector = parse_vector(&opts.vector)?;
    let mut params: QueryParams<AzureQueryOptions> = QueryParams::new(&opts.index, vector)
        .top_k(opts.top_k)
        .options(AzureQueryOptions {
            query_text: opts.text.clone(),
            semantic_configuration: opts.semantic_configuration.clone(),
            ..Default::default()
        });
    if let Some(filter) = &opts.filter {
        let filter = parse_query_filter(filter)?;
        debug!(filter = ?filter.to_native(), "using filter");
        params = params.filter(filter);
    }

    let results = store.query(params).await?;

    if ctx.json_output {
        println!("{}", format_query_results_json(&results)?);
    } else if !ctx.quiet {
        print!("{}", format_query_results_table(&results, ctx.use_colors));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_vector() {
        assert_eq!(parse_vector("[0.5, 1, -2]").unwrap(), vec![0.5, 1.0, -2.0]);
        assert!(parse_vector("0.5, 1").is_err());
        assert!(parse_vector(r#"["a"]"#).is_err());
    }

    #[test]
    fn test_parse_query_filter_expression() {
        let filter = parse_query_filter(r#" {"gt": {"price": 10}}"#).unwrap();
        assert!(matches!(filter, QueryFilter::Expression(_)));
        assert_eq!(filter.to_native().as_deref(), Some("price gt 10"));
    }

    #[test]
    fn test_parse_query_filter_raw() {
        let filter = parse_query_filter("rating ge 4").unwrap();
        assert_eq!(filter, QueryFilter::Raw("rating ge 4".to_string()));
    }

    #[test]
    fn test_parse_query_filter_bad_json() {
        assert!(parse_query_filter("{not json").is_err());
    }
}
