//! Query result and upsert output formatting.

use azure_vector_store_rs::store::QueryResult;
use serde::Serialize;

use super::helpers::{header_line, truncate_str};

/// Maximum document characters shown in a table row.
const DOCUMENT_WIDTH: usize = 60;

#[derive(Serialize)]
struct QueryResultsOutput<'a> {
    results: &'a [QueryResult],
}

#[derive(Serialize)]
struct UpsertOutput<'a> {
    index: &'a str,
    count: usize,
    ids: &'a [String],
}

/// Formats query results as JSON.
pub fn format_query_results_json(results: &[QueryResult]) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(&QueryResultsOutput { results })
}

/// Formats query results as a table, best match first.
pub fn format_query_results_table(results: &[QueryResult], use_colors: bool) -> String {
    if results.is_empty() {
        return "No results.\n".to_string();
    }

    let id_width = results
        .iter()
        .map(|r| r.id.chars().count())
        .max()
        .unwrap_or(0)
        .max(2);

    let mut output = header_line(
        &format!("{:<8} {:<id_width$} {}", "Score", "ID", "Document"),
        use_colors,
    );
    for result in results {
        let document = result
            .document
            .as_deref()
            .map(|d| truncate_str(&d.replace('\n', " "), DOCUMENT_WIDTH))
            .unwrap_or_default();
        output.push_str(&format!(
            "{:<8.4} {:<id_width$} {}\n",
            result.score, result.id, document
        ));
    }
    output
}

/// Formats upserted ids as JSON.
pub fn format_upsert_json(index: &str, ids: &[String]) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(&UpsertOutput {
        index,
        count: ids.len(),
        ids,
    })
}

/// Formats an upsert summary.
pub fn format_upsert_table(index: &str, ids: &[String]) -> String {
    format!("Upserted {} vectors into {index}.\n", ids.len())
}
