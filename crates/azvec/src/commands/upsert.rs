//! Upsert command implementation.
//!
//! Reads JSON Lines input, one vector per line:
//!
//! ```text
//! {"id": "doc-1", "vector": [0.1, 0.2, 0.3], "metadata": {"text": "hello"}}
//! ```
//!
//! `id` and `metadata` are optional. Missing ids are generated. Records
//! without `metadata` leave any stored metadata unchanged.

use std::fs;
use std::path::Path;

use azure_vector_store_rs::azure::AzureVectorStore;
use azure_vector_store_rs::store::{DeleteVectorParams, Metadata, UpsertParams, VectorStore};
use serde::Deserialize;
use uuid::Uuid;

use super::{CommandContext, CommandError, Result};
use crate::output::{format_upsert_json, format_upsert_table};

/// One line of upsert input.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct UpsertRecord {
    id: Option<String>,
    vector: Vec<f32>,
    metadata: Option<Metadata>,
}

/// Parsed upsert input.
#[derive(Debug)]
pub struct UpsertBatches {
    /// Ids in input order.
    pub ids: Vec<String>,
    /// Records carrying metadata, then records without any. The second batch
    /// sends no metadata so documents that already exist keep theirs.
    pub batches: Vec<UpsertParams>,
}

/// Builds upsert batches from JSON Lines text. Blank lines are skipped.
pub fn parse_records(index: &str, input: &str) -> Result<UpsertBatches> {
    let mut records = Vec::new();
    for (number, line) in input.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        let record: UpsertRecord = serde_json::from_str(line)
            .map_err(|e| CommandError::Input(format!("line {}: {e}", number + 1)))?;
        records.push(record);
    }
    if records.is_empty() {
        return Err(CommandError::Input("no records to upsert".to_string()));
    }

    let mut ids = Vec::with_capacity(records.len());
    let mut with_metadata = (Vec::new(), Vec::new(), Vec::new());
    let mut without_metadata = (Vec::new(), Vec::new());
    for record in records {
        let id = record.id.unwrap_or_else(|| Uuid::new_v4().to_string());
        ids.push(id.clone());
        match record.metadata {
            Some(metadata) => {
                with_metadata.0.push(id);
                with_metadata.1.push(record.vector);
                with_metadata.2.push(metadata);
            }
            None => {
                without_metadata.0.push(id);
                without_metadata.1.push(record.vector);
            }
        }
    }

    let mut batches = Vec::new();
    if !with_metadata.0.is_empty() {
        let (batch_ids, vectors, metadata) = with_metadata;
        batches.push(UpsertParams::new(index, vectors).ids(batch_ids).metadata(metadata));
    }
    if !without_metadata.0.is_empty() {
        let (batch_ids, vectors) = without_metadata;
        batches.push(UpsertParams::new(index, vectors).ids(batch_ids));
    }
    Ok(UpsertBatches { ids, batches })
}

/// Executes the upsert command.
pub async fn execute(
    ctx: &CommandContext,
    store: &AzureVectorStore,
    index: &str,
    file: &Path,
) -> Result<()> {
    let input = fs::read_to_string(file)?;
    let UpsertBatches { ids, batches } = parse_records(index, &input)?;
    for batch in batches {
        store.upsert(batch).await?;
    }

    if ctx.json_output {
        println!("{}", format_upsert_json(index, &ids)?);
    } else if !ctx.quiet {
        print!("{}", format_upsert_table(index, &ids));
    }
    Ok(())
}

/// Executes the delete-vector command.
pub async fn execute_delete(
    ctx: &CommandContext,
    store: &AzureVectorStore,
    index: &str,
    id: &str,
) -> Result<()> {
    store
        .delete_vector(DeleteVectorParams {
            index_name: index.to_string(),
            id: id.to_string(),
        })
        .await?;

    if ctx.json_output {
        let output = serde_json::json!({ "status": "success", "index": index, "deleted": id });
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else {
        ctx.status(format!("Deleted {id} from {index}."));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_records_splits_by_metadata() {
        let input = r#"
{"id": "a", "vector": [1, 0], "metadata": {"text": "first"}}

{"vector": [0, 1]}
{"id": "c", "vector": [1, 1], "metadata": {}}
"#;
        let parsed = parse_records("docs", input).unwrap();
        assert_eq!(parsed.ids.len(), 3);
        assert_eq!(parsed.ids[0], "a");
        assert_eq!(parsed.ids[1].len(), 36);
        assert_eq!(parsed.ids[2], "c");
        assert_eq!(parsed.batches.len(), 2);

        let with_metadata = &parsed.batches[0];
        assert_eq!(with_metadata.index_name, "docs");
        assert_eq!(with_metadata.ids.as_deref(), Some(&["a".to_string(), "c".to_string()][..]));
        assert_eq!(with_metadata.vectors, vec![vec![1.0, 0.0], vec![1.0, 1.0]]);
        let metadata = with_metadata.metadata.as_ref().unwrap();
        assert_eq!(metadata[0]["text"], "first");
        assert!(metadata[1].is_empty());

        // Records without metadata must not clear what is already stored.
        let without_metadata = &parsed.batches[1];
        assert_eq!(without_metadata.ids.as_deref(), Some(&[parsed.ids[1].clone()][..]));
        assert_eq!(without_metadata.vectors, vec![vec![0.0, 1.0]]);
        assert!(without_metadata.metadata.is_none());
    }

    #[test]
    fn test_parse_records_without_metadata() {
        let parsed = parse_records("docs", r#"{"id": "a", "vector": [1]}"#).unwrap();
        assert_eq!(parsed.batches.len(), 1);
        assert!(parsed.batches[0].metadata.is_none());
    }

    #[test]
    fn test_parse_records_reports_line() {
        let input = "{\"vector\": [1]}\n{\"vector\": \"oops\"}\n";
        let err = parse_records("docs", input).unwrap_err();
        assert!(err.to_string().contains("line 2"));
    }

    #[test]
    fn test_parse_records_empty_input() {
        assert!(matches!(
            parse_records("docs", "\n  \n"),
            Err(CommandError::Input(_))
        ));
    }
}
