//! Document batch models for `POST /indexes/{name}/docs/index`.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A document as a free-form JSON object.
pub type Document = Map<String, Value>;

/// The action applied to one document in an indexing batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum IndexActionType {
    /// Insert, or replace an existing document entirely.
    Upload,
    /// Update fields of an existing document; fails if it does not exist.
    Merge,
    /// Merge if the document exists, otherwise upload.
    MergeOrUpload,
    /// Remove the document; only the key field is required.
    Delete,
}

/// One entry of an indexing batch.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IndexAction {
    #[serde(rename = "@search.action")]
    pub action: IndexActionType,

    #[serde(flatten)]
    pub document: Document,
}

impl IndexAction {
    pub fn new(action: IndexActionType, document: Document) -> Self {
        Self { action, document }
    }
}

/// Body of an indexing request.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct IndexBatch {
    pub value: Vec<IndexAction>,
}

impl IndexBatch {
    /// Builds a batch applying the same action to every document.
    pub fn from_documents(action: IndexActionType, documents: Vec<Document>) -> Self {
        Self {
            value: documents
                .into_iter()
                .map(|document| IndexAction::new(action, document))
                .collect(),
        }
    }

    /// Builds a delete batch addressing documents by key.
    pub fn delete_keys<I, S>(key_field: &str, keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let documents = keys
            .into_iter()
            .map(|key| {
                let mut document = Document::new();
                document.insert(key_field.to_string(), Value::String(key.into()));
                document
            })
            .collect();
        Self::from_documents(IndexActionType::Delete, documents)
    }

    pub fn len(&self) -> usize {
        self.value.len()
    }

    pub fn is_empty(&self) -> bool {
        self.value.is_empty()
    }
}

/// Outcome for one document of an indexing batch.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IndexingResult {
    pub key: String,

    /// Whether the operation succeeded for this document.
    pub status: bool,

    #[serde(default)]
    pub error_message: Option<String>,

    pub status_code: u16,
}

/// Response of an indexing request (HTTP 200, or 207 on partial failure).
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct IndexDocumentsResult {
    pub value: Vec<IndexingResult>,
}

impl IndexDocumentsResult {
    /// Returns the per-document results that failed.
    pub fn failures(&self) -> impl Iterator<Item = &IndexingResult> {
        self.value.iter().filter(|r| !r.status)
    }

    /// Returns true if every document in the batch succeeded.
    pub fn all_succeeded(&self) -> bool {
        self.value.iter().all(|r| r.status)
    }
}
