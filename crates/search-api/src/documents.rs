//! Document and search operations.

use tracing::debug;

use crate::client::SearchClient;
use crate::error::Result;
use crate::models::{
    Document, IndexActionType, IndexBatch, IndexDocumentsResult, SearchRequest, SearchResponse,
};

impl SearchClient {
    /// Sends an indexing batch.
    ///
    /// A partially failed batch is not an error at this level: the service
    /// answers 207 and the per-document outcomes are in the result.
    pub async fn index_documents(
        &self,
        index: &str,
        batch: &IndexBatch,
    ) -> Result<IndexDocumentsResult> {
        debug!(index, documents = batch.len(), "indexing document batch");
        self.post(&format!("/indexes/{index}/docs/index"), batch)
            .await
    }

    /// Uploads documents, replacing any existing documents with the same key.
    pub async fn upload_documents(
        &self,
        index: &str,
        documents: Vec<Document>,
    ) -> Result<IndexDocumentsResult> {
        let batch = IndexBatch::from_documents(IndexActionType::Upload, documents);
        self.index_documents(index, &batch).await
    }

    /// Merges partial documents into existing ones.
    pub async fn merge_documents(
        &self,
        index: &str,
        partials: Vec<Document>,
    ) -> Result<IndexDocumentsResult> {
        let batch = IndexBatch::from_documents(IndexActionType::Merge, partials);
        self.index_documents(index, &batch).await
    }

    /// Deletes documents by key.
    ///
    /// Deleting a key that does not exist is reported as success by the service.
    pub async fn delete_documents<I, S>(
        &self,
        index: &str,
        key_field: &str,
        keys: I,
    ) -> Result<IndexDocumentsResult>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let batch = IndexBatch::delete_keys(key_field, keys);
        self.index_documents(index, &batch).await
    }

    /// Looks up a document by key, returning `None` if it does not exist.
    pub async fn get_document(&self, index: &str, key: &str) -> Result<Option<Document>> {
        match self.get(&format!("/indexes/{index}/docs/{key}")).await {
            Ok(document) => Ok(Some(document)),
            Err(e) if e.is_not_found() => Ok(None),
            Err(e) => Err(e),
        }
    }

    /// Runs a search request against an index.
    pub async fn search(&self, index: &str, request: &SearchRequest) -> Result<SearchResponse> {
        debug!(
            index,
            vector_queries = request.vector_queries.len(),
            has_filter = request.filter.is_some(),
            "searching index"
        );
        self.post(&format!("/indexes/{index}/docs/search"), request)
            .await
    }
}
