//! [`VectorStore`] implementation backed by Azure AI Search.
//!
//! Each vector is stored as one document with the layout built by
//! [`schema::index_definition`]: a string key, a searchable `content` field,
//! the metadata object serialized as JSON text, and the vector field.
//!
//! # Example
//!
//! ```no_run
//! use azure_vector_store_rs::azure::{AzureVectorStore, AzureVectorStoreConfig};
//! use azure_vector_store_rs::filter::FilterExpression;
//! use azure_vector_store_rs::store::{CreateIndexParams, QueryParams, UpsertParams, VectorStore};
//!
//! # async fn run() -> azure_vector_store_rs::error::Result<()> {
//! let config = AzureVectorStoreConfig::new("https://my-service.search.windows.net", "admin-key");
//! let store = AzureVectorStore::from_config(&config)?;
//!
//! store.create_index(CreateIndexParams::new("docs", 3)).await?;
//! let ids = store.upsert(UpsertParams::new("docs", vec![vec![0.1, 0.2, 0.3]])).await?;
//!
//! let hits = store
//!     .query(
//!         QueryParams::new("docs", vec![0.1, 0.2, 0.3])
//!             .top_k(5)
//!             .filter(FilterExpression::eq("category", "guides")),
//!     )
//!     .await?;
//! # let _ = (ids, hits);
//! # Ok(())
//! # }
//! ```

mod config;
pub mod schema;

use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};

use async_trait::async_trait;
use azure_search_api_rs::client::SearchClient;
use azure_search_api_rs::error::{ApiError, Error as ApiClientError};
use azure_search_api_rs::models::{
    Document, IndexActionType, IndexBatch, IndexDocumentsResult, QueryType, SearchRequest,
    SearchResult, VectorQuery,
};
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, info, warn};
use uuid::Uuid;

pub use config::AzureVectorStoreConfig;
pub use schema::{AzureIndexOptions, FieldSpec, FieldType, HnswOptions, DEFAULT_VECTOR_FIELD};

use crate::error::{Operation, Result, VectorStoreError};
use crate::store::{
    CreateIndexParams, DeleteVectorParams, IndexStats, Metadata, QueryParams, QueryResult,
    UpdateVectorParams, UpsertParams, VectorStore,
};
use schema::{IndexSchema, CONTENT_FIELD, KEY_FIELD, METADATA_FIELD};

/// Options accepted by `query` on the Azure store.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AzureQueryOptions {
    /// Text for hybrid search alongside the vector query.
    pub query_text: Option<String>,
    pub query_type: Option<QueryType>,
    /// Semantic configuration name; implies a semantic query.
    pub semantic_configuration: Option<String>,
    /// Fields to return. The key and metadata fields are always included.
    pub select: Vec<String>,
    /// Vector fields to search instead of the detected one.
    pub vector_fields: Vec<String>,
    /// Scan all vectors instead of using the ANN index.
    pub exhaustive: bool,
}

/// Vector store backed by an Azure AI Search service.
pub struct AzureVectorStore {
    client: SearchClient,
    vector_field: Option<String>,
    schemas: RwLock<HashMap<String, IndexSchema>>,
}

impl std::fmt::Debug for AzureVectorStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AzureVectorStore")
            .field("client", &self.client)
            .field("vector_field", &self.vector_field)
            .finish_non_exhaustive()
    }
}

impl AzureVectorStore {
    pub fn new(client: SearchClient) -> Self {
        Self {
            client,
            vector_field: None,
            schemas: RwLock::new(HashMap::new()),
        }
    }

    /// Builds the store and its client from connection settings.
    pub fn from_config(config: &AzureVectorStoreConfig) -> Result<Self> {
        let store = Self::new(config.build_client()?);
        Ok(match &config.vector_field {
            Some(field) => store.with_vector_field(field),
            None => store,
        })
    }

    /// Sets the vector field name used for new indexes and preferred when
    /// reading existing ones.
    pub fn with_vector_field(mut self, field: impl Into<String>) -> Self {
        self.vector_field = Some(field.into());
        self
    }

    pub fn client(&self) -> &SearchClient {
        &self.client
    }

    fn cached_schema(&self, index: &str) -> Option<IndexSchema> {
        self.schemas
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(index)
            .cloned()
    }

    fn remember_schema(&self, index: &str, schema: IndexSchema) {
        self.schemas
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(index.to_string(), schema);
    }

    fn forget_schema(&self, index: &str) {
        self.schemas
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(index);
    }

    /// Fetches the index definition and refreshes the cache.
    async fn load_schema(
        &self,
        index: &str,
    ) -> std::result::Result<IndexSchema, ApiClientError> {
        let definition = self.client.get_index(index).await?;
        let schema = IndexSchema::from_definition(&definition, self.vector_field.as_deref());
        debug!(
            index,
            vector_field = %schema.vector_field,
            dimension = ?schema.dimension,
            "loaded index schema"
        );
        self.remember_schema(index, schema.clone());
        Ok(schema)
    }

    /// Returns the cached schema unless its dimension disagrees with any of
    /// `lengths`, in which case the definition is fetched again.
    fn fresh_cached_schema(&self, index: &str, lengths: &[usize]) -> Option<IndexSchema> {
        let schema = self.cached_schema(index)?;
        match schema.dimension {
            Some(dimension) if lengths.iter().any(|len| *len != dimension) => {
                debug!(index, dimension, "cached schema disagrees with vectors; reloading");
                None
            }
            _ => Some(schema),
        }
    }

    async fn schema(
        &self,
        index: &str,
        operation: Operation,
        lengths: &[usize],
    ) -> Result<IndexSchema> {
        if let Some(schema) = self.fresh_cached_schema(index, lengths) {
            return Ok(schema);
        }
        self.load_schema(index).await.map_err(|e| {
            VectorStoreError::service(operation, e).with_detail("indexName", index)
        })
    }

    /// Like [`Self::schema`], but falls back to the conventional layout when
    /// the index cannot be read.
    async fn schema_or_default(&self, index: &str, lengths: &[usize]) -> IndexSchema {
        if let Some(schema) = self.fresh_cached_schema(index, lengths) {
            return schema;
        }
        match self.load_schema(index).await {
            Ok(schema) => schema,
            Err(e) => {
                let vector_field = self
                    .vector_field
                    .clone()
                    .unwrap_or_else(|| DEFAULT_VECTOR_FIELD.to_string());
                warn!(
                    index,
                    error = %e,
                    vector_field = %vector_field,
                    "could not read index definition; using default vector field"
                );
                IndexSchema {
                    vector_field,
                    dimension: None,
                    metric: Default::default(),
                    projected_fields: Vec::new(),
                }
            }
        }
    }

    async fn on_existing_index(&self, params: &CreateIndexParams<AzureIndexOptions>) -> Result<()> {
        let index = params.index_name.as_str();
        warn!(index, "index already exists; leaving it unchanged");

        let existing = match self.load_schema(index).await {
            Ok(schema) => schema,
            Err(e) => {
                warn!(index, error = %e, "could not read existing index definition");
                return Ok(());
            }
        };

        if let Some(dimension) = existing.dimension.filter(|d| *d != params.dimension) {
            warn!(
                index,
                existing = dimension,
                requested = params.dimension,
                "existing index uses a different dimension"
            );
        }
        if existing.metric != params.metric {
            warn!(
                index,
                existing = existing.metric.service_name(),
                requested = params.metric.service_name(),
                "existing index uses a different metric"
            );
        }
        Ok(())
    }
}

#[async_trait]
impl VectorStore for AzureVectorStore {
    type IndexOptions = AzureIndexOptions;
    type QueryOptions = AzureQueryOptions;

    async fn create_index(&self, params: CreateIndexParams<AzureIndexOptions>) -> Result<()> {
        let op = Operation::CreateIndex;
        let index = params.index_name.as_str();
        require_index_name(op, index)?;
        if params.dimension == 0 {
            return Err(VectorStoreError::validation(op, "dimension must be greater than 0")
                .with_detail("indexName", index)
                .with_detail("dimension", params.dimension));
        }

        let vector_field = params
            .options
            .vector_field
            .as_deref()
            .or(self.vector_field.as_deref())
            .unwrap_or(DEFAULT_VECTOR_FIELD);
        let definition = schema::index_definition(
            index,
            params.dimension,
            params.metric,
            vector_field,
            &params.options,
        );

        match self.client.create_index(&definition).await {
            Ok(created) => {
                info!(index, dimension = params.dimension, "created index");
                self.remember_schema(
                    index,
                    IndexSchema::from_definition(&created, Some(vector_field)),
                );
                Ok(())
            }
            Err(e) if is_already_exists(&e) => self.on_existing_index(&params).await,
            Err(e) => Err(VectorStoreError::service(op, e)
                .with_detail("indexName", index)
                .with_detail("dimension", params.dimension)
                .with_detail("metric", params.metric.service_name())),
        }
    }

    async fn upsert(&self, params: UpsertParams) -> Result<Vec<String>> {
        let op = Operation::Upsert;
        let index = params.index_name.as_str();
        require_index_name(op, index)?;
        if params.vectors.is_empty() {
            return Err(VectorStoreError::validation(op, "no vectors to upsert")
                .with_detail("indexName", index));
        }
        let total = params.vectors.len();
        if let Some(ids) = &params.ids {
            require_same_length(op, index, "ids", ids.len(), total)?;
        }
        if let Some(metadata) = &params.metadata {
            require_same_length(op, index, "metadata", metadata.len(), total)?;
        }

        let lengths: Vec<usize> = params.vectors.iter().map(Vec::len).collect();
        let schema = self.schema(index, op, &lengths).await?;
        let Some(dimension) = schema.dimension else {
            return Err(VectorStoreError::validation(
                op,
                format!("index '{index}' has no vector field"),
            )
            .with_detail("indexName", index));
        };
        for (position, vector) in params.vectors.iter().enumerate() {
            require_dimension(op, index, dimension, vector.len())
                .map_err(|e| e.with_detail("position", position))?;
        }

        let ids: Vec<String> = match params.ids {
            Some(ids) => ids,
            None => (0..total).map(|_| Uuid::new_v4().to_string()).collect(),
        };
        let documents = ids
            .iter()
            .zip(&params.vectors)
            .enumerate()
            .map(|(i, (id, vector))| {
                let metadata = params.metadata.as_ref().map(|m| &m[i]);
                document(&schema, id, Some(vector.as_slice()), metadata)
            })
            .collect();

        let batch = IndexBatch::from_documents(IndexActionType::MergeOrUpload, documents);
        let result = self
            .client
            .index_documents(index, &batch)
            .await
            .map_err(|e| {
                self.forget_schema(index);
                VectorStoreError::service(op, e)
                    .with_detail("indexName", index)
                    .with_detail("count", total)
            })?;
        check_batch(op, index, &result, false)?;

        debug!(index, count = total, "upserted vectors");
        Ok(ids)
    }

    async fn query(&self, params: QueryParams<AzureQueryOptions>) -> Result<Vec<QueryResult>> {
        let op = Operation::Query;
        let index = params.index_name.as_str();
        require_index_name(op, index)?;
        if params.query_vector.is_empty() {
            return Err(VectorStoreError::validation(op, "query vector is empty")
                .with_detail("indexName", index));
        }
        if params.top_k == 0 {
            return Err(VectorStoreError::validation(op, "topK must be greater than 0")
                .with_detail("indexName", index));
        }
        if params.include_vector {
            debug!(index, "includeVector is not supported; vectors are not returned");
        }

        let schema = self
            .schema_or_default(index, &[params.query_vector.len()])
            .await;
        if let Some(dimension) = schema.dimension {
            require_dimension(op, index, dimension, params.query_vector.len())?;
        }

        let options = params.options;
        let fields = if options.vector_fields.is_empty() {
            schema.vector_field.clone()
        } else {
            options.vector_fields.join(",")
        };
        let filter = params.filter.as_ref().and_then(|f| f.to_native());
        let semantic = options.semantic_configuration.is_some()
            || options.query_type == Some(QueryType::Semantic);

        let request = SearchRequest {
            search: options.query_text,
            vector_queries: vec![VectorQuery::Vector {
                vector: params.query_vector,
                k: Some(params.top_k),
                fields,
                exhaustive: options.exhaustive.then_some(true),
            }],
            filter,
            top: Some(params.top_k),
            select: select_clause(&options.select),
            query_type: if semantic {
                Some(QueryType::Semantic)
            } else {
                options.query_type
            },
            captions: semantic.then(|| "extractive".to_string()),
            semantic_configuration: options.semantic_configuration,
            ..Default::default()
        };

        let response = self.client.search(index, &request).await.map_err(|e| {
            self.forget_schema(index);
            let err = VectorStoreError::service(op, e)
                .with_detail("indexName", index)
                .with_detail("topK", params.top_k);
            match &request.filter {
                Some(filter) => err.with_detail("filter", filter),
                None => err,
            }
        })?;

        debug!(index, hits = response.value.len(), "query complete");
        Ok(response.value.into_iter().map(query_result).collect())
    }

    async fn update_vector(&self, params: UpdateVectorParams) -> Result<()> {
        let op = Operation::UpdateVector;
        let index = params.index_name.as_str();
        let id = params.id.as_str();
        require_index_name(op, index)?;
        if params.update.is_empty() {
            return Err(VectorStoreError::validation(op, "no updates provided")
                .with_detail("indexName", index)
                .with_detail("id", id));
        }

        let lengths: Vec<usize> = params.update.vector.iter().map(Vec::len).collect();
        let schema = self.schema(index, op, &lengths).await?;
        if let (Some(dimension), Some(vector)) = (schema.dimension, &params.update.vector) {
            require_dimension(op, index, dimension, vector.len())
                .map_err(|e| e.with_detail("id", id))?;
        }

        let existing = self.client.get_document(index, id).await.map_err(|e| {
            VectorStoreError::service(op, e)
                .with_detail("indexName", index)
                .with_detail("id", id)
        })?;
        if existing.is_none() {
            return Err(VectorStoreError::validation(op, "vector not found")
                .with_detail("indexName", index)
                .with_detail("id", id));
        }

        let partial = document(
            &schema,
            id,
            params.update.vector.as_deref(),
            params.update.metadata.as_ref(),
        );
        let result = self
            .client
            .merge_documents(index, vec![partial])
            .await
            .map_err(|e| {
                self.forget_schema(index);
                VectorStoreError::service(op, e)
                    .with_detail("indexName", index)
                    .with_detail("id", id)
            })?;
        check_batch(op, index, &result, false)?;

        debug!(index, id, "updated vector");
        Ok(())
    }

    async fn delete_vector(&self, params: DeleteVectorParams) -> Result<()> {
        let op = Operation::DeleteVector;
        let index = params.index_name.as_str();
        require_index_name(op, index)?;

        let result = self
            .client
            .delete_documents(index, KEY_FIELD, [params.id.as_str()])
            .await
            .map_err(|e| {
                VectorStoreError::service(op, e)
                    .with_detail("indexName", index)
                    .with_detail("id", &params.id)
            })?;
        check_batch(op, index, &result, true)?;

        debug!(index, id = %params.id, "deleted vector");
        Ok(())
    }

    async fn list_indexes(&self) -> Result<Vec<String>> {
        self.client
            .list_index_names()
            .await
            .map_err(|e| VectorStoreError::service(Operation::ListIndexes, e))
    }

    async fn describe_index(&self, index_name: &str) -> Result<IndexStats> {
        let op = Operation::DescribeIndex;
        require_index_name(op, index_name)?;

        let schema = self
            .load_schema(index_name)
            .await
            .map_err(|e| VectorStoreError::service(op, e).with_detail("indexName", index_name))?;
        let count = self
            .client
            .document_count(index_name)
            .await
            .map_err(|e| VectorStoreError::service(op, e).with_detail("indexName", index_name))?;

        Ok(IndexStats {
            dimension: schema.dimension.unwrap_or(0),
            count,
            metric: schema.metric,
        })
    }

    async fn delete_index(&self, index_name: &str) -> Result<()> {
        let op = Operation::DeleteIndex;
        require_index_name(op, index_name)?;

        self.client
            .delete_index(index_name)
            .await
            .map_err(|e| VectorStoreError::service(op, e).with_detail("indexName", index_name))?;
        self.forget_schema(index_name);
        info!(index = index_name, "deleted index");
        Ok(())
    }
}

fn is_already_exists(err: &ApiClientError) -> bool {
    match err.api_error() {
        Some(ApiError::Conflict { .. }) => true,
        Some(ApiError::Validation { message, .. }) => message.contains("already exists"),
        _ => false,
    }
}

fn require_index_name(op: Operation, index: &str) -> Result<()> {
    if index.trim().is_empty() {
        return Err(VectorStoreError::validation(op, "index name is required"));
    }
    Ok(())
}

fn require_same_length(
    op: Operation,
    index: &str,
    what: &str,
    actual: usize,
    expected: usize,
) -> Result<()> {
    if actual != expected {
        return Err(VectorStoreError::validation(
            op,
            format!("{what} length {actual} does not match vector count {expected}"),
        )
        .with_detail("indexName", index));
    }
    Ok(())
}

fn require_dimension(op: Operation, index: &str, expected: usize, actual: usize) -> Result<()> {
    if actual != expected {
        return Err(VectorStoreError::validation(
            op,
            format!("vector dimension {actual} does not match index dimension {expected}"),
        )
        .with_detail("indexName", index)
        .with_detail("expected", expected)
        .with_detail("actual", actual));
    }
    Ok(())
}

/// Builds the stored document for a vector. Fields left out are untouched by
/// a merge.
fn document(
    schema: &IndexSchema,
    id: &str,
    vector: Option<&[f32]>,
    metadata: Option<&Metadata>,
) -> Document {
    let mut doc = Document::new();
    doc.insert(KEY_FIELD.to_string(), Value::String(id.to_string()));

    if let Some(vector) = vector {
        doc.insert(schema.vector_field.clone(), Value::from(vector.to_vec()));
    }

    if let Some(metadata) = metadata {
        doc.insert(
            METADATA_FIELD.to_string(),
            Value::String(Value::Object(metadata.clone()).to_string()),
        );
        let content = ["content", "text"]
            .iter()
            .find_map(|key| metadata.get(*key).and_then(Value::as_str));
        if let Some(content) = content {
            doc.insert(CONTENT_FIELD.to_string(), Value::String(content.to_string()));
        }
        for field in &schema.projected_fields {
            if let Some(value) = metadata.get(field) {
                doc.insert(field.clone(), value.clone());
            }
        }
    }

    doc
}

fn select_clause(select: &[String]) -> Option<String> {
    if select.is_empty() {
        return None;
    }
    let mut fields = vec![KEY_FIELD, METADATA_FIELD];
    fields.extend(
        select
            .iter()
            .map(String::as_str)
            .filter(|f| *f != KEY_FIELD && *f != METADATA_FIELD),
    );
    Some(fields.join(","))
}

fn query_result(hit: SearchResult) -> QueryResult {
    let mut doc = hit.document;
    let id = match doc.remove(KEY_FIELD) {
        Some(Value::String(id)) => id,
        Some(other) => other.to_string(),
        None => String::new(),
    };
    let metadata = match doc.remove(METADATA_FIELD) {
        Some(Value::String(text)) => match serde_json::from_str(&text) {
            Ok(Value::Object(map)) => map,
            _ => {
                warn!(id = %id, "stored metadata is not a JSON object; ignoring it");
                Metadata::new()
            }
        },
        Some(Value::Object(map)) => map,
        _ => Metadata::new(),
    };
    let document = match doc.remove(CONTENT_FIELD) {
        Some(Value::String(text)) => Some(text),
        _ => None,
    };
    let captions = hit
        .captions
        .unwrap_or_default()
        .into_iter()
        .filter_map(|c| c.text)
        .collect();

    QueryResult {
        id,
        score: hit.score,
        metadata,
        document,
        reranker_score: hit.reranker_score,
        captions,
    }
}

/// Turns per-document failures into one error.
fn check_batch(
    op: Operation,
    index: &str,
    result: &IndexDocumentsResult,
    ignore_not_found: bool,
) -> Result<()> {
    let failures: Vec<_> = result
        .failures()
        .filter(|r| !(ignore_not_found && r.status_code == 404))
        .collect();
    let Some(first) = failures.first() else {
        return Ok(());
    };

    warn!(
        index,
        failed = failures.len(),
        total = result.value.len(),
        first_key = %first.key,
        "batch partially failed"
    );
    Err(VectorStoreError::PartialUpload {
        operation: op,
        index_name: index.to_string(),
        failed: failures.len(),
        total: result.value.len(),
        first_key: first.key.clone(),
        first_message: first
            .error_message
            .clone()
            .unwrap_or_else(|| format!("status {}", first.status_code)),
    })
}
