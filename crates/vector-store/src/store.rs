//! The uniform vector-store interface and its request/response types.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::Result;
use crate::filter::{translate, FilterExpression};

/// Free-form metadata attached to a vector.
pub type Metadata = Map<String, Value>;

/// Number of results returned by a query when the caller does not say.
pub const DEFAULT_TOP_K: usize = 10;

/// Similarity metric of an index.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Metric {
    #[default]
    Cosine,
    Euclidean,
    #[serde(alias = "dotProduct", alias = "dot_product")]
    DotProduct,
}

impl Metric {
    /// Returns the name the search service uses for this metric.
    pub fn service_name(self) -> &'static str {
        match self {
            Metric::Cosine => "cosine",
            Metric::Euclidean => "euclidean",
            Metric::DotProduct => "dotProduct",
        }
    }

    /// Parses a service metric name. Unknown names yield `None`.
    pub fn from_service_name(name: &str) -> Option<Self> {
        match name {
            "cosine" => Some(Metric::Cosine),
            "euclidean" => Some(Metric::Euclidean),
            "dotProduct" => Some(Metric::DotProduct),
            _ => None,
        }
    }
}

/// Parameters for [`VectorStore::create_index`].
#[derive(Debug, Clone, PartialEq)]
pub struct CreateIndexParams<O> {
    pub index_name: String,
    pub dimension: usize,
    pub metric: Metric,
    /// Store-specific options.
    pub options: O,
}

impl<O: Default> CreateIndexParams<O> {
    pub fn new(index_name: impl Into<String>, dimension: usize) -> Self {
        Self {
            index_name: index_name.into(),
            dimension,
            metric: Metric::default(),
            options: O::default(),
        }
    }
}

impl<O> CreateIndexParams<O> {
    pub fn metric(mut self, metric: Metric) -> Self {
        self.metric = metric;
        self
    }

    pub fn options(mut self, options: O) -> Self {
        self.options = options;
        self
    }
}

/// Parameters for [`VectorStore::upsert`].
///
/// `metadata` and `ids`, when present, are matched to `vectors` by position.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UpsertParams {
    pub index_name: String,
    pub vectors: Vec<Vec<f32>>,
    pub metadata: Option<Vec<Metadata>>,
    pub ids: Option<Vec<String>>,
}

impl UpsertParams {
    pub fn new(index_name: impl Into<String>, vectors: Vec<Vec<f32>>) -> Self {
        Self {
            index_name: index_name.into(),
            vectors,
            metadata: None,
            ids: None,
        }
    }

    pub fn metadata(mut self, metadata: Vec<Metadata>) -> Self {
        self.metadata = Some(metadata);
        self
    }

    pub fn ids<I, S>(mut self, ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.ids = Some(ids.into_iter().map(Into::into).collect());
        self
    }
}

/// Filter of a query: native filter text or a structured expression.
///
/// Deserializes from either a JSON string or a filter record.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum QueryFilter {
    Raw(String),
    Expression(FilterExpression),
}

impl QueryFilter {
    /// Returns the native filter string, or `None` if nothing remains.
    pub fn to_native(&self) -> Option<String> {
        match self {
            QueryFilter::Raw(raw) => Some(raw.clone()),
            QueryFilter::Expression(expr) => translate(Some(expr)),
        }
    }
}

impl From<FilterExpression> for QueryFilter {
    fn from(expr: FilterExpression) -> Self {
        QueryFilter::Expression(expr)
    }
}

impl From<&str> for QueryFilter {
    fn from(raw: &str) -> Self {
        QueryFilter::Raw(raw.to_string())
    }
}

impl From<String> for QueryFilter {
    fn from(raw: String) -> Self {
        QueryFilter::Raw(raw)
    }
}

/// Parameters for [`VectorStore::query`].
#[derive(Debug, Clone, PartialEq)]
pub struct QueryParams<O> {
    pub index_name: String,
    pub query_vector: Vec<f32>,
    pub top_k: usize,
    pub filter: Option<QueryFilter>,
    /// Accepted for interface compatibility; vectors are never returned.
    pub include_vector: bool,
    /// Store-specific options.
    pub options: O,
}

impl<O: Default> QueryParams<O> {
    pub fn new(index_name: impl Into<String>, query_vector: Vec<f32>) -> Self {
        Self {
            index_name: index_name.into(),
            query_vector,
            top_k: DEFAULT_TOP_K,
            filter: None,
            include_vector: false,
            options: O::default(),
        }
    }
}

impl<O> QueryParams<O> {
    pub fn top_k(mut self, top_k: usize) -> Self {
        self.top_k = top_k;
        self
    }

    pub fn filter(mut self, filter: impl Into<QueryFilter>) -> Self {
        self.filter = Some(filter.into());
        self
    }

    pub fn include_vector(mut self, include: bool) -> Self {
        self.include_vector = include;
        self
    }

    pub fn options(mut self, options: O) -> Self {
        self.options = options;
        self
    }
}

/// One hit of a query.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QueryResult {
    pub id: String,
    pub score: f64,
    pub metadata: Metadata,
    /// Text content stored alongside the vector.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub document: Option<String>,
    /// Semantic reranker score, when semantic ranking ran.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reranker_score: Option<f64>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub captions: Vec<String>,
}

/// Fields to change on an existing vector.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct VectorUpdate {
    pub vector: Option<Vec<f32>>,
    pub metadata: Option<Metadata>,
}

impl VectorUpdate {
    pub fn is_empty(&self) -> bool {
        self.vector.is_none() && self.metadata.is_none()
    }
}

/// Parameters for [`VectorStore::update_vector`].
#[derive(Debug, Clone, PartialEq)]
pub struct UpdateVectorParams {
    pub index_name: String,
    pub id: String,
    pub update: VectorUpdate,
}

/// Parameters for [`VectorStore::delete_vector`].
#[derive(Debug, Clone, PartialEq)]
pub struct DeleteVectorParams {
    pub index_name: String,
    pub id: String,
}

/// Summary of an index.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IndexStats {
    pub dimension: usize,
    pub count: u64,
    pub metric: Metric,
}

/// A store of vectors grouped into named indexes.
///
/// Implementations are shared across tasks; calls may run concurrently.
#[async_trait]
pub trait VectorStore: Send + Sync {
    /// Store-specific index creation options.
    type IndexOptions: Default + Send + Sync + 'static;

    /// Store-specific query options.
    type QueryOptions: Default + Send + Sync + 'static;

    /// Creates an index. Creating an index that already exists succeeds
    /// without changing it.
    async fn create_index(&self, params: CreateIndexParams<Self::IndexOptions>) -> Result<()>;

    /// Inserts or replaces vectors, returning their ids in input order.
    async fn upsert(&self, params: UpsertParams) -> Result<Vec<String>>;

    /// Returns the nearest neighbours of the query vector, best first.
    async fn query(&self, params: QueryParams<Self::QueryOptions>) -> Result<Vec<QueryResult>>;

    async fn update_vector(&self, params: UpdateVectorParams) -> Result<()>;

    /// Deletes a vector. Deleting an unknown id succeeds.
    async fn delete_vector(&self, params: DeleteVectorParams) -> Result<()>;

    async fn list_indexes(&self) -> Result<Vec<String>>;

    async fn describe_index(&self, index_name: &str) -> Result<IndexStats>;

    async fn delete_index(&self, index_name: &str) -> Result<()>;
}
