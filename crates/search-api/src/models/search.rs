//! Search request and response models for `POST /indexes/{name}/docs/search`.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::document::Document;

/// Query parser used for the text part of a search.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QueryType {
    Simple,
    Full,
    Semantic,
}

/// A vector query attached to a search request.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum VectorQuery {
    /// Query with a caller-supplied embedding.
    #[serde(rename_all = "camelCase")]
    Vector {
        vector: Vec<f32>,
        /// Number of nearest neighbours to return.
        #[serde(skip_serializing_if = "Option::is_none")]
        k: Option<usize>,
        /// Comma-separated vector field names.
        fields: String,
        /// Bypass the ANN index and scan all vectors.
        #[serde(skip_serializing_if = "Option::is_none")]
        exhaustive: Option<bool>,
    },
}

impl VectorQuery {
    pub fn vector(vector: Vec<f32>, k: usize, fields: impl Into<String>) -> Self {
        VectorQuery::Vector {
            vector,
            k: Some(k),
            fields: fields.into(),
            exhaustive: None,
        }
    }
}

/// Body of a search request.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchRequest {
    /// Full-text query; `*` or absent matches everything.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,

    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub vector_queries: Vec<VectorQuery>,

    /// OData `$filter` expression.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filter: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub top: Option<usize>,

    /// Comma-separated list of fields to return.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub select: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub query_type: Option<QueryType>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub semantic_configuration: Option<String>,

    /// Caption mode for semantic queries, e.g. `extractive`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub captions: Option<String>,

    /// Answer mode for semantic queries, e.g. `extractive|count-3`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub answers: Option<String>,

    /// Comma-separated list of fields to highlight.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub highlight: Option<String>,

    /// Request the total match count.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub count: Option<bool>,
}

/// A semantic caption extracted from a result.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Caption {
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub highlights: Option<String>,
}

/// One hit of a search response.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SearchResult {
    #[serde(rename = "@search.score")]
    pub score: f64,

    #[serde(rename = "@search.rerankerScore", default)]
    pub reranker_score: Option<f64>,

    #[serde(rename = "@search.captions", default)]
    pub captions: Option<Vec<Caption>>,

    #[serde(rename = "@search.highlights", default)]
    pub highlights: Option<HashMap<String, Vec<String>>>,

    /// The retrieved document fields.
    #[serde(flatten)]
    pub document: Document,
}

/// Response of a search request.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct SearchResponse {
    #[serde(rename = "@odata.count", default)]
    pub count: Option<u64>,

    #[serde(default)]
    pub value: Vec<SearchResult>,
}
