//! Prelude module for convenient imports.
//!
//! # Example
//!
//! ```
//! use azure_search_api_rs::prelude::*;
//!
//! // Now you have access to:
//! // - SearchClient, SearchClientBuilder, Credential (API client)
//! // - Error, ApiError, Result (error handling)
//! // - SearchIndex, SearchField, SearchRequest, VectorQuery, ... (models)
//! ```

// Client types
pub use crate::client::{Credential, SearchClient, SearchClientBuilder, DEFAULT_API_VERSION};

// Error types
pub use crate::error::{ApiError, Error, Result};

// Models
pub use crate::models::{
    Document, HnswParameters, IndexAction, IndexActionType, IndexBatch, IndexDocumentsResult,
    IndexingResult, QueryType, SearchField, SearchIndex, SearchRequest, SearchResponse,
    SearchResult, SemanticConfiguration, SemanticField, SemanticPrioritizedFields,
    SemanticSearch, VectorQuery, VectorSearch, VectorSearchAlgorithm, VectorSearchProfile,
};
