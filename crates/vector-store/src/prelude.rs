//! Prelude module for convenient imports.
//!
//! ```
//! use azure_vector_store_rs::prelude::*;
//!
//! let filter = FilterExpression::eq("genre", "jazz");
//! assert_eq!(filter.to_odata().as_deref(), Some("genre eq 'jazz'"));
//! ```

pub use crate::azure::{
    AzureIndexOptions, AzureQueryOptions, AzureVectorStore, AzureVectorStoreConfig, FieldSpec,
    FieldType,
};
pub use crate::error::{ErrorCategory, Operation, Result, VectorStoreError};
pub use crate::filter::{translate, FilterExpression, FilterValue};
pub use crate::store::{
    CreateIndexParams, DeleteVectorParams, IndexStats, Metadata, Metric, QueryFilter,
    QueryParams, QueryResult, UpdateVectorParams, UpsertParams, VectorStore, VectorUpdate,
};
