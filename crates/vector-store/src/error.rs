//! Error types for vector-store operations.

use std::collections::BTreeMap;
use std::fmt;

use thiserror::Error;

/// The vector-store operation that failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    CreateIndex,
    ListIndexes,
    DescribeIndex,
    DeleteIndex,
    Upsert,
    Query,
    UpdateVector,
    DeleteVector,
}

impl Operation {
    /// Stable identifier for logs and machine-readable output.
    pub fn id(self) -> &'static str {
        match self {
            Operation::CreateIndex => "AZURE_VECTOR_CREATE_INDEX_FAILED",
            Operation::ListIndexes => "AZURE_VECTOR_LIST_INDEXES_FAILED",
            Operation::DescribeIndex => "AZURE_VECTOR_DESCRIBE_INDEX_FAILED",
            Operation::DeleteIndex => "AZURE_VECTOR_DELETE_INDEX_FAILED",
            Operation::Upsert => "AZURE_VECTOR_UPSERT_FAILED",
            Operation::Query => "AZURE_VECTOR_QUERY_FAILED",
            Operation::UpdateVector => "AZURE_VECTOR_UPDATE_VECTOR_FAILED",
            Operation::DeleteVector => "AZURE_VECTOR_DELETE_VECTOR_FAILED",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

/// Who is responsible for a failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// The caller passed invalid input.
    User,
    /// The search service failed or rejected the request.
    ThirdParty,
}

/// Parameters of the failed call, keyed by name.
pub type Details = BTreeMap<String, String>;

/// Errors returned by [`VectorStore`](crate::store::VectorStore) implementations.
#[derive(Debug, Error)]
pub enum VectorStoreError {
    /// Input rejected before any request was sent.
    #[error("{operation}: {message}")]
    Validation {
        operation: Operation,
        message: String,
        details: Details,
    },

    /// The search service call failed.
    #[error("{operation}: search service call failed: {source}")]
    Service {
        operation: Operation,
        details: Details,
        #[source]
        source: azure_search_api_rs::error::Error,
    },

    /// Some documents of a batch were rejected. The others stay committed.
    #[error(
        "{operation}: {failed} of {total} documents failed in index '{index_name}'; \
         first failure '{first_key}': {first_message}"
    )]
    PartialUpload {
        operation: Operation,
        index_name: String,
        failed: usize,
        total: usize,
        first_key: String,
        first_message: String,
    },

    /// The store could not be configured.
    #[error("invalid configuration: {0}")]
    Config(String),
}

impl VectorStoreError {
    /// Creates a validation error.
    pub fn validation(operation: Operation, message: impl Into<String>) -> Self {
        VectorStoreError::Validation {
            operation,
            message: message.into(),
            details: Details::new(),
        }
    }

    /// Wraps a service failure.
    pub fn service(operation: Operation, source: azure_search_api_rs::error::Error) -> Self {
        VectorStoreError::Service {
            operation,
            details: Details::new(),
            source,
        }
    }

    /// Records a call parameter on validation and service errors.
    pub fn with_detail(mut self, key: &str, value: impl ToString) -> Self {
        match &mut self {
            VectorStoreError::Validation { details, .. }
            | VectorStoreError::Service { details, .. } => {
                details.insert(key.to_string(), value.to_string());
            }
            VectorStoreError::PartialUpload { .. } | VectorStoreError::Config(_) => {}
        }
        self
    }

    /// Returns the failed operation, if the error came from one.
    pub fn operation(&self) -> Option<Operation> {
        match self {
            VectorStoreError::Validation { operation, .. }
            | VectorStoreError::Service { operation, .. }
            | VectorStoreError::PartialUpload { operation, .. } => Some(*operation),
            VectorStoreError::Config(_) => None,
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            VectorStoreError::Validation { .. } | VectorStoreError::Config(_) => ErrorCategory::User,
            VectorStoreError::Service { .. } | VectorStoreError::PartialUpload { .. } => {
                ErrorCategory::ThirdParty
            }
        }
    }

    /// Returns the recorded call parameters.
    pub fn details(&self) -> Option<&Details> {
        match self {
            VectorStoreError::Validation { details, .. }
            | VectorStoreError::Service { details, .. } => Some(details),
            _ => None,
        }
    }
}

/// A specialized Result type for vector-store operations.
pub type Result<T> = std::result::Result<T, VectorStoreError>;

#[cfg(test)]
mod tests {
    use super::*;
    use azure_search_api_rs::error::{ApiError, Error as ApiClientError};
    use std::error::Error as _;

    #[test]
    fn test_operation_ids() {
        assert_eq!(Operation::Upsert.id(), "AZURE_VECTOR_UPSERT_FAILED");
        assert_eq!(Operation::Query.to_string(), "AZURE_VECTOR_QUERY_FAILED");
    }

    #[test]
    fn test_validation_error_carries_details() {
        let err = VectorStoreError::validation(Operation::Upsert, "dimension mismatch")
            .with_detail("indexName", "products")
            .with_detail("expected", 3);

        assert_eq!(err.category(), ErrorCategory::User);
        assert_eq!(err.operation(), Some(Operation::Upsert));
        let details = err.details().unwrap();
        assert_eq!(details.get("indexName").map(String::as_str), Some("products"));
        assert_eq!(details.get("expected").map(String::as_str), Some("3"));
        assert_eq!(
            err.to_string(),
            "AZURE_VECTOR_UPSERT_FAILED: dimension mismatch"
        );
    }

    #[test]
    fn test_service_error_exposes_source() {
        let err = VectorStoreError::service(
            Operation::DeleteIndex,
            ApiClientError::Api(ApiError::Auth {
                message: "Invalid api-key".to_string(),
            }),
        )
        .with_detail("indexName", "products");

        assert_eq!(err.category(), ErrorCategory::ThirdParty);
        assert!(err.source().is_some());
        assert!(err.to_string().contains("Invalid api-key"));
    }

    #[test]
    fn test_partial_upload_message() {
        let err = VectorStoreError::PartialUpload {
            operation: Operation::Upsert,
            index_name: "products".to_string(),
            failed: 2,
            total: 5,
            first_key: "b".to_string(),
            first_message: "Document is too large".to_string(),
        };

        assert_eq!(err.category(), ErrorCategory::ThirdParty);
        assert!(err.details().is_none());
        let message = err.to_string();
        assert!(message.contains("2 of 5 documents failed"));
        assert!(message.contains("'b': Document is too large"));
    }

    #[test]
    fn test_config_error_has_no_operation() {
        let err = VectorStoreError::Config("endpoint is empty".to_string());
        assert_eq!(err.operation(), None);
        assert_eq!(err.category(), ErrorCategory::User);
        let err = err.with_detail("ignored", 1);
        assert!(err.details().is_none());
    }
}
