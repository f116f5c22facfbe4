//! Error types for the Azure AI Search client.

use std::fmt;

/// Errors reported by the search service itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    /// HTTP-level error with status code.
    Http { status: u16, message: String },
    /// Authentication or authorization failure.
    Auth { message: String },
    /// Request throttled (429, or 503 with Retry-After).
    RateLimit { retry_after: Option<u64> },
    /// The addressed index or document does not exist.
    NotFound { path: String, message: String },
    /// The resource already exists or an ETag precondition failed.
    Conflict { message: String },
    /// The service rejected the request body or parameters.
    Validation {
        field: Option<String>,
        message: String,
    },
    /// Network/connection error.
    Network { message: String },
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::Http { status, message } => write!(f, "HTTP error {}: {}", status, message),
            ApiError::Auth { message } => write!(f, "Auth error: {}", message),
            ApiError::RateLimit { retry_after } => match retry_after {
                Some(secs) => write!(f, "Rate limited, retry after {} seconds", secs),
                None => write!(f, "Rate limited"),
            },
            ApiError::NotFound { path, message } => {
                if message.is_empty() {
                    write!(f, "Not found: {}", path)
                } else {
                    write!(f, "Not found: {} ({})", path, message)
                }
            }
            ApiError::Conflict { message } => write!(f, "Conflict: {}", message),
            ApiError::Validation { field, message } => match field {
                Some(f_name) => write!(f, "Validation error on {}: {}", f_name, message),
                None => write!(f, "Validation error: {}", message),
            },
            ApiError::Network { message } => write!(f, "Network error: {}", message),
        }
    }
}

impl std::error::Error for ApiError {}

impl ApiError {
    /// Returns true if this error is potentially retryable.
    pub fn is_retryable(&self) -> bool {
        matches!(self, ApiError::RateLimit { .. } | ApiError::Network { .. })
    }

    /// Returns the HTTP status code this error was built from, when known.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Http { status, .. } => Some(*status),
            ApiError::Auth { .. } => Some(403),
            ApiError::RateLimit { .. } => Some(429),
            ApiError::NotFound { .. } => Some(404),
            ApiError::Conflict { .. } => Some(409),
            ApiError::Validation { .. } => Some(400),
            ApiError::Network { .. } => None,
        }
    }
}

/// Errors returned by [`SearchClient`](crate::client::SearchClient) operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Transport failure (connection, TLS, timeout, body decoding).
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The service answered with an error status.
    #[error("{0}")]
    Api(#[from] ApiError),

    /// A request or response body could not be (de)serialized.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The client was configured with an unusable value.
    #[error("invalid client configuration: {0}")]
    InvalidConfig(String),
}

impl Error {
    /// Returns true if the service reported that the resource does not exist.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::Api(ApiError::NotFound { .. }))
    }

    /// Returns true if the service reported a conflict with an existing resource.
    pub fn is_conflict(&self) -> bool {
        matches!(self, Error::Api(ApiError::Conflict { .. }))
    }

    /// Returns the underlying service error, if any.
    pub fn api_error(&self) -> Option<&ApiError> {
        match self {
            Error::Api(e) => Some(e),
            _ => None,
        }
    }
}

/// Result alias used throughout the client.
pub type Result<T> = std::result::Result<T, Error>;
