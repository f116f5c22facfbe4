//! Retry logic for HTTP requests with exponential backoff.

use std::time::Duration;

use serde::Deserialize;
use tokio::time::sleep;
use tracing::warn;

use crate::error::{ApiError, Error, Result};

/// Default initial backoff duration for retries (1 second).
pub(crate) const DEFAULT_INITIAL_BACKOFF_SECS: u64 = 1;

/// Default maximum backoff duration for retries (30 seconds).
pub(crate) const DEFAULT_MAX_BACKOFF_SECS: u64 = 30;

/// Default maximum number of retry attempts.
pub(crate) const DEFAULT_MAX_RETRIES: u32 = 3;

/// Configuration for retry behavior.
#[derive(Clone, Debug)]
pub(crate) struct RetryConfig {
    /// Maximum number of retry attempts.
    pub max_retries: u32,
    /// Initial backoff duration for retries.
    pub initial_backoff: Duration,
    /// Maximum backoff duration for retries.
    pub max_backoff: Duration,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: DEFAULT_MAX_RETRIES,
            initial_backoff: Duration::from_secs(DEFAULT_INITIAL_BACKOFF_SECS),
            max_backoff: Duration::from_secs(DEFAULT_MAX_BACKOFF_SECS),
        }
    }
}

impl RetryConfig {
    /// Calculates the backoff duration for a retry attempt.
    ///
    /// If `retry_after` is provided (from a throttled response), uses that value.
    /// Otherwise, uses exponential backoff: initial * 2^attempt, capped at max_backoff.
    pub fn calculate_backoff(&self, attempt: u32, retry_after: Option<u64>) -> Duration {
        if let Some(secs) = retry_after {
            Duration::from_secs(secs).min(self.max_backoff)
        } else {
            let factor = 1u32.checked_shl(attempt).unwrap_or(u32::MAX);
            self.initial_backoff
                .saturating_mul(factor)
                .min(self.max_backoff)
        }
    }
}

/// Decision type for retry logic.
pub(crate) enum RetryDecision {
    /// Request succeeded; the response body has not been read yet.
    Success(reqwest::Response),
    /// Request should be retried.
    Retry { retry_after: Option<u64> },
}

/// Returns true for statuses the service uses to signal throttling.
fn is_throttled(status: reqwest::StatusCode) -> bool {
    matches!(status.as_u16(), 429 | 503)
}

fn retry_after_header(response: &reqwest::Response) -> Option<u64> {
    response
        .headers()
        .get("retry-after")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.trim().parse::<u64>().ok())
}

/// Classifies a response as success, retry, or a terminal error.
pub(crate) async fn classify_response(
    response: reqwest::Response,
    attempt: u32,
    max_retries: u32,
) -> Result<RetryDecision> {
    let status = response.status();

    if status.is_success() {
        return Ok(RetryDecision::Success(response));
    }

    if is_throttled(status) && attempt < max_retries {
        return Ok(RetryDecision::Retry {
            retry_after: retry_after_header(&response),
        });
    }

    Err(parse_error_response(response).await)
}

/// Error envelope returned by the service: `{"error": {"code": "...", "message": "..."}}`.
#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: String,
}

/// Extracts the human-readable message from an error body, falling back to the raw text.
fn extract_message(body: &str) -> String {
    serde_json::from_str::<ErrorEnvelope>(body)
        .map(|envelope| envelope.error.message)
        .unwrap_or_else(|_| body.trim().to_string())
}

/// Parses an error response into our error types.
pub(crate) async fn parse_error_response(response: reqwest::Response) -> Error {
    let status = response.status();
    let status_code = status.as_u16();
    let path = response.url().path().to_string();
    let retry_after = retry_after_header(&response);

    let body = response.text().await.unwrap_or_default();
    let message = extract_message(&body);

    let api_error = match status_code {
        401 | 403 => ApiError::Auth {
            message: if message.is_empty() {
                "Authentication failed".to_string()
            } else {
                message
            },
        },
        404 => ApiError::NotFound { path, message },
        409 | 412 => ApiError::Conflict { message },
        429 => ApiError::RateLimit { retry_after },
        503 if retry_after.is_some() => ApiError::RateLimit { retry_after },
        400 => ApiError::Validation {
            field: None,
            message: if message.is_empty() {
                "Bad request".to_string()
            } else {
                message
            },
        },
        _ => ApiError::Http {
            status: status_code,
            message: if message.is_empty() {
                status
                    .canonical_reason()
                    .unwrap_or("Unknown error")
                    .to_string()
            } else {
                message
            },
        },
    };

    Error::Api(api_error)
}

/// Executes a request with retry logic, returning the first successful response.
///
/// `make_request` is invoked once per attempt so each attempt gets a fresh
/// request builder.
pub(crate) async fn execute_with_retry<F, Fut>(
    config: &RetryConfig,
    mut make_request: F,
) -> Result<reqwest::Response>
where
    F: FnMut() -> Fut,
    Fut: std::future::Future<Output = Result<reqwest::Response>>,
{
    for attempt in 0..=config.max_retries {
        let response = make_request().await?;

        match classify_response(response, attempt, config.max_retries).await? {
            RetryDecision::Success(response) => return Ok(response),
            RetryDecision::Retry { retry_after } => {
                let backoff = config.calculate_backoff(attempt, retry_after);
                warn!(
                    attempt = attempt + 1,
                    max_retries = config.max_retries,
                    backoff_ms = backoff.as_millis() as u64,
                    "search service throttled request, retrying"
                );
                sleep(backoff).await;
            }
        }
    }

    // All retries exhausted
    Err(Error::Api(ApiError::RateLimit { retry_after: None }))
}
