//! HTTP client wrapper for the Azure AI Search REST API.

use std::fmt;
use std::time::Duration;

use reqwest::{Method, RequestBuilder, Url};
use serde::{de::DeserializeOwned, Serialize};
use tracing::debug;

use crate::error::{Error, Result};
use crate::retry::{execute_with_retry, RetryConfig};

#[cfg(test)]
use crate::retry::{DEFAULT_INITIAL_BACKOFF_SECS, DEFAULT_MAX_BACKOFF_SECS, DEFAULT_MAX_RETRIES};

/// REST API version sent with every request.
pub const DEFAULT_API_VERSION: &str = "2024-07-01";

/// Default request timeout in seconds.
pub(crate) const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Credentials used to authenticate against the search service.
#[derive(Clone, PartialEq, Eq)]
pub enum Credential {
    /// Admin or query key, sent in the `api-key` header.
    ApiKey(String),
    /// Microsoft Entra access token, sent as a bearer token.
    Bearer(String),
}

impl Credential {
    fn apply(&self, request: RequestBuilder) -> RequestBuilder {
        match self {
            Credential::ApiKey(key) => request.header("api-key", key),
            Credential::Bearer(token) => request.bearer_auth(token),
        }
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Credential::ApiKey(_) => f.write_str("ApiKey([REDACTED])"),
            Credential::Bearer(_) => f.write_str("Bearer([REDACTED])"),
        }
    }
}

/// Builder for configuring a [`SearchClient`].
///
/// # Example
///
/// ```
/// use std::time::Duration;
/// use azure_search_api_rs::client::{Credential, SearchClientBuilder};
///
/// let client = SearchClientBuilder::new(
///     "https://my-service.search.windows.net",
///     Credential::ApiKey("admin-key".into()),
/// )
/// .max_retries(5)
/// .request_timeout(Duration::from_secs(10))
/// .build()
/// .unwrap();
///
/// assert_eq!(client.max_retries(), 5);
/// ```
#[derive(Debug, Clone)]
pub struct SearchClientBuilder {
    endpoint: String,
    credential: Credential,
    api_version: String,
    retry_config: RetryConfig,
    request_timeout: Duration,
}

impl SearchClientBuilder {
    /// Creates a builder with default retry and timeout settings.
    pub fn new(endpoint: impl Into<String>, credential: Credential) -> Self {
        Self {
            endpoint: endpoint.into(),
            credential,
            api_version: DEFAULT_API_VERSION.to_string(),
            retry_config: RetryConfig::default(),
            request_timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }

    /// Overrides the service endpoint.
    pub fn endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    /// Overrides the REST API version.
    pub fn api_version(mut self, api_version: impl Into<String>) -> Self {
        self.api_version = api_version.into();
        self
    }

    /// Sets the maximum number of retries for throttled requests.
    pub fn max_retries(mut self, max_retries: u32) -> Self {
        self.retry_config.max_retries = max_retries;
        self
    }

    /// Sets the initial backoff used when the service sends no Retry-After.
    pub fn initial_backoff(mut self, backoff: Duration) -> Self {
        self.retry_config.initial_backoff = backoff;
        self
    }

    /// Sets the upper bound for any single backoff.
    pub fn max_backoff(mut self, backoff: Duration) -> Self {
        self.retry_config.max_backoff = backoff;
        self
    }

    /// Sets the per-request timeout.
    pub fn request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    /// Builds the client.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfig`] if the endpoint is not an absolute
    /// http(s) URL, and [`Error::Http`] if the HTTP client cannot be built.
    pub fn build(self) -> Result<SearchClient> {
        let endpoint = self.endpoint.trim().trim_end_matches('/').to_string();
        let parsed = Url::parse(&endpoint)
            .map_err(|e| Error::InvalidConfig(format!("endpoint '{endpoint}': {e}")))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(Error::InvalidConfig(format!(
                "endpoint '{endpoint}' must use http or https"
            )));
        }
        if self.api_version.trim().is_empty() {
            return Err(Error::InvalidConfig("api version is empty".to_string()));
        }

        let http_client = reqwest::Client::builder()
            .timeout(self.request_timeout)
            .build()?;

        Ok(SearchClient {
            endpoint,
            credential: self.credential,
            api_version: self.api_version,
            http_client,
            retry_config: self.retry_config,
        })
    }
}

/// Client for interacting with an Azure AI Search service.
#[derive(Clone)]
pub struct SearchClient {
    endpoint: String,
    credential: Credential,
    api_version: String,
    http_client: reqwest::Client,
    retry_config: RetryConfig,
}

impl SearchClient {
    /// Creates a client with default settings.
    pub fn new(endpoint: impl Into<String>, credential: Credential) -> Result<Self> {
        SearchClientBuilder::new(endpoint, credential).build()
    }

    /// Returns a builder for a customized client.
    pub fn builder(endpoint: impl Into<String>, credential: Credential) -> SearchClientBuilder {
        SearchClientBuilder::new(endpoint, credential)
    }

    /// Returns the service endpoint without a trailing slash.
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Returns the REST API version.
    pub fn api_version(&self) -> &str {
        &self.api_version
    }

    /// Returns the credential.
    pub fn credential(&self) -> &Credential {
        &self.credential
    }

    /// Returns a reference to the underlying HTTP client.
    pub fn http_client(&self) -> &reqwest::Client {
        &self.http_client
    }

    /// Returns the maximum number of retries.
    pub fn max_retries(&self) -> u32 {
        self.retry_config.max_retries
    }

    /// Returns the initial backoff.
    pub fn initial_backoff(&self) -> Duration {
        self.retry_config.initial_backoff
    }

    /// Returns the maximum backoff.
    pub fn max_backoff(&self) -> Duration {
        self.retry_config.max_backoff
    }

    #[cfg(test)]
    pub(crate) fn calculate_backoff(&self, attempt: u32, retry_after: Option<u64>) -> Duration {
        self.retry_config.calculate_backoff(attempt, retry_after)
    }

    fn url(&self, path: &str) -> Result<Url> {
        Url::parse(&format!("{}{}", self.endpoint, path))
            .map_err(|e| Error::InvalidConfig(format!("request path '{path}': {e}")))
    }

    fn request(&self, method: Method, url: Url, query: &[(&str, &str)]) -> RequestBuilder {
        let request = self
            .http_client
            .request(method, url)
            .query(&[("api-version", self.api_version.as_str())])
            .query(query);
        self.credential.apply(request)
    }

    /// Sends a request with retries, returning the successful response.
    async fn send<B: Serialize>(
        &self,
        method: Method,
        path: &str,
        query: &[(&str, &str)],
        body: Option<&B>,
    ) -> Result<reqwest::Response> {
        let url = self.url(path)?;
        debug!(%method, path, "search service request");

        execute_with_retry(&self.retry_config, || {
            let mut request = self.request(method.clone(), url.clone(), query);
            if let Some(body) = body {
                request = request.json(body);
            }
            async move { request.send().await.map_err(Error::from) }
        })
        .await
    }

    /// Performs a GET request and deserializes the JSON response.
    ///
    /// # Arguments
    /// * `path` - The API path (e.g., "/indexes", "/indexes/products")
    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        self.get_with_query(path, &[]).await
    }

    /// Performs a GET request with extra query parameters.
    pub async fn get_with_query<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, &str)],
    ) -> Result<T> {
        let response = self.send::<()>(Method::GET, path, query, None).await?;
        Ok(response.json::<T>().await?)
    }

    /// Performs a GET request and returns the body as text.
    pub async fn get_text(&self, path: &str) -> Result<String> {
        let response = self.send::<()>(Method::GET, path, &[], None).await?;
        Ok(response.text().await?)
    }

    /// Performs a POST request with a JSON body and deserializes the JSON response.
    pub async fn post<T: DeserializeOwned, B: Serialize>(&self, path: &str, body: &B) -> Result<T> {
        let response = self.send(Method::POST, path, &[], Some(body)).await?;
        Ok(response.json::<T>().await?)
    }

    /// Performs a DELETE request.
    ///
    /// DELETE typically returns 204 No Content; the body is ignored.
    pub async fn delete(&self, path: &str) -> Result<()> {
        self.send::<()>(Method::DELETE, path, &[], None).await?;
        Ok(())
    }
}

impl fmt::Debug for SearchClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SearchClient")
            .field("endpoint", &self.endpoint)
            .field("credential", &self.credential)
            .field("api_version", &self.api_version)
            .field("retry_config", &self.retry_config)
            .finish()
    }
}

#[cfg(test)]
#[path = "client_tests.rs"]
mod tests;
