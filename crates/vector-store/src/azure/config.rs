//! Connection settings for [`AzureVectorStore`](super::AzureVectorStore).

use std::time::Duration;

use azure_search_api_rs::client::{Credential, SearchClient};
use serde::Deserialize;

use crate::error::{Result, VectorStoreError};

/// Settings for connecting to a search service.
///
/// Deserializes from the camelCase keys used in config files:
///
/// ```
/// use azure_vector_store_rs::azure::AzureVectorStoreConfig;
///
/// let config: AzureVectorStoreConfig = serde_json::from_str(r#"{
///     "endpoint": "https://my-service.search.windows.net",
///     "apiKey": "secret",
///     "maxRetries": 5
/// }"#).unwrap();
///
/// assert_eq!(config.max_retries, Some(5));
/// ```
#[derive(Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AzureVectorStoreConfig {
    pub endpoint: String,
    /// Admin or query key, sent as the `api-key` header.
    pub api_key: Option<String>,
    /// Microsoft Entra token, used when no key is set.
    pub bearer_token: Option<String>,
    pub api_version: Option<String>,
    /// Preferred vector field name for indexes created or queried by the store.
    pub vector_field: Option<String>,
    pub max_retries: Option<u32>,
    pub initial_backoff_ms: Option<u64>,
    pub max_backoff_ms: Option<u64>,
    pub request_timeout_secs: Option<u64>,
}

impl std::fmt::Debug for AzureVectorStoreConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AzureVectorStoreConfig")
            .field("endpoint", &self.endpoint)
            .field("api_key", &self.api_key.as_ref().map(|_| "[REDACTED]"))
            .field("bearer_token", &self.bearer_token.as_ref().map(|_| "[REDACTED]"))
            .field("api_version", &self.api_version)
            .field("vector_field", &self.vector_field)
            .field("max_retries", &self.max_retries)
            .field("initial_backoff_ms", &self.initial_backoff_ms)
            .field("max_backoff_ms", &self.max_backoff_ms)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .finish()
    }
}

impl AzureVectorStoreConfig {
    pub fn new(endpoint: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            api_key: Some(api_key.into()),
            ..Default::default()
        }
    }

    fn credential(&self) -> Result<Credential> {
        let non_empty = |s: &Option<String>| s.clone().filter(|s| !s.is_empty());
        match (non_empty(&self.api_key), non_empty(&self.bearer_token)) {
            (Some(key), _) => Ok(Credential::ApiKey(key)),
            (None, Some(token)) => Ok(Credential::Bearer(token)),
            (None, None) => Err(VectorStoreError::Config(
                "either an API key or a bearer token is required".to_string(),
            )),
        }
    }

    /// Builds a search client from these settings.
    pub fn build_client(&self) -> Result<SearchClient> {
        if self.endpoint.trim().is_empty() {
            return Err(VectorStoreError::Config("endpoint is required".to_string()));
        }

        let mut builder = SearchClient::builder(self.endpoint.trim(), self.credential()?);
        if let Some(version) = &self.api_version {
            builder = builder.api_version(version);
        }
        if let Some(retries) = self.max_retries {
            builder = builder.max_retries(retries);
        }
        if let Some(ms) = self.initial_backoff_ms {
            builder = builder.initial_backoff(Duration::from_millis(ms));
        }
        if let Some(ms) = self.max_backoff_ms {
            builder = builder.max_backoff(Duration::from_millis(ms));
        }
        if let Some(secs) = self.request_timeout_secs {
            builder = builder.request_timeout(Duration::from_secs(secs));
        }

        builder
            .build()
            .map_err(|e| VectorStoreError::Config(e.to_string()))
    }
}
