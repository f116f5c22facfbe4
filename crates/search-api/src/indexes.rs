//! Index management operations.

use tracing::info;

use crate::client::SearchClient;
use crate::error::{ApiError, Error, Result};
use crate::models::{IndexNameList, SearchIndex};

impl SearchClient {
    /// Creates an index and returns the definition stored by the service.
    ///
    /// Fails with a conflict error if an index of the same name exists.
    pub async fn create_index(&self, index: &SearchIndex) -> Result<SearchIndex> {
        let created: SearchIndex = self.post("/indexes", index).await?;
        info!(index = %created.name, "created search index");
        Ok(created)
    }

    /// Lists the names of all indexes in the service.
    pub async fn list_index_names(&self) -> Result<Vec<String>> {
        let list: IndexNameList = self.get_with_query("/indexes", &[("$select", "name")]).await?;
        Ok(list.value.into_iter().map(|i| i.name).collect())
    }

    /// Fetches an index definition.
    pub async fn get_index(&self, name: &str) -> Result<SearchIndex> {
        self.get(&format!("/indexes/{name}")).await
    }

    /// Deletes an index and all of its documents.
    pub async fn delete_index(&self, name: &str) -> Result<()> {
        self.delete(&format!("/indexes/{name}")).await?;
        info!(index = %name, "deleted search index");
        Ok(())
    }

    /// Returns the number of documents in an index.
    ///
    /// The service answers with a bare integer, sometimes prefixed with a UTF-8 BOM.
    pub async fn document_count(&self, name: &str) -> Result<u64> {
        let body = self.get_text(&format!("/indexes/{name}/docs/$count")).await?;
        let trimmed = body.trim_start_matches('\u{feff}').trim();
        trimmed.parse::<u64>().map_err(|_| {
            Error::Api(ApiError::Validation {
                field: Some("$count".to_string()),
                message: format!("unexpected document count response: '{trimmed}'"),
            })
        })
    }
}
