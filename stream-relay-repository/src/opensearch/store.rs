//! OpenSearch-backed document store.

use async_trait::async_trait;
use opensearch::{
    http::transport::{SingleNodeConnectionPool, TransportBuilder},
    params::Refresh,
    DeleteByQueryParts, DeleteParts, GetParts, IndexParts, OpenSearch, SearchParts,
};
use serde_json::{json, Map, Value};
use tracing::{debug, error, info};
use url::Url;

use crate::errors::RepositoryError;
use crate::interfaces::DocumentStore;
use stream_relay_shared::SearchParams;

/// Document store implementation using the OpenSearch client.
///
/// Writes use `refresh=wait_for` so a confirmed write is visible to search
/// before the caller acknowledges the originating message.
pub struct OpenSearchStore {
    client: OpenSearch,
}

impl OpenSearchStore {
    /// Create a new store connected to the given URL.
    ///
    /// # Arguments
    ///
    /// * `url` - The OpenSearch server URL (e.g. "http://localhost:9200")
    pub fn new(url: &str) -> Result<Self, RepositoryError> {
        let parsed_url =
            Url::parse(url).map_err(|e| RepositoryError::connection(e.to_string()))?;

        let conn_pool = SingleNodeConnectionPool::new(parsed_url);
        let transport = TransportBuilder::new(conn_pool)
            .disable_proxy()
            .build()
            .map_err(|e| RepositoryError::connection(e.to_string()))?;

        info!(url = %url, "Created OpenSearch document store");

        Ok(Self {
            client: OpenSearch::new(transport),
        })
    }
}

#[async_trait]
impl DocumentStore for OpenSearchStore {
    async fn create(
        &self,
        index: &str,
        id: &str,
        document: &Value,
    ) -> Result<bool, RepositoryError> {
        let response = self
            .client
            .index(IndexParts::IndexId(index, id))
            .body(document)
            .refresh(Refresh::WaitFor)
            .send()
            .await
            .map_err(|e| RepositoryError::index(e.to_string()))?;

        let status = response.status_code();
        if !status.is_success() {
            let error_body = response.text().await.unwrap_or_default();
            error!(index = %index, id = %id, status = %status, body = %error_body, "Index request failed");
            return Err(RepositoryError::index(format!(
                "Index failed with status {}: {}",
                status, error_body
            )));
        }

        debug!(index = %index, id = %id, "Document indexed");
        Ok(true)
    }

    async fn get(&self, index: &str, id: &str) -> Result<Value, RepositoryError> {
        let response = self
            .client
            .get(GetParts::IndexId(index, id))
            .send()
            .await
            .map_err(|e| RepositoryError::search(e.to_string()))?;

        let status = response.status_code();
        if status.as_u16() == 404 {
            return Err(RepositoryError::document_not_found(index, id));
        }
        if !status.is_success() {
            let error_body = response.text().await.unwrap_or_default();
            return Err(RepositoryError::search(format!(
                "Get failed with status {}: {}",
                status, error_body
            )));
        }

        let body: Value = response
            .json()
            .await
            .map_err(|e| RepositoryError::parse(e.to_string()))?;

        body.get("_source")
            .cloned()
            .ok_or_else(|| RepositoryError::parse("get response has no _source".to_string()))
    }

    async fn search(
        &self,
        index: &str,
        params: &SearchParams,
    ) -> Result<Vec<Value>, RepositoryError> {
        let mut body = Map::new();
        body.insert(
            "query".to_string(),
            params
                .query
                .clone()
                .unwrap_or_else(|| json!({ "match_all": {} })),
        );
        if let Some(ref sort) = params.sort {
            body.insert("sort".to_string(), sort.clone());
        }
        if let Some(from) = params.from {
            body.insert("from".to_string(), json!(from));
        }
        if let Some(size) = params.size {
            body.insert("size".to_string(), json!(size));
        }

        let response = self
            .client
            .search(SearchParts::Index(&[index]))
            .body(Value::Object(body))
            .send()
            .await
            .map_err(|e| RepositoryError::search(e.to_string()))?;

        let status = response.status_code();
        if !status.is_success() {
            let error_body = response.text().await.unwrap_or_default();
            error!(index = %index, status = %status, body = %error_body, "Search request failed");
            return Err(RepositoryError::search(format!(
                "Search failed with status {}: {}",
                status, error_body
            )));
        }

        let body: Value = response
            .json()
            .await
            .map_err(|e| RepositoryError::parse(e.to_string()))?;

        let hits = body
            .get("hits")
            .and_then(|h| h.get("hits"))
            .and_then(Value::as_array)
            .ok_or_else(|| RepositoryError::parse("search response has no hits".to_string()))?;

        Ok(hits
            .iter()
            .filter_map(|hit| hit.get("_source").cloned())
            .collect())
    }

    async fn delete(&self, index: &str, id: &str) -> Result<(), RepositoryError> {
        let response = self
            .client
            .delete(DeleteParts::IndexId(index, id))
            .refresh(Refresh::WaitFor)
            .send()
            .await
            .map_err(|e| RepositoryError::delete(e.to_string()))?;

        let status = response.status_code();

        // 404 is acceptable - document may not exist
        if !status.is_success() && status.as_u16() != 404 {
            let error_body = response.text().await.unwrap_or_default();
            error!(index = %index, id = %id, status = %status, body = %error_body, "Delete request failed");
            return Err(RepositoryError::delete(format!(
                "Delete failed with status {}: {}",
                status, error_body
            )));
        }

        debug!(index = %index, id = %id, "Document deleted");
        Ok(())
    }

    async fn delete_by_query(&self, index: &str, query: &Value) -> Result<(), RepositoryError> {
        let response = self
            .client
            .delete_by_query(DeleteByQueryParts::Index(&[index]))
            .body(json!({ "query": query }))
            .send()
            .await
            .map_err(|e| RepositoryError::delete(e.to_string()))?;

        let status = response.status_code();
        if !status.is_success() {
            let error_body = response.text().await.unwrap_or_default();
            error!(index = %index, status = %status, body = %error_body, "Delete-by-query request failed");
            return Err(RepositoryError::delete(format!(
                "Delete by query failed with status {}: {}",
                status, error_body
            )));
        }

        debug!(index = %index, "Delete-by-query issued");
        Ok(())
    }
}
