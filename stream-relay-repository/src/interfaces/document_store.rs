//! Document store trait definition.

use async_trait::async_trait;
use serde_json::Value;

use crate::errors::RepositoryError;
use stream_relay_shared::SearchParams;

/// Abstracts the underlying document index (OpenSearch, Elasticsearch, an
/// in-memory double, ...).
///
/// Implementations are injected into the event processor, which relies on
/// two guarantees:
///
/// - `create` is an **upsert**: writing the same id twice with equivalent
///   content leaves the store in the same observable state as writing it
///   once. This is what makes redelivered messages harmless.
/// - `delete_by_query` is bulk and best-effort; the relay never inspects a
///   deletion count.
///
/// The trait stays object-safe (documents travel as `serde_json::Value`);
/// typed deserialization happens at the processor level.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Upsert a document by id. Returns `true` once the write is confirmed.
    async fn create(&self, index: &str, id: &str, document: &Value)
        -> Result<bool, RepositoryError>;

    /// Fetch a document by id.
    ///
    /// # Errors
    ///
    /// `RepositoryError::DocumentNotFound` if no document exists under `id`.
    async fn get(&self, index: &str, id: &str) -> Result<Value, RepositoryError>;

    /// Execute a search, forwarding the caller's parameters opaquely.
    ///
    /// An absent query means "match all". Results are the raw document
    /// sources in backend order.
    async fn search(
        &self,
        index: &str,
        params: &SearchParams,
    ) -> Result<Vec<Value>, RepositoryError>;

    /// Delete a document by id. Deleting a missing document is not an error.
    async fn delete(&self, index: &str, id: &str) -> Result<(), RepositoryError>;

    /// Bulk-delete every document matching `query`.
    async fn delete_by_query(&self, index: &str, query: &Value) -> Result<(), RepositoryError>;
}
