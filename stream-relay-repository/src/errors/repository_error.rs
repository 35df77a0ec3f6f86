//! Unified error type for gateway operations.

use thiserror::Error;

/// Errors surfaced by the document store and message queue gateways.
///
/// Used by the `DocumentStore` and `MessageQueue` traits so that any
/// concrete backend reports failures the same way to the relay core.
#[derive(Debug, Clone, Error)]
pub enum RepositoryError {
    /// Failed to establish a connection to a backend.
    #[error("Connection error: {0}")]
    ConnectionError(String),

    /// Failed to index (upsert) a document.
    #[error("Index error: {0}")]
    IndexError(String),

    /// Failed to execute a search.
    #[error("Search error: {0}")]
    SearchError(String),

    /// Failed to delete a document or run a delete-by-query.
    #[error("Delete error: {0}")]
    DeleteError(String),

    /// Message queue operation failed (send, delete or receive).
    #[error("Queue error: {0}")]
    QueueError(String),

    /// Failed to parse a backend response.
    #[error("Parse error: {0}")]
    ParseError(String),

    /// Failed to serialize a request body.
    #[error("Serialization error: {0}")]
    SerializationError(String),

    /// Document not found.
    #[error("Document not found: {0}")]
    DocumentNotFound(String),
}

impl RepositoryError {
    /// Create a connection error.
    pub fn connection(msg: impl Into<String>) -> Self {
        Self::ConnectionError(msg.into())
    }

    /// Create an index error.
    pub fn index(msg: impl Into<String>) -> Self {
        Self::IndexError(msg.into())
    }

    /// Create a search error.
    pub fn search(msg: impl Into<String>) -> Self {
        Self::SearchError(msg.into())
    }

    /// Create a delete error.
    pub fn delete(msg: impl Into<String>) -> Self {
        Self::DeleteError(msg.into())
    }

    /// Create a queue error.
    pub fn queue(msg: impl Into<String>) -> Self {
        Self::QueueError(msg.into())
    }

    /// Create a parse error.
    pub fn parse(msg: impl Into<String>) -> Self {
        Self::ParseError(msg.into())
    }

    /// Create a serialization error.
    pub fn serialization(msg: impl Into<String>) -> Self {
        Self::SerializationError(msg.into())
    }

    /// Create a document-not-found error.
    pub fn document_not_found(index: &str, id: &str) -> Self {
        Self::DocumentNotFound(format!("index={}, id={}", index, id))
    }
}
