//! Message queue trait definition.

use std::collections::HashMap;

use async_trait::async_trait;

use crate::errors::RepositoryError;
use stream_relay_shared::QueueMessage;

/// Abstracts the acknowledgement channel the change events arrive on.
///
/// `delete` removes a processed message so it is not redelivered; the event
/// processor only calls it after a confirmed index write. A stale or expired
/// receipt handle surfaces as a `RepositoryError` the processor logs as a
/// failed acknowledgement, never as a fatal condition.
#[async_trait]
pub trait MessageQueue: Send + Sync {
    /// Send a message to a queue, optionally with string attributes.
    async fn send(
        &self,
        queue_url: &str,
        body: &str,
        attributes: Option<HashMap<String, String>>,
    ) -> Result<(), RepositoryError>;

    /// Delete a message from a queue by its receipt handle.
    async fn delete(&self, queue_url: &str, receipt_handle: &str) -> Result<(), RepositoryError>;

    /// Long-poll a queue for up to `max_messages` messages, waiting at most
    /// `wait_seconds` for one to arrive.
    async fn receive(
        &self,
        queue_url: &str,
        max_messages: u32,
        wait_seconds: u32,
    ) -> Result<Vec<QueueMessage>, RepositoryError>;
}
