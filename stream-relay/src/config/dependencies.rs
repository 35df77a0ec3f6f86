//! Dependency initialization and wiring for the relay.
//!
//! The processor is constructed exactly once here, with its collaborators
//! and configuration passed in explicitly. There is no lazily-initialized
//! global instance.

use std::sync::Arc;

use tracing::info;

use crate::config::RelayConfig;
use crate::consumer::QueuePoller;
use crate::processor::EventProcessor;
use crate::RelayError;
use stream_relay_repository::{DocumentStore, MessageQueue, OpenSearchStore, SqsQueue};

/// Container for all initialized dependencies.
pub struct Dependencies {
    /// The configured event processor.
    pub processor: Arc<EventProcessor>,
    /// The poller feeding queue batches to the processor.
    pub poller: QueuePoller,
}

impl Dependencies {
    /// Initialize all dependencies from the given configuration.
    pub fn new(config: RelayConfig) -> Result<Self, RelayError> {
        info!(
            opensearch_url = %config.opensearch_url,
            queue_count = config.queue_urls.len(),
            table_count = config.tables.len(),
            "Initializing dependencies"
        );

        let store: Arc<dyn DocumentStore> = Arc::new(
            OpenSearchStore::new(&config.opensearch_url)
                .map_err(|e| RelayError::config(format!("Failed to create document store: {}", e)))?,
        );
        let queue: Arc<dyn MessageQueue> = Arc::new(SqsQueue::new());

        let processor = Arc::new(EventProcessor::new(
            store,
            Arc::clone(&queue),
            config.queue_urls.clone(),
            config.tables,
        ));

        let poller = QueuePoller::new(queue, Arc::clone(&processor), config.queue_urls);

        Ok(Self { processor, poller })
    }
}
