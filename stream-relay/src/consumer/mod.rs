//! Long-polling queue consumer.
//!
//! One tokio task per configured queue long-polls for message batches and
//! feeds them to the event processor. Tasks are independent: a slow or
//! unavailable queue blocks only its own poller. Shutdown is signalled over
//! a broadcast channel on ctrl-c; in-flight messages are simply left
//! unacknowledged, which is safe under the idempotent-upsert invariant.

use std::sync::Arc;

use tokio::sync::broadcast;
use tokio::time::{sleep, Duration};
use tracing::{error, info, warn};

use crate::processor::EventProcessor;
use crate::RelayError;
use stream_relay_repository::MessageQueue;

/// Maximum number of messages fetched per poll.
const MAX_BATCH_SIZE: u32 = 10;

/// Long-poll wait per receive call, in seconds.
const POLL_WAIT_SECONDS: u32 = 20;

/// Back-off after a failed receive.
const RECEIVE_ERROR_BACKOFF: Duration = Duration::from_secs(5);

/// Polls every configured queue and drives the processor.
pub struct QueuePoller {
    queue: Arc<dyn MessageQueue>,
    processor: Arc<EventProcessor>,
    queue_urls: Vec<String>,
}

impl QueuePoller {
    /// Create a poller over the given queues.
    pub fn new(
        queue: Arc<dyn MessageQueue>,
        processor: Arc<EventProcessor>,
        queue_urls: Vec<String>,
    ) -> Self {
        Self {
            queue,
            processor,
            queue_urls,
        }
    }

    /// Run until ctrl-c.
    pub async fn run(&self) -> Result<(), RelayError> {
        let (shutdown_tx, _) = broadcast::channel::<()>(1);

        info!(queue_count = self.queue_urls.len(), "Starting queue poller");

        let mut handles = Vec::with_capacity(self.queue_urls.len());
        for queue_url in &self.queue_urls {
            let queue = Arc::clone(&self.queue);
            let processor = Arc::clone(&self.processor);
            let queue_url = queue_url.clone();
            let shutdown_rx = shutdown_tx.subscribe();

            handles.push(tokio::spawn(async move {
                poll_queue(queue, processor, queue_url, shutdown_rx).await;
            }));
        }

        tokio::signal::ctrl_c()
            .await
            .map_err(|e| RelayError::config(format!("Failed to listen for shutdown: {}", e)))?;

        info!("Received shutdown signal");
        let _ = shutdown_tx.send(());

        for handle in handles {
            let _ = handle.await;
        }

        info!("Queue poller shutdown complete");
        Ok(())
    }
}

async fn poll_queue(
    queue: Arc<dyn MessageQueue>,
    processor: Arc<EventProcessor>,
    queue_url: String,
    mut shutdown: broadcast::Receiver<()>,
) {
    info!(queue_url = %queue_url, "Polling queue");

    loop {
        tokio::select! {
            _ = shutdown.recv() => {
                info!(queue_url = %queue_url, "Poller stopping");
                break;
            }
            received = queue.receive(&queue_url, MAX_BATCH_SIZE, POLL_WAIT_SECONDS) => {
                match received {
                    Ok(batch) => {
                        if !batch.is_empty() {
                            processor.process(&batch).await;
                        }
                    }
                    Err(e) => {
                        error!(queue_url = %queue_url, error = %e, "Failed to receive messages");
                        warn!(
                            queue_url = %queue_url,
                            backoff_secs = RECEIVE_ERROR_BACKOFF.as_secs(),
                            "Backing off before next poll"
                        );
                        sleep(RECEIVE_ERROR_BACKOFF).await;
                    }
                }
            }
        }
    }
}
