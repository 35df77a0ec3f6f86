//! The per-message processing state machine and the purge engine.

use std::sync::Arc;

use chrono::{DateTime, Months, SecondsFormat, Utc};
use serde::de::DeserializeOwned;
use serde_json::{json, Value};
use tracing::{error, info, instrument, warn};

use crate::envelope::parse_message;
use crate::errors::ProcessError;
use crate::flatten::flatten_record;
use crate::routing::{extract_table_name, resolve_queue_url};
use stream_relay_repository::{DocumentStore, MessageQueue};
use stream_relay_shared::{QueueMessage, SearchParams, StreamRecord};

/// Retention horizon for the purge engine, in months.
pub const PURGE_RETENTION_MONTHS: u32 = 6;

/// Orchestrates the per-message pipeline and exposes the relay operations.
///
/// Constructed once at process start with its collaborators and
/// configuration injected; holds no other state. Messages are independent
/// of each other, so no ordering is enforced within a batch. The only
/// ordering that matters is intra-message: the acknowledgement delete runs
/// strictly after a confirmed index write, so a crash between the two costs
/// at most a harmless duplicate re-upsert, never data loss.
pub struct EventProcessor {
    store: Arc<dyn DocumentStore>,
    queue: Arc<dyn MessageQueue>,
    queue_urls: Vec<String>,
    tables: Vec<String>,
}

impl EventProcessor {
    /// Create a new processor with its collaborators and configuration.
    ///
    /// # Arguments
    ///
    /// * `store` - Document store gateway
    /// * `queue` - Acknowledgement channel gateway
    /// * `queue_urls` - Ordered list of known acknowledgement queue URLs
    /// * `tables` - Destination index names the purge engine iterates
    pub fn new(
        store: Arc<dyn DocumentStore>,
        queue: Arc<dyn MessageQueue>,
        queue_urls: Vec<String>,
        tables: Vec<String>,
    ) -> Self {
        Self {
            store,
            queue,
            queue_urls,
            tables,
        }
    }

    /// Process a batch of raw queue messages.
    ///
    /// Never fails the whole batch: every per-message failure is logged with
    /// its message id and reason, the message is left unacknowledged for
    /// redelivery, and processing continues with the next message. An empty
    /// batch is a no-op.
    #[instrument(skip(self, batch), fields(batch_size = batch.len()))]
    pub async fn process(&self, batch: &[QueueMessage]) {
        if batch.is_empty() {
            info!("No records to process");
            return;
        }

        for message in batch {
            info!(message_id = %message.message_id, "Processing queue message");

            let record = match parse_message(&message.body) {
                Some(record) => record,
                None => {
                    // Parse miss: skip without acknowledging so the channel's
                    // redelivery/expiry policy decides the message's fate.
                    error!(
                        message_id = %message.message_id,
                        "Skipping record - could not parse change event"
                    );
                    continue;
                }
            };

            if let Err(e) = self.process_record(message, record).await {
                error!(
                    message_id = %message.message_id,
                    error = %e,
                    "Failed to process individual record"
                );
            }
        }
    }

    /// Run one message through flatten -> route -> index -> acknowledge.
    async fn process_record(
        &self,
        message: &QueueMessage,
        record: StreamRecord,
    ) -> Result<(), ProcessError> {
        let table_name = extract_table_name(&record.event_source_arn)?;
        info!(table_name = %table_name, "Extracted table name");

        let flat = flatten_record(&record)?;

        let queue_url = resolve_queue_url(&table_name, &self.queue_urls)?;

        let pk = flat
            .get("pk")
            .and_then(Value::as_str)
            .filter(|pk| !pk.is_empty())
            .ok_or(ProcessError::MissingPrimaryKey)?
            .to_string();

        let saved = self
            .store
            .create(&table_name, &pk, &Value::Object(flat))
            .await?;

        // Acknowledge strictly after the confirmed write.
        if saved {
            self.queue.delete(queue_url, &message.receipt_handle).await?;
        } else {
            warn!(
                message_id = %message.message_id,
                table_name = %table_name,
                "Index write was not confirmed, leaving message for redelivery"
            );
        }

        Ok(())
    }

    /// Search a table's index, forwarding the parameters opaquely.
    pub async fn search<T: DeserializeOwned>(
        &self,
        table_name: &str,
        params: &SearchParams,
    ) -> Result<Vec<T>, ProcessError> {
        let hits = self
            .store
            .search(&table_name.to_lowercase(), params)
            .await?;

        hits.into_iter()
            .map(|hit| {
                serde_json::from_value(hit).map_err(|e| ProcessError::Deserialize(e.to_string()))
            })
            .collect()
    }

    /// Fetch a single document by table and id.
    pub async fn get<T: DeserializeOwned>(
        &self,
        table_name: &str,
        id: &str,
    ) -> Result<T, ProcessError> {
        let document = self.store.get(&table_name.to_lowercase(), id).await?;
        serde_json::from_value(document).map_err(|e| ProcessError::Deserialize(e.to_string()))
    }

    /// Delete a single document by table and id.
    pub async fn delete(&self, table_name: &str, id: &str) -> Result<(), ProcessError> {
        self.store.delete(&table_name.to_lowercase(), id).await?;
        Ok(())
    }

    /// Purge documents older than the retention horizon from every
    /// configured index.
    ///
    /// Best-effort: per-index failures are logged and do not abort the purge
    /// of the remaining indices. Callers get no partial-success reporting
    /// beyond the logs.
    #[instrument(skip(self))]
    pub async fn purge(&self) {
        let cutoff = purge_cutoff(Utc::now());
        let query = json!({
            "range": {
                "event_timestamp": {
                    "lt": cutoff.to_rfc3339_opts(SecondsFormat::Millis, true),
                }
            }
        });

        for table in &self.tables {
            match self.store.delete_by_query(table, &query).await {
                Ok(()) => {
                    info!(table = %table, cutoff = %cutoff, "Successfully purged old records");
                }
                Err(e) => {
                    error!(table = %table, error = %e, "Failed to purge records from table");
                }
            }
        }
    }
}

/// Compute the purge cutoff: documents with `event_timestamp` strictly
/// before this instant are deleted, documents exactly at it are retained.
fn purge_cutoff(now: DateTime<Utc>) -> DateTime<Utc> {
    now.checked_sub_months(Months::new(PURGE_RETENTION_MONTHS))
        .unwrap_or(now)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_purge_cutoff_exact_boundary() {
        let now = Utc.with_ymd_and_hms(2024, 7, 1, 0, 0, 0).unwrap();
        let cutoff = purge_cutoff(now);
        assert_eq!(cutoff, Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap());
    }

    #[test]
    fn test_purge_cutoff_clamps_short_months() {
        // 2024-08-31 minus six months lands in February; chrono clamps to
        // the last valid day instead of overflowing.
        let now = Utc.with_ymd_and_hms(2024, 8, 31, 12, 0, 0).unwrap();
        let cutoff = purge_cutoff(now);
        assert_eq!(cutoff, Utc.with_ymd_and_hms(2024, 2, 29, 12, 0, 0).unwrap());
    }
}
