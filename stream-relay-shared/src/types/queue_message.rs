//! Message envelope delivered by the acknowledgement channel.

use serde::{Deserialize, Serialize};

/// A single raw message received from a queue.
///
/// The body is kept as an opaque string; the envelope parser is responsible
/// for resolving it into a change event. The receipt handle is the token the
/// queue expects back when the message is acknowledged.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueueMessage {
    /// Queue-assigned message identifier, used for log correlation.
    #[serde(rename = "MessageId", default)]
    pub message_id: String,
    /// Raw message body.
    #[serde(rename = "Body", default)]
    pub body: String,
    /// Token required to delete the message after a confirmed index write.
    #[serde(rename = "ReceiptHandle", default)]
    pub receipt_handle: String,
}
