//! Change-stream record shape.
//!
//! A [`StreamRecord`] describes a single insert/update/delete on a
//! source-of-record item, including its before/after images in the tagged
//! attribute-value encoding.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::attribute::AttributeValue;

/// The fixed source tag a change event must carry to be recognized.
pub const STREAM_SOURCE: &str = "aws:dynamodb";

/// A single change event received from the upstream change stream.
///
/// Immutable once received; the relay only reads it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StreamRecord {
    /// Unique identifier of the change event.
    #[serde(rename = "eventID")]
    pub event_id: String,
    /// Kind of change: INSERT, MODIFY or REMOVE.
    #[serde(rename = "eventName")]
    pub event_name: String,
    /// Stream record format version.
    #[serde(rename = "eventVersion", default, skip_serializing_if = "Option::is_none")]
    pub event_version: Option<String>,
    /// Source tag; must equal [`STREAM_SOURCE`].
    #[serde(rename = "eventSource")]
    pub event_source: String,
    /// Region the change originated in.
    #[serde(rename = "awsRegion", default)]
    pub aws_region: String,
    /// Opaque reference to the origin table's stream. The table name is
    /// derived from the `.../table/<name>/...` segment.
    #[serde(rename = "eventSourceARN")]
    pub event_source_arn: String,
    /// The change payload carrying the key attributes and item images.
    pub dynamodb: StreamPayload,
}

/// The change payload of a stream record.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StreamPayload {
    /// Creation time of the stream record, seconds since the epoch.
    #[serde(
        rename = "ApproximateCreationDateTime",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub approximate_creation_date_time: Option<f64>,
    /// The primary key attributes of the changed item.
    #[serde(rename = "Keys", default, skip_serializing_if = "Option::is_none")]
    pub keys: Option<HashMap<String, AttributeValue>>,
    /// The item as it appears after the change. Absent for deletes.
    #[serde(rename = "NewImage", default, skip_serializing_if = "Option::is_none")]
    pub new_image: Option<HashMap<String, AttributeValue>>,
    /// The item as it appeared before the change.
    #[serde(rename = "OldImage", default, skip_serializing_if = "Option::is_none")]
    pub old_image: Option<HashMap<String, AttributeValue>>,
    /// Sequence number of the record within its shard.
    #[serde(
        rename = "SequenceNumber",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub sequence_number: Option<String>,
    /// Size of the record in bytes.
    #[serde(rename = "SizeBytes", default, skip_serializing_if = "Option::is_none")]
    pub size_bytes: Option<u64>,
    /// Which images the stream captures (e.g. NEW_AND_OLD_IMAGES).
    #[serde(
        rename = "StreamViewType",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub stream_view_type: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_deserialize_minimal_record() {
        let record: StreamRecord = serde_json::from_value(json!({
            "eventID": "1",
            "eventName": "INSERT",
            "eventSource": "aws:dynamodb",
            "awsRegion": "af-south-1",
            "eventSourceARN": "arn:aws:dynamodb:af-south-1:123:table/Orders/stream/2024",
            "dynamodb": {
                "NewImage": { "pk": { "S": "Order#1" } }
            }
        }))
        .expect("valid record");

        assert_eq!(record.event_id, "1");
        assert_eq!(record.event_source, STREAM_SOURCE);
        assert!(record.dynamodb.new_image.is_some());
        assert!(record.dynamodb.old_image.is_none());
    }
}
