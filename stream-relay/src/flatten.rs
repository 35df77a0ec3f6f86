//! Record flattening.
//!
//! Merges the unmarshalled new image with event provenance into one flat,
//! document-shaped mapping ready for indexing.

use chrono::{SecondsFormat, Utc};
use serde_json::{json, Map, Value};

use crate::errors::ProcessError;
use stream_relay_shared::{unmarshall, StreamRecord};

/// Flatten a change event into an indexable document.
///
/// The new image is unmarshalled from its tagged encoding, then five
/// provenance fields are overlaid: `event_id`, `event_name`, `event_source`,
/// `event_region` and `event_timestamp`. The timestamp is processing time,
/// not event time.
///
/// # Errors
///
/// * `ProcessError::InvalidRecordFormat` - the change payload has no new image
/// * `ProcessError::EmptyRecord` - the merged mapping is empty (defensive;
///   the provenance overlay should prevent this)
pub fn flatten_record(record: &StreamRecord) -> Result<Map<String, Value>, ProcessError> {
    let new_image = record
        .dynamodb
        .new_image
        .as_ref()
        .ok_or(ProcessError::InvalidRecordFormat)?;

    let mut flat = unmarshall(new_image);

    flat.insert("event_id".to_string(), json!(record.event_id));
    flat.insert("event_name".to_string(), json!(record.event_name));
    flat.insert("event_source".to_string(), json!(record.event_source));
    flat.insert("event_region".to_string(), json!(record.aws_region));
    flat.insert(
        "event_timestamp".to_string(),
        json!(Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)),
    );

    if flat.is_empty() {
        return Err(ProcessError::EmptyRecord);
    }

    Ok(flat)
}
