//! Message envelope parsing.
//!
//! A change event may arrive directly, wrapped inside a transport `body`
//! string, or inside a `Records` batch whose elements are themselves either
//! direct events or `body` wrappers. The cascade is represented as an
//! explicit [`Envelope`] variant matched in order, first match wins.
//!
//! Malformed JSON anywhere in the cascade degrades to `None` - a parse miss
//! is not an error. The message is left in its queue for redelivery or
//! expiry, and a truncated snippet of the body is logged for diagnosis.

use serde_json::Value;
use tracing::{error, warn};

use stream_relay_shared::{StreamRecord, STREAM_SOURCE};

/// How many characters of an unparseable body to include in logs.
const SNIPPET_LEN: usize = 100;

/// Recognized envelope shapes, tried in declaration order.
#[derive(Debug)]
enum Envelope {
    /// The top-level structure is itself a change event.
    Direct(Value),
    /// The change event is JSON-encoded inside a string `body` field.
    WrappedBody(String),
    /// A batch of records, each a direct event or a `body` wrapper.
    RecordsBatch(Vec<Value>),
}

/// Collect every shape the message matches, in cascade order. A message
/// can match more than one (a stray `body` string next to a `Records`
/// array); a shape that fails to resolve must not mask the next one.
fn classify(value: &Value) -> Vec<Envelope> {
    let mut shapes = Vec::new();
    if is_change_event(value) {
        shapes.push(Envelope::Direct(value.clone()));
    }
    if let Some(body) = value.get("body").and_then(Value::as_str) {
        shapes.push(Envelope::WrappedBody(body.to_string()));
    }
    if let Some(records) = value.get("Records").and_then(Value::as_array) {
        shapes.push(Envelope::RecordsBatch(records.clone()));
    }
    shapes
}

/// Shape predicate for "is a change event".
fn is_change_event(value: &Value) -> bool {
    value.get("eventID").map_or(false, Value::is_string)
        && value.get("eventName").map_or(false, Value::is_string)
        && value.get("eventSource").and_then(Value::as_str) == Some(STREAM_SOURCE)
        && value.get("eventSourceARN").map_or(false, Value::is_string)
        && value.get("dynamodb").map_or(false, Value::is_object)
}

fn decode(value: Value) -> Option<StreamRecord> {
    match serde_json::from_value::<StreamRecord>(value) {
        Ok(record) => Some(record),
        Err(e) => {
            // Passed the shape predicate but still failed to decode.
            warn!(error = %e, "Change event matched shape predicate but failed to decode");
            None
        }
    }
}

/// Try to resolve an inner `body` string into a change event.
fn decode_wrapped(body: &str) -> Option<StreamRecord> {
    let inner: Value = serde_json::from_str(body).ok()?;
    if is_change_event(&inner) {
        decode(inner)
    } else {
        None
    }
}

/// Extract a single change event from an arbitrarily-nested message body.
///
/// Returns `None` when no recognizable change event is present; the caller
/// must skip the message without acknowledging it.
pub fn parse_message(message_body: &str) -> Option<StreamRecord> {
    let parsed: Value = match serde_json::from_str(message_body) {
        Ok(value) => value,
        Err(e) => {
            let snippet: String = message_body.chars().take(SNIPPET_LEN).collect();
            error!(error = %e, body_snippet = %snippet, "Failed to parse message body");
            return None;
        }
    };

    for envelope in classify(&parsed) {
        if let Some(record) = resolve(envelope) {
            return Some(record);
        }
    }

    warn!("Could not find change event in message");
    None
}

fn resolve(envelope: Envelope) -> Option<StreamRecord> {
    match envelope {
        Envelope::Direct(value) => decode(value),
        Envelope::WrappedBody(body) => decode_wrapped(&body),
        Envelope::RecordsBatch(records) => {
            for record in records {
                if is_change_event(&record) {
                    if let Some(decoded) = decode(record) {
                        return Some(decoded);
                    }
                    continue;
                }
                if let Some(body) = record.get("body").and_then(Value::as_str) {
                    if let Some(decoded) = decode_wrapped(body) {
                        return Some(decoded);
                    }
                }
            }
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn event_json() -> Value {
        json!({
            "eventID": "evt-1",
            "eventName": "INSERT",
            "eventSource": "aws:dynamodb",
            "awsRegion": "af-south-1",
            "eventSourceARN": "arn:aws:dynamodb:af-south-1:123:table/Orders/stream/2024",
            "dynamodb": {
                "NewImage": { "pk": { "S": "Order#1" } }
            }
        })
    }

    #[test]
    fn test_parse_direct_event() {
        let body = event_json().to_string();
        let record = parse_message(&body).expect("direct event parses");
        assert_eq!(record.event_id, "evt-1");
    }

    #[test]
    fn test_parse_wrapped_body() {
        let body = json!({ "body": event_json().to_string() }).to_string();
        let record = parse_message(&body).expect("wrapped event parses");
        assert_eq!(record.event_id, "evt-1");
    }

    #[test]
    fn test_parse_records_batch_with_nested_body() {
        // Two levels of unwrapping: Records array, then a JSON-encoded body.
        let body = json!({
            "Records": [ { "body": event_json().to_string() } ]
        })
        .to_string();
        let record = parse_message(&body).expect("nested event parses");
        assert_eq!(record.event_id, "evt-1");
    }

    #[test]
    fn test_parse_records_batch_with_direct_element() {
        let body = json!({ "Records": [ event_json() ] }).to_string();
        assert!(parse_message(&body).is_some());
    }

    #[test]
    fn test_wrong_source_tag_is_a_miss() {
        let mut event = event_json();
        event["eventSource"] = json!("aws:kinesis");
        assert!(parse_message(&event.to_string()).is_none());
    }

    #[test]
    fn test_unrecognized_shape_is_a_miss() {
        assert!(parse_message(r#"{"hello": "world"}"#).is_none());
    }

    #[test]
    fn test_malformed_json_is_a_miss() {
        assert!(parse_message("{not json").is_none());
    }

    #[test]
    fn test_malformed_inner_body_is_a_miss() {
        let body = json!({ "body": "{not json" }).to_string();
        assert!(parse_message(&body).is_none());
    }

    #[test]
    fn test_unresolvable_body_falls_through_to_records() {
        // A stray `body` string that holds no change event must not mask a
        // valid `Records` batch sitting next to it.
        let body = json!({
            "body": "{}",
            "Records": [ event_json() ]
        })
        .to_string();
        let record = parse_message(&body).expect("batch event parses despite stray body");
        assert_eq!(record.event_id, "evt-1");
    }

    #[test]
    fn test_batch_skips_bad_elements() {
        let body = json!({
            "Records": [ { "body": "{not json" }, event_json() ]
        })
        .to_string();
        assert!(parse_message(&body).is_some());
    }
}
