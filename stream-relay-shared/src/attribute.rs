//! Tagged attribute-value encoding used by the source store's change stream.
//!
//! Each field value arrives wrapped with a short type tag, e.g.
//! `{"S": "Product#X"}` or `{"N": "10"}`. [`unmarshall`] converts a tagged
//! map into a plain JSON object for indexing.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Number, Value};

/// A single tagged value from the change stream.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum AttributeValue {
    /// String value.
    #[serde(rename = "S")]
    String(String),
    /// Numeric value, transported as a string to preserve precision.
    #[serde(rename = "N")]
    Number(String),
    /// Binary value, base64-encoded. Passed through as a string.
    #[serde(rename = "B")]
    Binary(String),
    /// Boolean value.
    #[serde(rename = "BOOL")]
    Boolean(bool),
    /// Null marker.
    #[serde(rename = "NULL")]
    Null(bool),
    /// Nested map of tagged values.
    #[serde(rename = "M")]
    Map(HashMap<String, AttributeValue>),
    /// List of tagged values.
    #[serde(rename = "L")]
    List(Vec<AttributeValue>),
    /// Set of strings.
    #[serde(rename = "SS")]
    StringSet(Vec<String>),
    /// Set of numbers, transported as strings.
    #[serde(rename = "NS")]
    NumberSet(Vec<String>),
}

impl AttributeValue {
    /// Convert this tagged value into a plain JSON value.
    pub fn to_json(&self) -> Value {
        match self {
            AttributeValue::String(s) => Value::String(s.clone()),
            AttributeValue::Number(n) => parse_number(n),
            AttributeValue::Binary(b) => Value::String(b.clone()),
            AttributeValue::Boolean(b) => Value::Bool(*b),
            AttributeValue::Null(_) => Value::Null,
            AttributeValue::Map(m) => {
                let mut out = Map::with_capacity(m.len());
                for (key, value) in m {
                    out.insert(key.clone(), value.to_json());
                }
                Value::Object(out)
            }
            AttributeValue::List(l) => Value::Array(l.iter().map(AttributeValue::to_json).collect()),
            AttributeValue::StringSet(ss) => {
                Value::Array(ss.iter().cloned().map(Value::String).collect())
            }
            AttributeValue::NumberSet(ns) => {
                Value::Array(ns.iter().map(|n| parse_number(n)).collect())
            }
        }
    }
}

/// Parse a stringly-typed number, keeping the raw string when it does not
/// fit a JSON number (arbitrary-precision values survive as strings).
fn parse_number(raw: &str) -> Value {
    if let Ok(i) = raw.parse::<i64>() {
        return Value::Number(Number::from(i));
    }
    if let Ok(f) = raw.parse::<f64>() {
        if let Some(n) = Number::from_f64(f) {
            return Value::Number(n);
        }
    }
    Value::String(raw.to_string())
}

/// Convert a tagged-value map into a plain JSON object.
///
/// This is the pure `tagged-map -> plain-map` boundary the relay core relies
/// on: no field is renamed or dropped, only the type tags are unwrapped.
pub fn unmarshall(image: &HashMap<String, AttributeValue>) -> Map<String, Value> {
    let mut out = Map::with_capacity(image.len());
    for (key, value) in image {
        out.insert(key.clone(), value.to_json());
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn image_from(value: Value) -> HashMap<String, AttributeValue> {
        serde_json::from_value(value).expect("valid tagged image")
    }

    #[test]
    fn test_unmarshall_scalars() {
        let image = image_from(json!({
            "pk": { "S": "Product#X" },
            "price": { "N": "10" },
            "active": { "BOOL": true },
            "removed_at": { "NULL": true }
        }));

        let flat = unmarshall(&image);

        assert_eq!(flat["pk"], json!("Product#X"));
        assert_eq!(flat["price"], json!(10));
        assert_eq!(flat["active"], json!(true));
        assert_eq!(flat["removed_at"], Value::Null);
    }

    #[test]
    fn test_unmarshall_nested_map_and_list() {
        let image = image_from(json!({
            "metadata": { "M": {
                "weight": { "N": "1.5" },
                "manufacturer": { "S": "Acme" }
            }},
            "tags": { "L": [ { "S": "premium" }, { "S": "wireless" } ] }
        }));

        let flat = unmarshall(&image);

        assert_eq!(
            flat["metadata"],
            json!({ "weight": 1.5, "manufacturer": "Acme" })
        );
        assert_eq!(flat["tags"], json!(["premium", "wireless"]));
    }

    #[test]
    fn test_unmarshall_sets() {
        let image = image_from(json!({
            "labels": { "SS": ["a", "b"] },
            "scores": { "NS": ["1", "2"] }
        }));

        let flat = unmarshall(&image);

        assert_eq!(flat["labels"], json!(["a", "b"]));
        assert_eq!(flat["scores"], json!([1, 2]));
    }

    #[test]
    fn test_number_out_of_range_stays_string() {
        let image = image_from(json!({
            "big": { "N": "123456789012345678901234567890" }
        }));

        let flat = unmarshall(&image);

        // Too large for i64 but representable as f64; must stay numeric or
        // fall back to the raw string, never panic.
        assert!(flat["big"].is_number() || flat["big"].is_string());
    }

    #[test]
    fn test_number_non_numeric_stays_string() {
        assert_eq!(parse_number("not-a-number"), json!("not-a-number"));
    }
}
