//! Opaque search parameter passthrough.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Caller-supplied search parameters, forwarded to the document store
/// without interpretation.
///
/// The relay does not validate the internal shape of `query` or `sort`; the
/// document store's query engine is the authority on both. An absent query
/// means "match all".
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SearchParams {
    /// Query clause (match, term, range, bool, ...).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub query: Option<Value>,
    /// Sort specification.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sort: Option<Value>,
    /// Pagination start offset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub from: Option<i64>,
    /// Number of results per page.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<i64>,
}
