//! Table name extraction and acknowledgement queue resolution.
//!
//! Both are recomputed per message: table sets are small and static per
//! deployment, so no caching is warranted.

use lazy_static::lazy_static;
use regex::Regex;
use tracing::error;

use crate::errors::ProcessError;

lazy_static! {
    static ref TABLE_NAME_REGEXP: Regex = Regex::new(r"table/([^/]+)").unwrap();
}

/// Derive the destination index name from an event source reference.
///
/// The table name is the segment between `table/` and the next path
/// separator, lowercased. Absence of a match is fatal for the record.
pub fn extract_table_name(event_source_arn: &str) -> Result<String, ProcessError> {
    match TABLE_NAME_REGEXP
        .captures(event_source_arn)
        .and_then(|captures| captures.get(1))
    {
        Some(name) => Ok(name.as_str().to_lowercase()),
        None => {
            error!(event_source_arn = %event_source_arn, "Failed to extract table name from ARN");
            Err(ProcessError::TableNameExtraction(
                event_source_arn.to_string(),
            ))
        }
    }
}

/// Resolve the acknowledgement queue for a table.
///
/// Selects the first configured URL whose lowercased form contains the
/// lowercased table name as a substring. No match is fatal for the record.
pub fn resolve_queue_url<'a>(
    table_name: &str,
    queue_urls: &'a [String],
) -> Result<&'a str, ProcessError> {
    let needle = table_name.to_lowercase();
    queue_urls
        .iter()
        .find(|url| url.to_lowercase().contains(&needle))
        .map(String::as_str)
        .ok_or_else(|| ProcessError::NoQueueForTable(table_name.to_string()))
}
