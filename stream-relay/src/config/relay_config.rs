//! Environment-driven relay configuration.

use std::env;

use crate::RelayError;

/// Default OpenSearch URL.
const DEFAULT_OPENSEARCH_URL: &str = "http://localhost:9200";

/// Static configuration the relay requires at construction.
///
/// Missing required values are fatal: the process does not start without
/// them.
#[derive(Debug, Clone)]
pub struct RelayConfig {
    /// Ordered list of acknowledgement queue URLs, one per source table.
    pub queue_urls: Vec<String>,
    /// Destination index names the purge engine iterates.
    pub tables: Vec<String>,
    /// Document store URL.
    pub opensearch_url: String,
}

impl RelayConfig {
    /// Read configuration from the environment.
    ///
    /// # Environment Variables
    ///
    /// - `QUEUE_URLS`: comma-separated queue URLs (required)
    /// - `TABLES`: comma-separated destination index names (required)
    /// - `OPENSEARCH_URL`: document store URL (default: http://localhost:9200)
    pub fn from_env() -> Result<Self, RelayError> {
        let queue_urls = required_list("QUEUE_URLS")?;
        let tables = required_list("TABLES")?;
        let opensearch_url =
            env::var("OPENSEARCH_URL").unwrap_or_else(|_| DEFAULT_OPENSEARCH_URL.to_string());

        Ok(Self {
            queue_urls,
            tables,
            opensearch_url,
        })
    }
}

/// Read a required comma-separated environment variable.
fn required_list(name: &str) -> Result<Vec<String>, RelayError> {
    let raw = env::var(name).map_err(|_| RelayError::config(format!("{} is required", name)))?;
    let values = parse_list(&raw);
    if values.is_empty() {
        return Err(RelayError::config(format!(
            "{} must contain at least one value",
            name
        )));
    }
    Ok(values)
}

fn parse_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_list_trims_and_drops_empties() {
        let values = parse_list(" https://q/a , https://q/b ,, ");
        assert_eq!(values, vec!["https://q/a", "https://q/b"]);
    }

    #[test]
    fn test_parse_list_empty_input() {
        assert!(parse_list("").is_empty());
    }
}
