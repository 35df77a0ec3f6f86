//! Message queue client speaking the SQS JSON protocol over HTTP.
//!
//! Requests are posted to the origin of the queue URL with an
//! `X-Amz-Target` header selecting the action, the wire format used by
//! SQS-compatible endpoints (elasticmq, localstack, or a signing proxy in
//! front of the real service). Request signing is out of scope here.

use std::collections::HashMap;

use async_trait::async_trait;
use reqwest::Client as HttpClient;
use serde_json::{json, Map, Value};
use tracing::{debug, info};
use url::Url;

use crate::errors::RepositoryError;
use crate::interfaces::MessageQueue;
use stream_relay_shared::QueueMessage;

const TARGET_PREFIX: &str = "AmazonSQS";
const PROTOCOL_CONTENT_TYPE: &str = "application/x-amz-json-1.0";

/// Message queue implementation for SQS-compatible endpoints.
pub struct SqsQueue {
    http: HttpClient,
}

impl SqsQueue {
    /// Create a new queue client.
    pub fn new() -> Self {
        Self {
            http: HttpClient::new(),
        }
    }

    /// Derive the service endpoint (scheme + authority) from a queue URL.
    fn endpoint(queue_url: &str) -> Result<String, RepositoryError> {
        let mut url =
            Url::parse(queue_url).map_err(|e| RepositoryError::queue(e.to_string()))?;
        url.set_path("");
        url.set_query(None);
        Ok(url.to_string())
    }

    /// Post one protocol action and return the decoded response body.
    async fn call(
        &self,
        queue_url: &str,
        action: &str,
        payload: Value,
    ) -> Result<Value, RepositoryError> {
        let endpoint = Self::endpoint(queue_url)?;

        let response = self
            .http
            .post(endpoint)
            .header("X-Amz-Target", format!("{}.{}", TARGET_PREFIX, action))
            .header("Content-Type", PROTOCOL_CONTENT_TYPE)
            .json(&payload)
            .send()
            .await
            .map_err(|e| RepositoryError::queue(e.to_string()))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| RepositoryError::queue(e.to_string()))?;

        if !status.is_success() {
            return Err(RepositoryError::queue(format!(
                "{} failed with status {}: {}",
                action, status, text
            )));
        }

        if text.is_empty() {
            return Ok(Value::Null);
        }
        serde_json::from_str(&text).map_err(|e| RepositoryError::parse(e.to_string()))
    }
}

impl Default for SqsQueue {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl MessageQueue for SqsQueue {
    async fn send(
        &self,
        queue_url: &str,
        body: &str,
        attributes: Option<HashMap<String, String>>,
    ) -> Result<(), RepositoryError> {
        let mut payload = Map::new();
        payload.insert("QueueUrl".to_string(), json!(queue_url));
        payload.insert("MessageBody".to_string(), json!(body));

        if let Some(attributes) = attributes {
            let mut wrapped = Map::new();
            for (name, value) in attributes {
                wrapped.insert(
                    name,
                    json!({ "DataType": "String", "StringValue": value }),
                );
            }
            payload.insert("MessageAttributes".to_string(), Value::Object(wrapped));
        }

        self.call(queue_url, "SendMessage", Value::Object(payload))
            .await?;

        info!(queue_url = %queue_url, "Sent message to queue");
        Ok(())
    }

    async fn delete(&self, queue_url: &str, receipt_handle: &str) -> Result<(), RepositoryError> {
        self.call(
            queue_url,
            "DeleteMessage",
            json!({
                "QueueUrl": queue_url,
                "ReceiptHandle": receipt_handle,
            }),
        )
        .await?;

        info!(queue_url = %queue_url, "Deleted message from queue");
        Ok(())
    }

    async fn receive(
        &self,
        queue_url: &str,
        max_messages: u32,
        wait_seconds: u32,
    ) -> Result<Vec<QueueMessage>, RepositoryError> {
        let body = self
            .call(
                queue_url,
                "ReceiveMessage",
                json!({
                    "QueueUrl": queue_url,
                    "MaxNumberOfMessages": max_messages,
                    "WaitTimeSeconds": wait_seconds,
                }),
            )
            .await?;

        let messages = match body.get("Messages") {
            Some(messages) => serde_json::from_value::<Vec<QueueMessage>>(messages.clone())
                .map_err(|e| RepositoryError::parse(e.to_string()))?,
            None => Vec::new(),
        };

        debug!(queue_url = %queue_url, count = messages.len(), "Received messages");
        Ok(messages)
    }
}
