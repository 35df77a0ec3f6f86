//! # Stream Relay Repository
//!
//! This crate provides the capability contracts the relay core depends on
//! and their concrete implementations: an OpenSearch-backed document store
//! and an SQS-compatible message queue client. The traits enable dependency
//! injection and substitution with in-memory test doubles.

pub mod errors;
pub mod interfaces;
pub mod opensearch;
pub mod sqs;

pub use errors::RepositoryError;
pub use interfaces::{DocumentStore, MessageQueue};
pub use opensearch::OpenSearchStore;
pub use sqs::SqsQueue;
