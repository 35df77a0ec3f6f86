//! # Stream Relay Shared
//!
//! Shared wire types for the change-stream relay system: the change-stream
//! record shape, the tagged attribute-value encoding and its unmarshaller,
//! the queue message envelope, and the opaque search parameter passthrough.

pub mod attribute;
pub mod types;

pub use attribute::{unmarshall, AttributeValue};
pub use types::{QueueMessage, SearchParams, StreamPayload, StreamRecord, STREAM_SOURCE};
