//! Shared data structures for the relay system.

mod queue_message;
mod search_params;
mod stream_record;

pub use queue_message::QueueMessage;
pub use search_params::SearchParams;
pub use stream_record::{StreamPayload, StreamRecord, STREAM_SOURCE};
