//! Capability contracts for the relay's external collaborators.
//!
//! These traits define what the relay core requires from the document store
//! and the message channel, allowing swappable backends and in-memory test
//! doubles.

mod document_store;
mod message_queue;

pub use document_store::DocumentStore;
pub use message_queue::MessageQueue;
