//! SQS-compatible implementation of the message queue contract.

mod queue;

pub use queue::SqsQueue;
