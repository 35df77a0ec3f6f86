//! # Stream Relay
//!
//! Relays change events from a source-of-record store into a searchable
//! document index, guaranteeing each change is reflected at least once with
//! idempotent upserts keyed by record identity, and periodically purges
//! documents older than the retention window.
//!
//! ## Architecture
//!
//! Each queue message flows through a per-message pipeline:
//!
//! 1. **Envelope parser**: resolves the raw body into a change event
//! 2. **Flattener**: unmarshalls the new image and overlays provenance
//! 3. **Router**: derives the destination index and acknowledgement queue
//! 4. **Document store**: idempotent upsert keyed by the record's `pk`
//! 5. **Queue**: the message is deleted only after the confirmed write
//!
//! One message's failure never aborts the batch.
//!
//! ## Modules
//!
//! - [`config`]: Configuration and dependency initialization
//! - [`consumer`]: Long-polling queue poller feeding the processor
//! - [`envelope`]: Message envelope parsing cascade
//! - [`flatten`]: Record flattening
//! - [`routing`]: Table name extraction and queue resolution
//! - [`processor`]: Event processing, search, delete and purge
//! - [`errors`]: Per-message error taxonomy

pub mod config;
pub mod consumer;
pub mod envelope;
pub mod errors;
pub mod flatten;
pub mod processor;
pub mod routing;

pub use config::{Dependencies, RelayConfig};
pub use errors::ProcessError;
pub use processor::EventProcessor;

use thiserror::Error;

/// Errors that can occur during relay startup or execution.
#[derive(Error, Debug)]
pub enum RelayError {
    /// Configuration error; fatal, the process does not start.
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Processing error surfaced by a synchronous operation.
    #[error("Process error: {0}")]
    ProcessError(#[from] ProcessError),
}

impl RelayError {
    /// Create a configuration error.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::ConfigError(msg.into())
    }
}
