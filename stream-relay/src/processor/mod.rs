//! Event processing, search, delete and purge operations.

mod event_processor;

pub use event_processor::{EventProcessor, PURGE_RETENTION_MONTHS};
