//! Per-message error taxonomy for the relay pipeline.

use thiserror::Error;

use stream_relay_repository::RepositoryError;

/// Errors that fail a single message or a synchronous caller operation.
///
/// Inside `process` these are terminal for the affected message only: they
/// are logged with context and the batch continues. For the synchronous
/// `search`, `get` and `delete` operations they surface directly to the
/// caller.
#[derive(Error, Debug)]
pub enum ProcessError {
    /// The change payload carries no new image.
    #[error("invalid record format, missing new image in change payload")]
    InvalidRecordFormat,

    /// The flattened record ended up empty.
    #[error("no data to process after flattening")]
    EmptyRecord,

    /// The flattened record has no usable `pk` field.
    #[error("flattened record is missing a non-empty pk field")]
    MissingPrimaryKey,

    /// No table name could be derived from the event source reference.
    #[error("could not extract table name from event source ARN: {0}")]
    TableNameExtraction(String),

    /// No configured queue URL matches the record's table.
    #[error("no queue URL configured for table: {0}")]
    NoQueueForTable(String),

    /// A result document could not be deserialized into the caller's type.
    #[error("deserialize error: {0}")]
    Deserialize(String),

    /// A gateway operation failed.
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}
