//! Error types for the relay repository layer.

mod repository_error;

pub use repository_error::RepositoryError;
