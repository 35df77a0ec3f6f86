//! OpenSearch implementation of the document store contract.

mod store;

pub use store::OpenSearchStore;
