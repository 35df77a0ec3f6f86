//! Configuration and dependency initialization.

mod dependencies;
mod relay_config;

pub use dependencies::Dependencies;
pub use relay_config::RelayConfig;
