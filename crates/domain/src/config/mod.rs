//! Configuration module for Ferrous Filters
//!
//! - `root`: Main configuration, file load/save and CLI overrides
//! - `filtering`: Filter storage, refresh schedule and the filter list
//! - `logging`: Logging settings
//! - `errors`: Configuration errors

pub mod errors;
pub mod filtering;
pub mod logging;
pub mod root;

pub use errors::ConfigError;
pub use filtering::FilteringConfig;
pub use logging::LoggingConfig;
pub use root::{CliOverrides, Config};
