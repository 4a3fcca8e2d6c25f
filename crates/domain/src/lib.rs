//! Ferrous Filters Domain Layer
pub mod config;
pub mod errors;
pub mod filter;
pub mod filter_content;
pub mod validators;

pub use config::{CliOverrides, Config, ConfigError, FilteringConfig, LoggingConfig};
pub use errors::DomainError;
pub use filter::{FilterId, FilterInfo, FilterRecord, USER_FILTER_ID};
pub use filter_content::{checksum, parse_filter_contents, rule_lines, ParsedFilter};
