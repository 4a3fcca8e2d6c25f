use thiserror::Error;

#[derive(Error, Debug)]
pub enum DomainError {
    #[error("Filter file not found: {0}")]
    FilterFileNotFound(String),

    #[error("I/O error: {0}")]
    IoError(String),

    #[error("Fetch failed: {0}")]
    FetchError(String),

    #[error("Unexpected HTTP status {status} from {url}")]
    UnexpectedStatus { url: String, status: u16 },

    #[error("Non-text response {content_type} from {url}")]
    UnexpectedContentType { url: String, content_type: String },

    #[error("Filter already exists: {0}")]
    DuplicateFilter(String),

    #[error("Filter not found: {0}")]
    FilterNotFound(String),

    #[error("Invalid filter URL: {0}")]
    InvalidFilterUrl(String),

    #[error("Invalid filter name: {0}")]
    InvalidFilterName(String),

    #[error("Filtering engine reconfiguration failed: {0}")]
    EngineReconfigurationFailed(String),
}
