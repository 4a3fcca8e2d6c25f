use async_trait::async_trait;
use chrono::{DateTime, Utc};
use ferrous_filters_domain::{DomainError, FilterRecord};
use std::path::PathBuf;

/// Storage for cached filter content, addressed by filter id.
///
/// The modification time of the stored content is the source of truth for
/// `FilterRecord::last_updated`; every successful operation re-derives it
/// from storage instead of trusting the in-memory value.
#[async_trait]
pub trait FilterStore: Send + Sync {
    /// Location of the cached content for `filter`.
    fn path(&self, filter: &FilterRecord) -> PathBuf;

    /// Atomically replace the stored content with `filter.content` and set
    /// `filter.last_updated` to the resulting modification time.
    async fn save(&self, filter: &mut FilterRecord) -> Result<(), DomainError>;

    /// Read the stored content into `filter`, recomputing rule count,
    /// checksum and `last_updated`.
    ///
    /// # Errors
    ///
    /// * `DomainError::FilterFileNotFound` - Nothing cached yet (expected on first run)
    /// * `DomainError::IoError` - The file exists but cannot be read
    async fn load(&self, filter: &mut FilterRecord) -> Result<(), DomainError>;

    /// Modification time of the stored content, `None` when absent or unreadable.
    async fn last_modified(&self, filter: &FilterRecord) -> Option<DateTime<Utc>>;

    /// Mark the stored content as fresh without rewriting it.
    async fn touch(&self, filter: &mut FilterRecord) -> Result<(), DomainError>;

    /// Delete the stored content. Missing content is not an error.
    async fn remove(&self, filter: &FilterRecord) -> Result<(), DomainError>;
}
