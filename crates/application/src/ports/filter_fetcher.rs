use async_trait::async_trait;
use ferrous_filters_domain::{DomainError, FilterRecord};

/// Downloads filter content from its source URL.
#[async_trait]
pub trait FilterFetcher: Send + Sync {
    /// Fetch `filter.url` into the given working copy.
    ///
    /// Returns `Ok(false)` when the remote body matches `filter.checksum`;
    /// the copy is left as it was. Returns `Ok(true)` after storing the new
    /// content, rule count and checksum (and the title, when present).
    ///
    /// Implementations must never touch shared registry state.
    async fn fetch(&self, filter: &mut FilterRecord) -> Result<bool, DomainError>;
}
