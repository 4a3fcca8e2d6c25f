use async_trait::async_trait;
use ferrous_filters_domain::DomainError;

/// The DNS filtering engine that consumes the registry's filter contents.
#[async_trait]
pub trait FilteringEnginePort: Send + Sync {
    /// Whether the engine is currently serving with a compiled rule set.
    fn is_running(&self) -> bool;

    /// Rebuild the active rule set from the registry.
    ///
    /// An error means the engine could not apply the current filter set and
    /// now disagrees with the registry.
    async fn reconfigure(&self) -> Result<(), DomainError>;
}
