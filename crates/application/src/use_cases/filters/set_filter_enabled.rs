use ferrous_filters_domain::DomainError;
use std::sync::Arc;
use tracing::{info, instrument};

use crate::services::FilterRegistry;

pub struct SetFilterEnabledUseCase {
    registry: Arc<FilterRegistry>,
}

impl SetFilterEnabledUseCase {
    pub fn new(registry: Arc<FilterRegistry>) -> Self {
        Self { registry }
    }

    #[instrument(skip(self))]
    pub async fn execute(&self, url: &str, enabled: bool) -> Result<(), DomainError> {
        if !self.registry.set_enabled(url, enabled).await {
            return Err(DomainError::FilterNotFound(url.to_string()));
        }

        info!(url, enabled, "Filter state changed");
        Ok(())
    }
}
