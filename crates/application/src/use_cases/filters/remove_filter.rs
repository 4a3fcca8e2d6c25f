use ferrous_filters_domain::{DomainError, FilterInfo};
use std::sync::Arc;
use tracing::{info, instrument, warn};

use crate::ports::FilterStore;
use crate::services::FilterRegistry;

pub struct RemoveFilterUseCase {
    registry: Arc<FilterRegistry>,
    store: Arc<dyn FilterStore>,
}

impl RemoveFilterUseCase {
    pub fn new(registry: Arc<FilterRegistry>, store: Arc<dyn FilterStore>) -> Self {
        Self { registry, store }
    }

    #[instrument(skip(self))]
    pub async fn execute(&self, url: &str) -> Result<FilterInfo, DomainError> {
        let filter = self
            .registry
            .remove(url)
            .await
            .ok_or_else(|| DomainError::FilterNotFound(url.to_string()))?;

        if let Err(e) = self.store.remove(&filter).await {
            warn!(filter_id = filter.id, error = %e, "Couldn't delete cached filter file");
        }

        info!(filter_id = filter.id, url = %filter.url, "Filter removed");
        Ok(filter.info())
    }
}
