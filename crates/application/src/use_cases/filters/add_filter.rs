use ferrous_filters_domain::validators::{validate_filter_name, validate_filter_url};
use ferrous_filters_domain::{DomainError, FilterInfo, FilterRecord};
use std::sync::Arc;
use tracing::{info, instrument};

use crate::services::FilterRegistry;

/// Subscribes to a new filter list. The content is fetched by the next refresh.
pub struct AddFilterUseCase {
    registry: Arc<FilterRegistry>,
}

impl AddFilterUseCase {
    pub fn new(registry: Arc<FilterRegistry>) -> Self {
        Self { registry }
    }

    #[instrument(skip(self))]
    pub async fn execute(
        &self,
        url: String,
        name: String,
        enabled: bool,
    ) -> Result<FilterInfo, DomainError> {
        validate_filter_url(&url).map_err(DomainError::InvalidFilterUrl)?;
        validate_filter_name(&name).map_err(DomainError::InvalidFilterName)?;

        if self.registry.exists(&url).await {
            return Err(DomainError::DuplicateFilter(url));
        }

        let id = self.registry.assign_id().await;
        let filter = FilterRecord::new(url.as_str(), name.as_str(), enabled).with_id(id);
        let info = filter.info();

        if !self.registry.add(filter).await {
            return Err(DomainError::DuplicateFilter(url));
        }

        info!(filter_id = id, url = %url, "Filter added");
        Ok(info)
    }
}
