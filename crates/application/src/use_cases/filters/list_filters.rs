use ferrous_filters_domain::FilterInfo;
use std::sync::Arc;

use crate::services::FilterRegistry;

pub struct ListFiltersUseCase {
    registry: Arc<FilterRegistry>,
}

impl ListFiltersUseCase {
    pub fn new(registry: Arc<FilterRegistry>) -> Self {
        Self { registry }
    }

    pub async fn execute(&self) -> Vec<FilterInfo> {
        self.registry.list().await
    }
}
