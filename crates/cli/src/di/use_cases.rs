use super::FilterServices;
use ferrous_filters_application::use_cases::{
    AddFilterUseCase, ListFiltersUseCase, RefreshFiltersUseCase, RemoveFilterUseCase,
    SetFilterEnabledUseCase,
};
use ferrous_filters_domain::Config;
use std::sync::Arc;

pub struct UseCases {
    pub refresh_filters: Arc<RefreshFiltersUseCase>,
    pub add_filter: Arc<AddFilterUseCase>,
    pub remove_filter: Arc<RemoveFilterUseCase>,
    pub set_filter_enabled: Arc<SetFilterEnabledUseCase>,
    pub list_filters: Arc<ListFiltersUseCase>,
}

impl UseCases {
    pub fn new(services: &FilterServices, config: &Config) -> Self {
        let refresh_filters = RefreshFiltersUseCase::new(
            services.registry.clone(),
            services.fetcher.clone(),
            services.store.clone(),
            services.engine_port(),
        )
        .with_update_interval(config.filtering.update_interval())
        .with_max_concurrent_fetches(config.filtering.max_concurrent_fetches);

        Self {
            refresh_filters: Arc::new(refresh_filters),
            add_filter: Arc::new(AddFilterUseCase::new(services.registry.clone())),
            remove_filter: Arc::new(RemoveFilterUseCase::new(
                services.registry.clone(),
                services.store.clone(),
            )),
            set_filter_enabled: Arc::new(SetFilterEnabledUseCase::new(services.registry.clone())),
            list_filters: Arc::new(ListFiltersUseCase::new(services.registry.clone())),
        }
    }
}
