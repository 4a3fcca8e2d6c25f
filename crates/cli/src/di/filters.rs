use ferrous_filters_application::ports::{FilterFetcher, FilterStore, FilteringEnginePort};
use ferrous_filters_application::services::FilterRegistry;
use ferrous_filters_domain::Config;
use ferrous_filters_infrastructure::engine::RuleSetEngine;
use ferrous_filters_infrastructure::filters::{FileFilterStore, HttpFilterFetcher};
use std::path::Path;
use std::sync::Arc;
use tracing::{info, warn};

/// Storage, registry, fetcher and engine wired from the configuration.
pub struct FilterServices {
    pub store: Arc<dyn FilterStore>,
    pub registry: Arc<FilterRegistry>,
    pub fetcher: Arc<dyn FilterFetcher>,
    pub engine: Arc<RuleSetEngine>,
}

impl FilterServices {
    pub async fn new(config: &Config, work_dir: &Path) -> anyhow::Result<Self> {
        let filtering = &config.filtering;

        let file_store = FileFilterStore::new(filtering.filter_storage_dir(work_dir));
        file_store.ensure_dir().await?;
        info!(dir = %file_store.dir().display(), "Filter storage ready");
        let store: Arc<dyn FilterStore> = Arc::new(file_store);

        let registry = Arc::new(
            FilterRegistry::new(store.clone())
                .with_filters(filtering.filters.clone())
                .with_user_rules(filtering.user_rules.clone()),
        );

        let removed = registry.deduplicate().await;
        if removed > 0 {
            warn!(removed, "Duplicate filter URLs dropped from configuration");
        }
        registry.load_all().await;

        let fetcher: Arc<dyn FilterFetcher> = Arc::new(HttpFilterFetcher::new(
            filtering.fetch_timeout(),
            &filtering.user_agent,
        )?);

        let engine = Arc::new(RuleSetEngine::new(registry.clone()));
        if filtering.enabled {
            engine.start().await?;
        } else {
            info!("Filtering disabled, engine not started");
        }

        Ok(Self {
            store,
            registry,
            fetcher,
            engine,
        })
    }

    pub fn engine_port(&self) -> Arc<dyn FilteringEnginePort> {
        self.engine.clone()
    }
}
