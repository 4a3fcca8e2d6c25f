use chrono::Utc;
use ferrous_filters_domain::{DomainError, FilterRecord};
use futures::stream::{self, StreamExt};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::{debug, error, info, instrument, warn};

use crate::ports::{FilterFetcher, FilterStore, FilteringEnginePort};
use crate::services::{FilterRegistry, RefreshedFilter};

/// Refreshes stale (or all, when forced) enabled filters from their URLs.
///
/// One cycle:
///   1. Snapshot candidates under the read lock
///   2. Fetch and persist each candidate with no lock held
///   3. Merge the results back under one write lock
///   4. Reconfigure the running engine if any filter content changed
///
/// Per-filter failures are logged and skipped; the filter stays stale and is
/// retried on the next cycle. The only cycle-level failure is the engine
/// rejecting changed filters, which leaves engine and registry diverged.
pub struct RefreshFiltersUseCase {
    registry: Arc<FilterRegistry>,
    fetcher: Arc<dyn FilterFetcher>,
    store: Arc<dyn FilterStore>,
    engine: Arc<dyn FilteringEnginePort>,
    update_interval: chrono::Duration,
    max_concurrent_fetches: usize,
    paused: AtomicBool,
}

impl RefreshFiltersUseCase {
    pub fn new(
        registry: Arc<FilterRegistry>,
        fetcher: Arc<dyn FilterFetcher>,
        store: Arc<dyn FilterStore>,
        engine: Arc<dyn FilteringEnginePort>,
    ) -> Self {
        Self {
            registry,
            fetcher,
            store,
            engine,
            update_interval: chrono::Duration::hours(24),
            max_concurrent_fetches: 4,
            paused: AtomicBool::new(false),
        }
    }

    pub fn with_update_interval(mut self, interval: chrono::Duration) -> Self {
        self.update_interval = interval;
        self
    }

    pub fn with_max_concurrent_fetches(mut self, max: usize) -> Self {
        self.max_concurrent_fetches = max.max(1);
        self
    }

    /// While paused (e.g. initial setup not finished) every cycle is a no-op.
    pub fn set_paused(&self, paused: bool) {
        self.paused.store(paused, Ordering::Relaxed);
    }

    pub fn is_paused(&self) -> bool {
        self.paused.load(Ordering::Relaxed)
    }

    /// Run one refresh cycle and return the number of filters whose content changed.
    ///
    /// `force` ignores staleness and refetches every enabled filter.
    ///
    /// # Errors
    ///
    /// `EngineReconfigurationFailed` when filters changed and the running
    /// engine rejected the new filter set. The registry already holds the new
    /// content at that point, so the caller must halt the process.
    #[instrument(skip(self))]
    pub async fn execute(&self, force: bool) -> Result<usize, DomainError> {
        if self.is_paused() {
            return Ok(0);
        }

        let candidates = self
            .registry
            .refresh_candidates(force, Utc::now(), self.update_interval)
            .await;
        if candidates.is_empty() {
            return Ok(0);
        }
        debug!(candidates = candidates.len(), "Refreshing filters");

        let outcomes: Vec<Option<RefreshedFilter>> = stream::iter(candidates)
            .map(|filter| self.refresh_one(filter))
            .buffer_unordered(self.max_concurrent_fetches)
            .collect()
            .await;

        let refreshed = outcomes.into_iter().flatten().collect();
        let updated = self.registry.merge_refreshed(refreshed).await;

        if updated > 0 && self.engine.is_running() {
            if let Err(e) = self.engine.reconfigure().await {
                error!(
                    updated,
                    error = %e,
                    "Filtering engine rejected the updated filters"
                );
                return Err(e);
            }
            info!(updated, "Filtering engine reconfigured");
        }

        Ok(updated)
    }

    /// Fetch and persist one working copy. `None` skips it for this cycle.
    async fn refresh_one(&self, mut filter: FilterRecord) -> Option<RefreshedFilter> {
        // Cache file gone: an unchanged body must still be written back.
        if filter.checksum.is_some() && self.store.last_modified(&filter).await.is_none() {
            debug!(filter_id = filter.id, "Filter file missing, rewriting on fetch");
            filter.checksum = None;
        }

        let changed = match self.fetcher.fetch(&mut filter).await {
            Ok(changed) => changed,
            Err(e) => {
                warn!(filter_id = filter.id, url = %filter.url, error = %e, "Failed to update filter");
                return None;
            }
        };

        if changed {
            if let Err(e) = self.store.save(&mut filter).await {
                error!(filter_id = filter.id, error = %e, "Failed to save the updated filter");
                return None;
            }
        } else {
            debug!(filter_id = filter.id, url = %filter.url, "Filter hasn't changed");
            if let Err(e) = self.store.touch(&mut filter).await {
                error!(filter_id = filter.id, error = %e, "Failed to touch filter file");
                filter.last_updated = Some(Utc::now());
            }
        }

        Some(RefreshedFilter { filter, changed })
    }
}
