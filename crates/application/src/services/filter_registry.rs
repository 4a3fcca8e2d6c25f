use chrono::{DateTime, Utc};
use ferrous_filters_domain::{FilterId, FilterInfo, FilterRecord};
use std::collections::HashSet;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, info, instrument, trace};

use crate::ports::FilterStore;

/// Filter list and id counter, only reachable through the registry lock.
pub struct RegistryState {
    filters: Vec<FilterRecord>,
    next_id: FilterId,
    user_rules: Vec<String>,
}

impl RegistryState {
    fn new() -> Self {
        Self {
            filters: Vec::new(),
            // Wall-clock seed keeps fresh ids above ids persisted by earlier runs.
            next_id: Utc::now().timestamp().max(1),
            user_rules: Vec::new(),
        }
    }

    /// Hand out the next filter id. Requires exclusive access to the state.
    pub fn assign_id(&mut self) -> FilterId {
        let id = self.next_id;
        self.next_id = self.next_id.saturating_add(1);
        id
    }

    fn advance_id_floor(&mut self, filters: &[FilterRecord]) {
        for filter in filters {
            if filter.id >= self.next_id {
                self.next_id = filter.id.saturating_add(1);
            }
        }
    }

    /// First occurrence of each URL wins; relative order is kept.
    fn deduplicate(&mut self) -> usize {
        let before = self.filters.len();
        let mut seen: HashSet<Arc<str>> = HashSet::with_capacity(before);
        self.filters.retain(|f| seen.insert(Arc::clone(&f.url)));
        before - self.filters.len()
    }
}

/// Result of refreshing one filter outside the registry lock.
#[derive(Debug, Clone)]
pub struct RefreshedFilter {
    pub filter: FilterRecord,
    pub changed: bool,
}

/// The shared collection of subscribed filters.
///
/// A single reader/writer lock guards the whole list: records can be added,
/// removed and compacted, so readers must never see a partially mutated
/// sequence. Network fetches happen on private copies outside the lock and
/// are merged back with `merge_refreshed`.
pub struct FilterRegistry {
    state: RwLock<RegistryState>,
    store: Arc<dyn FilterStore>,
}

impl FilterRegistry {
    pub fn new(store: Arc<dyn FilterStore>) -> Self {
        Self {
            state: RwLock::new(RegistryState::new()),
            store,
        }
    }

    /// Seed the registry with persisted filters, raising the id floor past them.
    pub fn with_filters(mut self, filters: Vec<FilterRecord>) -> Self {
        let state = self.state.get_mut();
        state.advance_id_floor(&filters);
        state.filters = filters;
        self
    }

    pub fn with_user_rules(mut self, rules: Vec<String>) -> Self {
        self.state.get_mut().user_rules = rules;
        self
    }

    pub async fn exists(&self, url: &str) -> bool {
        let state = self.state.read().await;
        state.filters.iter().any(|f| &*f.url == url)
    }

    /// Append `filter` unless its URL is already registered.
    ///
    /// Neither assigns an id nor fetches anything.
    pub async fn add(&self, filter: FilterRecord) -> bool {
        let mut state = self.state.write().await;
        if state.filters.iter().any(|f| f.url == filter.url) {
            return false;
        }
        state.filters.push(filter);
        true
    }

    pub async fn remove(&self, url: &str) -> Option<FilterRecord> {
        let mut state = self.state.write().await;
        let pos = state.filters.iter().position(|f| &*f.url == url)?;
        Some(state.filters.remove(pos))
    }

    /// Enable or disable the filter with `url`. Returns `false` if unknown.
    ///
    /// Enabling loads the cached content right away. A failed load is not an
    /// error: `last_updated` is cleared so the next refresh refetches it.
    /// Disabling drops the cached content.
    #[instrument(skip(self))]
    pub async fn set_enabled(&self, url: &str, enabled: bool) -> bool {
        let mut state = self.state.write().await;
        let Some(filter) = state.filters.iter_mut().find(|f| &*f.url == url) else {
            return false;
        };

        filter.enabled = enabled;
        if enabled {
            if let Err(e) = self.store.load(filter).await {
                filter.last_updated = None;
                trace!(url, error = %e, "Filter load failed, will refetch");
            }
        } else {
            filter.unload();
        }
        true
    }

    /// Assign ids to new filters and load cached content of enabled ones.
    #[instrument(skip(self))]
    pub async fn load_all(&self) {
        let mut state = self.state.write().await;

        for i in 0..state.filters.len() {
            if state.filters[i].id == 0 {
                let id = state.assign_id();
                state.filters[i].id = id;
            }

            let filter = &mut state.filters[i];
            if !filter.enabled {
                continue;
            }

            // Nothing is cached on the first start; the refresh job fetches it.
            if let Err(e) = self.store.load(filter).await {
                debug!(filter_id = filter.id, error = %e, "Couldn't load filter contents");
            }
        }
    }

    /// Drop later filters whose URL is already present. Returns how many were removed.
    pub async fn deduplicate(&self) -> usize {
        let removed = self.state.write().await.deduplicate();
        if removed > 0 {
            info!(removed, "Removed duplicate filters");
        }
        removed
    }

    pub async fn assign_id(&self) -> FilterId {
        self.state.write().await.assign_id()
    }

    /// Make sure ids handed out later never collide with `filters`.
    pub async fn advance_id_floor(&self, filters: &[FilterRecord]) {
        self.state.write().await.advance_id_floor(filters);
    }

    pub async fn next_id(&self) -> FilterId {
        self.state.read().await.next_id
    }

    pub async fn len(&self) -> usize {
        self.state.read().await.filters.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    pub async fn get(&self, url: &str) -> Option<FilterRecord> {
        let state = self.state.read().await;
        state.filters.iter().find(|f| &*f.url == url).cloned()
    }

    pub async fn list(&self) -> Vec<FilterInfo> {
        let state = self.state.read().await;
        state.filters.iter().map(FilterRecord::info).collect()
    }

    /// Every filter as configured, for writing the config file back.
    pub async fn filters(&self) -> Vec<FilterRecord> {
        self.state.read().await.filters.clone()
    }

    /// Enabled filters that currently hold content.
    pub async fn loaded_filters(&self) -> Vec<FilterRecord> {
        let state = self.state.read().await;
        state
            .filters
            .iter()
            .filter(|f| f.enabled && f.content.is_some())
            .cloned()
            .collect()
    }

    pub async fn set_user_rules(&self, rules: Vec<String>) {
        self.state.write().await.user_rules = rules;
    }

    pub async fn user_filter(&self) -> FilterRecord {
        FilterRecord::user_filter(&self.state.read().await.user_rules)
    }

    /// Working copies of the enabled filters that are due for a refresh.
    pub async fn refresh_candidates(
        &self,
        force: bool,
        now: DateTime<Utc>,
        threshold: chrono::Duration,
    ) -> Vec<FilterRecord> {
        let state = self.state.read().await;
        state
            .filters
            .iter()
            .filter(|f| f.enabled && (force || f.is_stale(now, threshold)))
            .map(FilterRecord::refresh_copy)
            .collect()
    }

    /// Apply refresh results. Returns how many filters got new content.
    ///
    /// A result only lands on a live filter with the same id and URL, so
    /// filters removed or replaced during the fetch are left alone.
    pub async fn merge_refreshed(&self, refreshed: Vec<RefreshedFilter>) -> usize {
        let mut state = self.state.write().await;
        let mut updated = 0;

        for RefreshedFilter { filter: fresh, changed } in refreshed {
            let Some(live) = state
                .filters
                .iter_mut()
                .find(|f| f.id == fresh.id && f.url == fresh.url)
            else {
                debug!(filter_id = fresh.id, url = %fresh.url, "Filter vanished during refresh");
                continue;
            };

            live.last_updated = fresh.last_updated;
            // Disabled while the fetch was in flight: keep it unloaded.
            if !changed || !live.enabled {
                continue;
            }

            info!(
                filter_id = live.id,
                old_rules = live.rules_count,
                new_rules = fresh.rules_count,
                "Updated filter"
            );
            live.name = fresh.name;
            live.content = fresh.content;
            live.rules_count = fresh.rules_count;
            live.checksum = fresh.checksum;
            updated += 1;
        }

        updated
    }
}
