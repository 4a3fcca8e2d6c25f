use crate::filter::FilterRecord;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Filter subscription and refresh configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct FilteringConfig {
    /// Whether the filtering engine is active (default: true)
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Data directory, relative to the working directory (default: "data")
    #[serde(default = "default_data_dir")]
    pub data_dir: String,

    /// Cached filter directory inside `data_dir` (default: "filters")
    #[serde(default = "default_filter_dir")]
    pub filter_dir: String,

    /// Age after which a cached filter is refetched (default: 24)
    #[serde(default = "default_update_interval_hours")]
    pub update_interval_hours: u32,

    /// Period of the background refresh check (default: 60)
    #[serde(default = "default_refresh_tick_secs")]
    pub refresh_tick_secs: u64,

    /// Timeout of a single filter download (default: 30)
    #[serde(default = "default_fetch_timeout_secs")]
    pub fetch_timeout_secs: u64,

    /// Maximum filter downloads in flight during one refresh (default: 4)
    #[serde(default = "default_max_concurrent_fetches")]
    pub max_concurrent_fetches: usize,

    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// Locally authored rules, compiled as the user filter
    #[serde(default)]
    pub user_rules: Vec<String>,

    #[serde(default)]
    pub filters: Vec<FilterRecord>,
}

impl FilteringConfig {
    /// `<working-dir>/<data-dir>/<filter-dir>`
    pub fn filter_storage_dir(&self, working_dir: &Path) -> PathBuf {
        working_dir.join(&self.data_dir).join(&self.filter_dir)
    }

    pub fn update_interval(&self) -> chrono::Duration {
        chrono::Duration::hours(i64::from(self.update_interval_hours))
    }

    pub fn refresh_tick(&self) -> Duration {
        Duration::from_secs(self.refresh_tick_secs)
    }

    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_secs(self.fetch_timeout_secs)
    }

    /// Take over names picked up from `! Title:` headers at runtime.
    ///
    /// Only entries matching a runtime filter by id and URL change; filters
    /// added, removed or toggled in the file meanwhile are left as they are.
    /// Returns how many names changed.
    pub fn apply_runtime_names(&mut self, runtime: &[FilterRecord]) -> usize {
        let mut renamed = 0;
        for filter in &mut self.filters {
            let Some(live) = runtime
                .iter()
                .find(|r| r.id == filter.id && r.url == filter.url)
            else {
                continue;
            };
            if live.name != filter.name {
                filter.name = live.name.clone();
                renamed += 1;
            }
        }
        renamed
    }
}

impl Default for FilteringConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            data_dir: default_data_dir(),
            filter_dir: default_filter_dir(),
            update_interval_hours: default_update_interval_hours(),
            refresh_tick_secs: default_refresh_tick_secs(),
            fetch_timeout_secs: default_fetch_timeout_secs(),
            max_concurrent_fetches: default_max_concurrent_fetches(),
            user_agent: default_user_agent(),
            user_rules: vec![],
            filters: vec![],
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_data_dir() -> String {
    "data".to_string()
}

fn default_filter_dir() -> String {
    "filters".to_string()
}

fn default_update_interval_hours() -> u32 {
    24
}

fn default_refresh_tick_secs() -> u64 {
    60
}

fn default_fetch_timeout_secs() -> u64 {
    30
}

fn default_max_concurrent_fetches() -> usize {
    4
}

fn default_user_agent() -> String {
    concat!("ferrous-filters/", env!("CARGO_PKG_VERSION")).to_string()
}
