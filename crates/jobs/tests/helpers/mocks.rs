#![allow(dead_code)]

use async_trait::async_trait;
use bytes::Bytes;
use chrono::{DateTime, Utc};
use ferrous_filters_application::ports::{FilterFetcher, FilterStore, FilteringEnginePort};
use ferrous_filters_domain::{DomainError, FilterId, FilterRecord};
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::RwLock;

// ============================================================================
// In-memory FilterStore
// ============================================================================

/// Remembers which filters have been written and when.
pub struct MemoryFilterStore {
    written: RwLock<HashMap<FilterId, DateTime<Utc>>>,
}

impl MemoryFilterStore {
    pub fn new() -> Self {
        Self {
            written: RwLock::new(HashMap::new()),
        }
    }
}

#[async_trait]
impl FilterStore for MemoryFilterStore {
    fn path(&self, filter: &FilterRecord) -> PathBuf {
        PathBuf::from(format!("/memory/{}.txt", filter.id))
    }

    async fn save(&self, filter: &mut FilterRecord) -> Result<(), DomainError> {
        let now = Utc::now();
        self.written.write().await.insert(filter.id, now);
        filter.last_updated = Some(now);
        Ok(())
    }

    async fn load(&self, filter: &mut FilterRecord) -> Result<(), DomainError> {
        Err(DomainError::FilterFileNotFound(self.path(filter).display().to_string()))
    }

    async fn last_modified(&self, filter: &FilterRecord) -> Option<DateTime<Utc>> {
        self.written.read().await.get(&filter.id).copied()
    }

    async fn touch(&self, filter: &mut FilterRecord) -> Result<(), DomainError> {
        let now = Utc::now();
        self.written.write().await.insert(filter.id, now);
        filter.last_updated = Some(now);
        Ok(())
    }

    async fn remove(&self, _filter: &FilterRecord) -> Result<(), DomainError> {
        Ok(())
    }
}

// ============================================================================
// Counting FilterFetcher
// ============================================================================

pub struct CountingFetcher {
    body: Arc<RwLock<Bytes>>,
    call_count: AtomicU64,
}

impl CountingFetcher {
    pub fn new(body: &'static [u8]) -> Self {
        Self {
            body: Arc::new(RwLock::new(Bytes::from_static(body))),
            call_count: AtomicU64::new(0),
        }
    }

    pub async fn set_body(&self, body: &'static [u8]) {
        *self.body.write().await = Bytes::from_static(body);
    }

    pub fn call_count(&self) -> u64 {
        self.call_count.load(Ordering::Relaxed)
    }
}

#[async_trait]
impl FilterFetcher for CountingFetcher {
    async fn fetch(&self, filter: &mut FilterRecord) -> Result<bool, DomainError> {
        self.call_count.fetch_add(1, Ordering::Relaxed);
        let body = self.body.read().await.clone();
        Ok(filter.apply_fetched(body))
    }
}

// ============================================================================
// Recording FilteringEngine
// ============================================================================

pub struct RecordingEngine {
    reconfigure_count: AtomicU64,
    reject: bool,
}

impl RecordingEngine {
    pub fn new() -> Self {
        Self {
            reconfigure_count: AtomicU64::new(0),
            reject: false,
        }
    }

    /// An engine that rejects every new filter set.
    pub fn rejecting() -> Self {
        Self {
            reconfigure_count: AtomicU64::new(0),
            reject: true,
        }
    }

    pub fn reconfigure_count(&self) -> u64 {
        self.reconfigure_count.load(Ordering::Relaxed)
    }
}

#[async_trait]
impl FilteringEnginePort for RecordingEngine {
    fn is_running(&self) -> bool {
        true
    }

    async fn reconfigure(&self) -> Result<(), DomainError> {
        self.reconfigure_count.fetch_add(1, Ordering::Relaxed);
        if self.reject {
            return Err(DomainError::EngineReconfigurationFailed(
                "filter id 1 is used by more than one filter".to_string(),
            ));
        }
        Ok(())
    }
}
