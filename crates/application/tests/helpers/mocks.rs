#![allow(dead_code)]

use async_trait::async_trait;
use bytes::Bytes;
use chrono::{DateTime, Utc};
use ferrous_filters_application::ports::{FilterFetcher, FilterStore, FilteringEnginePort};
use ferrous_filters_domain::{DomainError, FilterId, FilterRecord};
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;

// ============================================================================
// Mock FilterStore
// ============================================================================

pub struct MockFilterStore {
    files: Arc<RwLock<HashMap<FilterId, (Bytes, DateTime<Utc>)>>>,
    fail_saves: AtomicBool,
    fail_touches: AtomicBool,
    save_count: AtomicU64,
    touch_count: AtomicU64,
}

impl MockFilterStore {
    pub fn new() -> Self {
        Self {
            files: Arc::new(RwLock::new(HashMap::new())),
            fail_saves: AtomicBool::new(false),
            fail_touches: AtomicBool::new(false),
            save_count: AtomicU64::new(0),
            touch_count: AtomicU64::new(0),
        }
    }

    pub async fn put(&self, id: FilterId, content: &'static [u8]) {
        self.files
            .write()
            .await
            .insert(id, (Bytes::from_static(content), Utc::now()));
    }

    pub async fn put_at(&self, id: FilterId, content: &'static [u8], mtime: DateTime<Utc>) {
        self.files
            .write()
            .await
            .insert(id, (Bytes::from_static(content), mtime));
    }

    pub async fn content(&self, id: FilterId) -> Option<Bytes> {
        self.files.read().await.get(&id).map(|(c, _)| c.clone())
    }

    pub async fn delete(&self, id: FilterId) {
        self.files.write().await.remove(&id);
    }

    pub fn set_fail_saves(&self, fail: bool) {
        self.fail_saves.store(fail, Ordering::Relaxed);
    }

    pub fn set_fail_touches(&self, fail: bool) {
        self.fail_touches.store(fail, Ordering::Relaxed);
    }

    pub fn save_count(&self) -> u64 {
        self.save_count.load(Ordering::Relaxed)
    }

    pub fn touch_count(&self) -> u64 {
        self.touch_count.load(Ordering::Relaxed)
    }
}

#[async_trait]
impl FilterStore for MockFilterStore {
    fn path(&self, filter: &FilterRecord) -> PathBuf {
        PathBuf::from(format!("/mock/filters/{}.txt", filter.id))
    }

    async fn save(&self, filter: &mut FilterRecord) -> Result<(), DomainError> {
        self.save_count.fetch_add(1, Ordering::Relaxed);
        if self.fail_saves.load(Ordering::Relaxed) {
            return Err(DomainError::IoError("disk full".to_string()));
        }
        let now = Utc::now();
        let content = filter.content.clone().unwrap_or_default();
        self.files.write().await.insert(filter.id, (content, now));
        filter.last_updated = Some(now);
        Ok(())
    }

    async fn load(&self, filter: &mut FilterRecord) -> Result<(), DomainError> {
        let files = self.files.read().await;
        let (content, mtime) = files
            .get(&filter.id)
            .ok_or_else(|| DomainError::FilterFileNotFound(self.path(filter).display().to_string()))?;
        filter.set_content(content.clone());
        filter.last_updated = Some(*mtime);
        Ok(())
    }

    async fn last_modified(&self, filter: &FilterRecord) -> Option<DateTime<Utc>> {
        self.files.read().await.get(&filter.id).map(|(_, m)| *m)
    }

    async fn touch(&self, filter: &mut FilterRecord) -> Result<(), DomainError> {
        self.touch_count.fetch_add(1, Ordering::Relaxed);
        if self.fail_touches.load(Ordering::Relaxed) {
            return Err(DomainError::IoError("read-only filesystem".to_string()));
        }
        let mut files = self.files.write().await;
        let entry = files
            .get_mut(&filter.id)
            .ok_or_else(|| DomainError::FilterFileNotFound(filter.id.to_string()))?;
        let now = Utc::now();
        entry.1 = now;
        filter.last_updated = Some(now);
        Ok(())
    }

    async fn remove(&self, filter: &FilterRecord) -> Result<(), DomainError> {
        self.files.write().await.remove(&filter.id);
        Ok(())
    }
}

// ============================================================================
// Mock FilterFetcher
// ============================================================================

pub struct MockFilterFetcher {
    bodies: Arc<RwLock<HashMap<String, Bytes>>>,
    failing: Arc<RwLock<Vec<String>>>,
    delay: Option<Duration>,
    call_count: AtomicU64,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
}

impl MockFilterFetcher {
    pub fn new() -> Self {
        Self {
            bodies: Arc::new(RwLock::new(HashMap::new())),
            failing: Arc::new(RwLock::new(Vec::new())),
            delay: None,
            call_count: AtomicU64::new(0),
            in_flight: AtomicUsize::new(0),
            max_in_flight: AtomicUsize::new(0),
        }
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub async fn set_body(&self, url: &str, body: &'static [u8]) {
        self.bodies
            .write()
            .await
            .insert(url.to_string(), Bytes::from_static(body));
    }

    pub async fn set_failing(&self, url: &str) {
        self.failing.write().await.push(url.to_string());
    }

    pub fn call_count(&self) -> u64 {
        self.call_count.load(Ordering::Relaxed)
    }

    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::Relaxed)
    }
}

#[async_trait]
impl FilterFetcher for MockFilterFetcher {
    async fn fetch(&self, filter: &mut FilterRecord) -> Result<bool, DomainError> {
        self.call_count.fetch_add(1, Ordering::Relaxed);
        let current = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(current, Ordering::SeqCst);

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        let result = if self.failing.read().await.iter().any(|u| u.as_str() == &*filter.url) {
            Err(DomainError::UnexpectedStatus {
                url: filter.url.to_string(),
                status: 404,
            })
        } else {
            match self.bodies.read().await.get(&*filter.url) {
                Some(body) => Ok(filter.apply_fetched(body.clone())),
                None => Err(DomainError::FetchError(format!("no route to {}", filter.url))),
            }
        };

        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        result
    }
}

// ============================================================================
// Mock FilteringEngine
// ============================================================================

pub struct MockFilteringEngine {
    running: AtomicBool,
    should_fail: AtomicBool,
    reconfigure_count: AtomicU64,
}

impl MockFilteringEngine {
    pub fn new(running: bool) -> Self {
        Self {
            running: AtomicBool::new(running),
            should_fail: AtomicBool::new(false),
            reconfigure_count: AtomicU64::new(0),
        }
    }

    pub fn set_should_fail(&self, fail: bool) {
        self.should_fail.store(fail, Ordering::Relaxed);
    }

    pub fn reconfigure_count(&self) -> u64 {
        self.reconfigure_count.load(Ordering::Relaxed)
    }
}

#[async_trait]
impl FilteringEnginePort for MockFilteringEngine {
    fn is_running(&self) -> bool {
        self.running.load(Ordering::Relaxed)
    }

    async fn reconfigure(&self) -> Result<(), DomainError> {
        self.reconfigure_count.fetch_add(1, Ordering::Relaxed);
        if self.should_fail.load(Ordering::Relaxed) {
            return Err(DomainError::EngineReconfigurationFailed(
                "duplicate filter id".to_string(),
            ));
        }
        Ok(())
    }
}

// ============================================================================
// Fixtures
// ============================================================================

pub fn make_filter(id: FilterId, url: &str, enabled: bool) -> FilterRecord {
    FilterRecord::new(url, format!("Filter {id}"), enabled).with_id(id)
}
