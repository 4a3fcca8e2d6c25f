use crate::filter_content::{checksum, parse_filter_contents};
use bytes::Bytes;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

pub type FilterId = i64;

/// Reserved id of the locally authored user filter. Never assigned to a URL filter.
pub const USER_FILTER_ID: FilterId = 0;

/// One subscribed filter list.
///
/// Only `id`, `url`, `name` and `enabled` are persisted in the configuration
/// file; everything else is runtime state re-derived from the cached file on
/// disk or from the last fetch.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FilterRecord {
    /// `0` means "not assigned yet".
    #[serde(default)]
    pub id: FilterId,
    pub url: Arc<str>,
    #[serde(default = "default_name")]
    pub name: Arc<str>,
    #[serde(default)]
    pub enabled: bool,

    #[serde(skip)]
    pub rules_count: usize,
    #[serde(skip)]
    pub last_updated: Option<DateTime<Utc>>,
    #[serde(skip)]
    pub checksum: Option<u32>,
    #[serde(skip)]
    pub content: Option<Bytes>,
}

fn default_name() -> Arc<str> {
    Arc::from("")
}

impl FilterRecord {
    pub fn new(url: impl Into<Arc<str>>, name: impl Into<Arc<str>>, enabled: bool) -> Self {
        Self {
            id: 0,
            url: url.into(),
            name: name.into(),
            enabled,
            rules_count: 0,
            last_updated: None,
            checksum: None,
            content: None,
        }
    }

    pub fn with_id(mut self, id: FilterId) -> Self {
        self.id = id;
        self
    }

    /// The filter built from locally configured rules rather than a URL.
    pub fn user_filter(rules: &[String]) -> Self {
        let mut filter = Self::new("", "User rules", true).with_id(USER_FILTER_ID);
        filter.set_content(Bytes::from(rules.join("\n")));
        filter
    }

    pub fn is_user_filter(&self) -> bool {
        self.id == USER_FILTER_ID && self.url.is_empty()
    }

    /// Identity plus last known checksum; the working copy a refresh operates on.
    pub fn refresh_copy(&self) -> Self {
        Self {
            id: self.id,
            url: Arc::clone(&self.url),
            name: Arc::clone(&self.name),
            enabled: self.enabled,
            rules_count: 0,
            last_updated: self.last_updated,
            checksum: self.checksum,
            content: None,
        }
    }

    /// Replace the content, keeping rule count and checksum consistent with it.
    /// Returns the title found in the content, if any.
    pub fn set_content(&mut self, content: Bytes) -> Option<String> {
        let sum = checksum(&content);
        self.store_content(content, sum)
    }

    /// Apply a freshly downloaded body.
    ///
    /// Returns `false` and leaves the record untouched when the body matches
    /// the last known checksum. Otherwise stores the body and takes over the
    /// title found in it, if any.
    pub fn apply_fetched(&mut self, body: Bytes) -> bool {
        let sum = checksum(&body);
        if self.checksum == Some(sum) {
            return false;
        }
        if let Some(title) = self.store_content(body, sum) {
            self.name = Arc::from(title);
        }
        true
    }

    fn store_content(&mut self, content: Bytes, sum: u32) -> Option<String> {
        let parsed = parse_filter_contents(&content);
        self.rules_count = parsed.rules_count;
        self.checksum = Some(sum);
        self.content = Some(content);
        parsed.title
    }

    /// Drop cached rules. The checksum goes with them so that the next
    /// successful fetch is always treated as a change.
    pub fn unload(&mut self) {
        self.content = None;
        self.rules_count = 0;
        self.checksum = None;
    }

    pub fn is_stale(&self, now: DateTime<Utc>, threshold: chrono::Duration) -> bool {
        match self.last_updated {
            Some(updated) => now - updated > threshold,
            None => true,
        }
    }

    pub fn info(&self) -> FilterInfo {
        FilterInfo {
            id: self.id,
            url: Arc::clone(&self.url),
            name: Arc::clone(&self.name),
            enabled: self.enabled,
            rules_count: self.rules_count,
            last_updated: self.last_updated,
        }
    }
}

/// Filter metadata as exposed to administrative callers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterInfo {
    pub id: FilterId,
    pub url: Arc<str>,
    pub name: Arc<str>,
    pub enabled: bool,
    pub rules_count: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_updated: Option<DateTime<Utc>>,
}
