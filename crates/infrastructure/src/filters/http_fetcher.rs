use async_trait::async_trait;
use ferrous_filters_application::ports::FilterFetcher;
use ferrous_filters_domain::{DomainError, FilterRecord};
use reqwest::header::CONTENT_TYPE;
use reqwest::StatusCode;
use std::time::Duration;
use tracing::{debug, info, trace};

/// Only plain-text responses are accepted as filter content.
const TEXT_CONTENT_TYPE: &str = "text/plain";

/// Downloads filter lists over HTTP(S).
pub struct HttpFilterFetcher {
    /// Persistent client; every request is bounded by its timeout.
    client: reqwest::Client,
}

impl HttpFilterFetcher {
    pub fn new(timeout: Duration, user_agent: &str) -> Result<Self, DomainError> {
        let client = reqwest::Client::builder()
            .user_agent(user_agent)
            .timeout(timeout)
            .build()
            .map_err(|e| DomainError::FetchError(e.to_string()))?;
        Ok(Self { client })
    }

    /// Use an already configured client (shared proxy or TLS settings).
    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl FilterFetcher for HttpFilterFetcher {
    async fn fetch(&self, filter: &mut FilterRecord) -> Result<bool, DomainError> {
        let url = filter.url.to_string();
        trace!(filter_id = filter.id, url = %url, "Downloading filter update");

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| DomainError::FetchError(format!("request to {} failed: {}", url, e)))?;

        let status = response.status();
        if status != StatusCode::OK {
            debug!(url = %url, status = status.as_u16(), "Unexpected status, skipping");
            return Err(DomainError::UnexpectedStatus {
                url,
                status: status.as_u16(),
            });
        }

        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_ascii_lowercase();
        if !content_type.starts_with(TEXT_CONTENT_TYPE) {
            debug!(url = %url, content_type = %content_type, "Non-text response, skipping");
            return Err(DomainError::UnexpectedContentType { url, content_type });
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| DomainError::FetchError(format!("read error for {}: {}", url, e)))?;
        let len = body.len();

        if !filter.apply_fetched(body) {
            trace!(filter_id = filter.id, url = %url, "Filter hasn't changed");
            return Ok(false);
        }

        info!(
            filter_id = filter.id,
            bytes = len,
            rules = filter.rules_count,
            "Filter has been updated"
        );
        Ok(true)
    }
}
