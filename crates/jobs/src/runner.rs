use crate::FilterRefreshJob;
use ferrous_filters_domain::DomainError;
use std::sync::Arc;
use tokio::task::JoinSet;
use tracing::info;

/// Central orchestrator for all background jobs.
///
/// Use the builder pattern to register jobs, then call `.start()` once.
/// A job that finishes before shutdown was requested hit a fatal error.
///
/// # Example
///
/// ```rust,ignore
/// let mut jobs = JobRunner::new()
///     .with_filter_refresh(Arc::new(FilterRefreshJob::new(refresh)))
///     .start()
///     .await;
/// if let Some(Ok(Err(e))) = jobs.join_next().await { /* halt */ }
/// ```
pub struct JobRunner {
    filter_refresh: Option<Arc<FilterRefreshJob>>,
}

impl JobRunner {
    pub fn new() -> Self {
        Self {
            filter_refresh: None,
        }
    }

    /// The job is shared so callers can keep requesting forced refreshes.
    pub fn with_filter_refresh(mut self, job: Arc<FilterRefreshJob>) -> Self {
        self.filter_refresh = Some(job);
        self
    }

    /// Start all registered background jobs.
    ///
    /// Dropping the returned set aborts the jobs.
    pub async fn start(self) -> JoinSet<Result<(), DomainError>> {
        info!("Starting background job runner");
        let mut jobs = JoinSet::new();

        if let Some(job) = self.filter_refresh {
            jobs.spawn(job.run());
        }

        info!(jobs = jobs.len(), "All background jobs started");
        jobs
    }
}

impl Default for JobRunner {
    fn default() -> Self {
        Self::new()
    }
}
