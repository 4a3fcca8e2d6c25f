use ferrous_filters_application::use_cases::RefreshFiltersUseCase;
use ferrous_filters_domain::DomainError;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Notify;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info};

/// Periodically refreshes stale filters; also runs forced refreshes on request.
///
/// Timer cycles and forced cycles run on the same task, so they never overlap.
pub struct FilterRefreshJob {
    refresh: Arc<RefreshFiltersUseCase>,
    interval: Duration,
    force: Notify,
    shutdown: CancellationToken,
}

impl FilterRefreshJob {
    pub fn new(refresh: Arc<RefreshFiltersUseCase>) -> Self {
        Self {
            refresh,
            interval: Duration::from_secs(60),
            force: Notify::new(),
            shutdown: CancellationToken::new(),
        }
    }

    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.shutdown = token;
        self
    }

    /// Ask the job to refetch every enabled filter as soon as possible.
    /// Several requests before the job wakes up collapse into one cycle.
    pub fn request_force_refresh(&self) {
        self.force.notify_one();
    }

    /// Spawn the refresh loop. See [`FilterRefreshJob::run`].
    pub async fn start(self: Arc<Self>) -> JoinHandle<Result<(), DomainError>> {
        tokio::spawn(self.run())
    }

    /// Refresh until cancelled.
    ///
    /// Returns an error only when the engine rejected refreshed filters.
    /// The loop stops at that point; the owner must halt the process.
    pub async fn run(self: Arc<Self>) -> Result<(), DomainError> {
        info!(
            interval_secs = self.interval.as_secs(),
            "Starting filter refresh job"
        );

        let mut interval = tokio::time::interval(self.interval);
        interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);

        loop {
            let force = tokio::select! {
                biased;
                _ = self.shutdown.cancelled() => {
                    info!("FilterRefreshJob: shutting down");
                    return Ok(());
                }
                _ = self.force.notified() => true,
                _ = interval.tick() => false,
            };

            match self.refresh.execute(force).await {
                Ok(0) => debug!(force, "FilterRefreshJob: no filter changes"),
                Ok(updated) => info!(updated, force, "FilterRefreshJob: filters updated"),
                Err(e) => {
                    error!(error = %e, "FilterRefreshJob: engine out of sync with filters, stopping");
                    return Err(e);
                }
            }
        }
    }
}
