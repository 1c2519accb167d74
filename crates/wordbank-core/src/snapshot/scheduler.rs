//! Periodic scheduler for snapshots.
//!
//! Uses tokio-cron-scheduler to save every word list and the lookup cache at
//! a fixed interval, independent of interactive requests.

use std::sync::Arc;

use tokio_cron_scheduler::{Job, JobScheduler, JobSchedulerError};
use tracing::{debug, error, info};

use crate::error::WordbankResult;
use crate::lookup::LookupCache;
use crate::review::ListRegistry;

/// Configuration for the snapshot scheduler.
#[derive(Debug, Clone)]
pub struct SnapshotSchedulerConfig {
    /// Seconds between snapshots (default: 300)
    pub interval_secs: u64,
    /// Whether to snapshot immediately on start (default: false)
    pub run_on_start: bool,
}

impl Default for SnapshotSchedulerConfig {
    fn default() -> Self {
        Self {
            interval_secs: 300,
            run_on_start: false,
        }
    }
}

impl SnapshotSchedulerConfig {
    /// Create config with custom interval.
    pub fn with_interval(interval_secs: u64) -> Self {
        Self {
            interval_secs: interval_secs.max(1),
            ..Default::default()
        }
    }

    /// Enable a snapshot immediately on start.
    pub fn with_run_on_start(mut self) -> Self {
        self.run_on_start = true;
        self
    }
}

/// What one snapshot cycle wrote.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SnapshotOutcome {
    /// Word lists saved.
    pub lists_saved: usize,
    /// Usernames whose list failed to save.
    pub lists_failed: Vec<String>,
    /// Lookup cache entries saved.
    pub lookups_saved: usize,
}

/// Save every list, then the lookup cache.
///
/// List failures are reported in the outcome; a cache failure is returned.
pub async fn snapshot_once(
    registry: &ListRegistry,
    cache: &LookupCache,
) -> WordbankResult<SnapshotOutcome> {
    let lists = registry.snapshot_all().await;
    let lookups_saved = cache.persist(registry.store().as_ref()).await?;
    Ok(SnapshotOutcome {
        lists_saved: lists.saved,
        lists_failed: lists.failed,
        lookups_saved,
    })
}

/// Scheduler for periodic snapshots of lists and the lookup cache.
pub struct SnapshotScheduler {
    scheduler: JobScheduler,
    registry: Arc<ListRegistry>,
    cache: Arc<LookupCache>,
    config: SnapshotSchedulerConfig,
}

impl SnapshotScheduler {
    /// Create a new SnapshotScheduler.
    ///
    /// Note: Call `start()` to begin periodic execution.
    pub async fn new(
        registry: Arc<ListRegistry>,
        cache: Arc<LookupCache>,
        config: SnapshotSchedulerConfig,
    ) -> Result<Self, JobSchedulerError> {
        let scheduler = JobScheduler::new().await?;

        Ok(Self {
            scheduler,
            registry,
            cache,
            config,
        })
    }

    pub fn config(&self) -> &SnapshotSchedulerConfig {
        &self.config
    }

    /// Start the scheduler.
    pub async fn start(&self) -> Result<(), JobSchedulerError> {
        let registry = self.registry.clone();
        let cache = self.cache.clone();

        let job = Job::new_repeated_async(
            std::time::Duration::from_secs(self.config.interval_secs),
            move |_uuid, _lock| {
                let registry = registry.clone();
                let cache = cache.clone();
                Box::pin(async move {
                    debug!("Starting periodic snapshot");
                    log_outcome(snapshot_once(&registry, &cache).await);
                })
            },
        )?;

        self.scheduler.add(job).await?;

        if self.config.run_on_start {
            debug!("Running initial snapshot on start");
            log_outcome(self.run_now().await);
        }

        self.scheduler.start().await?;

        info!(
            interval_secs = self.config.interval_secs,
            "Snapshot scheduler started"
        );

        Ok(())
    }

    /// Stop the scheduler gracefully.
    pub async fn shutdown(&mut self) -> Result<(), JobSchedulerError> {
        info!("Shutting down snapshot scheduler");
        self.scheduler.shutdown().await
    }

    /// Snapshot now, outside the scheduled interval.
    pub async fn run_now(&self) -> WordbankResult<SnapshotOutcome> {
        snapshot_once(&self.registry, &self.cache).await
    }
}

fn log_outcome(outcome: WordbankResult<SnapshotOutcome>) {
    match outcome {
        Ok(outcome) => info!(
            lists_saved = outcome.lists_saved,
            lists_failed = outcome.lists_failed.len(),
            lookups_saved = outcome.lookups_saved,
            "Snapshot complete"
        ),
        Err(e) => error!(error = %e, "Snapshot failed"),
    }
}
