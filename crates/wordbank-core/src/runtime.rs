//! Runtime wiring the store, cache, registry and snapshot scheduler.
//!
//! Restores persisted state on creation, runs periodic snapshots while
//! started, and takes a final snapshot on shutdown.

use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::config::WordbankConfig;
use crate::conversation::Conversation;
use crate::error::{WordbankError, WordbankResult};
use crate::lookup::LookupCache;
use crate::review::{ListRegistry, RestoreReport};
use crate::snapshot::{snapshot_once, SnapshotOutcome, SnapshotScheduler, SnapshotSchedulerConfig};
use crate::storage::{SnapshotStore, SqliteSnapshotStore};
use crate::traits::Normalizer;

/// Owns every long-lived component of a wordbank process.
///
/// # Example
///
/// ```ignore
/// use std::sync::Arc;
/// use wordbank_core::{Event, WordbankConfig, WordbankRuntime};
///
/// # async fn example(normalizer: Arc<dyn wordbank_core::Normalizer>) -> wordbank_core::WordbankResult<()> {
/// let mut runtime = WordbankRuntime::new(WordbankConfig::default(), normalizer).await?;
/// runtime.start().await?;
///
/// let reply = runtime.conversation().handle("alice", Event::Start).await;
///
/// runtime.shutdown().await?;
/// # Ok(())
/// # }
/// ```
pub struct WordbankRuntime {
    conversation: Arc<Conversation>,
    scheduler: SnapshotScheduler,
    restored: RestoreReport,
    config: WordbankConfig,
}

impl WordbankRuntime {
    /// Open the store and restore the lookup cache and every word list.
    ///
    /// This creates the snapshot scheduler but does not start it.
    pub async fn new(config: WordbankConfig, normalizer: Arc<dyn Normalizer>) -> WordbankResult<Self> {
        config.validate()?;

        let store: Arc<dyn SnapshotStore> = match &config.storage.db_path {
            Some(path) => {
                debug!(path = %path.display(), "Creating file-backed snapshot store");
                Arc::new(SqliteSnapshotStore::new(path)?)
            }
            None => {
                debug!("Creating in-memory snapshot store");
                Arc::new(SqliteSnapshotStore::in_memory()?)
            }
        };

        let cache = Arc::new(LookupCache::new(normalizer));
        let lookups = cache.restore(store.as_ref()).await?;

        let registry = Arc::new(ListRegistry::new(store));
        let restored = registry.restore_all().await?;
        if !restored.reset.is_empty() {
            warn!(users = ?restored.reset, "Some word lists were reset to empty");
        }

        let scheduler_config = SnapshotSchedulerConfig {
            interval_secs: config.storage.snapshot_interval_secs.max(1),
            run_on_start: config.storage.snapshot_on_start,
        };
        let scheduler = SnapshotScheduler::new(registry.clone(), cache.clone(), scheduler_config)
            .await
            .map_err(|e| WordbankError::internal(format!("Failed to create snapshot scheduler: {}", e)))?;

        let conversation = Arc::new(Conversation::new(
            registry,
            cache,
            config.review.clone(),
            config.vocabulary.clone(),
        ));

        info!(
            lists = restored.restored,
            lookups,
            "Wordbank runtime ready"
        );

        Ok(Self {
            conversation,
            scheduler,
            restored,
            config,
        })
    }

    /// Start periodic snapshots.
    pub async fn start(&self) -> WordbankResult<()> {
        self.scheduler
            .start()
            .await
            .map_err(|e| WordbankError::internal(format!("Failed to start snapshot scheduler: {}", e)))
    }

    /// Stop periodic snapshots and save everything one last time.
    pub async fn shutdown(&mut self) -> WordbankResult<SnapshotOutcome> {
        debug!("Shutting down wordbank runtime");
        if let Err(e) = self.scheduler.shutdown().await {
            warn!(error = %e, "Snapshot scheduler did not stop cleanly");
        }

        let outcome = self.snapshot_now().await?;
        info!(
            lists_saved = outcome.lists_saved,
            lookups_saved = outcome.lookups_saved,
            "Final snapshot complete"
        );
        Ok(outcome)
    }

    /// Snapshot every list and the cache immediately.
    pub async fn snapshot_now(&self) -> WordbankResult<SnapshotOutcome> {
        snapshot_once(self.conversation.registry(), self.conversation.cache()).await
    }

    /// Shared event dispatcher.
    pub fn conversation(&self) -> Arc<Conversation> {
        self.conversation.clone()
    }

    /// What was loaded at startup.
    pub fn restored(&self) -> &RestoreReport {
        &self.restored
    }

    pub fn config(&self) -> &WordbankConfig {
        &self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::conversation::Event;
    use crate::traits::{Lookup, MockNormalizer};

    fn normalizer() -> Arc<dyn Normalizer> {
        let mut normalizer = MockNormalizer::new();
        normalizer.expect_provider_name().return_const("mock".to_string());
        normalizer
            .expect_normalize()
            .returning(|raw| Ok(Some(Lookup::new(raw.to_lowercase(), 10.0))));
        Arc::new(normalizer)
    }

    fn config(db_path: Option<std::path::PathBuf>) -> WordbankConfig {
        WordbankConfig::builder().db_path(db_path).build().unwrap()
    }

    #[tokio::test]
    async fn test_runtime_in_memory() {
        let mut runtime = WordbankRuntime::new(config(None), normalizer()).await.unwrap();
        runtime.start().await.unwrap();

        let reply = runtime
            .conversation()
            .handle("alice", Event::Document("cat\n".to_string()))
            .await;
        assert_eq!(reply.messages[0], "New words: 1");

        let outcome = runtime.shutdown().await.unwrap();
        assert_eq!(outcome.lists_saved, 1);
        assert_eq!(outcome.lookups_saved, 1);
    }

    #[tokio::test]
    async fn test_state_survives_restart() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("wordbank.db");

        {
            let mut runtime = WordbankRuntime::new(config(Some(path.clone())), normalizer())
                .await
                .unwrap();
            runtime
                .conversation()
                .handle("alice", Event::Document("cat\ndog\n".to_string()))
                .await;
            runtime.shutdown().await.unwrap();
        }

        let mut untouched = MockNormalizer::new();
        untouched.expect_provider_name().return_const("mock".to_string());
        untouched.expect_normalize().times(0);

        let runtime = WordbankRuntime::new(config(Some(path)), Arc::new(untouched))
            .await
            .unwrap();
        assert_eq!(runtime.restored().restored, 1);

        let conversation = runtime.conversation();
        let alice = conversation.registry().get("alice").await.unwrap();
        assert_eq!(alice.lock().await.len(), 2);
        assert_eq!(conversation.cache().len().await, 2);
    }
}
