//! Lookup cache in front of the external normalizer.
//!
//! Each raw word gets one [`OnceCell`]. Concurrent resolutions of the same key
//! wait on that cell, so the normalizer is called at most once per key. Both
//! found and not-found answers are kept forever; failed calls leave the cell
//! empty and are retried by the next resolution.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::{OnceCell, RwLock};
use tracing::{debug, warn};

use crate::error::WordbankResult;
use crate::storage::{LookupSnapshot, SnapshotStore};
use crate::traits::{Lookup, Normalizer};

type Slot = Arc<OnceCell<Option<Lookup>>>;

/// Memoizes [`Normalizer::normalize`] by raw (unnormalized) word.
pub struct LookupCache {
    normalizer: Arc<dyn Normalizer>,
    entries: RwLock<HashMap<String, Slot>>,
}

impl LookupCache {
    /// Create an empty cache in front of a normalizer.
    pub fn new(normalizer: Arc<dyn Normalizer>) -> Self {
        Self {
            normalizer,
            entries: RwLock::new(HashMap::new()),
        }
    }

    /// Name of the dictionary behind this cache.
    pub fn provider_name(&self) -> &str {
        self.normalizer.provider_name()
    }

    /// Resolve a raw word, calling the normalizer only on a cache miss.
    ///
    /// A failed lookup is logged and reported as `None` to the caller, but is
    /// not cached.
    pub async fn resolve(&self, raw: &str) -> Option<Lookup> {
        let slot = self.slot(raw).await;
        let result = slot
            .get_or_try_init(|| async {
                debug!(raw, provider = self.normalizer.provider_name(), "Lookup cache miss");
                self.normalizer.normalize(raw).await
            })
            .await;

        match result {
            Ok(lookup) => lookup.clone(),
            Err(e) => {
                warn!(raw, error = %e, transient = e.is_transient(), "Dictionary lookup failed");
                None
            }
        }
    }

    /// Cached answer for a raw word without calling the normalizer.
    pub async fn peek(&self, raw: &str) -> Option<Option<Lookup>> {
        let entries = self.entries.read().await;
        entries.get(raw).and_then(|slot| slot.get().cloned())
    }

    async fn slot(&self, raw: &str) -> Slot {
        if let Some(slot) = self.entries.read().await.get(raw) {
            return slot.clone();
        }
        let mut entries = self.entries.write().await;
        entries.entry(raw.to_string()).or_default().clone()
    }

    /// Number of keys with a cached answer.
    pub async fn len(&self) -> usize {
        let entries = self.entries.read().await;
        entries.values().filter(|slot| slot.initialized()).count()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    /// Copy of every cached answer.
    pub async fn snapshot(&self) -> LookupSnapshot {
        let entries = self.entries.read().await;
        entries
            .iter()
            .filter_map(|(raw, slot)| slot.get().map(|lookup| (raw.clone(), lookup.clone())))
            .collect()
    }

    /// Write every cached answer to the store.
    pub async fn persist(&self, store: &dyn SnapshotStore) -> WordbankResult<usize> {
        let snapshot = self.snapshot().await;
        store.save_lookups(&snapshot)?;
        debug!(entries = snapshot.len(), "Persisted lookup cache");
        Ok(snapshot.len())
    }

    /// Load cached answers from the store. Starts empty if nothing was stored.
    pub async fn restore(&self, store: &dyn SnapshotStore) -> WordbankResult<usize> {
        let stored = store.load_lookups()?;
        let count = stored.len();
        let mut entries = self.entries.write().await;
        for (raw, lookup) in stored {
            entries.insert(raw, Arc::new(OnceCell::new_with(Some(lookup))));
        }
        debug!(entries = count, "Restored lookup cache");
        Ok(count)
    }
}
