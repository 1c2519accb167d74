//! Username to word list mapping with batch snapshot support.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::{Mutex, RwLock};
use tracing::{debug, error, info};

use super::WordList;
use crate::error::WordbankResult;
use crate::storage::SnapshotStore;

/// Handle to one user's list. Holding the lock serializes that user's events.
pub type SharedWordList = Arc<Mutex<WordList>>;

/// Result of a batch save.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SnapshotReport {
    /// Lists written successfully.
    pub saved: usize,
    /// Usernames whose save failed.
    pub failed: Vec<String>,
}

impl SnapshotReport {
    pub fn is_complete(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Result of a batch load.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RestoreReport {
    /// Lists loaded from their records.
    pub restored: usize,
    /// Usernames reset to an empty list because their record was unreadable.
    pub reset: Vec<String>,
}

/// Owns every user's [`WordList`].
pub struct ListRegistry {
    lists: RwLock<HashMap<String, SharedWordList>>,
    store: Arc<dyn SnapshotStore>,
}

impl ListRegistry {
    /// Create an empty registry backed by a store.
    pub fn new(store: Arc<dyn SnapshotStore>) -> Self {
        Self {
            lists: RwLock::new(HashMap::new()),
            store,
        }
    }

    /// The backing store.
    pub fn store(&self) -> &Arc<dyn SnapshotStore> {
        &self.store
    }

    /// Get a user's list, creating an empty one on first interaction.
    pub async fn get_or_create(&self, username: &str) -> SharedWordList {
        if let Some(list) = self.lists.read().await.get(username) {
            return list.clone();
        }

        let mut lists = self.lists.write().await;
        lists
            .entry(username.to_string())
            .or_insert_with(|| {
                debug!(username, "Creating word list");
                Arc::new(Mutex::new(WordList::new(username)))
            })
            .clone()
    }

    /// Get a user's list without creating it.
    pub async fn get(&self, username: &str) -> Option<SharedWordList> {
        self.lists.read().await.get(username).cloned()
    }

    /// Number of loaded lists.
    pub async fn len(&self) -> usize {
        self.lists.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.lists.read().await.is_empty()
    }

    /// Usernames of loaded lists, sorted.
    pub async fn usernames(&self) -> Vec<String> {
        let mut names: Vec<String> = self.lists.read().await.keys().cloned().collect();
        names.sort();
        names
    }

    /// Save every loaded list.
    ///
    /// Each list is copied under its own lock, so a save never observes a
    /// list mid-event. A failed save is logged and does not stop the others.
    pub async fn snapshot_all(&self) -> SnapshotReport {
        let lists: Vec<(String, SharedWordList)> = {
            let lists = self.lists.read().await;
            lists
                .iter()
                .map(|(name, list)| (name.clone(), list.clone()))
                .collect()
        };

        let mut report = SnapshotReport::default();
        for (username, list) in lists {
            let record = list.lock().await.to_record();
            match self.store.save_list(&record) {
                Ok(()) => report.saved += 1,
                Err(e) => {
                    error!(username = %username, error = %e, "Failed to save word list");
                    report.failed.push(username);
                }
            }
        }

        info!(saved = report.saved, failed = report.failed.len(), "Snapshot of word lists complete");
        report
    }

    /// Load every stored list, replacing any list already loaded for the same user.
    ///
    /// An unreadable record leaves that user with an empty list. Only a
    /// failure to enumerate the store is returned as an error.
    pub async fn restore_all(&self) -> WordbankResult<RestoreReport> {
        let usernames = self.store.list_usernames()?;
        let mut report = RestoreReport::default();
        let mut restored = HashMap::with_capacity(usernames.len());

        for username in usernames {
            let list = match self.store.load_list(&username) {
                Ok(Some(record)) => {
                    report.restored += 1;
                    WordList::from_record(record)
                }
                Ok(None) => continue,
                Err(e) => {
                    error!(username = %username, error = %e, code = e.code().as_str(), "Skipping unreadable word list");
                    report.reset.push(username.clone());
                    WordList::new(username.clone())
                }
            };
            restored.insert(username, Arc::new(Mutex::new(list)));
        }

        self.lists.write().await.extend(restored);
        info!(restored = report.restored, reset = report.reset.len(), "Restored word lists");
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{SqliteSnapshotStore, WordListRecord};
    use crate::types::Word;

    fn registry() -> (Arc<SqliteSnapshotStore>, ListRegistry) {
        let store = Arc::new(SqliteSnapshotStore::in_memory().unwrap());
        let registry = ListRegistry::new(store.clone());
        (store, registry)
    }

    #[tokio::test]
    async fn test_get_or_create_reuses_lists() {
        let (_, registry) = registry();
        let first = registry.get_or_create("alice").await;
        first.lock().await.add_manual("cat");

        let again = registry.get_or_create("alice").await;
        assert!(Arc::ptr_eq(&first, &again));
        assert_eq!(again.lock().await.len(), 1);

        registry.get_or_create("bob").await;
        assert_eq!(registry.usernames().await, vec!["alice", "bob"]);
        assert!(registry.get("carol").await.is_none());
    }

    #[tokio::test]
    async fn test_snapshot_and_restore() {
        let (store, registry) = registry();
        registry.get_or_create("alice").await.lock().await.add_manual("cat");
        registry.get_or_create("bob").await;

        let report = registry.snapshot_all().await;
        assert_eq!(report.saved, 2);
        assert!(report.is_complete());

        let fresh = ListRegistry::new(store);
        let report = fresh.restore_all().await.unwrap();
        assert_eq!(report.restored, 2);
        assert!(report.reset.is_empty());

        let alice = fresh.get("alice").await.unwrap();
        assert_eq!(alice.lock().await.words()[0].value(), "cat");
    }

    #[tokio::test]
    async fn test_corrupted_record_resets_only_that_user() {
        let (store, registry) = registry();
        let mut record = WordListRecord::empty("alice");
        record.words.push(Word::new("cat"));
        store.save_list(&record).unwrap();
        store.save_raw("mallory", "{not json").unwrap();

        let report = registry.restore_all().await.unwrap();
        assert_eq!(report.restored, 1);
        assert_eq!(report.reset, vec!["mallory".to_string()]);

        let mallory = registry.get("mallory").await.unwrap();
        assert!(mallory.lock().await.is_empty());
        let alice = registry.get("alice").await.unwrap();
        assert_eq!(alice.lock().await.len(), 1);
    }

    #[tokio::test]
    async fn test_restore_from_empty_store() {
        let (_, registry) = registry();
        let report = registry.restore_all().await.unwrap();
        assert_eq!(report, RestoreReport::default());
        assert!(registry.is_empty().await);
    }
}
