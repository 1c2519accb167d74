//! Snapshot persistence for word lists and the lookup cache.
//!
//! Word lists are stored as opaque structured records, one per username.
//! The store never interprets their contents beyond (de)serializing them.

mod sqlite;

pub use sqlite::SqliteSnapshotStore;

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::error::WordbankResult;
use crate::traits::Lookup;
use crate::types::Word;

/// Serialized state of one user's word list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WordListRecord {
    pub username: String,
    #[serde(default)]
    pub current_word: Option<Word>,
    #[serde(default)]
    pub words: Vec<Word>,
    #[serde(default)]
    pub banned_words: Vec<Word>,
    #[serde(default)]
    pub low_frequency: Vec<Word>,
}

impl WordListRecord {
    /// An empty record for a user.
    pub fn empty(username: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            current_word: None,
            words: Vec::new(),
            banned_words: Vec::new(),
            low_frequency: Vec::new(),
        }
    }
}

/// Cached normalizer results keyed by raw word; `None` records "not found".
pub type LookupSnapshot = HashMap<String, Option<Lookup>>;

/// Trait for snapshot storage operations
pub trait SnapshotStore: Send + Sync {
    /// Insert or replace a user's word list
    fn save_list(&self, record: &WordListRecord) -> WordbankResult<()>;

    /// Load a user's word list
    fn load_list(&self, username: &str) -> WordbankResult<Option<WordListRecord>>;

    /// All usernames with a stored word list
    fn list_usernames(&self) -> WordbankResult<Vec<String>>;

    /// Insert or replace cached lookups
    fn save_lookups(&self, entries: &LookupSnapshot) -> WordbankResult<()>;

    /// Load every cached lookup
    fn load_lookups(&self) -> WordbankResult<LookupSnapshot>;
}
