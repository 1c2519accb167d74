//! wordbank-core - Core library for wordbank.
//!
//! This crate provides the review scheduler, lookup cache, snapshot storage
//! and conversation dispatcher behind the wordbank spaced repetition service.
//!
//! # Example
//!
//! ```ignore
//! use wordbank_core::{Event, WordbankConfig, WordbankRuntime};
//!
//! let mut runtime = WordbankRuntime::new(WordbankConfig::from_env()?, normalizer).await?;
//! runtime.start().await?;
//!
//! let reply = runtime
//!     .conversation()
//!     .handle("alice", Event::Document("running\ncats\n".to_string()))
//!     .await;
//! ```

pub mod config;
pub mod conversation;
pub mod error;
pub mod lookup;
pub mod review;
pub mod runtime;
pub mod snapshot;
pub mod storage;
pub mod traits;
pub mod types;

// Re-export commonly used types
pub use config::{Command, ReviewConfig, Vocabulary, WordbankConfig};
pub use conversation::{Conversation, Event, Reply};
pub use error::{ErrorCode, WordbankError, WordbankResult};
pub use lookup::LookupCache;
pub use review::{Choice, IngestReport, ListRegistry, WordList};
pub use runtime::WordbankRuntime;
pub use snapshot::{SnapshotOutcome, SnapshotScheduler};
pub use storage::{SnapshotStore, SqliteSnapshotStore, WordListRecord};
pub use traits::{Lookup, Normalizer, NormalizerConfig};
pub use types::{ListStats, Outcome, Word};
