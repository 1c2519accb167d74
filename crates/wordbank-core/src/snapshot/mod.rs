//! Periodic persistence of word lists and the lookup cache.

mod scheduler;

pub use scheduler::{snapshot_once, SnapshotOutcome, SnapshotScheduler, SnapshotSchedulerConfig};
