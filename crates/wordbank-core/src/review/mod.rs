//! Review scheduling: per-user word lists and the registry that owns them.

pub mod eligibility;
mod registry;
mod word_list;

pub use eligibility::Eligibility;
pub use registry::{ListRegistry, RestoreReport, SharedWordList, SnapshotReport};
pub use word_list::{Choice, IngestReport, WordList};
