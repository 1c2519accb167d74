//! Core types for wordbank.

mod stats;
mod word;

pub use stats::{ListStats, WordCategory};
pub use word::{Outcome, ReviewEvent, Word};
