//! Which words are due for review at a given moment.
//!
//! A word that was last answered correctly cools down for
//! `min(INIT * MULT^(successes - 1), MAX)`; a word last answered wrongly cools
//! down for `WRONG_COOLDOWN`. Never-reviewed words are only admitted when
//! fewer than `MIN_AVAILABLE` words are due.

use chrono::{DateTime, Duration, Utc};

use crate::config::ReviewConfig;
use crate::types::{Outcome, Word};

/// Review state of a single word at a moment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Eligibility {
    /// Never reviewed.
    New,
    /// Cooldown has elapsed.
    Due,
    /// Still cooling down.
    Cooldown { remaining: Duration },
}

/// Classify one word.
pub fn classify(word: &Word, config: &ReviewConfig, now: DateTime<Utc>) -> Eligibility {
    match word.last_outcome() {
        None => Eligibility::New,
        Some(Outcome::Success) => gate(
            word.time_since_last_success(now),
            config.repeat_interval(word.success_count()),
        ),
        Some(Outcome::Failure) => gate(word.time_since_last_failure(now), config.wrong_cooldown()),
    }
}

fn gate(elapsed: Option<Duration>, cooldown: Duration) -> Eligibility {
    match elapsed {
        Some(elapsed) if elapsed <= cooldown => Eligibility::Cooldown {
            remaining: cooldown - elapsed,
        },
        _ => Eligibility::Due,
    }
}

/// Indices of active words split by eligibility, in list order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Buckets {
    pub available: Vec<usize>,
    pub new: Vec<usize>,
    pub cooling: usize,
}

impl Buckets {
    /// Move new words into `available` until it holds `min_available`
    /// entries or no new words remain.
    pub fn top_up(mut self, min_available: usize) -> Vec<usize> {
        let missing = min_available.saturating_sub(self.available.len());
        self.available.extend(self.new.into_iter().take(missing));
        self.available
    }
}

/// Split words into due, new and cooling buckets.
pub fn partition(words: &[Word], config: &ReviewConfig, now: DateTime<Utc>) -> Buckets {
    let mut buckets = Buckets::default();
    for (index, word) in words.iter().enumerate() {
        match classify(word, config, now) {
            Eligibility::New => buckets.new.push(index),
            Eligibility::Due => buckets.available.push(index),
            Eligibility::Cooldown { .. } => buckets.cooling += 1,
        }
    }
    buckets
}

/// Indices of the words a choice may pick from right now.
pub fn select_available(words: &[Word], config: &ReviewConfig, now: DateTime<Utc>) -> Vec<usize> {
    partition(words, config, now).top_up(config.min_available)
}
