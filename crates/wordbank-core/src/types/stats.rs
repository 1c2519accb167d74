//! Category counts over a word list.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, IntoStaticStr};

use super::word::{Outcome, Word};

/// Progress category of an active word.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumIter, IntoStaticStr,
)]
pub enum WordCategory {
    /// Last answer was a success.
    #[strum(serialize = "repeat")]
    Repeat,
    /// Never reviewed.
    #[strum(serialize = "new")]
    New,
    /// Reviewed, last answer was not a success.
    #[strum(serialize = "to learn")]
    ToLearn,
}

impl WordCategory {
    /// Category of a word from its history.
    pub fn of(word: &Word) -> Self {
        match word.last_outcome() {
            None => Self::New,
            Some(Outcome::Success) => Self::Repeat,
            Some(Outcome::Failure) => Self::ToLearn,
        }
    }
}

/// Counts of active words per category.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListStats {
    pub new: usize,
    pub repeat: usize,
    pub to_learn: usize,
}

impl ListStats {
    /// Tally the given words.
    pub fn from_words<'a>(words: impl IntoIterator<Item = &'a Word>) -> Self {
        let mut stats = Self::default();
        for word in words {
            match WordCategory::of(word) {
                WordCategory::New => stats.new += 1,
                WordCategory::Repeat => stats.repeat += 1,
                WordCategory::ToLearn => stats.to_learn += 1,
            }
        }
        stats
    }

    /// Total number of words counted.
    pub fn total(&self) -> usize {
        self.new + self.repeat + self.to_learn
    }

    /// Non-zero categories keyed by name, in alphabetical order.
    pub fn by_category(&self) -> BTreeMap<&'static str, usize> {
        [
            (WordCategory::New, self.new),
            (WordCategory::Repeat, self.repeat),
            (WordCategory::ToLearn, self.to_learn),
        ]
        .into_iter()
        .filter(|(_, count)| *count > 0)
        .map(|(category, count)| (category.into(), count))
        .collect()
    }
}

impl std::fmt::Display for ListStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let parts: Vec<String> = self
            .by_category()
            .into_iter()
            .map(|(name, count)| format!("{}: {}", name, count))
            .collect();
        f.write_str(&parts.join(", "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summary_is_alphabetical_and_skips_zero() {
        let mut learned = Word::new("a");
        learned.success();
        let mut missed = Word::new("b");
        missed.failure();
        let mut missed_again = Word::new("c");
        missed_again.success();
        missed_again.failure();
        let fresh = Word::new("d");

        let stats = ListStats::from_words([&learned, &missed, &missed_again, &fresh]);
        assert_eq!(stats.total(), 4);
        assert_eq!(stats.to_string(), "new: 1, repeat: 1, to learn: 2");

        let only_new = ListStats::from_words([&fresh]);
        assert_eq!(only_new.to_string(), "new: 1");
    }

    #[test]
    fn test_empty_summary() {
        let stats = ListStats::default();
        assert_eq!(stats.to_string(), "");
        assert!(stats.by_category().is_empty());
    }
}
