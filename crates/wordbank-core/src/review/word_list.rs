//! Per-user word list and review scheduler.

use std::collections::HashSet;

use chrono::{DateTime, Utc};
use futures::{stream, StreamExt};
use rand::seq::SliceRandom;
use rand::Rng;
use tracing::{debug, info};

use super::eligibility;
use crate::config::ReviewConfig;
use crate::error::{WordbankError, WordbankResult};
use crate::lookup::LookupCache;
use crate::storage::WordListRecord;
use crate::types::{ListStats, Outcome, Word};

/// Dictionary lookups in flight per ingestion.
const LOOKUP_CONCURRENCY: usize = 8;

/// Result of asking for the next word.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Choice {
    /// Show this word.
    Word(String),
    /// Every word is cooling down.
    NothingDue,
    /// The list has no active words.
    Empty,
}

impl Choice {
    /// The chosen word, if any.
    pub fn word(&self) -> Option<&str> {
        match self {
            Self::Word(value) => Some(value),
            _ => None,
        }
    }

    /// Whether no word is shown.
    pub fn is_terminal(&self) -> bool {
        !matches!(self, Self::Word(_))
    }
}

/// Outcome of ingesting a submitted document.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct IngestReport {
    /// Words added to active review, in submission order.
    pub added: Vec<Word>,
    /// Non-empty lines submitted.
    pub submitted: usize,
    /// Lines dropped for containing non-ASCII characters.
    pub non_ascii: usize,
    /// Lines dropped because the word (raw or canonical) was already known.
    pub duplicates: usize,
    /// Lines the dictionary did not recognise.
    pub unknown: usize,
    /// Words parked in the low-frequency set.
    pub low_frequency: usize,
}

/// One user's words and the word currently being shown.
///
/// Active, banned and low-frequency words never share a canonical value
/// (except through [`WordList::add_manual`], which adds verbatim).
#[derive(Debug, Clone)]
pub struct WordList {
    username: String,
    words: Vec<Word>,
    banned: Vec<Word>,
    low_frequency: Vec<Word>,
    current: Option<usize>,
}

impl WordList {
    /// Create an empty list.
    pub fn new(username: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            words: Vec::new(),
            banned: Vec::new(),
            low_frequency: Vec::new(),
            current: None,
        }
    }

    /// Rebuild a list from its stored snapshot.
    pub fn from_record(record: WordListRecord) -> Self {
        let current = record.current_word.as_ref().and_then(|current| {
            record
                .words
                .iter()
                .position(|w| w.value() == current.value())
        });

        Self {
            username: record.username,
            words: record.words,
            banned: record.banned_words,
            low_frequency: record.low_frequency,
            current,
        }
    }

    /// Consistent copy of the list for persistence.
    pub fn to_record(&self) -> WordListRecord {
        WordListRecord {
            username: self.username.clone(),
            current_word: self.current_word().cloned(),
            words: self.words.clone(),
            banned_words: self.banned.clone(),
            low_frequency: self.low_frequency.clone(),
        }
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    /// Active words, in insertion order.
    pub fn words(&self) -> &[Word] {
        &self.words
    }

    pub fn banned_words(&self) -> &[Word] {
        &self.banned
    }

    pub fn low_frequency_words(&self) -> &[Word] {
        &self.low_frequency
    }

    /// The word currently shown to the learner.
    pub fn current_word(&self) -> Option<&Word> {
        self.current.and_then(|i| self.words.get(i))
    }

    /// Number of active words.
    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    /// Pick the next word to show, now.
    pub fn choose(&mut self, config: &ReviewConfig) -> Choice {
        self.choose_at(config, Utc::now(), &mut rand::thread_rng())
    }

    /// Pick the next word to show at `now`, uniformly among available words.
    pub fn choose_at<R: Rng + ?Sized>(
        &mut self,
        config: &ReviewConfig,
        now: DateTime<Utc>,
        rng: &mut R,
    ) -> Choice {
        if self.words.is_empty() {
            self.current = None;
            debug!(username = %self.username, "No active words");
            return Choice::Empty;
        }

        let available = eligibility::select_available(&self.words, config, now);
        match available.choose(rng) {
            Some(&index) => {
                self.current = Some(index);
                let value = self.words[index].value().to_string();
                info!(
                    username = %self.username,
                    available = available.len(),
                    word = %value,
                    "Chose next word"
                );
                Choice::Word(value)
            }
            None => {
                self.current = None;
                info!(username = %self.username, "Nothing due for review");
                Choice::NothingDue
            }
        }
    }

    /// Add newline-separated raw words, normalizing each through the cache.
    ///
    /// Lines are trimmed; blank and non-ASCII lines are skipped, as are raw
    /// words already active or banned. A canonical form that is already known
    /// in any set is dropped. Words with frequency below 1 go to the
    /// low-frequency set instead of review.
    pub async fn ingest(&mut self, text: &str, cache: &LookupCache) -> IngestReport {
        let mut report = IngestReport::default();

        let candidates: Vec<String> = {
            let known_raw: HashSet<&str> = self
                .words
                .iter()
                .chain(&self.banned)
                .map(Word::value)
                .collect();
            let mut seen = HashSet::new();
            let mut candidates = Vec::new();

            for raw in text.lines().map(str::trim).filter(|l| !l.is_empty()) {
                report.submitted += 1;
                if !raw.is_ascii() {
                    report.non_ascii += 1;
                } else if known_raw.contains(raw) || !seen.insert(raw) {
                    report.duplicates += 1;
                } else {
                    candidates.push(raw.to_string());
                }
            }
            candidates
        };

        let lookups: Vec<_> = stream::iter(candidates.clone())
            .map(move |raw| async move { cache.resolve(&raw).await })
            .buffered(LOOKUP_CONCURRENCY)
            .collect()
            .await;

        let mut known: HashSet<String> = self
            .words
            .iter()
            .chain(&self.banned)
            .chain(&self.low_frequency)
            .map(|w| w.value().to_string())
            .collect();

        for (raw, lookup) in candidates.iter().zip(lookups) {
            let Some(lookup) = lookup else {
                debug!(username = %self.username, raw = %raw, "Unknown word dropped");
                report.unknown += 1;
                continue;
            };
            if !known.insert(lookup.canonical.clone()) {
                report.duplicates += 1;
                continue;
            }

            let word = Word::with_frequency(lookup.canonical, lookup.frequency);
            if lookup.frequency >= 1.0 {
                report.added.push(word.clone());
                self.words.push(word);
            } else {
                report.low_frequency += 1;
                self.low_frequency.push(word);
            }
        }

        info!(
            username = %self.username,
            submitted = report.submitted,
            added = report.added.len(),
            duplicates = report.duplicates,
            unknown = report.unknown,
            low_frequency = report.low_frequency,
            non_ascii = report.non_ascii,
            "Ingested words"
        );
        report
    }

    /// Record an answer for the current word, now.
    pub fn record_result(&mut self, outcome: Outcome) -> WordbankResult<&Word> {
        self.record_result_at(outcome, Utc::now())
    }

    /// Record an answer for the current word at `now`.
    pub fn record_result_at(
        &mut self,
        outcome: Outcome,
        now: DateTime<Utc>,
    ) -> WordbankResult<&Word> {
        let index = self
            .current
            .ok_or_else(|| WordbankError::no_current_word(&self.username))?;
        let word = &mut self.words[index];
        word.record_outcome_at(outcome, now);
        debug!(username = %self.username, word = %word.value(), %outcome, "Recorded answer");
        Ok(word)
    }

    /// Ban the current word: it leaves review and is never re-added.
    pub fn delete_current(&mut self) -> WordbankResult<Word> {
        let index = self
            .current
            .take()
            .ok_or_else(|| WordbankError::no_current_word(&self.username))?;
        let word = self.words.remove(index);
        self.banned.push(word.clone());
        info!(username = %self.username, word = %word.value(), "Banned word");
        Ok(word)
    }

    /// Append a word verbatim, without normalization or duplicate checks.
    pub fn add_manual(&mut self, value: impl Into<String>) -> &Word {
        let index = self.words.len();
        self.words.push(Word::new(value));
        debug!(username = %self.username, word = %self.words[index].value(), "Added word manually");
        &self.words[index]
    }

    /// Category counts of active words.
    pub fn stats(&self) -> ListStats {
        ListStats::from_words(&self.words)
    }
}
