//! Vocabulary entries and their review history.

use chrono::{DateTime, Duration, SubsecRound, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Result of a single review.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Outcome {
    /// The learner recalled the word.
    Success,
    /// The learner did not recall the word.
    #[serde(alias = "unsuccess")]
    #[strum(to_string = "failure", serialize = "unsuccess")]
    Failure,
}

/// One timestamped review outcome.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReviewEvent {
    /// When the answer was recorded (unix seconds on disk).
    #[serde(with = "chrono::serde::ts_seconds")]
    pub time: DateTime<Utc>,
    /// What the answer was.
    #[serde(rename = "eventtype")]
    pub outcome: Outcome,
}

/// A vocabulary entry with its append-only review history.
///
/// The canonical `value` is the word's identity and never changes after
/// creation. Events are only ever appended, in chronological order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Word {
    value: String,
    #[serde(default)]
    frequency: Option<f64>,
    #[serde(default)]
    events: Vec<ReviewEvent>,
}

impl Word {
    /// Create an eventless word with unknown frequency.
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            frequency: None,
            events: Vec::new(),
        }
    }

    /// Create an eventless word with a known corpus frequency.
    pub fn with_frequency(value: impl Into<String>, frequency: f64) -> Self {
        Self {
            value: value.into(),
            frequency: Some(frequency),
            events: Vec::new(),
        }
    }

    /// Canonical text of the word.
    pub fn value(&self) -> &str {
        &self.value
    }

    /// Corpus frequency, if the dictionary reported one.
    pub fn frequency(&self) -> Option<f64> {
        self.frequency
    }

    /// Review history, oldest first.
    pub fn events(&self) -> &[ReviewEvent] {
        &self.events
    }

    /// Record an outcome stamped with the current time.
    pub fn record_outcome(&mut self, outcome: Outcome) {
        self.record_outcome_at(outcome, Utc::now());
    }

    /// Record an outcome at a given time.
    ///
    /// Times are kept to whole seconds, the precision they are stored with.
    /// A time earlier than the latest event is clamped to it so the history
    /// stays chronological.
    pub fn record_outcome_at(&mut self, outcome: Outcome, at: DateTime<Utc>) {
        let at = at.trunc_subsecs(0);
        let time = match self.events.last() {
            Some(last) if last.time > at => last.time,
            _ => at,
        };
        self.events.push(ReviewEvent { time, outcome });
    }

    /// Shorthand for recording a success now.
    pub fn success(&mut self) {
        self.record_outcome(Outcome::Success);
    }

    /// Shorthand for recording a failure now.
    pub fn failure(&mut self) {
        self.record_outcome(Outcome::Failure);
    }

    /// True when the word was never reviewed.
    pub fn is_new(&self) -> bool {
        self.events.is_empty()
    }

    /// Outcome of the most recent review.
    pub fn last_outcome(&self) -> Option<Outcome> {
        self.events.last().map(|e| e.outcome)
    }

    /// Number of successful reviews.
    pub fn success_count(&self) -> usize {
        self.events
            .iter()
            .filter(|e| e.outcome == Outcome::Success)
            .count()
    }

    /// Time of the most recent event with the given outcome.
    pub fn last_time_of(&self, outcome: Outcome) -> Option<DateTime<Utc>> {
        self.events
            .iter()
            .rev()
            .find(|e| e.outcome == outcome)
            .map(|e| e.time)
    }

    /// Elapsed time since the last success, `None` if there was none.
    pub fn time_since_last_success(&self, now: DateTime<Utc>) -> Option<Duration> {
        self.last_time_of(Outcome::Success)
            .map(|t| now.signed_duration_since(t))
    }

    /// Elapsed time since the last failure, `None` if there was none.
    pub fn time_since_last_failure(&self, now: DateTime<Utc>) -> Option<Duration> {
        self.last_time_of(Outcome::Failure)
            .map(|t| now.signed_duration_since(t))
    }
}

impl std::fmt::Display for Word {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.value)
    }
}
