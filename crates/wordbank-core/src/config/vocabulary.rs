//! Reply vocabulary: which texts count as which command.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::error::{WordbankError, WordbankResult};

/// A learner message interpreted against the [`Vocabulary`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Recalled the current word.
    Yes,
    /// Did not recall the current word.
    No,
    /// Never show the current word again.
    Delete,
    /// Skip to another word without answering.
    Next,
    /// Show category counts.
    Stats,
    /// Add a word verbatim, bypassing the dictionary.
    Add(String),
    /// Anything else.
    Other(String),
}

/// Token sets for each command. Matching ignores case and surrounding whitespace.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Vocabulary {
    pub yes: Vec<String>,
    pub no: Vec<String>,
    pub delete: Vec<String>,
    pub next: Vec<String>,
    pub stats: Vec<String>,
    /// Prefix introducing a manual entry, e.g. `add serendipity`.
    pub add_prefix: String,
}

fn tokens(values: &[&str]) -> Vec<String> {
    values.iter().map(|v| v.to_string()).collect()
}

impl Default for Vocabulary {
    fn default() -> Self {
        Self {
            yes: tokens(&["y", "yes", "+"]),
            no: tokens(&["n", "no", "-"]),
            delete: tokens(&["d", "del", "delete"]),
            next: tokens(&["next", ">"]),
            stats: tokens(&["stat", "stats"]),
            add_prefix: "add ".to_string(),
        }
    }
}

impl Vocabulary {
    /// Interpret a learner message.
    pub fn parse(&self, text: &str) -> Command {
        let trimmed = text.trim();
        let lowered = trimmed.to_lowercase();

        let prefix = self.add_prefix.to_lowercase();
        if !prefix.trim().is_empty() {
            if let Some(rest) = strip_prefix_ignore_case(trimmed, &prefix) {
                let value = rest.trim();
                if !value.is_empty() {
                    return Command::Add(value.to_string());
                }
            }
        }

        let is = |set: &[String]| set.iter().any(|t| t.trim().to_lowercase() == lowered);
        if is(&self.yes) {
            Command::Yes
        } else if is(&self.no) {
            Command::No
        } else if is(&self.delete) {
            Command::Delete
        } else if is(&self.next) {
            Command::Next
        } else if is(&self.stats) {
            Command::Stats
        } else {
            Command::Other(trimmed.to_string())
        }
    }

    /// Reject empty token sets and tokens claimed by two commands.
    pub fn validate(&self) -> WordbankResult<()> {
        let sets = [
            ("yes", &self.yes),
            ("no", &self.no),
            ("delete", &self.delete),
            ("next", &self.next),
            ("stats", &self.stats),
        ];

        let mut owners: HashMap<String, &str> = HashMap::new();
        for (name, set) in sets {
            if set.iter().all(|t| t.trim().is_empty()) {
                return Err(WordbankError::Configuration(format!(
                    "vocabulary.{} must contain at least one token",
                    name
                )));
            }
            for token in set {
                let key = token.trim().to_lowercase();
                if key.is_empty() {
                    continue;
                }
                if let Some(previous) = owners.insert(key.clone(), name) {
                    if previous != name {
                        return Err(WordbankError::Configuration(format!(
                            "vocabulary token '{}' is used by both '{}' and '{}'",
                            key, previous, name
                        )));
                    }
                }
            }
        }

        if self.add_prefix.trim().is_empty() {
            return Err(WordbankError::Configuration(
                "vocabulary.add_prefix must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}

/// Strip an already-lowercased `prefix` from `text`, ignoring case.
///
/// Lowercasing can change a character's byte length, so the cut is made
/// after the characters of `text` that produced the prefix.
fn strip_prefix_ignore_case<'a>(text: &'a str, prefix: &str) -> Option<&'a str> {
    let mut lowered = String::with_capacity(prefix.len());
    let mut end = 0;
    for c in text.chars() {
        if lowered.len() >= prefix.len() {
            break;
        }
        lowered.extend(c.to_lowercase());
        end += c.len_utf8();
    }
    (lowered == prefix).then(|| &text[end..])
}
