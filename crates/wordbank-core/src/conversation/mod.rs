//! Turns learner events into scheduler calls and reply messages.

use std::sync::Arc;

use tracing::{debug, info};

use crate::config::{Command, ReviewConfig, Vocabulary};
use crate::lookup::LookupCache;
use crate::review::{Choice, ListRegistry, WordList};
use crate::types::{ListStats, Outcome, Word};

const GREETING: &str = "Please, send me a file with words, one per line";
const EMPTY_LIST: &str = "No more words! Send me a file with new ones";
const NOTHING_DUE: &str = "Nothing to review right now, come back later";

/// Something the learner did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    /// Conversation opened.
    Start,
    /// A text message.
    Text(String),
    /// A submitted file of newline-separated words.
    Document(String),
}

/// Messages to send back, in order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Reply {
    pub messages: Vec<String>,
    /// Words added by a document, in submission order.
    pub added: Vec<Word>,
}

impl Reply {
    fn push(&mut self, message: impl Into<String>) {
        self.messages.push(message.into());
    }
}

/// Routes events to the right user's [`WordList`].
pub struct Conversation {
    registry: Arc<ListRegistry>,
    cache: Arc<LookupCache>,
    review: ReviewConfig,
    vocabulary: Vocabulary,
}

impl Conversation {
    pub fn new(
        registry: Arc<ListRegistry>,
        cache: Arc<LookupCache>,
        review: ReviewConfig,
        vocabulary: Vocabulary,
    ) -> Self {
        Self {
            registry,
            cache,
            review,
            vocabulary,
        }
    }

    pub fn registry(&self) -> &Arc<ListRegistry> {
        &self.registry
    }

    pub fn cache(&self) -> &Arc<LookupCache> {
        &self.cache
    }

    pub fn vocabulary(&self) -> &Vocabulary {
        &self.vocabulary
    }

    /// Handle one event for a user.
    ///
    /// The user's list stays locked for the whole event, so events for the
    /// same user never interleave.
    pub async fn handle(&self, username: &str, event: Event) -> Reply {
        let list = self.registry.get_or_create(username).await;
        let mut list = list.lock().await;
        let mut reply = Reply::default();

        match event {
            Event::Start => {
                info!(username, "Conversation started");
                reply.push(GREETING);
            }
            Event::Document(text) => {
                let report = list.ingest(&text, &self.cache).await;
                reply.push(format!("New words: {}", report.added.len()));
                reply.added = report.added;
                self.choose(&mut list, &mut reply);
            }
            Event::Text(text) => {
                let command = self.vocabulary.parse(&text);
                debug!(username, ?command, "Received message");
                self.dispatch(&mut list, command, &mut reply);
            }
        }
        reply
    }

    fn dispatch(&self, list: &mut WordList, command: Command, reply: &mut Reply) {
        match command {
            Command::Yes => {
                self.answer(list, Outcome::Success);
                self.choose(list, reply);
            }
            Command::No => {
                self.answer(list, Outcome::Failure);
                self.choose(list, reply);
            }
            Command::Delete => {
                if list.current_word().is_some() {
                    if let Ok(word) = list.delete_current() {
                        reply.push(format!("`{}` was deleted", word.value()));
                    }
                }
                self.choose(list, reply);
            }
            Command::Next => self.choose(list, reply),
            Command::Stats => reply.push(stats_message(&list.stats())),
            Command::Add(value) => {
                let word = list.add_manual(value);
                reply.push(format!("Added `{}`", word.value()));
            }
            Command::Other(_) => reply.push(self.usage()),
        }
    }

    fn answer(&self, list: &mut WordList, outcome: Outcome) {
        if list.current_word().is_none() {
            debug!(username = list.username(), %outcome, "No current word, answer ignored");
            return;
        }
        if let Err(e) = list.record_result(outcome) {
            debug!(username = list.username(), error = %e, "Answer not recorded");
        }
    }

    fn choose(&self, list: &mut WordList, reply: &mut Reply) {
        match list.choose(&self.review) {
            Choice::Word(value) => reply.push(value),
            Choice::NothingDue => reply.push(NOTHING_DUE),
            Choice::Empty => reply.push(EMPTY_LIST),
        }
    }

    fn usage(&self) -> String {
        let first = |set: &[String]| set.first().cloned().unwrap_or_default();
        let v = &self.vocabulary;
        format!(
            "Reply {} if you know the word, {} if you don't, {} to never see it again, \
             {} to skip, {} for progress, or \"{}<word>\" to add a word",
            first(&v.yes),
            first(&v.no),
            first(&v.delete),
            first(&v.next),
            first(&v.stats),
            v.add_prefix,
        )
    }
}

fn stats_message(stats: &ListStats) -> String {
    if stats.total() == 0 {
        EMPTY_LIST.to_string()
    } else {
        stats.to_string()
    }
}
