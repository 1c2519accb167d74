//! Server state management.

use std::sync::{Arc, Mutex};

use wordbank_core::{Conversation, WordbankRuntime};

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    conversation: Arc<Conversation>,
    runtime: Arc<Mutex<Option<WordbankRuntime>>>,
}

impl AppState {
    /// Create state owning a runtime, which is handed back by [`AppState::take_runtime`]
    /// for shutdown.
    pub fn new_with_runtime(runtime: WordbankRuntime) -> Self {
        Self {
            conversation: runtime.conversation(),
            runtime: Arc::new(Mutex::new(Some(runtime))),
        }
    }

    /// Create state around a bare conversation.
    pub fn new(conversation: Arc<Conversation>) -> Self {
        Self {
            conversation,
            runtime: Arc::new(Mutex::new(None)),
        }
    }

    pub fn conversation(&self) -> &Arc<Conversation> {
        &self.conversation
    }

    /// Take the runtime out of the state. Later calls return `None`.
    pub fn take_runtime(&self) -> Option<WordbankRuntime> {
        self.runtime.lock().ok().and_then(|mut runtime| runtime.take())
    }
}
