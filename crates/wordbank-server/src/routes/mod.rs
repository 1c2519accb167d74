//! Route definitions for the HTTP transport.

mod health;
mod snapshot;
mod users;

use axum::{
    routing::{get, post},
    Router,
};

use crate::state::AppState;

/// Create the main application router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        // Health check
        .route("/health", get(health::health_check))
        // Learner events
        .route("/users/:username/messages", post(users::post_message))
        .route("/users/:username/documents", post(users::post_document))
        .route("/users/:username/stats", get(users::get_stats))
        // Persistence
        .route("/snapshot", post(snapshot::take_snapshot))
        // Attach state
        .with_state(state)
}

pub use health::*;
pub use snapshot::*;
pub use users::*;
