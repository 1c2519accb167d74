//! wordbank-server - HTTP transport for wordbank.
//!
//! Stands in for a chat platform: each learner is addressed by username,
//! sends text messages or documents, and receives the replies in order.
//!
//! # Example
//!
//! ```ignore
//! use wordbank_server::{create_server, AppState};
//!
//! let state = AppState::new_with_runtime(runtime);
//! let app = create_server(state);
//!
//! let listener = tokio::net::TcpListener::bind("0.0.0.0:8080").await?;
//! axum::serve(listener, app).await?;
//! ```

pub mod error;
pub mod middleware;
pub mod routes;
pub mod state;

pub use error::{ApiError, ApiResult};
pub use state::AppState;

use axum::{extract::DefaultBodyLimit, middleware as axum_middleware, Router};
use tower_http::trace::TraceLayer;

/// Largest word document accepted, in bytes.
pub const MAX_DOCUMENT_BYTES: usize = 1024 * 1024;

/// Build the router for a learner-facing service.
pub fn create_server(state: AppState) -> Router {
    routes::create_router(state)
        .layer(DefaultBodyLimit::max(MAX_DOCUMENT_BYTES))
        .layer(axum_middleware::from_fn(middleware::logging_middleware))
        .layer(middleware::cors_layer())
        .layer(TraceLayer::new_for_http())
}
