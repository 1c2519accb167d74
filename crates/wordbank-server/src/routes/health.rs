//! Liveness and a summary of what the service holds.

use axum::{extract::State, Json};
use serde::Serialize;

use crate::error::ApiResult;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    /// Dictionary provider answering lookups.
    pub dictionary: String,
    /// Learners with a word list in memory.
    pub lists: usize,
    /// Raw words with a cached dictionary answer.
    pub cached_lookups: usize,
}

/// GET /health
pub async fn health_check(State(state): State<AppState>) -> ApiResult<Json<HealthResponse>> {
    let conversation = state.conversation();
    let cache = conversation.cache();

    Ok(Json(HealthResponse {
        status: "healthy",
        version: env!("CARGO_PKG_VERSION"),
        dictionary: cache.provider_name().to_string(),
        lists: conversation.registry().len().await,
        cached_lookups: cache.len().await,
    }))
}
