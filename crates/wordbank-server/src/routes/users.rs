//! Per-user learner endpoints.

use axum::{
    extract::{Path, State},
    Json,
};
use serde::{Deserialize, Serialize};

use wordbank_core::Event;

use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

/// Request body for a text message.
#[derive(Debug, Deserialize)]
pub struct MessageRequest {
    pub text: String,
}

/// Replies to send back to the learner, in order.
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub replies: Vec<String>,
}

/// Response for a submitted document.
#[derive(Debug, Serialize)]
pub struct DocumentResponse {
    /// Canonical forms added to review.
    pub added: Vec<String>,
    pub replies: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct StatsResponse {
    pub new: usize,
    pub repeat: usize,
    pub to_learn: usize,
    pub summary: String,
}

fn check_username(username: &str) -> ApiResult<&str> {
    let username = username.trim();
    if username.is_empty() {
        return Err(ApiError::bad_request("username must not be empty"));
    }
    Ok(username)
}

/// Handle a text message from a learner.
/// POST /users/:username/messages
pub async fn post_message(
    State(state): State<AppState>,
    Path(username): Path<String>,
    Json(request): Json<MessageRequest>,
) -> ApiResult<Json<MessageResponse>> {
    let username = check_username(&username)?;
    let event = if request.text.trim() == "/start" {
        Event::Start
    } else {
        Event::Text(request.text)
    };

    let reply = state.conversation().handle(username, event).await;
    Ok(Json(MessageResponse {
        replies: reply.messages,
    }))
}

/// Ingest a plain-text document of newline-separated words.
/// POST /users/:username/documents
pub async fn post_document(
    State(state): State<AppState>,
    Path(username): Path<String>,
    body: String,
) -> ApiResult<Json<DocumentResponse>> {
    let username = check_username(&username)?;
    let reply = state
        .conversation()
        .handle(username, Event::Document(body))
        .await;

    Ok(Json(DocumentResponse {
        added: reply.added.iter().map(|w| w.value().to_string()).collect(),
        replies: reply.messages,
    }))
}

/// Category counts for a learner's active words.
/// GET /users/:username/stats
pub async fn get_stats(
    State(state): State<AppState>,
    Path(username): Path<String>,
) -> ApiResult<Json<StatsResponse>> {
    let username = check_username(&username)?;
    let list = state
        .conversation()
        .registry()
        .get(username)
        .await
        .ok_or_else(|| ApiError::not_found(format!("No word list for user '{}'", username)))?;

    let stats = list.lock().await.stats();
    Ok(Json(StatsResponse {
        new: stats.new,
        repeat: stats.repeat,
        to_learn: stats.to_learn,
        summary: stats.to_string(),
    }))
}
