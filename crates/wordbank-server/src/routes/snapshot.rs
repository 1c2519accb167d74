//! Manual snapshot endpoint.

use axum::{extract::State, Json};
use serde::Serialize;
use tracing::info;

use wordbank_core::snapshot::snapshot_once;

use crate::error::ApiResult;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct SnapshotResponse {
    pub lists_saved: usize,
    pub lists_failed: Vec<String>,
    pub lookups_saved: usize,
}

/// Save every list and the lookup cache now.
/// POST /snapshot
pub async fn take_snapshot(State(state): State<AppState>) -> ApiResult<Json<SnapshotResponse>> {
    let conversation = state.conversation();
    let outcome = snapshot_once(conversation.registry(), conversation.cache()).await?;
    info!(lists_saved = outcome.lists_saved, "Manual snapshot complete");

    Ok(Json(SnapshotResponse {
        lists_saved: outcome.lists_saved,
        lists_failed: outcome.lists_failed,
        lookups_saved: outcome.lookups_saved,
    }))
}
