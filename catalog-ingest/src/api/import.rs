//! Import endpoints
//!
//! POST /import/selected, POST /import/pending
//!
//! Only one import runs at a time; a second request gets 409 Conflict.
//! Progress is streamed on GET /import/events.

use axum::{extract::State, routing::post, Json, Router};
use serde::Deserialize;

use crate::{
    error::{ApiError, ApiResult},
    models::{ImportItem, ImportSummary},
    AppState,
};

#[derive(Debug, Deserialize)]
pub struct ImportSelectedRequest {
    pub items: Vec<ImportItem>,
}

/// POST /import/selected
pub async fn import_selected(
    State(state): State<AppState>,
    Json(request): Json<ImportSelectedRequest>,
) -> ApiResult<Json<ImportSummary>> {
    let _guard = state
        .import_lock
        .try_lock()
        .map_err(|_| ApiError::Conflict("Import already running".to_string()))?;

    let summary = state.executor.import_selected_albums(request.items).await;
    Ok(Json(summary))
}

/// POST /import/pending
pub async fn import_pending(State(state): State<AppState>) -> ApiResult<Json<ImportSummary>> {
    let _guard = state
        .import_lock
        .try_lock()
        .map_err(|_| ApiError::Conflict("Import already running".to_string()))?;

    let summary = state.executor.import_all_pending_albums().await;
    if !summary.success {
        *state.last_error.write().await = Some("Listing import candidates failed".to_string());
    }
    Ok(Json(summary))
}

pub fn import_routes() -> Router<AppState> {
    Router::new()
        .route("/import/selected", post(import_selected))
        .route("/import/pending", post(import_pending))
}
