//! Review session endpoints
//!
//! One in-memory session at a time, serialized through `AppState::review`.
//!
//! - POST /review/start: open a session (explicit names, or the import-root listing)
//! - GET /review, GET /review/ready
//! - POST /review/tiers/:tier, POST /review/items/:id/edit, POST /review/items/:id/action
//! - POST /review/commit: import ready items, then close
//! - DELETE /review

use axum::{
    extract::{Path, State},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::{
    error::{ApiError, ApiResult},
    models::{ConfidenceTier, ImportSummary},
    review::{ItemAction, ReviewItem, ReviewSession, ReviewSnapshot, StatusCounts, TierAction},
    AppState,
};
use catalog_common::events::CatalogEvent;
use catalog_common::time::now;

/// POST /review/start request
#[derive(Debug, Default, Deserialize)]
pub struct StartReviewRequest {
    /// Names to review; the import root is listed when absent
    #[serde(default)]
    pub folder_names: Option<Vec<String>>,
}

#[derive(Debug, Deserialize)]
pub struct TierActionRequest {
    pub action: TierAction,
}

#[derive(Debug, Serialize)]
pub struct TierActionResponse {
    pub tier: ConfidenceTier,
    pub action: TierAction,
    pub affected: usize,
    pub status_counts: StatusCounts,
}

#[derive(Debug, Deserialize)]
pub struct EditItemRequest {
    pub studio: String,
    #[serde(default)]
    pub model: String,
}

#[derive(Debug, Deserialize)]
pub struct ItemActionRequest {
    pub action: ItemAction,
}

#[derive(Debug, Serialize)]
pub struct CloseReviewResponse {
    pub session_id: Uuid,
}

fn no_session() -> ApiError {
    ApiError::NotFound("No review session open".to_string())
}

/// POST /review/start
pub async fn start_review(
    State(state): State<AppState>,
    request: Option<Json<StartReviewRequest>>,
) -> ApiResult<Json<ReviewSnapshot>> {
    let request = request.map(|Json(r)| r).unwrap_or_default();

    let mut review = state.review.write().await;
    if let Some(existing) = review.as_ref() {
        return Err(ApiError::Conflict(format!(
            "Review session already open: {}",
            existing.session_id()
        )));
    }

    let folder_names = match request.folder_names {
        Some(names) => names,
        None => state.executor.list_pending_folders().await?,
    };

    let session = ReviewSession::new(folder_names, &state.parser);
    info!(
        session_id = %session.session_id(),
        items = session.len(),
        "Review session started"
    );
    state.event_bus.emit_lossy(CatalogEvent::ReviewSessionStarted {
        session_id: session.session_id(),
        item_count: session.len(),
        timestamp: now(),
    });

    let snapshot = session.snapshot();
    *review = Some(session);
    Ok(Json(snapshot))
}

/// GET /review
pub async fn get_review(State(state): State<AppState>) -> ApiResult<Json<ReviewSnapshot>> {
    let review = state.review.read().await;
    let session = review.as_ref().ok_or_else(no_session)?;
    Ok(Json(session.snapshot()))
}

/// GET /review/ready
pub async fn ready_items(State(state): State<AppState>) -> ApiResult<Json<Vec<ReviewItem>>> {
    let review = state.review.read().await;
    let session = review.as_ref().ok_or_else(no_session)?;
    Ok(Json(session.ready_items().into_iter().cloned().collect()))
}

/// POST /review/tiers/:tier
pub async fn apply_tier_action(
    State(state): State<AppState>,
    Path(tier): Path<String>,
    Json(request): Json<TierActionRequest>,
) -> ApiResult<Json<TierActionResponse>> {
    let tier: ConfidenceTier = tier.parse().map_err(ApiError::BadRequest)?;

    let mut review = state.review.write().await;
    let session = review.as_mut().ok_or_else(no_session)?;
    let affected = session.apply_tier_action(tier, request.action);

    Ok(Json(TierActionResponse {
        tier,
        action: request.action,
        affected,
        status_counts: session.status_counts(),
    }))
}

/// POST /review/items/:id/edit
pub async fn edit_item(
    State(state): State<AppState>,
    Path(id): Path<usize>,
    Json(request): Json<EditItemRequest>,
) -> ApiResult<Json<ReviewItem>> {
    let mut review = state.review.write().await;
    let session = review.as_mut().ok_or_else(no_session)?;
    let item = session.edit_item(id, &request.studio, &request.model)?;
    Ok(Json(item.clone()))
}

/// POST /review/items/:id/action
pub async fn item_action(
    State(state): State<AppState>,
    Path(id): Path<usize>,
    Json(request): Json<ItemActionRequest>,
) -> ApiResult<Json<ReviewItem>> {
    let mut review = state.review.write().await;
    let session = review.as_mut().ok_or_else(no_session)?;
    let item = session.item_action(id, request.action)?;
    Ok(Json(item.clone()))
}

/// POST /review/commit
pub async fn commit_review(State(state): State<AppState>) -> ApiResult<Json<ImportSummary>> {
    let _guard = state
        .import_lock
        .try_lock()
        .map_err(|_| ApiError::Conflict("Import already running".to_string()))?;

    let session = state.review.write().await.take().ok_or_else(no_session)?;
    let items = session.to_import_items();
    info!(
        session_id = %session.session_id(),
        ready = items.len(),
        "Committing review session"
    );

    let summary = state.executor.import_selected_albums(items).await;

    state.event_bus.emit_lossy(CatalogEvent::ReviewSessionClosed {
        session_id: session.session_id(),
        timestamp: now(),
    });

    Ok(Json(summary))
}

/// DELETE /review
pub async fn close_review(State(state): State<AppState>) -> ApiResult<Json<CloseReviewResponse>> {
    let session = state.review.write().await.take().ok_or_else(no_session)?;
    info!(session_id = %session.session_id(), "Review session discarded");

    state.event_bus.emit_lossy(CatalogEvent::ReviewSessionClosed {
        session_id: session.session_id(),
        timestamp: now(),
    });

    Ok(Json(CloseReviewResponse {
        session_id: session.session_id(),
    }))
}

pub fn review_routes() -> Router<AppState> {
    Router::new()
        .route("/review", get(get_review).delete(close_review))
        .route("/review/start", post(start_review))
        .route("/review/ready", get(ready_items))
        .route("/review/commit", post(commit_review))
        .route("/review/tiers/:tier", post(apply_tier_action))
        .route("/review/items/:id/edit", post(edit_item))
        .route("/review/items/:id/action", post(item_action))
}
