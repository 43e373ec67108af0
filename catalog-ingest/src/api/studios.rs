//! Curated studio endpoints
//!
//! The import pipeline never creates studios; this is the only way they appear.

use axum::{extract::State, http::StatusCode, routing::get, Json, Router};
use catalog_common::db::Studio;
use serde::Deserialize;
use tracing::info;

use crate::{db, error::ApiResult, AppState};

#[derive(Debug, Deserialize)]
pub struct CreateStudioRequest {
    pub name: String,
}

/// GET /studios
pub async fn list_studios(State(state): State<AppState>) -> ApiResult<Json<Vec<Studio>>> {
    Ok(Json(db::studios::list_studios(&state.db).await?))
}

/// POST /studios
pub async fn create_studio(
    State(state): State<AppState>,
    Json(request): Json<CreateStudioRequest>,
) -> ApiResult<(StatusCode, Json<Studio>)> {
    let studio = db::studios::create_studio(&state.db, &request.name).await?;
    info!(studio_id = studio.id, name = %studio.name, "Studio created");
    Ok((StatusCode::CREATED, Json(studio)))
}

pub fn studio_routes() -> Router<AppState> {
    Router::new().route("/studios", get(list_studios).post(create_studio))
}
