//! Folder-name parsing endpoints
//!
//! POST /parse (exact form only), POST /parse/smart (full heuristics, with tier)

use axum::{extract::State, routing::post, Json, Router};
use serde::Deserialize;

use crate::{
    error::{ApiError, ApiResult},
    models::ParsedCandidate,
    AppState,
};

/// Parse request: one name or a list. Responses carry one candidate per name, in order.
#[derive(Debug, Deserialize)]
pub struct ParseRequest {
    #[serde(default)]
    pub folder_name: Option<String>,
    #[serde(default)]
    pub folder_names: Vec<String>,
}

impl ParseRequest {
    fn names(self) -> ApiResult<Vec<String>> {
        let mut names = self.folder_names;
        if let Some(name) = self.folder_name {
            names.insert(0, name);
        }
        if names.is_empty() {
            return Err(ApiError::BadRequest(
                "folder_name or folder_names is required".to_string(),
            ));
        }
        Ok(names)
    }
}

/// POST /parse
pub async fn parse_exact(
    State(state): State<AppState>,
    Json(request): Json<ParseRequest>,
) -> ApiResult<Json<Vec<ParsedCandidate>>> {
    let names = request.names()?;
    Ok(Json(
        names
            .iter()
            .map(|name| state.parser.parse_folder_name(name))
            .collect(),
    ))
}

/// POST /parse/smart
pub async fn parse_smart(
    State(state): State<AppState>,
    Json(request): Json<ParseRequest>,
) -> ApiResult<Json<Vec<ParsedCandidate>>> {
    let names = request.names()?;
    Ok(Json(
        names
            .iter()
            .map(|name| state.parser.smart_parse(name))
            .collect(),
    ))
}

pub fn parse_routes() -> Router<AppState> {
    Router::new()
        .route("/parse", post(parse_exact))
        .route("/parse/smart", post(parse_smart))
}
