use axum::{
    extract::{Query, State},
    Json,
};
use serde::Deserialize;
use std::sync::Arc;

use crate::state::AppState;

/// GET /predict 查询参数
///
/// `limit` is kept as text so a malformed value falls back to the default
/// instead of rejecting the request.
#[derive(Debug, Deserialize)]
pub struct PredictQuery {
    #[serde(default)]
    pub q: String,
    pub limit: Option<String>,
}

/// GET /predict - 自动补全
///
/// Always answers a bare JSON array; an empty trie answers `[]`.
pub async fn predict(
    State(state): State<Arc<AppState>>,
    Query(req): Query<PredictQuery>,
) -> Json<Vec<String>> {
    let limit = req.limit.as_deref().and_then(|l| l.trim().parse::<i64>().ok());
    Json(state.suggestions.suggest_last_word(&req.q, limit))
}
