use axum::{
    extract::{Query, State},
    Json,
};
use std::sync::Arc;
use std::time::Instant;

use super::types::*;
use crate::api::ApiResponse;
use crate::state::AppState;

/// GET /api/search - 全文搜索
pub async fn search(
    State(state): State<Arc<AppState>>,
    Query(req): Query<SearchQuery>,
) -> Json<ApiResponse<SearchResponse>> {
    let Some(index) = state.documents.as_ref() else {
        return Json(ApiResponse::error("Index not built"));
    };

    let query = req.q.trim();
    if query.is_empty() {
        return Json(ApiResponse::error("Search query must not be empty"));
    }

    let max_results = state.config.search.max_results;
    let limit = match req.limit.as_deref().and_then(|l| l.trim().parse::<i64>().ok()) {
        None => max_results,
        Some(n) if n <= 0 => {
            return Json(ApiResponse::success(SearchResponse {
                results: Vec::new(),
                total: 0,
                elapsed_ms: 0.0,
            }))
        }
        Some(n) => usize::try_from(n).map_or(max_results, |n| n.min(max_results)),
    };

    let started = Instant::now();
    match index.search(query, limit).await {
        Ok(results) => {
            let elapsed_ms = started.elapsed().as_secs_f64() * 1000.0;
            tracing::debug!(
                "Search '{}' returned {} results in {:.3} ms",
                query,
                results.len(),
                elapsed_ms
            );
            Json(ApiResponse::success(SearchResponse {
                total: results.len(),
                results,
                elapsed_ms,
            }))
        }
        Err(e) => {
            tracing::warn!("Search '{}' failed: {}", query, e);
            Json(ApiResponse::error("Invalid search query"))
        }
    }
}

/// GET /api/lucky - 随机文档
pub async fn lucky(State(state): State<Arc<AppState>>) -> Json<ApiResponse<LuckyResponse>> {
    let Some(index) = state.documents.as_ref() else {
        return Json(ApiResponse::error("Index not built"));
    };

    match index.random_path().await {
        Ok(Some(path)) => Json(ApiResponse::success(LuckyResponse { path })),
        Ok(None) => Json(ApiResponse::error("Index is empty")),
        Err(e) => {
            tracing::error!("Failed to pick a random document: {}", e);
            Json(ApiResponse::error("Failed to pick a random document"))
        }
    }
}
