use serde::{Deserialize, Serialize};

use docsearch::search::SearchHit;

/// GET /api/search 查询参数
///
/// `limit` is kept as text, a malformed value falls back to the default.
#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    #[serde(default)]
    pub q: String,
    pub limit: Option<String>,
}

/// 搜索响应
#[derive(Debug, Serialize)]
pub struct SearchResponse {
    pub results: Vec<SearchHit>,
    pub total: usize,
    /// Query time in milliseconds / 查询耗时
    pub elapsed_ms: f64,
}

/// 随机文档
#[derive(Debug, Serialize)]
pub struct LuckyResponse {
    pub path: String,
}
