pub mod search;
pub mod server;
pub mod suggest;

use axum::{routing::get, Router};
use serde::Serialize;
use std::path::Path;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, services::ServeDir, trace::TraceLayer};

use crate::state::AppState;

#[derive(Serialize)]
pub struct ApiResponse<T> {
    pub code: i32,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            code: 200,
            message: "success".to_string(),
            data: Some(data),
        }
    }

    pub fn error(message: &str) -> Self {
        Self {
            code: 400,
            message: message.to_string(),
            data: None,
        }
    }
}

/// Build the service router / 构建路由
///
/// Unmatched paths fall through to static files under `www_dir`.
pub fn build_router(state: Arc<AppState>, www_dir: &Path) -> Router {
    Router::new()
        .route("/predict", get(suggest::predict))
        .route("/api/search", get(search::search))
        .route("/api/lucky", get(search::lucky))
        .route("/api/health", get(server::health_check))
        .fallback_service(ServeDir::new(www_dir))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use docsearch::config::{AppConfig, IndexMode};
    use docsearch::search::{DocumentIndex, IndexedDocument, SuggestionService, Tokenizer, Trie};
    use serde_json::Value;
    use tower::ServiceExt;

    fn suggestions(max: usize) -> SuggestionService {
        let trie: Trie = ["apple", "application", "apply", "banana"].into_iter().collect();
        SuggestionService::new(trie, Tokenizer::new(5), max)
    }

    fn state(documents: Option<DocumentIndex>) -> Arc<AppState> {
        Arc::new(AppState {
            config: AppConfig::default(),
            mode: IndexMode::Html,
            documents,
            suggestions: suggestions(10),
        })
    }

    async fn documents(dir: &Path) -> DocumentIndex {
        let index = DocumentIndex::create(&dir.join("index.db"), IndexMode::Html)
            .await
            .unwrap();
        index
            .replace_all(&[
                IndexedDocument {
                    path: "/wiki/Apple.html".to_string(),
                    title: "Apple".to_string(),
                    content: "The apple is a sweet fruit".to_string(),
                },
                IndexedDocument {
                    path: "/wiki/Rust.html".to_string(),
                    title: "Rust".to_string(),
                    content: "Rust is a programming language".to_string(),
                },
            ])
            .await
            .unwrap();
        index
    }

    async fn get_json(router: Router, uri: &str) -> (StatusCode, Value) {
        let response = router
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn test_predict_returns_array() {
        let www = tempfile::tempdir().unwrap();
        let router = build_router(state(None), www.path());

        let (status, body) = get_json(router.clone(), "/predict?q=app").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, serde_json::json!(["apple", "application", "apply"]));

        let (_, body) = get_json(router.clone(), "/predict?q=green%20APP&limit=2").await;
        assert_eq!(body, serde_json::json!(["apple", "application"]));

        let (_, body) = get_json(router.clone(), "/predict?q=xyz").await;
        assert_eq!(body, serde_json::json!([]));
    }

    #[tokio::test]
    async fn test_predict_limit_edge_cases() {
        let www = tempfile::tempdir().unwrap();
        let router = build_router(state(None), www.path());

        for uri in ["/predict?q=app&limit=0", "/predict?q=app&limit=-4"] {
            let (status, body) = get_json(router.clone(), uri).await;
            assert_eq!(status, StatusCode::OK);
            assert_eq!(body, serde_json::json!([]));
        }

        let (status, body) = get_json(router.clone(), "/predict?q=app&limit=lots").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body.as_array().unwrap().len(), 3);

        let (_, body) = get_json(router, "/predict").await;
        assert_eq!(body.as_array().unwrap().len(), 4);
    }

    #[tokio::test]
    async fn test_predict_with_empty_trie() {
        let www = tempfile::tempdir().unwrap();
        let state = Arc::new(AppState {
            config: AppConfig::default(),
            mode: IndexMode::Html,
            documents: None,
            suggestions: SuggestionService::empty(Tokenizer::new(5), 10),
        });
        let (_, body) = get_json(build_router(state, www.path()), "/predict?q=app").await;
        assert_eq!(body, serde_json::json!([]));
    }

    #[tokio::test]
    async fn test_search_endpoint() {
        let dir = tempfile::tempdir().unwrap();
        let router = build_router(state(Some(documents(dir.path()).await)), dir.path());

        let (status, body) = get_json(router.clone(), "/api/search?q=fruit").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["code"], 200);
        assert_eq!(body["data"]["total"], 1);
        assert_eq!(body["data"]["results"][0]["path"], "/wiki/Apple.html");
        assert!(body["data"]["elapsed_ms"].as_f64().unwrap() >= 0.0);

        let (_, body) = get_json(router.clone(), "/api/search?q=%20").await;
        assert_eq!(body["code"], 400);

        let (_, body) = get_json(router, "/api/search?q=%22unbalanced").await;
        assert_eq!(body["code"], 400);
        assert!(body.get("data").is_none());
    }

    #[tokio::test]
    async fn test_search_limit_never_rejects_request() {
        let dir = tempfile::tempdir().unwrap();
        let router = build_router(state(Some(documents(dir.path()).await)), dir.path());

        for uri in ["/api/search?q=fruit&limit=-1", "/api/search?q=fruit&limit=0"] {
            let (status, body) = get_json(router.clone(), uri).await;
            assert_eq!(status, StatusCode::OK);
            assert_eq!(body["code"], 200);
            assert_eq!(body["data"]["total"], 0);
            assert_eq!(body["data"]["results"], serde_json::json!([]));
        }

        let (status, body) = get_json(router.clone(), "/api/search?q=fruit&limit=abc").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["code"], 200);
        assert_eq!(body["data"]["total"], 1);

        let (_, body) = get_json(router, "/api/search?q=rust%20OR%20apple&limit=1").await;
        assert_eq!(body["data"]["total"], 1);
    }

    #[tokio::test]
    async fn test_lucky_on_empty_index() {
        let dir = tempfile::tempdir().unwrap();
        let index = DocumentIndex::create(&dir.path().join("index.db"), IndexMode::Html)
            .await
            .unwrap();
        let router = build_router(state(Some(index)), dir.path());

        let (status, body) = get_json(router, "/api/lucky").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["code"], 400);
        assert_eq!(body["message"], "Index is empty");
        assert!(body.get("data").is_none());
    }

    #[tokio::test]
    async fn test_search_without_index() {
        let www = tempfile::tempdir().unwrap();
        let router = build_router(state(None), www.path());

        let (_, body) = get_json(router.clone(), "/api/search?q=fruit").await;
        assert_eq!(body["code"], 400);
        assert_eq!(body["message"], "Index not built");

        let (_, body) = get_json(router, "/api/lucky").await;
        assert_eq!(body["code"], 400);
    }

    #[tokio::test]
    async fn test_lucky_endpoint() {
        let dir = tempfile::tempdir().unwrap();
        let router = build_router(state(Some(documents(dir.path()).await)), dir.path());

        let (_, body) = get_json(router, "/api/lucky").await;
        assert_eq!(body["code"], 200);
        let path = body["data"]["path"].as_str().unwrap();
        assert!(path == "/wiki/Apple.html" || path == "/wiki/Rust.html");
    }

    #[tokio::test]
    async fn test_health_reports_words() {
        let www = tempfile::tempdir().unwrap();
        let (status, body) = get_json(build_router(state(None), www.path()), "/api/health").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
        assert_eq!(body["words"], 4);
        assert_eq!(body["mode"], "html");
        assert_eq!(body["search_enabled"], false);
        assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));
    }

    #[tokio::test]
    async fn test_static_fallback() {
        let www = tempfile::tempdir().unwrap();
        std::fs::write(www.path().join("index.html"), "<h1>home</h1>").unwrap();
        let router = build_router(state(None), www.path());

        let response = router
            .clone()
            .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert_eq!(&bytes[..], b"<h1>home</h1>");

        let response = router
            .oneshot(Request::builder().uri("/missing.css").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
