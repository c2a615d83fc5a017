use docsearch::config::{AppConfig, IndexMode};
use docsearch::search::{DocumentIndex, SuggestionService};

/// Shared service state / 服务共享状态
///
/// Everything here is read-only after startup.
pub struct AppState {
    pub config: AppConfig,
    pub mode: IndexMode,
    /// Full-text store, `None` when the index has not been built / 全文索引（可能未构建）
    pub documents: Option<DocumentIndex>,
    /// Autocomplete, possibly empty / 联想服务
    pub suggestions: SuggestionService,
}

impl AppState {
    /// Open the stores for `mode` / 打开索引
    ///
    /// Missing stores are logged and left out; startup continues.
    pub async fn load(config: AppConfig, mode: IndexMode) -> Self {
        let documents_path = config.get_document_db_path(mode);
        let documents = match DocumentIndex::open_existing(&documents_path, mode).await {
            Ok(index) => Some(index),
            Err(e) => {
                tracing::warn!("Document index {:?} unavailable, search disabled: {}", documents_path, e);
                None
            }
        };

        let suggestions = SuggestionService::load(
            &config.get_vocab_db_path(mode),
            mode,
            config.search.min_token_len,
            config.search.max_suggestions,
        )
        .await;

        Self {
            config,
            mode,
            documents,
            suggestions,
        }
    }
}
