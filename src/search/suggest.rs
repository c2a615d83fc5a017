//! Autocomplete service / 联想服务
//!
//! Owns the trie built at startup from every persisted vocabulary row and
//! answers prefix queries against it. Loading never fails: a missing or
//! unreadable store leaves the trie empty and every query answers `[]`.

use std::path::Path;
use std::sync::Arc;

use super::tokenizer::Tokenizer;
use super::trie::Trie;
use super::vocabulary::VocabularyStore;
use crate::config::IndexMode;
use crate::error::Result;

/// Progress log interval while inserting words / 进度日志间隔
const PROGRESS_INTERVAL: usize = 1000;

/// Summary of one trie load / 加载统计
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoadReport {
    /// Rows read from the store
    pub rows: usize,
    /// Rows skipped because they were not valid UTF-8
    pub skipped_rows: usize,
    /// Distinct words in the trie
    pub words: usize,
}

/// Read every vocabulary row and insert its words / 从词表构建前缀树
///
/// A row that fails to decode is logged and skipped; the remaining rows
/// still load. Store errors are returned to the caller.
pub async fn build_trie(store: &VocabularyStore, tokenizer: &Tokenizer) -> Result<(Trie, LoadReport)> {
    let rows = store.load_rows().await?;
    let mut trie = Trie::new();
    let mut report = LoadReport {
        rows: rows.len(),
        ..Default::default()
    };

    for row in &rows {
        let label = format!("vocabulary row {}", row.id);
        let words = match tokenizer.tokenize_bytes(&row.bytes, &label) {
            Ok(words) => words,
            Err(e) => {
                tracing::warn!("Skipping {}", e);
                report.skipped_rows += 1;
                continue;
            }
        };

        for word in words {
            if trie.insert(&word) && trie.len() % PROGRESS_INTERVAL == 0 {
                tracing::debug!("Loaded {} words", trie.len());
            }
        }
    }

    report.words = trie.len();
    Ok((trie, report))
}

/// Query-time autocomplete entry point / 联想查询服务
#[derive(Clone)]
pub struct SuggestionService {
    trie: Arc<Trie>,
    tokenizer: Tokenizer,
    max_suggestions: usize,
}

impl SuggestionService {
    pub fn new(trie: Trie, tokenizer: Tokenizer, max_suggestions: usize) -> Self {
        Self {
            trie: Arc::new(trie),
            tokenizer,
            max_suggestions,
        }
    }

    /// Service with no vocabulary; every query answers nothing / 空服务
    pub fn empty(tokenizer: Tokenizer, max_suggestions: usize) -> Self {
        Self::new(Trie::new(), tokenizer, max_suggestions)
    }

    /// Build the trie from the vocabulary store at `path` / 启动时加载
    ///
    /// Blocks until every row is inserted. Any store failure degrades to an
    /// empty service instead of an error.
    pub async fn load(path: &Path, mode: IndexMode, min_token_len: usize, max_suggestions: usize) -> Self {
        let tokenizer = Tokenizer::new(min_token_len);

        let store = match VocabularyStore::open_existing(path, mode).await {
            Ok(store) => store,
            Err(e) => {
                tracing::warn!(
                    "Vocabulary store {:?} unavailable, autocomplete disabled: {}",
                    path,
                    e
                );
                return Self::empty(tokenizer, max_suggestions);
            }
        };

        let built = build_trie(&store, &tokenizer).await;
        store.close().await;

        match built {
            Ok((trie, report)) => {
                tracing::info!(
                    "Autocomplete ready: {} words from {} rows ({} skipped), {} nodes",
                    report.words,
                    report.rows,
                    report.skipped_rows,
                    trie.node_count()
                );
                Self::new(trie, tokenizer, max_suggestions)
            }
            Err(e) => {
                tracing::warn!("Failed to read vocabulary {:?}, autocomplete disabled: {}", path, e);
                Self::empty(tokenizer, max_suggestions)
            }
        }
    }

    /// Completions for `query` / 获取联想词
    ///
    /// `limit` defaults to the configured maximum and is clamped to it; zero
    /// or negative answers nothing.
    pub fn suggest(&self, query: &str, limit: Option<i64>) -> Vec<String> {
        let limit = match limit {
            None => self.max_suggestions,
            Some(n) if n <= 0 => return Vec::new(),
            Some(n) => usize::try_from(n).map_or(self.max_suggestions, |n| n.min(self.max_suggestions)),
        };

        let prefix = self.tokenizer.normalize_query(query);
        self.trie.collect_suggestions(&prefix, limit)
    }

    /// Complete only the last whitespace-separated word of `query` / 补全最后一个词
    pub fn suggest_last_word(&self, query: &str, limit: Option<i64>) -> Vec<String> {
        self.suggest(last_word(query), limit)
    }

    /// 已加载的单词数
    pub fn word_count(&self) -> usize {
        self.trie.len()
    }
}

/// Last whitespace-separated word, empty for a blank query
pub fn last_word(query: &str) -> &str {
    query.split_whitespace().next_back().unwrap_or("")
}
