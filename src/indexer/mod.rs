//! Offline corpus indexer / 语料索引器
//!
//! One sequential pass over a directory tree:
//! - every accepted file becomes an [`IndexedDocument`]
//! - every document's text feeds the run's [`Vocabulary`]
//! - the document store is replaced, then the vocabulary is appended as one row
//!
//! Files that cannot be read or decoded are logged and skipped.

use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::config::{AppConfig, IndexMode};
use crate::error::{Result, SearchError};
use crate::search::db_index::{DocumentIndex, IndexedDocument};
use crate::search::html::{extract_title, strip_html, DEFAULT_TITLE};
use crate::search::tokenizer::Tokenizer;
use crate::search::vocabulary::{Vocabulary, VocabularyStore};

/// Image extensions accepted in image mode / 图片扩展名
const IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg"];

/// Result of one indexing run / 索引统计
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IndexReport {
    /// Documents written to the store
    pub processed: usize,
    /// Accepted files that could not be read or decoded
    pub skipped: usize,
    /// Distinct words in the appended vocabulary row
    pub words: usize,
}

/// Corpus indexer / 索引器
pub struct Indexer {
    mode: IndexMode,
    tokenizer: Tokenizer,
    data_dir: PathBuf,
}

impl Indexer {
    pub fn new(mode: IndexMode, min_token_len: usize, data_dir: impl Into<PathBuf>) -> Self {
        Self {
            mode,
            tokenizer: Tokenizer::new(min_token_len),
            data_dir: data_dir.into(),
        }
    }

    /// Indexer using the configured threshold and data directory
    pub fn from_config(config: &AppConfig, mode: IndexMode) -> Self {
        Self::new(mode, config.search.min_token_len, config.get_data_dir())
    }

    /// Whether a file belongs to this mode's corpus (extension, case-insensitive)
    fn accepts(&self, path: &Path) -> bool {
        let Some(ext) = path.extension().and_then(|e| e.to_str()) else {
            return false;
        };
        let ext = ext.to_ascii_lowercase();
        match self.mode {
            IndexMode::Html => ext == "html",
            IndexMode::Images => IMAGE_EXTENSIONS.contains(&ext.as_str()),
        }
    }

    /// Turn one file into a document / 读取单个文档
    pub fn read_document(&self, path: &Path) -> Result<IndexedDocument> {
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let url = format!("{}{}", self.mode.url_prefix(), file_name);

        match self.mode {
            IndexMode::Html => {
                let bytes = std::fs::read(path)?;
                let html = std::str::from_utf8(&bytes)
                    .map_err(|e| SearchError::decode(path.display().to_string(), e))?;
                Ok(IndexedDocument {
                    path: url,
                    title: extract_title(html).unwrap_or_else(|| DEFAULT_TITLE.to_string()),
                    content: strip_html(html),
                })
            }
            IndexMode::Images => {
                let stem = path
                    .file_stem()
                    .map(|s| s.to_string_lossy().into_owned())
                    .unwrap_or_default();
                Ok(IndexedDocument {
                    path: url,
                    title: stem.clone(),
                    content: stem,
                })
            }
        }
    }

    /// Walk the corpus and read every accepted file / 遍历语料目录
    ///
    /// Returns the documents in file-name order and the number of skipped files.
    pub fn collect_documents(&self, corpus: &Path) -> (Vec<IndexedDocument>, usize) {
        let mut documents = Vec::new();
        let mut skipped = 0;

        for entry in WalkDir::new(corpus).sort_by_file_name() {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    tracing::warn!("Failed to walk {:?}: {}", corpus, e);
                    continue;
                }
            };
            if !entry.file_type().is_file() || !self.accepts(entry.path()) {
                continue;
            }

            match self.read_document(entry.path()) {
                Ok(doc) => documents.push(doc),
                Err(e) => {
                    tracing::warn!("Skipping {:?}: {}", entry.path(), e);
                    skipped += 1;
                }
            }
        }

        (documents, skipped)
    }

    /// Index `corpus` and commit to both stores / 执行索引
    pub async fn run(&self, corpus: &Path) -> Result<IndexReport> {
        if !corpus.is_dir() {
            return Err(SearchError::Io(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                format!("corpus directory not found: {}", corpus.display()),
            )));
        }
        tracing::info!("Indexing {:?} ({:?} mode)", corpus, self.mode);

        let (documents, skipped) = self.collect_documents(corpus);

        let mut vocabulary = Vocabulary::new();
        // Body text already carries the page title
        for doc in &documents {
            vocabulary.add_text(&self.tokenizer, &doc.content);
        }

        let index = DocumentIndex::create(&self.data_dir.join(self.mode.document_db_file()), self.mode).await?;
        index.replace_all(&documents).await?;
        index.close().await;

        // Documents are committed at this point; a failure below leaves the
        // vocabulary one run behind until the next successful run
        let vocab_path = self.data_dir.join(self.mode.vocab_db_file());
        let appended = match VocabularyStore::create(&vocab_path, self.mode).await {
            Ok(store) => {
                let result = store.append(&vocabulary).await;
                store.close().await;
                result
            }
            Err(e) => Err(e),
        };
        if let Err(e) = appended {
            tracing::warn!(
                "Document index replaced ({} documents) but vocabulary {:?} was not updated, autocomplete is stale until the next run: {}",
                documents.len(),
                vocab_path,
                e
            );
            return Err(e);
        }

        let report = IndexReport {
            processed: documents.len(),
            skipped,
            words: vocabulary.len(),
        };
        tracing::info!(
            "Indexing completed, {} documents ({} skipped), {} words",
            report.processed,
            report.skipped,
            report.words
        );
        Ok(report)
    }
}
