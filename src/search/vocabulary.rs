//! Vocabulary set and its persisted rows / 词表
//!
//! Each indexing run appends one row holding the run's words joined by a
//! single space. Words are alphabetic-only, so the separator can never
//! appear inside one. The service reads every row back at startup.

use sqlx::{Pool, Row, Sqlite};
use std::collections::BTreeSet;
use std::path::Path;

use super::tokenizer::{CharFolding, Tokenizer};
use crate::config::IndexMode;
use crate::db::open_sqlite;
use crate::error::Result;

/// Separator between words in a persisted row / 词分隔符
pub const SEPARATOR: char = ' ';

/// Deduplicated word set of one indexing run / 词表
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Vocabulary {
    words: BTreeSet<String>,
}

impl Vocabulary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add one word, returns true if it was new
    pub fn insert(&mut self, word: impl Into<String>) -> bool {
        self.words.insert(word.into())
    }

    /// Tokenize a document and merge its words / 合并文档中的词
    ///
    /// Returns how many words were new to this vocabulary.
    pub fn add_text<F: CharFolding>(&mut self, tokenizer: &Tokenizer<F>, text: &str) -> usize {
        let mut added = 0;
        tokenizer.for_each_word(text, |word| {
            if self.words.insert(word) {
                added += 1;
            }
        });
        added
    }

    pub fn contains(&self, word: &str) -> bool {
        self.words.contains(word)
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    /// Words in ascending order / 有序遍历
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.words.iter().map(String::as_str)
    }

    /// Single-row form: words joined by [`SEPARATOR`] / 序列化
    pub fn serialize(&self) -> String {
        let mut row = String::with_capacity(self.words.iter().map(|w| w.len() + 1).sum());
        for (i, word) in self.words.iter().enumerate() {
            if i > 0 {
                row.push(SEPARATOR);
            }
            row.push_str(word);
        }
        row
    }

    /// Rebuild from a persisted row / 反序列化
    ///
    /// The row is re-tokenized, so words below the tokenizer's threshold are
    /// dropped even if an older run stored them.
    pub fn from_row<F: CharFolding>(tokenizer: &Tokenizer<F>, row: &str) -> Self {
        let mut vocabulary = Self::new();
        vocabulary.add_text(tokenizer, row);
        vocabulary
    }
}

impl<S: Into<String>> FromIterator<S> for Vocabulary {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self {
            words: iter.into_iter().map(Into::into).collect(),
        }
    }
}

impl<S: Into<String>> Extend<S> for Vocabulary {
    fn extend<I: IntoIterator<Item = S>>(&mut self, iter: I) {
        self.words.extend(iter.into_iter().map(Into::into));
    }
}

/// One raw vocabulary row, undecoded / 原始词表行
#[derive(Debug, Clone)]
pub struct VocabularyRow {
    pub id: i64,
    pub bytes: Vec<u8>,
}

/// Persisted vocabulary table / 词表存储
pub struct VocabularyStore {
    db: Pool<Sqlite>,
    table: &'static str,
}

impl VocabularyStore {
    /// Open for writing, creating the file and table if needed / 打开（可创建）
    pub async fn create(path: &Path, mode: IndexMode) -> Result<Self> {
        let store = Self {
            db: open_sqlite(path, true).await?,
            table: mode.vocab_table(),
        };
        store.init().await?;
        Ok(store)
    }

    /// Open an existing store; a missing file is an error / 打开已有词表
    pub async fn open_existing(path: &Path, mode: IndexMode) -> Result<Self> {
        Ok(Self {
            db: open_sqlite(path, false).await?,
            table: mode.vocab_table(),
        })
    }

    /// Create the table if missing / 初始化表结构
    pub async fn init(&self) -> Result<()> {
        sqlx::query(&format!(
            "CREATE TABLE IF NOT EXISTS {} (
                vocabulary TEXT NOT NULL,
                created_at TEXT
            )",
            self.table
        ))
        .execute(&self.db)
        .await?;
        Ok(())
    }

    /// Append one run's vocabulary as a new row, returns its rowid / 追加一行
    pub async fn append(&self, vocabulary: &Vocabulary) -> Result<i64> {
        let result = sqlx::query(&format!(
            "INSERT INTO {} (vocabulary, created_at) VALUES (?, ?)",
            self.table
        ))
        .bind(vocabulary.serialize())
        .bind(chrono::Utc::now().to_rfc3339())
        .execute(&self.db)
        .await?;
        Ok(result.last_insert_rowid())
    }

    /// Raw bytes of every row, oldest first / 读取所有行
    ///
    /// Rows are returned undecoded so a malformed one can be skipped on its own.
    pub async fn load_rows(&self) -> Result<Vec<VocabularyRow>> {
        let rows = sqlx::query(&format!(
            "SELECT rowid AS id, CAST(vocabulary AS BLOB) AS bytes FROM {} ORDER BY rowid",
            self.table
        ))
        .fetch_all(&self.db)
        .await?;

        let rows = rows
            .iter()
            .map(|row| {
                Ok(VocabularyRow {
                    id: row.try_get("id")?,
                    bytes: row.try_get::<Option<Vec<u8>>, _>("bytes")?.unwrap_or_default(),
                })
            })
            .collect::<std::result::Result<Vec<_>, sqlx::Error>>()?;
        Ok(rows)
    }

    pub async fn row_count(&self) -> Result<i64> {
        let (count,): (i64,) = sqlx::query_as(&format!("SELECT COUNT(*) FROM {}", self.table))
            .fetch_one(&self.db)
            .await?;
        Ok(count)
    }

    /// Close database connection pool / 关闭连接池
    pub async fn close(&self) {
        self.db.close().await;
    }

    #[cfg(test)]
    pub(crate) async fn insert_raw(&self, bytes: &[u8]) -> Result<()> {
        sqlx::query(&format!("INSERT INTO {} (vocabulary) VALUES (CAST(? AS TEXT))", self.table))
            .bind(bytes)
            .execute(&self.db)
            .await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::search::tokenizer::Tokenizer;

    #[test]
    fn test_serialize_single_spaces() {
        let vocabulary: Vocabulary = ["gamma", "alpha", "beta", "alpha"].into_iter().collect();
        assert_eq!(vocabulary.len(), 3);
        assert_eq!(vocabulary.serialize(), "alpha beta gamma");
        assert_eq!(Vocabulary::new().serialize(), "");
    }

    #[test]
    fn test_add_text_deduplicates() {
        let tokenizer = Tokenizer::new(5);
        let mut vocabulary = Vocabulary::new();
        assert_eq!(vocabulary.add_text(&tokenizer, "Quick quick QUICK brown"), 2);
        assert_eq!(vocabulary.add_text(&tokenizer, "brown jumps"), 1);
        assert!(vocabulary.contains("quick"));
        assert!(!vocabulary.contains("QUICK"));
    }

    #[test]
    fn test_row_round_trip() {
        let tokenizer = Tokenizer::new(5);
        let mut vocabulary = Vocabulary::new();
        vocabulary.add_text(&tokenizer, "Árboles y canciones del mundo: zebras, apples!");

        let restored = Vocabulary::from_row(&tokenizer, &vocabulary.serialize());
        assert_eq!(restored, vocabulary);
    }

    #[test]
    fn test_row_refiltered_with_threshold() {
        let row = "cat house mouse elephant";
        let restored = Vocabulary::from_row(&Tokenizer::new(5), row);
        assert_eq!(restored.iter().collect::<Vec<_>>(), vec!["elephant", "house", "mouse"]);
    }

    #[tokio::test]
    async fn test_store_appends_rows() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("vocab.db");
        let store = VocabularyStore::create(&path, IndexMode::Html).await.unwrap();

        let first: Vocabulary = ["apple", "banana"].into_iter().collect();
        let second: Vocabulary = ["cherry"].into_iter().collect();
        store.append(&first).await.unwrap();
        store.append(&second).await.unwrap();

        let rows = store.load_rows().await.unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].bytes, b"apple banana");
        assert_eq!(rows[1].bytes, b"cherry");
        assert_eq!(store.row_count().await.unwrap(), 2);
        store.close().await;
    }

    #[tokio::test]
    async fn test_open_existing_missing_file_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.db");
        assert!(VocabularyStore::open_existing(&path, IndexMode::Html).await.is_err());
        assert!(!path.exists());
    }
}
