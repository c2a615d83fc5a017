//! Full-text document store - SQLite FTS5 / 全文索引
//!
//! Ranking and query matching are left entirely to FTS5 (`bm25`,
//! `snippet`). This module only creates the table, fills it and runs the
//! queries the service needs.
//!
//! 存储方案：
//! - one database file per mode (`index.db` / `images.db`)
//! - one FTS5 table `(path UNINDEXED, title, content)`
//! - a run replaces all rows inside a single transaction

use serde::Serialize;
use sqlx::{Pool, Row, Sqlite};
use std::path::Path;

use crate::config::IndexMode;
use crate::db::open_sqlite;
use crate::error::Result;

/// Document handed to the store / 待索引文档
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexedDocument {
    pub path: String,
    pub title: String,
    pub content: String,
}

/// 搜索结果
#[derive(Debug, Clone, Serialize)]
pub struct SearchHit {
    pub path: String,
    pub title: String,
    pub snippet: String,
    /// bm25 score, lower is better / 越小越相关
    pub rank: f64,
}

/// Full-text document index / 全文索引
pub struct DocumentIndex {
    db: Pool<Sqlite>,
    table: &'static str,
}

impl DocumentIndex {
    /// Open for writing, creating the file and table if needed / 打开（可创建）
    pub async fn create(path: &Path, mode: IndexMode) -> Result<Self> {
        let index = Self {
            db: open_sqlite(path, true).await?,
            table: mode.document_table(),
        };
        index.init().await?;
        tracing::info!("Document index ready: {:?} ({})", path, index.table);
        Ok(index)
    }

    /// Open an existing index; a missing file is an error / 打开已有索引
    pub async fn open_existing(path: &Path, mode: IndexMode) -> Result<Self> {
        Ok(Self {
            db: open_sqlite(path, false).await?,
            table: mode.document_table(),
        })
    }

    /// 初始化表结构（只在表不存在时创建）
    pub async fn init(&self) -> Result<()> {
        sqlx::query(&format!(
            "CREATE VIRTUAL TABLE IF NOT EXISTS {} USING fts5(path UNINDEXED, title, content)",
            self.table
        ))
        .execute(&self.db)
        .await?;
        Ok(())
    }

    /// 清空索引
    pub async fn clear(&self) -> Result<()> {
        sqlx::query(&format!("DELETE FROM {}", self.table))
            .execute(&self.db)
            .await?;
        Ok(())
    }

    /// Replace every row with `documents` in one transaction / 整体替换
    pub async fn replace_all(&self, documents: &[IndexedDocument]) -> Result<()> {
        let mut tx = self.db.begin().await?;

        sqlx::query(&format!("DELETE FROM {}", self.table))
            .execute(&mut *tx)
            .await?;
        self.insert_in(&mut tx, documents).await?;

        tx.commit().await?;
        Ok(())
    }

    /// 批量插入
    pub async fn insert_batch(&self, documents: &[IndexedDocument]) -> Result<()> {
        if documents.is_empty() {
            return Ok(());
        }
        let mut tx = self.db.begin().await?;
        self.insert_in(&mut tx, documents).await?;
        tx.commit().await?;
        Ok(())
    }

    async fn insert_in(
        &self,
        tx: &mut sqlx::Transaction<'_, Sqlite>,
        documents: &[IndexedDocument],
    ) -> Result<()> {
        let sql = format!(
            "INSERT INTO {} (path, title, content) VALUES (?, ?, ?)",
            self.table
        );
        for doc in documents {
            sqlx::query(&sql)
                .bind(&doc.path)
                .bind(&doc.title)
                .bind(&doc.content)
                .execute(&mut **tx)
                .await?;
        }
        Ok(())
    }

    /// Full-text query, best matches first / 全文搜索
    ///
    /// `query` uses FTS5 query syntax; a syntax error is returned as a
    /// database error.
    pub async fn search(&self, query: &str, limit: usize) -> Result<Vec<SearchHit>> {
        let rows = sqlx::query(&format!(
            "SELECT path, title, snippet({t}, 2, '<b>', '</b>', '...', 30) AS snippet, bm25({t}) AS score
             FROM {t} WHERE {t} MATCH ? ORDER BY score ASC LIMIT ?",
            t = self.table
        ))
        .bind(query)
        .bind(limit as i64)
        .fetch_all(&self.db)
        .await?;

        let mut hits = Vec::with_capacity(rows.len());
        for row in &rows {
            hits.push(SearchHit {
                path: row.try_get("path")?,
                title: row.try_get("title")?,
                snippet: row.try_get::<Option<String>, _>("snippet")?.unwrap_or_default(),
                rank: row.try_get("score")?,
            });
        }
        Ok(hits)
    }

    /// Path of a random document, `None` when the index is empty / 随机文档
    pub async fn random_path(&self) -> Result<Option<String>> {
        let row: Option<(String,)> = sqlx::query_as(&format!(
            "SELECT path FROM {t} WHERE rowid >= (ABS(RANDOM()) % (SELECT MAX(rowid) FROM {t})) LIMIT 1",
            t = self.table
        ))
        .fetch_optional(&self.db)
        .await?;
        Ok(row.map(|(path,)| path))
    }

    /// 文档数量
    pub async fn count(&self) -> Result<i64> {
        let (count,): (i64,) = sqlx::query_as(&format!("SELECT COUNT(*) FROM {}", self.table))
            .fetch_one(&self.db)
            .await?;
        Ok(count)
    }

    /// Close database connection pool / 关闭数据库连接池
    pub async fn close(&self) {
        self.db.close().await;
    }
}
