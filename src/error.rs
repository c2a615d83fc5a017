//! Crate error type / 错误类型

use thiserror::Error;

/// Errors raised by the indexer, the stores and the suggestion loader
#[derive(Debug, Error)]
pub enum SearchError {
    /// Input bytes were not valid UTF-8 / 无效的 UTF-8
    #[error("failed to decode {source_name}: {source}")]
    Decode {
        source_name: String,
        #[source]
        source: std::str::Utf8Error,
    },

    /// SQLite failure / 数据库错误
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// File system failure / 文件系统错误
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Invalid or unreadable configuration / 配置错误
    #[error("configuration error: {0}")]
    Config(String),
}

impl SearchError {
    pub(crate) fn decode(source_name: impl Into<String>, source: std::str::Utf8Error) -> Self {
        Self::Decode {
            source_name: source_name.into(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, SearchError>;
