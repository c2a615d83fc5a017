//! SQLite connection helper shared by the stores / SQLite 连接

use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous};
use sqlx::SqlitePool;
use std::path::Path;
use std::time::Duration;

use crate::error::Result;

/// Open a database file in WAL mode / 打开数据库（WAL模式）
///
/// With `create == false` a missing file is an error instead of a fresh
/// empty database; the service relies on that to notice an unbuilt index.
pub async fn open_sqlite(path: &Path, create: bool) -> Result<SqlitePool> {
    if create {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
    }

    let options = SqliteConnectOptions::new()
        .filename(path)
        .create_if_missing(create)
        .journal_mode(SqliteJournalMode::Wal)
        .busy_timeout(Duration::from_secs(10))
        .synchronous(SqliteSynchronous::Normal);

    let db = SqlitePoolOptions::new()
        .max_connections(4)
        .connect_with(options)
        .await?;

    tracing::debug!("Opened database {:?} (WAL mode)", path);
    Ok(db)
}
