//! Application configuration module / 应用配置模块
//!
//! Manages configuration loaded from config.json
//! Creates default config file on first run / 首次运行时创建默认配置文件

use once_cell::sync::OnceCell;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::error::{Result, SearchError};

/// Minimum token length shared by the indexer and the trie loader / 最小词长
pub const DEFAULT_MIN_TOKEN_LEN: usize = 5;

/// Environment override for the data directory / 数据目录环境变量
pub const DATA_DIR_ENV: &str = "DOCSEARCH_DATA_DIR";

/// Global configuration instance / 全局配置实例
static CONFIG: OnceCell<Arc<RwLock<AppConfig>>> = OnceCell::new();

/// Application configuration / 应用配置
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Server configuration / 服务器配置
    #[serde(default)]
    pub server: ServerConfig,
    /// Database configuration / 数据库配置
    #[serde(default)]
    pub database: DatabaseConfig,
    /// Search configuration / 搜索配置
    #[serde(default)]
    pub search: SearchConfig,
}

/// Server configuration / 服务器配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Server host address / 服务器监听地址
    pub host: String,
    /// Server port / 服务器端口
    pub port: u16,
    /// Static site root served as fallback / 静态文件目录
    pub www_dir: String,
}

/// Database configuration / 数据库配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// Data directory path / 数据目录路径
    pub data_dir: String,
}

/// Search configuration / 搜索配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchConfig {
    /// Words shorter than this are never indexed nor loaded / 最小词长
    pub min_token_len: usize,
    /// Upper bound for one autocomplete answer / 最大联想数
    pub max_suggestions: usize,
    /// Upper bound for one full-text answer / 最大搜索结果数
    pub max_results: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8000,
            www_dir: "www".to_string(),
        }
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            data_dir: "data".to_string(),
        }
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            min_token_len: DEFAULT_MIN_TOKEN_LEN,
            max_suggestions: 10,
            max_results: 100,
        }
    }
}

/// Which corpus a store belongs to / 索引模式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IndexMode {
    #[default]
    Html,
    Images,
}

impl IndexMode {
    /// Full-text database file name / 全文数据库文件名
    pub fn document_db_file(self) -> &'static str {
        match self {
            Self::Html => "index.db",
            Self::Images => "images.db",
        }
    }

    /// FTS5 table name / 全文表名
    pub fn document_table(self) -> &'static str {
        match self {
            Self::Html => "webpage_index",
            Self::Images => "images_index",
        }
    }

    /// Vocabulary database file name / 词表数据库文件名
    pub fn vocab_db_file(self) -> &'static str {
        match self {
            Self::Html => "index_vocab.db",
            Self::Images => "images_vocab.db",
        }
    }

    /// Vocabulary table name / 词表表名
    pub fn vocab_table(self) -> &'static str {
        match self {
            Self::Html => "webpage_vocab",
            Self::Images => "images_vocab",
        }
    }

    /// Path prefix recorded for indexed documents / 文档路径前缀
    pub fn url_prefix(self) -> &'static str {
        match self {
            Self::Html => "/wiki/",
            Self::Images => "/special/",
        }
    }
}

impl std::str::FromStr for IndexMode {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "html" => Ok(Self::Html),
            "images" => Ok(Self::Images),
            other => Err(format!("unknown mode '{}', expected html or images", other)),
        }
    }
}

impl std::fmt::Display for IndexMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Html => f.write_str("html"),
            Self::Images => f.write_str("images"),
        }
    }
}

impl AppConfig {
    /// Get the full data directory path / 获取完整的数据目录路径
    pub fn get_data_dir(&self) -> PathBuf {
        std::env::var(DATA_DIR_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(&self.database.data_dir))
    }

    /// Full-text database path for a mode / 全文数据库路径
    pub fn get_document_db_path(&self, mode: IndexMode) -> PathBuf {
        self.get_data_dir().join(mode.document_db_file())
    }

    /// Vocabulary database path for a mode / 词表数据库路径
    pub fn get_vocab_db_path(&self, mode: IndexMode) -> PathBuf {
        self.get_data_dir().join(mode.vocab_db_file())
    }

    /// Get the server bind address / 获取服务器绑定地址
    pub fn get_bind_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }

    fn validate(&self) -> Result<()> {
        if self.search.min_token_len == 0 {
            return Err(SearchError::Config(
                "search.min_token_len must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

/// Get the config file path / 获取配置文件路径
fn get_config_path() -> PathBuf {
    std::env::current_dir()
        .unwrap_or_else(|_| PathBuf::from("."))
        .join("config.json")
}

/// Load configuration from the working directory, creating a default one if missing
pub fn load_config() -> Result<AppConfig> {
    load_config_from(&get_config_path())
}

/// Load configuration from file, or create default if not exists / 加载配置文件，不存在则创建默认配置
pub fn load_config_from(config_path: &Path) -> Result<AppConfig> {
    if config_path.exists() {
        let content = std::fs::read_to_string(config_path)?;
        let config: AppConfig = serde_json::from_str(&content)
            .map_err(|e| SearchError::Config(format!("Failed to parse config file: {}", e)))?;
        config.validate()?;

        tracing::info!("Loaded configuration from {:?}", config_path);
        Ok(config)
    } else {
        let config = AppConfig::default();
        save_config_to(&config, config_path)?;
        tracing::info!("Created default configuration at {:?}", config_path);
        Ok(config)
    }
}

/// Save configuration to file / 保存配置到文件
pub fn save_config_to(config: &AppConfig, config_path: &Path) -> Result<()> {
    let content = serde_json::to_string_pretty(config)
        .map_err(|e| SearchError::Config(format!("Failed to serialize config: {}", e)))?;
    std::fs::write(config_path, content)?;
    Ok(())
}

/// Initialize global configuration / 初始化全局配置
pub fn init_config() -> Result<Arc<RwLock<AppConfig>>> {
    let config_arc = Arc::new(RwLock::new(load_config()?));

    CONFIG
        .set(config_arc.clone())
        .map_err(|_| SearchError::Config("Config already initialized".to_string()))?;

    Ok(config_arc)
}

/// Get global configuration instance / 获取全局配置实例
pub fn get_config() -> Arc<RwLock<AppConfig>> {
    CONFIG
        .get_or_init(|| {
            let config = load_config().unwrap_or_default();
            Arc::new(RwLock::new(config))
        })
        .clone()
}

/// Get a read-only snapshot of current config / 获取当前配置的只读快照
pub fn config() -> AppConfig {
    get_config().read().clone()
}
