//! Search module - autocomplete and full-text primitives / 搜索模块
//!
//! Architecture principles / 架构原则：
//! - Search module only exposes primitive operations: tokenize, insert, suggest, query
//! - The indexer and the HTTP layer control the flow
//! - Call direction: Indexer / API → Search (unidirectional) / 调用方向
//!
//! Components / 组件：
//! - `tokenizer`: lowercase alphabetic words above a minimum length
//! - `trie`: in-memory prefix tree answering bounded completions
//! - `vocabulary`: per-run word set and its persisted rows
//! - `suggest`: trie loaded from the vocabulary store at startup
//! - `db_index`: SQLite FTS5 document store for full-text results

pub mod db_index;
pub mod html;
pub mod suggest;
pub mod tokenizer;
pub mod trie;
pub mod vocabulary;

pub use db_index::{DocumentIndex, IndexedDocument, SearchHit};
pub use suggest::{LoadReport, SuggestionService};
pub use tokenizer::{CharFolding, SimpleFolding, Tokenizer};
pub use trie::{Trie, TrieNode};
pub use vocabulary::{Vocabulary, VocabularyStore};
