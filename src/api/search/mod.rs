//! Full-text search API / 全文搜索接口

mod query;
mod types;

pub use query::{lucky, search};
