pub mod config;
pub mod db;
pub mod error;
pub mod indexer;
pub mod search;

pub use error::{Result, SearchError};
