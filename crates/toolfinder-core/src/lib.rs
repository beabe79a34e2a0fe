// Search GitHub repositories page by page and stream them out as CSV
pub mod config;
pub mod error;
pub mod export;
pub mod models;
pub mod query;
pub mod reader;
pub mod search;

#[cfg(test)]
mod testing;

pub use config::Config;
pub use error::{Error, ReadError};
pub use export::CsvWriter;
pub use models::Repository;
pub use reader::{RepositoryReader, DEFAULT_PAGE_SIZE};
pub use search::{search_to_csv, SearchOptions};

/// Result type alias because typing Result<T, Error> everywhere is tedious
pub type Result<T> = std::result::Result<T, Error>;
