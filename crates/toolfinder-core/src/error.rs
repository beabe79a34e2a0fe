use thiserror::Error;
use toolfinder_api::ApiError;

use crate::models::ResponseError;

/// All the ways a search run can go wrong
#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Read(#[from] ReadError),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Task failed: {0}")]
    TaskFailed(String),
}

/// Failures while reading search pages
///
/// Everything except `Transport` belongs to the "read error" family and
/// renders with a `read error` suffix. API error lists are kept as a chain of
/// `Entry` values around the `Api` base, built by [`ReadError::from_entries`].
#[derive(Error, Debug)]
pub enum ReadError {
    #[error(transparent)]
    Transport(#[from] ApiError),

    #[error("{message}: read error")]
    Message { message: String },

    #[error("api error: read error")]
    Api,

    #[error("{kind} - {message}: {source}")]
    Entry {
        kind: String,
        message: String,
        #[source]
        source: Box<ReadError>,
    },

    #[error("output stream closed: read error")]
    OutputClosed,
}

impl ReadError {
    pub fn message(message: impl Into<String>) -> Self {
        ReadError::Message {
            message: message.into(),
        }
    }

    /// Fold API error entries around the base error in listed order
    ///
    /// Each entry wraps everything before it, so the rendered text names the
    /// last entry first: `T2 - M2: T1 - M1: api error: read error`.
    pub fn from_entries(entries: &[ResponseError]) -> Self {
        entries
            .iter()
            .fold(ReadError::Api, |cause, entry| ReadError::Entry {
                kind: entry.kind.clone(),
                message: entry.message.clone(),
                source: Box::new(cause),
            })
    }

    pub fn is_read_error(&self) -> bool {
        !matches!(self, ReadError::Transport(_))
    }
}
