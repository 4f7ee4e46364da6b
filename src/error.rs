//! Error types for the content core

use thiserror::Error;

/// Failures surfaced by the listing aggregator, the detail assembler and
/// the content client.
#[derive(Error, Debug)]
pub enum Error {
    /// The content repository query failed (transport, status or body)
    #[error("content query failed: {0}")]
    UpstreamQuery(String),

    /// `load_next` was called on a page without a cursor
    #[error("no more pages to load")]
    NoMorePages,

    /// No document matched the requested uid
    #[error("post not found: {0}")]
    PostNotFound(String),

    /// A returned document is missing fields the projection requires
    #[error("malformed document {uid}: {reason}")]
    MalformedDocument { uid: String, reason: String },
}

impl Error {
    pub(crate) fn malformed(uid: &str, reason: impl Into<String>) -> Self {
        Self::MalformedDocument {
            uid: uid.to_string(),
            reason: reason.into(),
        }
    }
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        Self::UpstreamQuery(err.to_string())
    }
}

/// Result alias for the content core
pub type Result<T> = std::result::Result<T, Error>;
