//! Core error types for Scrollkeeper.
//!
//! Integration crates (GitHub, Telegram) convert their transport failures into
//! these variants so callers can match on the kind of failure instead of
//! inspecting messages.

use thiserror::Error;

/// Type alias for Result using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Root error type for the capture and sync core.
#[derive(Error, Debug)]
pub enum Error {
    #[error("Input validation failed: {0}")]
    Validation(String),

    #[error("Not found: {0}")]
    NotFound(String),

    /// Non-success answer from the remote document store. The upstream status
    /// and body are kept verbatim so the API layer can proxy them.
    #[error("Remote store returned {status}: {body}")]
    RemoteSync { status: u16, body: String },

    #[error("Chat platform error: {0}")]
    Chat(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Unexpected error: {0}")]
    Unexpected(String),
}

impl Error {
    pub fn remote_sync(status: u16, body: impl Into<String>) -> Self {
        Error::RemoteSync {
            status,
            body: body.into(),
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Serialization(err.to_string())
    }
}

impl From<serde_yaml::Error> for Error {
    fn from(err: serde_yaml::Error) -> Self {
        Error::Serialization(err.to_string())
    }
}
