// file: src/error.rs
// description: Custom error types and result type aliases
// reference: https://docs.rs/thiserror

use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, AssistError>;

#[derive(Error, Debug)]
pub enum AssistError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Request failed: {0}")]
    Http(String),

    #[error("Backend returned status {status}: {body}")]
    BackendStatus { status: u16, body: String },

    #[error("Failed to decode backend response: {0}")]
    Decode(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("File operation failed for {path}: {source}")]
    FileOperation {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<reqwest::Error> for AssistError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            AssistError::Decode(err.to_string())
        } else {
            AssistError::Http(err.to_string())
        }
    }
}

impl From<serde_json::Error> for AssistError {
    fn from(err: serde_json::Error) -> Self {
        AssistError::Serialization(err.to_string())
    }
}
