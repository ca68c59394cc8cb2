//! Error types shared by the store, forms, and scorers.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, AppraisalError>;

#[derive(Error, Debug)]
pub enum AppraisalError {
    /// Storage slot could not be read or written
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Payload could not be (de)serialized
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Transport-level failure talking to the appraisal backend
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Backend answered with a non-success status
    #[error("Backend returned {status}: {message}")]
    Backend { status: u16, message: String },

    /// Unknown field, or a value the field cannot hold
    #[error("Invalid field '{field}' on {entry}")]
    InvalidField { entry: &'static str, field: String },

    #[error("No entry with id {0}")]
    EntryNotFound(String),

    #[error("Authentication failed: {0}")]
    Auth(String),

    #[error("Configuration error: {0}")]
    Config(String),
}
