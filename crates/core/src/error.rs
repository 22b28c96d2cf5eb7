//! Error types for document extraction and evaluation.

use thiserror::Error;

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while extracting or scoring documents.
#[derive(Error, Debug)]
pub enum Error {
    /// Failed to open, read or write a file.
    #[error("Failed to read file: {0}")]
    IoError(#[from] std::io::Error),

    /// Failed to build a markup tree from HTML input.
    #[error("HTML parsing error: {0}")]
    HtmlError(String),

    /// Malformed TETML (XML) input.
    #[error("XML parsing error: {0}")]
    XmlError(String),

    /// JSON serialization or deserialization failure.
    #[error("JSON error: {0}")]
    JsonError(String),

    /// A line-delimited evaluation record could not be used.
    #[error("Invalid record at line {line}: {message}")]
    InvalidRecord { line: usize, message: String },

    /// A configuration value could not be interpreted.
    #[error("Invalid configuration: {0}")]
    ConfigError(String),
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::JsonError(err.to_string())
    }
}
