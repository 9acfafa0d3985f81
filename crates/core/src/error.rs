//! Error types for deck generation.

use thiserror::Error;

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while generating a presentation.
#[derive(Error, Debug)]
pub enum Error {
    /// The requested topic was empty or whitespace only.
    #[error("Please enter a valid topic.")]
    EmptyTopic,

    /// Failed to read or write a file.
    #[error("File error: {0}")]
    IoError(#[from] std::io::Error),

    /// The knowledge source could not be reached.
    #[error("Failed to fetch article: {0}")]
    FetchError(String),

    /// The knowledge source answered with something we could not understand.
    #[error("Unexpected response from knowledge source: {0}")]
    SourceError(String),

    /// ZIP archive error (for PPTX).
    #[error("ZIP error: {0}")]
    ZipError(String),

    /// XML writing or parsing error (for PPTX).
    #[error("XML error: {0}")]
    XmlError(String),

    /// Failed to parse an existing PPTX file.
    #[error("PPTX parsing error: {0}")]
    PptxParseError(String),

    /// A download payload could not be decoded.
    #[error("Invalid download payload: {0}")]
    PayloadError(String),

    /// Invalid or unreadable configuration.
    #[error("Configuration error: {0}")]
    ConfigError(String),
}
