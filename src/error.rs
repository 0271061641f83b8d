//! Error types for the bookgen documentation pipeline.

use std::path::PathBuf;
use thiserror::Error;

/// Filesystem errors raised by writers and content scans
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Invalid path: {0}")]
    InvalidPath(String),

    #[error("Failed to scan {path:?}: {message}")]
    ScanFailed { path: PathBuf, message: String },

    #[error("Serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Storage I/O error: {0}")]
    IoError(#[from] std::io::Error),
}

/// Errors produced while generating books and draining deferred tasks
#[derive(Debug, Error)]
pub enum GenerateError {
    #[error("book {book}: generator {generator} failed: {message}")]
    Handler {
        book: String,
        generator: String,
        message: String,
    },

    #[error("book {book}: extraction failed: {source}")]
    Extraction {
        book: String,
        #[source]
        source: StorageError,
    },

    #[error("deferred task '{label}' failed: {source}")]
    Task {
        label: String,
        #[source]
        source: Box<GenerateError>,
    },

    #[error("book not on shelf: {0}")]
    UnknownBook(String),

    #[error("Storage error: {0}")]
    StorageError(#[from] StorageError),
}

impl GenerateError {
    /// Failure raised by a generator body for `book`
    pub fn handler(book: &str, generator: &str, message: impl Into<String>) -> Self {
        GenerateError::Handler {
            book: book.to_string(),
            generator: generator.to_string(),
            message: message.into(),
        }
    }
}

/// Errors from the opaque PDF render action
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("PDF renderer unavailable: {0}")]
    Unavailable(String),

    #[error("Navigation to {url} failed: {message}")]
    Navigation { url: String, message: String },

    #[error("Print to PDF failed: {0}")]
    Print(String),

    #[error("Failed to persist PDF: {0}")]
    Write(#[from] StorageError),
}

/// Umbrella error surfaced by the CLI
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Generation failed: {0}")]
    GenerationFailed(#[from] GenerateError),

    #[error("PDF rendering unavailable: {0}")]
    RenderError(#[from] RenderError),

    #[error("PDF generation failed for {failed} book(s)")]
    PdfFailed { failed: usize },

    #[error("Unknown book: {0}")]
    UnknownBook(String),

    #[error("Storage error: {0}")]
    StorageError(#[from] StorageError),
}

impl From<config::ConfigError> for ApiError {
    fn from(err: config::ConfigError) -> Self {
        ApiError::ConfigError(err.to_string())
    }
}
