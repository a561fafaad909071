//! Centralized error types for outreachkit.
//!
//! Validation outcomes (snippet issues, attachment rejections, missing
//! fields) are ordinary values and never show up here. This enum covers the
//! failures that stop an operation outright.

use std::path::PathBuf;
use thiserror::Error;

/// All errors produced by the outreachkit library.
#[derive(Error, Debug)]
pub enum OutreachError {
    /// I/O error with the associated file path.
    #[error("I/O error reading '{path}': {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    /// The specified file does not exist.
    #[error("File not found: {0}")]
    FileNotFound(PathBuf),

    /// A variable catalog could not be built (duplicate or malformed token).
    #[error("Invalid variable catalog: {0}")]
    InvalidCatalog(String),

    /// A template kind name was not recognised.
    #[error("Unknown template kind: {0}")]
    UnknownKind(String),

    /// A template file could not be decoded.
    #[error("Could not parse template '{path}': {reason}")]
    TemplateParse { path: PathBuf, reason: String },

    /// Reading the content of one file in an attachment batch failed.
    /// The whole batch is abandoned.
    #[error("Attachment batch failed on '{file_name}': {reason}")]
    BatchConversion { file_name: String, reason: String },

    /// The editing session was already submitted or cancelled.
    #[error("Editing session is closed")]
    SessionClosed,

    /// A converted attachment batch was applied to a session other than
    /// the one that staged it.
    #[error("Attachment batch belongs to another editing session")]
    ForeignBatch,
}

/// Convenience alias for `Result<T, OutreachError>`.
pub type Result<T> = std::result::Result<T, OutreachError>;

impl OutreachError {
    /// Create an `Io` variant from a path and an `io::Error`.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

/// Allow `?` on `std::io::Error` when no path context is available
/// (rare, prefer `OutreachError::io`).
impl From<std::io::Error> for OutreachError {
    fn from(source: std::io::Error) -> Self {
        Self::Io {
            path: PathBuf::from("<unknown>"),
            source,
        }
    }
}
