//! Load Error Types
//!
//! This module provides structured errors using `exn` for automatic location
//! tracking and error tree construction.

use derive_more::{Display, Error};
use std::io::Error as IoError;
use std::path::PathBuf;

/// A load error with automatic location tracking.
pub type Error = exn::Exn<ErrorKind>;
/// Result type alias for load operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Actionable error categories.
///
/// These describe what the caller should *do*, not what went wrong internally.
#[derive(Debug, Display, Error)]
pub enum ErrorKind {
    /// Repository path or index file does not exist
    #[display("not found: {}", _0.display())]
    NotFound(#[error(not(source))] PathBuf),
    /// Index file in a format that can't be read (only XML and JSON are)
    #[display("unsupported index format: {_0}")]
    UnsupportedFormat(#[error(not(source))] String),
    /// Underlying I/O error
    #[display("I/O error: {_0}")]
    Io(IoError),
    /// The index file isn't a well-formed repository index
    #[display("invalid repository index")]
    InvalidDocument,
    /// A field the index can't do without is absent
    #[display("missing field: {_0}")]
    MissingField(#[error(not(source))] &'static str),
    /// The loaded records can't form a catalog
    #[display("could not build catalog")]
    Catalog,
}
impl From<IoError> for ErrorKind {
    fn from(err: IoError) -> Self {
        Self::Io(err)
    }
}

impl ErrorKind {
    pub(crate) fn from_io(err: IoError, path: impl Into<PathBuf>) -> Self {
        match err.kind() {
            std::io::ErrorKind::NotFound => Self::NotFound(path.into()),
            _ => Self::Io(err),
        }
    }

    /// Returns `true` if retrying might succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Io(_))
    }
}
