//! Model Error Types
//!
//! This module provides structured errors using `exn` for automatic location
//! tracking and error tree construction.

use derive_more::{Display, Error};

/// A model error with automatic location tracking.
pub type Error = exn::Exn<ErrorKind>;
/// Result type alias for model operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Actionable error categories.
///
/// These describe what the caller should *do*, not what went wrong internally.
#[derive(Debug, Display, Error, Clone, PartialEq, Eq)]
pub enum ErrorKind {
    /// A date string was not in `YYYY-MM-DD` form, or not a real calendar date.
    #[display("invalid date: {_0}")]
    InvalidDate(#[error(not(source))] String),
    /// A timestamp was outside the range representable as a calendar date.
    #[display("timestamp out of range: {_0}")]
    TimestampOutOfRange(#[error(not(source))] i64),
}

impl ErrorKind {
    /// Returns `true` if retrying might succeed.
    pub fn is_retryable(&self) -> bool {
        // Dates are either valid or they're not.
        false
    }
}
