//! Error Types
//!
//! This module provides structured errors using `exn` for automatic location
//! tracking and error tree construction.

use derive_more::{Display, Error};

/// An error with automatic location tracking.
pub type Error = exn::Exn<ErrorKind>;
/// Result type alias for opening a catalog.
pub type Result<T> = std::result::Result<T, Error>;

/// Actionable error categories.
///
/// These describe what the caller should *do*, not what went wrong internally.
#[derive(Debug, Display, Error, Clone, PartialEq, Eq)]
pub enum ErrorKind {
    /// Configuration could not be loaded
    #[display("configuration error")]
    Config,
    /// Repository could not be loaded
    #[display("could not load repository")]
    Load,
}

impl ErrorKind {
    /// Returns `true` if retrying might succeed.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Config | Self::Load => false,
        }
    }
}
