//! Normalized record types for a software repository catalog.
//!
//! A catalog is one [`Repository`] metadata record plus an ordered sequence of
//! [`Application`]s, each owning one or more [`Package`]s (the individual
//! releases). These types carry no behaviour beyond small accessors; loading
//! lives in `repodex-load` and indexing/querying in `repodex-index`.

mod application;
mod date;
pub mod error;
mod package;
mod repository;

pub use crate::application::{Application, Donations, Links};
pub use crate::date::{DATE_FORMAT, date_from_unix_millis, parse_date};
pub use crate::package::Package;
pub use crate::repository::Repository;

/// Opaque, format-specific localized variants of an application's texts.
///
/// Passed through untouched from the source document.
pub type Localized = serde_json::Value;
