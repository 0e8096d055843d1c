//! Indexing and query engine for repository catalogs.
//!
//! A [`Catalog`] wraps one loaded repository snapshot (metadata plus the
//! ordered application sequence) and answers point lookups, filtered listings,
//! date-range listings, full-text search and intersections, all under the same
//! pagination contract ([`Window`] in, [`Page`] out).
//!
//! # Lifecycle
//! Construction stores the records and computes nothing else. The derived
//! lookup structures ([`Indexes`]) are produced by a single normalization pass
//! that runs exactly once, either explicitly via
//! [`Catalog::build_indexes`] or implicitly by the first query that needs it.
//! The pass never mutates the loaded records: it produces a new, normalized
//! snapshot, so references handed out before indexing stay valid and
//! unchanged. Once built, every query is a pure read and a `&Catalog` can be
//! shared between any number of threads.
//!
//! # Example
//!
//! ```
//! use repodex_index::{Catalog, Order, Window};
//! use repodex_model::{Application, Repository};
//!
//! let mut app = Application::new("org.example.blocker");
//! app.name = Some("Blocker".to_string());
//! app.summary = "Ad blocker".to_string();
//! app.categories = vec!["Internet".to_string()];
//!
//! let mut catalog = Catalog::new(Repository::default(), vec![app]).unwrap();
//! catalog.set_full_text(true);
//!
//! let page = catalog.search("BLOCK", Window::default());
//! assert_eq!(page.total, 1);
//! let page = catalog.apps_by_category("Internet", Window::default());
//! assert_eq!(page.ids().collect::<Vec<_>>(), ["org.example.blocker"]);
//! assert_eq!(catalog.apps(Window::new(5, 10), Order::Name).len(), 0);
//! ```

mod build;
mod catalog;
mod combine;
pub mod error;
mod page;
mod probe;
mod query;
mod text;

pub use crate::build::Indexes;
pub use crate::catalog::Catalog;
pub use crate::page::{Page, Window};
pub use crate::probe::{ArtifactProbe, ProbeHandle, SourceMetadata};
pub use crate::query::Order;
