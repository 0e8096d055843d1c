//! Loading repository catalogs from disk.
//!
//! A repository directory holds the index (`index.xml`, or `index-v1.json`
//! when there is no XML index), the artifacts it lists and optionally a
//! `categories.txt` list. A full repository checkout
//! also has a `metadata` directory next to the repository directory, holding
//! one source metadata file per application; without it the repository is
//! treated as index-only.
//!
//! ```text
//! fdroid/
//! ├── metadata/
//! │   └── org.example.app.yml
//! └── repo/
//!     ├── categories.txt
//!     ├── index-v1.json
//!     ├── index.xml
//!     └── org.example.app_42.apk
//! ```

mod categories;
mod document;
pub mod error;
mod probe;
mod source;
mod xml;

pub use crate::categories::load_categories;
pub use crate::document::{Document, load_document, parse_document};
pub use crate::probe::LocalProbe;
pub use crate::source::{CATEGORIES_FILE, Format, INDEX_FILE, Source, XML_INDEX_FILE, is_index_only, resolve};
pub use crate::xml::parse_xml_document;
