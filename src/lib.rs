//! Index and query software repository catalogs.
//!
//! [`open`] turns a [`Config`] into a ready-to-query [`Catalog`]: it loads the
//! repository index and category list, decides whether local artifacts are
//! available and wires up the probe that reads them.
//!
//! ```no_run
//! use repodex::{Config, Order, Window};
//!
//! # fn main() -> repodex::error::Result<()> {
//! let mut config = Config::new("/srv/fdroid/repo");
//! config.full_text = true;
//! let catalog = repodex::open(&config)?;
//! for app in catalog.apps_added_since("2016-03-01", Window::first(10)) {
//!     println!("{}: {}", app.id, app.display_name());
//! }
//! let newest = catalog.apps(Window::default(), Order::Added);
//! println!("{} applications", newest.total);
//! # Ok(())
//! # }
//! ```

pub mod error;

use crate::error::{ErrorKind, Result};
use exn::ResultExt;
use repodex_load::{LocalProbe, load_categories, load_document, resolve};
use std::path::Path;
use tracing::instrument;

pub use repodex_config::Config;
pub use repodex_index::{ArtifactProbe, Catalog, Indexes, Order, Page, SourceMetadata, Window};
pub use repodex_model::{Application, Donations, Links, Package, Repository, parse_date};

/// Open the catalog described by `config`.
///
/// Index-only mode is detected from the repository layout unless the
/// configuration overrides it. Nothing is indexed yet; the first query that
/// needs the indexes builds them.
#[instrument(skip_all, fields(repository = %config.repository.display()))]
pub fn open(config: &Config) -> Result<Catalog> {
    let source = resolve(&config.repository).or_raise(|| ErrorKind::Load)?;
    let document = load_document(&source.index).or_raise(|| ErrorKind::Load)?;
    let categories = load_categories(config.categories.clone().unwrap_or_else(|| source.categories()));
    let index_only = config.index_only.unwrap_or_else(|| source.is_index_only());
    tracing::info!(
        apps = document.apps.len(),
        categories = categories.len(),
        index_only,
        full_text = config.full_text,
        "repository opened"
    );
    let catalog = document
        .into_catalog()
        .or_raise(|| ErrorKind::Load)?
        .with_categories(categories)
        .with_probe(LocalProbe::new(&source.repo_dir))
        .with_index_only(index_only)
        .with_full_text(config.full_text)
        .with_limit(config.limit);
    Ok(catalog)
}

/// Load the configuration at `path` (see [`Config::load`]) and open its
/// catalog.
pub fn open_with(path: impl AsRef<Path>) -> Result<Catalog> {
    let config = Config::load(path).or_raise(|| ErrorKind::Config)?;
    open(&config)
}
