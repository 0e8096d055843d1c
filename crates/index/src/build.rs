//! The index build: a single normalization pass over the loaded records.

use crate::probe::ArtifactProbe;
use crate::text::search_blob;
use repodex_model::Application;
use std::collections::{BTreeMap, HashMap};
use time::Date;
use tracing::instrument;

type Buckets = HashMap<String, Vec<usize>>;
type DateBuckets = BTreeMap<Date, Vec<usize>>;

/// Derived lookup structures over a normalized catalog snapshot.
///
/// Every structure refers to applications by their position in
/// [`apps`](Self::apps), and every structure is populated by the same pass,
/// so they can never disagree about the data. Bucket contents are always in
/// catalog order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Indexes {
    apps: Vec<Application>,
    by_id: HashMap<String, usize>,
    by_name: HashMap<String, usize>,
    by_category: Buckets,
    by_author: Buckets,
    by_license: Buckets,
    by_added: DateBuckets,
    by_updated: DateBuckets,
    by_built: DateBuckets,
    full_text: Option<Vec<String>>,
    licenses: Vec<String>,
    categories: Vec<String>,
}

impl Indexes {
    /// Normalize `source` into a new snapshot and index it.
    ///
    /// For each application, in order:
    /// - a missing name is replaced by the id,
    /// - when a probe is given, every package gets its build date, the
    ///   application gets the build date of its *first* package, and source
    ///   metadata (added date, root requirement) is applied,
    /// - `last_updated` is raised to the build date if it's older (replacing an
    ///   artifact is itself an update).
    #[instrument(skip_all, fields(app_count = source.len(), full_text))]
    pub(crate) fn build(source: &[Application], probe: Option<&dyn ArtifactProbe>, full_text: bool) -> Self {
        let mut indexes = Self {
            apps: Vec::with_capacity(source.len()),
            full_text: full_text.then(|| Vec::with_capacity(source.len())),
            ..Default::default()
        };
        for (position, app) in source.iter().enumerate() {
            let app = normalize(app.clone(), probe);
            indexes.insert(position, &app);
            indexes.apps.push(app);
        }
        indexes.licenses = sorted_keys(&indexes.by_license);
        indexes.categories = sorted_keys(&indexes.by_category);
        tracing::info!(
            apps = indexes.apps.len(),
            categories = indexes.categories.len(),
            licenses = indexes.licenses.len(),
            full_text,
            "catalog indexed"
        );
        indexes
    }

    fn insert(&mut self, position: usize, app: &Application) {
        self.by_id.insert(app.id.clone(), position);
        // Last writer wins when two applications share a display name.
        self.by_name.insert(app.display_name().to_string(), position);
        for category in &app.categories {
            self.by_category.entry(category.clone()).or_default().push(position);
        }
        if let Some(author) = &app.author {
            self.by_author.entry(author.clone()).or_default().push(position);
        }
        if let Some(license) = &app.license {
            self.by_license.entry(license.clone()).or_default().push(position);
        }
        for (buckets, date, field) in [
            (&mut self.by_added, app.added, "added"),
            (&mut self.by_updated, app.last_updated, "last_updated"),
        ] {
            match date {
                Some(date) => buckets.entry(date).or_default().push(position),
                None => tracing::warn!(app = %app.id, field, "missing date, left out of date index"),
            }
        }
        // A missing build date is normal in index-only mode.
        if let Some(built) = app.built {
            self.by_built.entry(built).or_default().push(position);
        }
        if let Some(blobs) = &mut self.full_text {
            blobs.push(search_blob(app));
        }
    }

    /// The normalized applications, in catalog order.
    pub fn apps(&self) -> &[Application] {
        &self.apps
    }

    pub fn by_id(&self) -> &HashMap<String, usize> {
        &self.by_id
    }

    pub fn by_name(&self) -> &HashMap<String, usize> {
        &self.by_name
    }

    pub fn by_category(&self) -> &HashMap<String, Vec<usize>> {
        &self.by_category
    }

    pub fn by_author(&self) -> &HashMap<String, Vec<usize>> {
        &self.by_author
    }

    pub fn by_license(&self) -> &HashMap<String, Vec<usize>> {
        &self.by_license
    }

    pub fn by_added(&self) -> &BTreeMap<Date, Vec<usize>> {
        &self.by_added
    }

    pub fn by_updated(&self) -> &BTreeMap<Date, Vec<usize>> {
        &self.by_updated
    }

    pub fn by_built(&self) -> &BTreeMap<Date, Vec<usize>> {
        &self.by_built
    }

    /// Per-position search blobs; `None` unless full-text mode was enabled
    /// when the indexes were built.
    pub fn full_text(&self) -> Option<&[String]> {
        self.full_text.as_deref()
    }

    /// Licenses used by at least one application, sorted and deduplicated.
    pub fn licenses(&self) -> &[String] {
        &self.licenses
    }

    /// Categories used by at least one application, sorted and deduplicated.
    pub fn categories(&self) -> &[String] {
        &self.categories
    }
}

fn sorted_keys(buckets: &Buckets) -> Vec<String> {
    let mut keys: Vec<String> = buckets.keys().cloned().collect();
    keys.sort();
    keys
}

fn normalize(mut app: Application, probe: Option<&dyn ArtifactProbe>) -> Application {
    if app.name.is_none() {
        tracing::warn!(app = %app.id, field = "name", "missing or invalid name, using id instead");
        app.name = Some(app.id.clone());
    }
    if app.categories.is_empty() {
        tracing::warn!(app = %app.id, field = "categories", "application has no categories");
    }
    if let Some(probe) = probe {
        for package in &mut app.packages {
            package.built = probe.built_date(&package.artifact);
        }
        app.built = app.packages.first().and_then(|package| package.built);
        if let Some(metadata) = probe.source_metadata(&app.id) {
            match (metadata.added, metadata.modified) {
                (Some(added), _) => app.added = Some(added),
                // Without an explicit date, a metadata file older than the
                // index entry is better evidence of when the app was added.
                (None, Some(modified)) if app.added.is_some_and(|added| modified < added) => {
                    app.added = Some(modified);
                },
                _ => {},
            }
            if metadata.requires_root {
                app.requirements.insert("root".to_string());
            }
        }
    }
    // `None` sorts before any date, so an unknown update date is raised too.
    if app.built > app.last_updated {
        app.last_updated = app.built;
    }
    app
}
