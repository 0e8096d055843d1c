use crate::build::Indexes;
use crate::error::{ErrorKind, Result};
use crate::page::{Page, Window, paginate, saturating_abs};
use crate::probe::{ArtifactProbe, ProbeHandle};
use repodex_model::{Application, Repository};
use std::collections::HashSet;
use std::fmt;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, OnceLock};

/// One repository catalog and its query engine.
///
/// See the [crate documentation](crate) for the lifecycle.
pub struct Catalog {
    meta: Repository,
    apps: Vec<Application>,
    categories: Vec<String>,
    limit: usize,
    full_text: bool,
    index_only: bool,
    probe: Option<ProbeHandle>,
    indexes: OnceLock<Indexes>,
    full_hits: AtomicUsize,
}

impl fmt::Debug for Catalog {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Catalog")
            .field("meta", &self.meta)
            .field("apps", &self.apps.len())
            .field("categories", &self.categories)
            .field("limit", &self.limit)
            .field("full_text", &self.full_text)
            .field("index_only", &self.index_only)
            .field("probe", &self.probe.is_some())
            .field("indexed", &self.indexes.get().is_some())
            .finish_non_exhaustive()
    }
}

impl Catalog {
    /// Wrap a loaded repository snapshot. Nothing is indexed yet.
    ///
    /// The repository's `app_count` is recomputed from `apps`. Fails if two
    /// applications share an id.
    pub fn new(mut meta: Repository, apps: Vec<Application>) -> Result<Self> {
        let mut seen = HashSet::with_capacity(apps.len());
        for app in &apps {
            if !seen.insert(app.id.as_str()) {
                exn::bail!(ErrorKind::DuplicateId(app.id.clone()));
            }
            if app.packages.is_empty() {
                tracing::warn!(app = %app.id, field = "packages", "application has no packages");
            }
        }
        meta.app_count = apps.len();
        Ok(Self {
            meta,
            apps,
            categories: Vec::new(),
            limit: 0,
            full_text: false,
            index_only: false,
            probe: None,
            indexes: OnceLock::new(),
            full_hits: AtomicUsize::new(0),
        })
    }

    /// Attach the repository's category list. Stored sorted and deduplicated.
    pub fn with_categories(mut self, mut categories: Vec<String>) -> Self {
        categories.sort();
        categories.dedup();
        self.categories = categories;
        self
    }

    /// Attach the probe consulted for build dates and source metadata.
    pub fn with_probe(mut self, probe: impl ArtifactProbe + Send + Sync + 'static) -> Self {
        self.probe = Some(Arc::new(probe));
        self
    }

    pub fn with_limit(mut self, limit: i64) -> Self {
        self.set_limit(limit);
        self
    }

    pub fn with_full_text(mut self, enabled: bool) -> Self {
        self.full_text = enabled;
        self
    }

    pub fn with_index_only(mut self, index_only: bool) -> Self {
        self.index_only = index_only;
        self
    }

    /// Set the default page size used when a [`Window`] has no limit of its
    /// own. Negative values are normalized to their absolute value; `0` means
    /// unbounded.
    pub fn set_limit(&mut self, limit: i64) {
        self.limit = saturating_abs(limit);
    }

    pub fn limit(&self) -> usize {
        self.limit
    }

    /// Enable or disable full-text search.
    ///
    /// The search index is only produced by the index build, so enabling this
    /// after the indexes exist has no effect until
    /// [`rebuild_indexes`](Self::rebuild_indexes) is called. Disabling it makes
    /// [`search`](Self::search) return nothing but doesn't discard the index.
    pub fn set_full_text(&mut self, enabled: bool) {
        self.full_text = enabled;
    }

    pub fn full_text(&self) -> bool {
        self.full_text
    }

    /// In index-only mode the probe is never consulted, so no build dates or
    /// source metadata are applied. Takes effect on the next index build.
    pub fn set_index_only(&mut self, index_only: bool) {
        self.index_only = index_only;
    }

    pub fn index_only(&self) -> bool {
        self.index_only
    }

    /// The match count of the most recent listing on this catalog.
    ///
    /// Under concurrent use prefer [`Page::total`], which belongs to one call.
    pub fn full_hits(&self) -> usize {
        self.full_hits.load(Ordering::Relaxed)
    }

    /// Build the derived indexes if they don't exist yet and return them.
    ///
    /// Safe to call from several threads at once: the build runs exactly once
    /// and every caller gets the same result.
    pub fn build_indexes(&self) -> &Indexes {
        self.indexes.get_or_init(|| {
            let probe = match self.index_only {
                true => None,
                false => self.probe.as_deref().map(|probe| probe as &dyn ArtifactProbe),
            };
            Indexes::build(&self.apps, probe, self.full_text)
        })
    }

    /// Discard the indexes and build them again, picking up changes to the
    /// full-text and index-only settings.
    pub fn rebuild_indexes(&mut self) -> &Indexes {
        self.indexes.take();
        self.build_indexes()
    }

    /// The indexes, if they've been built.
    pub fn indexes(&self) -> Option<&Indexes> {
        self.indexes.get()
    }

    pub fn meta(&self) -> &Repository {
        &self.meta
    }

    /// The repository's category list, as attached with
    /// [`with_categories`](Self::with_categories).
    pub fn categories(&self) -> &[String] {
        &self.categories
    }

    /// Every license used in the catalog, sorted and deduplicated.
    pub fn licenses(&self) -> &[String] {
        self.build_indexes().licenses()
    }

    pub fn app_by_id(&self, id: &str) -> Option<&Application> {
        let indexes = self.build_indexes();
        indexes.by_id().get(id).map(|&position| &indexes.apps()[position])
    }

    /// Look up an application by display name. If several applications share
    /// a name, the last one in catalog order wins.
    pub fn app_by_name(&self, name: &str) -> Option<&Application> {
        let indexes = self.build_indexes();
        indexes.by_name().get(name).map(|&position| &indexes.apps()[position])
    }

    /// The normalized snapshot once indexed, the loaded records before that.
    pub(crate) fn records(&self) -> &[Application] {
        self.indexes.get().map_or(self.apps.as_slice(), Indexes::apps)
    }

    /// Apply the pagination kernel and record the match count.
    pub(crate) fn page<'a, I>(&self, candidates: I, window: Window) -> Page<'a>
    where
        I: IntoIterator<Item = &'a Application>,
    {
        let (start, limit) = window.resolve(self.limit);
        let page = paginate(candidates, start, limit);
        self.full_hits.store(page.total, Ordering::Relaxed);
        page
    }

    /// An empty result, recorded as zero matches.
    pub(crate) fn nothing<'a>(&self) -> Page<'a> {
        self.full_hits.store(0, Ordering::Relaxed);
        Page::empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::probe::SourceMetadata;
    use repodex_model::{Package, parse_date};
    use std::sync::atomic::AtomicUsize as Counter;
    use time::Date;

    fn app(id: &str) -> Application {
        let mut app = Application::new(id);
        app.packages = vec![Package { artifact: format!("{id}.apk"), ..Default::default() }];
        app
    }

    #[derive(Default)]
    struct CountingProbe {
        calls: Arc<Counter>,
    }
    impl ArtifactProbe for CountingProbe {
        fn built_date(&self, _artifact: &str) -> Option<Date> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            parse_date("2016-03-10").ok()
        }
        fn source_metadata(&self, _id: &str) -> Option<SourceMetadata> {
            None
        }
    }

    #[test]
    fn test_duplicate_id_rejected() {
        let err = Catalog::new(Repository::default(), vec![app("a"), app("b"), app("a")]).unwrap_err();
        assert_eq!(*err, ErrorKind::DuplicateId("a".to_string()));
        assert!(!err.is_retryable());
    }

    #[test]
    fn test_app_count_recomputed() {
        let meta = Repository { app_count: 99, ..Default::default() };
        let catalog = Catalog::new(meta, vec![app("a"), app("b")]).unwrap();
        assert_eq!(catalog.meta().app_count, 2);
        assert!(catalog.indexes().is_none());
    }

    #[test]
    fn test_lookup_builds_indexes_and_misses_are_none() {
        let catalog = Catalog::new(Repository::default(), vec![app("a")]).unwrap();
        assert!(catalog.app_by_id("missing").is_none());
        assert!(catalog.indexes().is_some());
        assert_eq!(catalog.app_by_id("a").map(|app| app.id.as_str()), Some("a"));
        // Names are filled in from the id by the build.
        assert_eq!(catalog.app_by_name("a").map(|app| app.id.as_str()), Some("a"));
        assert!(catalog.app_by_name("missing").is_none());
    }

    #[test]
    fn test_build_runs_once() {
        let calls = Arc::new(Counter::new(0));
        let catalog = Catalog::new(Repository::default(), vec![app("a"), app("b")])
            .unwrap()
            .with_probe(CountingProbe { calls: calls.clone() });
        let first = catalog.build_indexes().clone();
        let second = catalog.build_indexes();
        assert_eq!(calls.load(Ordering::SeqCst), 2);
        assert_eq!(&first, second);
    }

    #[test]
    fn test_build_runs_once_across_threads() {
        let calls = Arc::new(Counter::new(0));
        let catalog = Catalog::new(Repository::default(), vec![app("a"), app("b"), app("c")])
            .unwrap()
            .with_probe(CountingProbe { calls: calls.clone() });
        std::thread::scope(|scope| {
            for _ in 0..8 {
                scope.spawn(|| catalog.app_by_id("b").map(|app| app.built));
            }
        });
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[test]
    fn test_index_only_skips_probe() {
        let calls = Arc::new(Counter::new(0));
        let mut catalog = Catalog::new(Repository::default(), vec![app("a")])
            .unwrap()
            .with_probe(CountingProbe { calls: calls.clone() })
            .with_index_only(true);
        assert_eq!(catalog.app_by_id("a").and_then(|app| app.built), None);
        assert_eq!(calls.load(Ordering::SeqCst), 0);

        catalog.set_index_only(false);
        catalog.rebuild_indexes();
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert!(catalog.app_by_id("a").and_then(|app| app.built).is_some());
    }

    #[test]
    fn test_loaded_records_never_mutated() {
        let mut nameless = app("a");
        nameless.name = None;
        let catalog = Catalog::new(Repository::default(), vec![nameless]).unwrap();
        let before = catalog.records()[0].clone();
        catalog.build_indexes();
        assert_eq!(before.name, None);
        assert_eq!(catalog.apps[0].name, None);
        assert_eq!(catalog.records()[0].name.as_deref(), Some("a"));
    }

    #[test]
    fn test_settings() {
        let mut catalog = Catalog::new(Repository::default(), vec![])
            .unwrap()
            .with_limit(-25)
            .with_categories(vec!["System".into(), "Games".into(), "System".into()]);
        assert_eq!(catalog.limit(), 25);
        assert_eq!(catalog.categories(), ["Games", "System"]);
        catalog.set_limit(0);
        assert_eq!(catalog.limit(), 0);
        assert!(!catalog.full_text());
        catalog.set_full_text(true);
        assert!(catalog.full_text());
        assert!(catalog.licenses().is_empty());
    }
}
