//! Listings, lookups by key, date ranges and full-text search.

use crate::build::Indexes;
use crate::catalog::Catalog;
use crate::page::{Page, Window};
use repodex_model::{Application, parse_date};
use std::collections::{BTreeMap, HashMap};
use std::convert::Infallible;
use std::str::FromStr;
use time::Date;

/// Ordering of [`Catalog::apps`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Order {
    /// Catalog order, as loaded
    #[default]
    Name,
    /// Oldest `added` date first; undated records come before any dated one
    Added,
    /// Oldest `last_updated` date first; undated records come before any dated one
    Updated,
}
impl FromStr for Order {
    type Err = Infallible;

    /// Unrecognized values fall back to catalog order.
    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Ok(match value.to_ascii_lowercase().as_str() {
            "added" => Self::Added,
            "updated" => Self::Updated,
            _ => Self::Name,
        })
    }
}

impl Catalog {
    /// Every application in the requested order.
    ///
    /// Catalog order needs no indexes. The date orders sort the normalized
    /// snapshot (building the indexes if needed), since normalization can move
    /// dates. The sort is stable and computed on each call, so applications
    /// with equal dates keep their catalog order.
    pub fn apps(&self, window: Window, order: Order) -> Page<'_> {
        match order {
            Order::Name => self.page(self.records(), window),
            Order::Added => self.page(sorted_by(self.build_indexes().apps(), |app| app.added), window),
            Order::Updated => self.page(sorted_by(self.build_indexes().apps(), |app| app.last_updated), window),
        }
    }

    pub fn apps_by_category(&self, category: &str, window: Window) -> Page<'_> {
        self.bucket(Indexes::by_category, category, window)
    }

    pub fn apps_by_author(&self, author: &str, window: Window) -> Page<'_> {
        self.bucket(Indexes::by_author, author, window)
    }

    pub fn apps_by_license(&self, license: &str, window: Window) -> Page<'_> {
        self.bucket(Indexes::by_license, license, window)
    }

    /// Applications added on or after `since` (`YYYY-MM-DD`), newest first.
    pub fn apps_added_since(&self, since: &str, window: Window) -> Page<'_> {
        self.since(Indexes::by_added, since, window)
    }

    /// Applications updated on or after `since` (`YYYY-MM-DD`), newest first.
    pub fn apps_updated_since(&self, since: &str, window: Window) -> Page<'_> {
        self.since(Indexes::by_updated, since, window)
    }

    /// Applications whose first package was built on or after `since`
    /// (`YYYY-MM-DD`), newest first. Always empty in index-only mode.
    pub fn apps_built_since(&self, since: &str, window: Window) -> Page<'_> {
        self.since(Indexes::by_built, since, window)
    }

    /// Case-insensitive substring search over name, summary and description.
    ///
    /// Needs full-text mode enabled and a search index built with it; without
    /// either the result is empty.
    pub fn search(&self, keyword: &str, window: Window) -> Page<'_> {
        if !self.full_text() {
            tracing::debug!(keyword, "full-text search is disabled");
            return self.nothing();
        }
        let indexes = self.build_indexes();
        let Some(blobs) = indexes.full_text() else {
            tracing::warn!(keyword, "indexes were built without full-text search, rebuild them to search");
            return self.nothing();
        };
        let needle = keyword.to_lowercase();
        let matches = blobs
            .iter()
            .zip(indexes.apps())
            .filter(|(blob, _)| blob.contains(&needle))
            .map(|(_, app)| app);
        self.page(matches, window)
    }

    fn bucket<'a>(
        &'a self,
        index: fn(&Indexes) -> &HashMap<String, Vec<usize>>,
        key: &str,
        window: Window,
    ) -> Page<'a> {
        let indexes = self.build_indexes();
        let positions = index(indexes).get(key).map(Vec::as_slice).unwrap_or_default();
        self.page(positions.iter().map(|&position| &indexes.apps()[position]), window)
    }

    fn since<'a>(&'a self, index: fn(&Indexes) -> &BTreeMap<Date, Vec<usize>>, since: &str, window: Window) -> Page<'a> {
        let Ok(threshold) = parse_date(since) else {
            tracing::warn!(since, "unparsable threshold date, expected YYYY-MM-DD");
            return self.nothing();
        };
        let indexes = self.build_indexes();
        let matches = index(indexes)
            .range(threshold..)
            .rev()
            .flat_map(|(_, positions)| positions.iter().map(|&position| &indexes.apps()[position]));
        self.page(matches, window)
    }
}

fn sorted_by<K: Ord>(records: &[Application], key: impl Fn(&Application) -> K) -> Vec<&Application> {
    let mut sorted: Vec<&Application> = records.iter().collect();
    sorted.sort_by_key(|app| key(app));
    sorted
}
