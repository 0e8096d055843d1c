//! The pagination kernel shared by every listing.

use repodex_model::Application;
use std::ops::Deref;

/// Which part of an ordered result stream to return.
///
/// A `limit` of `Some(0)` means "everything from `start` onwards", while
/// `None` defers to the catalog's default limit (see
/// [`Catalog::set_limit`](crate::Catalog::set_limit)).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Window {
    pub start: usize,
    pub limit: Option<usize>,
}
impl Window {
    /// Build a window from signed values. Negative values are normalized to
    /// their absolute value, so `Window::new(-5, -10)` equals `Window::new(5, 10)`.
    pub fn new(start: i64, limit: i64) -> Self {
        Self {
            start: saturating_abs(start),
            limit: Some(saturating_abs(limit)),
        }
    }

    /// Start at `start` and use the catalog's default limit.
    pub fn from_start(start: i64) -> Self {
        Self { start: saturating_abs(start), limit: None }
    }

    /// Every result, regardless of the catalog's default limit.
    pub fn all() -> Self {
        Self { start: 0, limit: Some(0) }
    }

    /// The first `limit` results.
    pub fn first(limit: usize) -> Self {
        Self { start: 0, limit: Some(limit) }
    }

    pub fn with_start(mut self, start: usize) -> Self {
        self.start = start;
        self
    }

    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Resolve against a default limit, returning `(start, limit)` where a
    /// limit of `0` is unbounded.
    pub(crate) fn resolve(self, default_limit: usize) -> (usize, usize) {
        (self.start, self.limit.unwrap_or(default_limit))
    }
}

pub(crate) fn saturating_abs(value: i64) -> usize {
    usize::try_from(value.unsigned_abs()).unwrap_or(usize::MAX)
}

/// One window of an ordered result stream.
///
/// `total` is the number of records that matched the query's filter before
/// the window was applied, so it doesn't change with `start` or `limit`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Page<'a> {
    pub items: Vec<&'a Application>,
    pub total: usize,
}
impl<'a> Page<'a> {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Identifiers of the applications on this page, in order.
    pub fn ids(&self) -> impl Iterator<Item = &'a str> + '_ {
        self.items.iter().map(|app| app.id.as_str())
    }

    pub fn into_items(self) -> Vec<&'a Application> {
        self.items
    }
}
impl<'a> Deref for Page<'a> {
    type Target = [&'a Application];
    fn deref(&self) -> &Self::Target {
        &self.items
    }
}
impl<'a> IntoIterator for Page<'a> {
    type Item = &'a Application;
    type IntoIter = std::vec::IntoIter<&'a Application>;
    fn into_iter(self) -> Self::IntoIter {
        self.items.into_iter()
    }
}

/// Skip `start`, take `limit` (`0` = unbounded), and count every candidate.
///
/// The candidate stream is always consumed in full so the total is exact,
/// even when `start` is past the end.
pub(crate) fn paginate<'a, I>(candidates: I, start: usize, limit: usize) -> Page<'a>
where
    I: IntoIterator<Item = &'a Application>,
{
    let mut items = Vec::new();
    let mut total = 0;
    for (position, app) in candidates.into_iter().enumerate() {
        if position >= start && (limit == 0 || position - start < limit) {
            items.push(app);
        }
        total += 1;
    }
    Page { items, total }
}
