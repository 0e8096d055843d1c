use crate::catalog::Catalog;
use crate::page::{Page, Window};
use repodex_model::Application;
use std::collections::HashMap;

impl Catalog {
    /// The applications of `left` whose id also appears in `right`, in `left`
    /// order.
    ///
    /// An application is emitted once per matching entry of `right`, so
    /// duplicates in `right` multiply the output. The total counts the whole
    /// intersection before the window is applied.
    ///
    /// ```
    /// # use repodex_index::{Catalog, Order, Window};
    /// # use repodex_model::{Application, Repository};
    /// let apps = ["a", "b", "c"].map(Application::new).to_vec();
    /// let catalog = Catalog::new(Repository::default(), apps).unwrap();
    /// let all = catalog.apps(Window::default(), Order::Name).into_items();
    /// let page = catalog.intersect(all.clone(), &all[1..], Window::default());
    /// assert_eq!(page.ids().collect::<Vec<_>>(), ["b", "c"]);
    /// ```
    pub fn intersect<'a, L, R>(&self, left: L, right: R, window: Window) -> Page<'a>
    where
        L: IntoIterator<Item = &'a Application>,
        R: IntoIterator,
        R::Item: AsRef<Application>,
    {
        let mut counts: HashMap<String, usize> = HashMap::new();
        for app in right {
            *counts.entry(app.as_ref().id.clone()).or_default() += 1;
        }
        let matches = left.into_iter().flat_map(|app| {
            let count = counts.get(&app.id).copied().unwrap_or_default();
            std::iter::repeat_n(app, count)
        });
        self.page(matches, window)
    }
}
