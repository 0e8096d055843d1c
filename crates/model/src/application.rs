use crate::{Localized, Package};
use std::collections::BTreeSet;
use time::Date;

/// Project URLs of an application.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Links {
    pub web: Option<String>,
    pub source: Option<String>,
    pub tracker: Option<String>,
    pub changelog: Option<String>,
}

/// Donation channels advertised by an application.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Donations {
    /// Generic donation URL
    pub donate: Option<String>,
    pub flattr: Option<String>,
    pub liberapay: Option<String>,
    pub bitcoin: Option<String>,
    pub litecoin: Option<String>,
}

/// One catalog entry.
///
/// Identity is [`id`](Self::id), a reversed-domain package identifier that is
/// unique within a catalog. Dates are repository-relative: `added` and
/// `last_updated` describe the catalog entry, not the software itself.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Application {
    pub id: String,
    /// Display name. `None` when the source document didn't carry a usable
    /// name; the index build substitutes the `id`.
    pub name: Option<String>,
    pub summary: String,
    /// Long description, possibly containing HTML markup (stored as-is)
    pub description: String,
    pub icon: Option<String>,
    pub license: Option<String>,
    /// Ordered, duplicate-free category names (may be empty)
    pub categories: Vec<String>,
    pub author: Option<String>,
    pub author_email: Option<String>,
    pub links: Links,
    pub donations: Donations,
    pub added: Option<Date>,
    pub last_updated: Option<Date>,
    /// Build date of the *first* package, populated by the index build.
    ///
    /// Note that this is the first package in [`packages`](Self::packages)
    /// order, not the most recently built one.
    pub built: Option<Date>,
    pub anti_features: BTreeSet<String>,
    /// Special requirements, e.g. `"root"`
    pub requirements: BTreeSet<String>,
    pub suggested_version_code: Option<u64>,
    pub localized: Option<Localized>,
    pub packages: Vec<Package>,
}
impl AsRef<Application> for Application {
    fn as_ref(&self) -> &Application {
        self
    }
}
impl Application {
    pub fn new(id: impl Into<String>) -> Self {
        Self { id: id.into(), ..Default::default() }
    }

    /// The name to display (and index) for this application, falling back to
    /// the `id` when no name is known.
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or(&self.id)
    }

    /// The first category, if any (some front-ends only show one).
    pub fn primary_category(&self) -> Option<&str> {
        self.categories.first().map(String::as_str)
    }
}
