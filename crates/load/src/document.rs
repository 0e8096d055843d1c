//! Reading repository indexes, and the `index-v1.json` format in particular.

use crate::error::{ErrorKind, Result};
use crate::source::{Format, resolve};
use crate::xml::parse_xml_document;
use exn::{OptionExt, ResultExt};
use repodex_index::Catalog;
use repodex_model::{Application, Donations, Links, Localized, Package, Repository, date_from_unix_millis};
use serde::Deserialize;
use serde_json::Value;
use std::collections::{BTreeSet, HashMap};
use std::path::Path;
use time::Date;
use tracing::instrument;

/// A loaded repository index: metadata plus applications in index order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Document {
    pub repository: Repository,
    pub apps: Vec<Application>,
}
impl Document {
    /// Wrap the document in an unindexed [`Catalog`].
    pub fn into_catalog(self) -> Result<Catalog> {
        Catalog::new(self.repository, self.apps).or_raise(|| ErrorKind::Catalog)
    }
}

/// Load a repository index from a repository directory or an index file,
/// in whichever format [`resolve`] finds.
#[instrument(skip_all, fields(path = %path.as_ref().display()))]
pub fn load_document(path: impl AsRef<Path>) -> Result<Document> {
    let source = resolve(path)?;
    let contents = std::fs::read_to_string(&source.index).map_err(|e| ErrorKind::from_io(e, &source.index))?;
    let document = match source.format {
        Format::Json => parse_document(&contents)?,
        Format::Xml => parse_xml_document(&contents)?,
    };
    tracing::debug!(apps = document.apps.len(), repository = %document.repository.name, "repository index loaded");
    Ok(document)
}

/// Parse the contents of an `index-v1.json` file.
pub fn parse_document(contents: &str) -> Result<Document> {
    let raw: RawIndex = serde_json::from_str(contents).or_raise(|| ErrorKind::InvalidDocument)?;
    let repo = raw.repo.ok_or_raise(|| ErrorKind::MissingField("repo"))?;
    let mut packages = raw.packages;
    let apps = raw
        .apps
        .into_iter()
        .map(|app| {
            let id = app.package_name.clone().ok_or_raise(|| ErrorKind::MissingField("packageName"))?;
            let releases = packages.remove(&id).unwrap_or_default();
            Ok(app.into_application(id, releases))
        })
        .collect::<Result<Vec<_>>>()?;
    let repository = Repository {
        name: repo.name,
        url: repo.address,
        public_key: repo.pubkey.unwrap_or_default(),
        timestamp: repo.timestamp.div_euclid(1000),
        version: repo.version,
        description: repo.description,
        icon: repo.icon,
        app_count: apps.len(),
    };
    Ok(Document { repository, apps })
}

#[derive(Deserialize)]
struct RawIndex {
    repo: Option<RawRepo>,
    #[serde(default)]
    apps: Vec<RawApp>,
    #[serde(default)]
    packages: HashMap<String, Vec<RawPackage>>,
}

#[derive(Deserialize, Default)]
#[serde(default)]
struct RawRepo {
    name: String,
    address: String,
    pubkey: Option<String>,
    /// Milliseconds
    timestamp: i64,
    version: u32,
    description: String,
    icon: Option<String>,
}

#[derive(Deserialize, Default)]
#[serde(default, rename_all = "camelCase")]
struct RawApp {
    package_name: Option<String>,
    added: Option<i64>,
    last_updated: Option<i64>,
    name: Option<Value>,
    summary: Option<Value>,
    description: Option<Value>,
    icon: Option<Value>,
    license: Option<Value>,
    changelog: Option<Value>,
    source_code: Option<String>,
    issue_tracker: Option<String>,
    web_site: Option<String>,
    author_name: Option<String>,
    author_email: Option<String>,
    anti_features: Vec<String>,
    categories: Vec<String>,
    donate: Option<String>,
    #[serde(rename = "flattrID")]
    flattr_id: Option<String>,
    #[serde(rename = "liberapayID")]
    liberapay_id: Option<String>,
    bitcoin: Option<String>,
    litecoin: Option<String>,
    suggested_version_code: Option<Value>,
    localized: Option<Localized>,
}
impl RawApp {
    fn into_application(self, id: String, releases: Vec<RawPackage>) -> Application {
        let name = text(self.name);
        if name.is_none() {
            tracing::debug!(app = %id, "no usable name in index");
        }
        let mut categories = Vec::with_capacity(self.categories.len());
        for category in self.categories {
            if !categories.contains(&category) {
                categories.push(category);
            }
        }
        Application {
            added: date(&id, "added", self.added),
            last_updated: date(&id, "lastUpdated", self.last_updated),
            name,
            summary: text(self.summary).unwrap_or_default(),
            description: text(self.description).unwrap_or_default(),
            icon: text(self.icon).filter(|icon| !icon.is_empty()),
            license: text(self.license).filter(|license| !license.is_empty()),
            categories,
            author: self.author_name,
            author_email: self.author_email,
            links: Links {
                web: self.web_site,
                source: self.source_code,
                tracker: self.issue_tracker,
                changelog: text(self.changelog).filter(|changelog| !changelog.is_empty()),
            },
            donations: Donations {
                donate: self.donate,
                flattr: self.flattr_id,
                liberapay: self.liberapay_id,
                bitcoin: self.bitcoin,
                litecoin: self.litecoin,
            },
            built: None,
            anti_features: self.anti_features.into_iter().collect(),
            requirements: BTreeSet::new(),
            suggested_version_code: self.suggested_version_code.as_ref().and_then(version_code),
            localized: self.localized,
            packages: releases.into_iter().map(|release| release.into_package(&id)).collect(),
            id,
        }
    }
}

#[derive(Deserialize, Default)]
#[serde(default, rename_all = "camelCase")]
struct RawPackage {
    version_name: String,
    version_code: u64,
    apk_name: String,
    hash: String,
    size: u64,
    sig: String,
    min_sdk_version: Option<Value>,
    target_sdk_version: Option<Value>,
    added: Option<i64>,
    #[serde(rename = "uses-permission")]
    uses_permission: Vec<Vec<Value>>,
    nativecode: Vec<String>,
    features: Vec<String>,
}
impl RawPackage {
    fn into_package(self, id: &str) -> Package {
        Package {
            added: date(id, "package.added", self.added),
            version: self.version_name,
            version_code: self.version_code,
            artifact: self.apk_name,
            hash: self.hash,
            signature: self.sig,
            size: self.size,
            min_sdk: self.min_sdk_version.as_ref().and_then(sdk_version),
            target_sdk: self.target_sdk_version.as_ref().and_then(sdk_version),
            // Each entry is `[name, maxSdkVersion]`.
            permissions: self
                .uses_permission
                .iter()
                .filter_map(|entry| entry.first().and_then(Value::as_str))
                .map(str::to_string)
                .collect(),
            native_code: self.nativecode.into_iter().collect(),
            features: self.features.into_iter().collect(),
            built: None,
        }
    }
}

/// Only string values count as text; anything else is treated as absent.
fn text(value: Option<Value>) -> Option<String> {
    match value {
        Some(Value::String(text)) => Some(text),
        _ => None,
    }
}

/// Numeric fields that some index generators write as strings.
fn version_code(value: &Value) -> Option<u64> {
    value.as_u64().or_else(|| value.as_str().and_then(|code| code.trim().parse().ok()))
}

fn sdk_version(value: &Value) -> Option<u32> {
    version_code(value).and_then(|version| u32::try_from(version).ok())
}

fn date(id: &str, field: &'static str, millis: Option<i64>) -> Option<Date> {
    match date_from_unix_millis(millis?) {
        Ok(date) => Some(date),
        Err(err) => {
            tracing::warn!(app = %id, field, error = ?err, "unusable timestamp");
            None
        },
    }
}
