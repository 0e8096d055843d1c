//! Reading legacy `index.xml` repository indexes.
//!
//! The XML index carries the same information as `index-v1.json` in a flatter
//! shape: repository metadata as attributes of `<repo>`, one `<application>`
//! per app with its `<package>` releases nested inside, list fields as
//! comma-separated text and dates as `YYYY-MM-DD`.

use crate::document::Document;
use crate::error::{ErrorKind, Result};
use exn::{OptionExt, ResultExt};
use repodex_model::{Application, Donations, Links, Package, Repository, parse_date};
use serde::Deserialize;
use std::str::FromStr;
use time::Date;

/// Parse the contents of an `index.xml` file.
pub fn parse_xml_document(contents: &str) -> Result<Document> {
    let raw: RawIndex = quick_xml::de::from_str(contents).or_raise(|| ErrorKind::InvalidDocument)?;
    let repo = raw.repo.ok_or_raise(|| ErrorKind::MissingField("repo"))?;
    let apps = raw.applications.into_iter().map(RawApp::into_application).collect::<Result<Vec<_>>>()?;
    let repository = Repository {
        name: repo.name,
        url: repo.url,
        public_key: repo.pubkey,
        timestamp: number(&repo.timestamp).unwrap_or_default(),
        version: number(&repo.version).unwrap_or_default(),
        description: repo.description,
        icon: repo.icon.filter(|icon| !icon.is_empty()),
        app_count: apps.len(),
    };
    Ok(Document { repository, apps })
}

#[derive(Deserialize, Default)]
#[serde(default)]
struct RawIndex {
    repo: Option<RawRepo>,
    #[serde(rename = "application")]
    applications: Vec<RawApp>,
}

#[derive(Deserialize, Default)]
#[serde(default)]
struct RawRepo {
    #[serde(rename = "@name")]
    name: String,
    #[serde(rename = "@url")]
    url: String,
    #[serde(rename = "@pubkey")]
    pubkey: String,
    /// Seconds
    #[serde(rename = "@timestamp")]
    timestamp: String,
    #[serde(rename = "@version")]
    version: String,
    #[serde(rename = "@icon")]
    icon: Option<String>,
    description: String,
}

#[derive(Deserialize, Default)]
#[serde(default)]
struct RawApp {
    #[serde(rename = "@id")]
    id_attribute: Option<String>,
    id: Option<String>,
    added: Option<String>,
    lastupdated: Option<String>,
    name: Option<String>,
    summary: String,
    desc: String,
    icon: Option<String>,
    license: Option<String>,
    categories: String,
    web: Option<String>,
    source: Option<String>,
    tracker: Option<String>,
    changelog: Option<String>,
    author: Option<String>,
    email: Option<String>,
    donate: Option<String>,
    flattr: Option<String>,
    liberapay: Option<String>,
    bitcoin: Option<String>,
    litecoin: Option<String>,
    marketvercode: Option<String>,
    antifeatures: String,
    requirements: String,
    #[serde(rename = "package")]
    packages: Vec<RawPackage>,
}
impl RawApp {
    fn into_application(self) -> Result<Application> {
        let id = self
            .id
            .filter(|id| !id.is_empty())
            .or(self.id_attribute)
            .ok_or_raise(|| ErrorKind::MissingField("id"))?;
        let name = non_empty(self.name);
        if name.is_none() {
            tracing::debug!(app = %id, "no usable name in index");
        }
        let mut categories: Vec<String> = Vec::new();
        for category in list(&self.categories) {
            if !categories.contains(&category) {
                categories.push(category);
            }
        }
        Ok(Application {
            added: date(&id, "added", self.added.as_deref()),
            last_updated: date(&id, "lastupdated", self.lastupdated.as_deref()),
            name,
            summary: self.summary,
            description: self.desc,
            icon: non_empty(self.icon),
            license: non_empty(self.license),
            categories,
            author: non_empty(self.author),
            author_email: non_empty(self.email),
            links: Links {
                web: non_empty(self.web),
                source: non_empty(self.source),
                tracker: non_empty(self.tracker),
                changelog: non_empty(self.changelog),
            },
            donations: Donations {
                donate: non_empty(self.donate),
                flattr: non_empty(self.flattr),
                liberapay: non_empty(self.liberapay),
                bitcoin: non_empty(self.bitcoin),
                litecoin: non_empty(self.litecoin),
            },
            built: None,
            anti_features: list(&self.antifeatures).collect(),
            requirements: list(&self.requirements).collect(),
            suggested_version_code: self.marketvercode.as_deref().and_then(number),
            localized: None,
            packages: self.packages.into_iter().map(|release| release.into_package(&id)).collect(),
            id,
        })
    }
}

#[derive(Deserialize, Default)]
#[serde(default)]
struct RawPackage {
    version: String,
    versioncode: String,
    apkname: String,
    hash: RawHash,
    sig: String,
    size: String,
    sdkver: Option<String>,
    #[serde(rename = "targetSdkVersion")]
    target_sdk_version: Option<String>,
    added: Option<String>,
    permissions: String,
    nativecode: String,
    features: String,
}
impl RawPackage {
    fn into_package(self, id: &str) -> Package {
        Package {
            added: date(id, "package.added", self.added.as_deref()),
            version: self.version,
            version_code: number(&self.versioncode).unwrap_or_default(),
            artifact: self.apkname,
            hash: self.hash.value,
            signature: self.sig,
            size: number(&self.size).unwrap_or_default(),
            min_sdk: self.sdkver.as_deref().and_then(number),
            target_sdk: self.target_sdk_version.as_deref().and_then(number),
            permissions: list(&self.permissions).collect(),
            native_code: list(&self.nativecode).collect(),
            features: list(&self.features).collect(),
            built: None,
        }
    }
}

/// `<hash type="sha256">…</hash>`
#[derive(Deserialize, Default)]
#[serde(default)]
struct RawHash {
    #[serde(rename = "$text")]
    value: String,
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|value| !value.trim().is_empty())
}

/// Comma-separated values, trimmed, skipping empty entries.
fn list(value: &str) -> impl Iterator<Item = String> + '_ {
    value.split(',').map(str::trim).filter(|entry| !entry.is_empty()).map(str::to_string)
}

fn number<T: FromStr>(value: &str) -> Option<T> {
    value.trim().parse().ok()
}

fn date(id: &str, field: &'static str, value: Option<&str>) -> Option<Date> {
    let value = value.map(str::trim).filter(|value| !value.is_empty())?;
    match parse_date(value) {
        Ok(date) => Some(date),
        Err(err) => {
            tracing::warn!(app = %id, field, error = ?err, "unusable date");
            None
        },
    }
}
