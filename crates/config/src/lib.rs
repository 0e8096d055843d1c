//! Layered configuration for opening a repository catalog.
//!
//! Values are merged in order, later sources overriding earlier ones:
//! 1. built-in defaults,
//! 2. `<name>.toml`, `<name>.yaml` and `<name>.json` next to the given
//!    configuration path (each optional),
//! 3. environment variables prefixed with `REPODEX_` (e.g. `REPODEX_LIMIT=20`).

pub mod error;

use crate::error::{ErrorKind, Result};
use directories::ProjectDirs;
use exn::{OptionExt, ResultExt};
use figment::Figment;
use figment::providers::{Env, Format, Json, Serialized, Toml, Yaml};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::instrument;

const ENV_PREFIX: &str = "REPODEX_";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Repository directory, or the index file itself
    pub repository: PathBuf,
    /// Category list; defaults to `categories.txt` in the repository directory
    #[serde(default)]
    pub categories: Option<PathBuf>,
    /// Default page size, `0` for unbounded. The sign is ignored.
    pub limit: i64,
    /// Build the full-text search index
    pub full_text: bool,
    /// Force (or rule out) index-only mode instead of detecting it
    #[serde(default)]
    pub index_only: Option<bool>,
}

#[derive(Serialize)]
struct Defaults {
    limit: i64,
    full_text: bool,
}
impl Default for Defaults {
    fn default() -> Self {
        Self { limit: 0, full_text: false }
    }
}

impl Config {
    /// A configuration for the given repository with every other value at
    /// its default.
    pub fn new(repository: impl Into<PathBuf>) -> Self {
        let defaults = Defaults::default();
        Self {
            repository: repository.into(),
            categories: None,
            limit: defaults.limit,
            full_text: defaults.full_text,
            index_only: None,
        }
    }

    /// The platform's default configuration file, e.g.
    /// `~/.config/repodex/repodex.toml` on Linux.
    pub fn default_path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("", "", "repodex").ok_or_raise(|| ErrorKind::NoConfigDir)?;
        Ok(dirs.config_dir().join("repodex.toml"))
    }

    /// The merged providers for a configuration path, before extraction.
    ///
    /// The extension of `path` is ignored: files with each supported
    /// extension are looked up next to it.
    pub fn figment(path: impl AsRef<Path>) -> Figment {
        let path = path.as_ref();
        Figment::from(Serialized::defaults(Defaults::default()))
            .merge(Toml::file(path.with_extension("toml")))
            .merge(Yaml::file(path.with_extension("yaml")))
            .merge(Json::file(path.with_extension("json")))
            .merge(Env::prefixed(ENV_PREFIX))
    }

    #[instrument(skip_all, fields(path = %path.as_ref().display()))]
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        Self::from_figment(&Self::figment(path))
    }

    /// Extract from a figment, e.g. one returned by [`figment`](Self::figment)
    /// with further providers merged in.
    pub fn from_figment(figment: &Figment) -> Result<Self> {
        let config: Self = figment.extract().or_raise(|| ErrorKind::Extract)?;
        tracing::debug!(?config, "configuration loaded");
        Ok(config)
    }
}
