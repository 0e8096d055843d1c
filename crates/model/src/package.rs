use std::collections::BTreeSet;
use time::Date;

/// A single release of an application: one installable artifact.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Package {
    /// Human-readable version name (e.g., `"1.4.2"`)
    pub version: String,
    pub version_code: u64,
    /// File name of the artifact, relative to the repository directory
    pub artifact: String,
    pub hash: String,
    pub signature: String,
    /// Artifact size in bytes
    pub size: u64,
    pub min_sdk: Option<u32>,
    pub target_sdk: Option<u32>,
    /// When this release was added to the repository
    pub added: Option<Date>,
    pub permissions: BTreeSet<String>,
    pub native_code: BTreeSet<String>,
    pub features: BTreeSet<String>,
    /// Last modification date of the artifact on disk.
    ///
    /// Only populated by the index build, and only when local artifacts are
    /// available.
    pub built: Option<Date>,
}
