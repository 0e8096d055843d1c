/// Repository metadata, loaded once alongside the application sequence.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Repository {
    pub name: String,
    /// Canonical address of the repository
    pub url: String,
    /// Signing key (hex), empty when the index format doesn't carry one
    pub public_key: String,
    /// Index generation time, in seconds since the Unix epoch
    pub timestamp: i64,
    /// Index format version
    pub version: u32,
    pub description: String,
    /// File name of the repository icon
    pub icon: Option<String>,
    /// Number of applications in the catalog.
    ///
    /// Recomputed on load; always equal to the length of the application
    /// sequence it was loaded with.
    pub app_count: usize,
}
