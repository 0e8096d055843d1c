use std::sync::Arc;
use time::Date;

pub type ProbeHandle = Arc<dyn ArtifactProbe + Send + Sync>;

/// Facts about an application recorded outside the repository index itself,
/// in its source metadata file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SourceMetadata {
    /// Explicit date the application was added to the repository
    pub added: Option<Date>,
    /// Last modification date of the metadata file
    pub modified: Option<Date>,
    /// The application declares it needs root access
    pub requires_root: bool,
}

/// Access to the local artifacts behind a catalog.
///
/// Consulted once per package (and once per application) during the index
/// build, and only when the catalog is not in index-only mode. Probe failures
/// are missing data, never errors: return `None`.
pub trait ArtifactProbe {
    /// Last modification date of the artifact file with the given name.
    fn built_date(&self, artifact: &str) -> Option<Date>;

    /// Source metadata for the application with the given id.
    fn source_metadata(&self, _id: &str) -> Option<SourceMetadata> {
        None
    }
}
