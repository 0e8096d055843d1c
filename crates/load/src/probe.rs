//! Build dates and source metadata from a local repository checkout.

use crate::source::metadata_dir;
use regex::Regex;
use repodex_index::{ArtifactProbe, SourceMetadata};
use repodex_model::parse_date;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;
use time::{Date, OffsetDateTime};

macro_rules! regex {
    ($name:ident, $regex:expr) => {
        static $name: LazyLock<Regex> = LazyLock::new(|| Regex::new($regex).unwrap());
    };
}

regex!(APP_ADDED_REGEX, r"(?m)^\s*AppAdded:\s?(\d{4}-\d{2}-\d{2})");
// Matches `Requires Root: yes` as well as `RequiresRoot: 'yes'`.
regex!(REQUIRES_ROOT_REGEX, r"(?im)^Requires ?Root:\s*'?yes'?\s*$");

const METADATA_EXTENSIONS: [&str; 2] = ["yml", "txt"];

/// Reads artifact modification times from the repository directory and
/// source metadata files from the `metadata` directory next to it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocalProbe {
    repo_dir: PathBuf,
    metadata_dir: PathBuf,
}
impl LocalProbe {
    pub fn new(repo_dir: impl Into<PathBuf>) -> Self {
        let repo_dir = repo_dir.into();
        let metadata_dir = metadata_dir(&repo_dir);
        Self { repo_dir, metadata_dir }
    }

    pub fn repo_dir(&self) -> &Path {
        &self.repo_dir
    }

    fn metadata_file(&self, id: &str) -> Option<PathBuf> {
        METADATA_EXTENSIONS
            .iter()
            .map(|ext| self.metadata_dir.join(format!("{id}.{ext}")))
            .find(|path| path.is_file())
    }
}

impl ArtifactProbe for LocalProbe {
    fn built_date(&self, artifact: &str) -> Option<Date> {
        let path = self.repo_dir.join(artifact);
        modified_date(&path)
    }

    fn source_metadata(&self, id: &str) -> Option<SourceMetadata> {
        let path = self.metadata_file(id)?;
        let contents = match std::fs::read_to_string(&path) {
            Ok(contents) => contents,
            Err(err) => {
                tracing::debug!(app = %id, path = %path.display(), error = %err, "unreadable metadata file");
                return None;
            },
        };
        let mut metadata = parse_metadata(&contents);
        if metadata.added.is_none() {
            metadata.modified = modified_date(&path);
        }
        Some(metadata)
    }
}

fn modified_date(path: &Path) -> Option<Date> {
    match std::fs::metadata(path).and_then(|metadata| metadata.modified()) {
        Ok(modified) => Some(OffsetDateTime::from(modified).date()),
        Err(err) => {
            tracing::debug!(path = %path.display(), error = %err, "no modification time");
            None
        },
    }
}

/// Extract the fields of interest from a metadata file's contents.
fn parse_metadata(contents: &str) -> SourceMetadata {
    let added = APP_ADDED_REGEX
        .captures(contents)
        .and_then(|captures| captures.get(1))
        .and_then(|added| parse_date(added.as_str()).ok());
    SourceMetadata {
        added,
        modified: None,
        requires_root: REQUIRES_ROOT_REGEX.is_match(contents),
    }
}
