use crate::error::{ErrorKind, Result};
use std::path::{Path, PathBuf};

/// File name of the JSON repository index inside a repository directory.
pub const INDEX_FILE: &str = "index-v1.json";
/// File name of the XML repository index, preferred when both are present.
pub const XML_INDEX_FILE: &str = "index.xml";
/// File name of the category list inside a repository directory.
pub const CATEGORIES_FILE: &str = "categories.txt";

/// On-disk format of a repository index.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Json,
    Xml,
}
impl Format {
    fn from_extension(path: &Path) -> Result<Self> {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("json") => Ok(Self::Json),
            Some(ext) if ext.eq_ignore_ascii_case("xml") => Ok(Self::Xml),
            other => exn::bail!(ErrorKind::UnsupportedFormat(other.unwrap_or_default().to_string())),
        }
    }
}

/// Where a repository's files live on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Source {
    /// The index file itself
    pub index: PathBuf,
    pub format: Format,
    /// The repository directory (holding the index and the artifacts)
    pub repo_dir: PathBuf,
}
impl Source {
    /// The default category list location.
    pub fn categories(&self) -> PathBuf {
        self.repo_dir.join(CATEGORIES_FILE)
    }

    /// The source metadata directory, a sibling of the repository directory.
    pub fn metadata_dir(&self) -> PathBuf {
        metadata_dir(&self.repo_dir)
    }

    pub fn is_index_only(&self) -> bool {
        is_index_only(&self.repo_dir)
    }
}

/// Resolve a repository directory or index file path.
///
/// A directory resolves to its `index.xml`, or to `index-v1.json` when there
/// is no XML index. The format follows the file extension; anything but
/// `.xml` and `.json` (e.g. a signed `.jar`) is rejected.
pub fn resolve(path: impl AsRef<Path>) -> Result<Source> {
    let path = path.as_ref();
    let (index, repo_dir) = if path.is_dir() {
        let xml = path.join(XML_INDEX_FILE);
        let index = if xml.is_file() { xml } else { path.join(INDEX_FILE) };
        (index, path.to_path_buf())
    } else if path.is_file() {
        let repo_dir = path.parent().map(Path::to_path_buf).unwrap_or_default();
        (path.to_path_buf(), repo_dir)
    } else {
        exn::bail!(ErrorKind::NotFound(path.to_path_buf()));
    };
    let format = Format::from_extension(&index)?;
    if !index.is_file() {
        exn::bail!(ErrorKind::NotFound(index));
    }
    Ok(Source { index, format, repo_dir })
}

pub(crate) fn metadata_dir(repo_dir: &Path) -> PathBuf {
    repo_dir.parent().unwrap_or(repo_dir).join("metadata")
}

/// A repository is index-only (no local artifacts or source metadata to
/// consult) when there's no `metadata` directory next to it.
pub fn is_index_only(repo_dir: impl AsRef<Path>) -> bool {
    !metadata_dir(repo_dir.as_ref()).is_dir()
}
