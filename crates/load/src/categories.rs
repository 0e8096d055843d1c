use std::path::Path;
use tracing::instrument;

/// Read a category list: one name per line, returned sorted.
///
/// A missing or unreadable file yields an empty list, so category browsing
/// simply isn't offered.
#[instrument(skip_all, fields(path = %path.as_ref().display()))]
pub fn load_categories(path: impl AsRef<Path>) -> Vec<String> {
    let path = path.as_ref();
    match std::fs::read_to_string(path) {
        Ok(contents) => parse_categories(&contents),
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            tracing::debug!("no category list");
            Vec::new()
        },
        Err(err) => {
            tracing::warn!(error = %err, "could not read category list");
            Vec::new()
        },
    }
}

pub(crate) fn parse_categories(contents: &str) -> Vec<String> {
    let mut categories: Vec<String> =
        contents.lines().map(str::trim).filter(|line| !line.is_empty()).map(str::to_string).collect();
    categories.sort();
    categories
}
