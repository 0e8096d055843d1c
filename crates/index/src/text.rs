use regex::Regex;
use repodex_model::Application;
use std::sync::LazyLock;

static TAG_REGEX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?s)<!--.*?-->|<[^>]*>").unwrap());

/// Remove markup tags (and comments), keeping the text between them.
pub(crate) fn strip_tags(html: &str) -> String {
    TAG_REGEX.replace_all(html, "").into_owned()
}

/// The lowercase blob searched by full-text queries: display name, summary
/// and the tag-stripped description, concatenated as-is.
pub(crate) fn search_blob(app: &Application) -> String {
    [app.display_name(), app.summary.as_str(), strip_tags(&app.description).as_str()].concat().to_lowercase()
}
