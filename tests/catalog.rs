use repodex::error::ErrorKind;
use repodex::{Catalog, Config, Order, Window, open, parse_date};
use rstest::rstest;
use serde_json::{Value, json};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};
use tempfile::TempDir;

/// Milliseconds since the epoch at midnight UTC of the given day.
fn millis(date: &str) -> i64 {
    let date = parse_date(date).unwrap();
    date.midnight().assume_utc().unix_timestamp() * 1000
}

fn set_modified(path: &Path, date: &str) {
    let secs = u64::try_from(millis(date) / 1000).unwrap() + 3600;
    let file = fs::File::options().write(true).open(path).unwrap();
    file.set_modified(SystemTime::UNIX_EPOCH + Duration::from_secs(secs)).unwrap();
}

struct Fixture {
    root: TempDir,
    apps: Vec<Value>,
    packages: serde_json::Map<String, Value>,
}
impl Fixture {
    fn new() -> Self {
        Self { root: tempfile::tempdir().unwrap(), apps: vec![], packages: Default::default() }
    }

    fn repo_dir(&self) -> PathBuf {
        self.root.path().join("repo")
    }

    fn app(mut self, id: &str, category: &str, added: &str, updated: &str, extra: Value) -> Self {
        let mut app = json!({
            "packageName": id,
            "name": id.rsplit('.').next().unwrap(),
            "summary": format!("Summary of {id}"),
            "license": "GPL-3.0-only",
            "categories": [category],
            "added": millis(added),
            "lastUpdated": millis(updated),
        });
        if let (Some(app), Some(extra)) = (app.as_object_mut(), extra.as_object()) {
            app.extend(extra.clone());
        }
        self.apps.push(app);
        self.packages.insert(
            id.to_string(),
            json!([{"versionName": "1.0", "versionCode": 1, "apkName": format!("{id}_1.apk"), "size": 10}]),
        );
        self
    }

    fn write(self, categories: Option<&str>) -> Self {
        let repo = self.repo_dir();
        fs::create_dir_all(&repo).unwrap();
        let index = json!({
            "repo": {
                "name": "Test Repo",
                "address": "https://example.org/repo",
                "timestamp": millis("2016-03-10"),
                "version": 18,
                "description": "Testing"
            },
            "apps": &self.apps,
            "packages": &self.packages,
        });
        fs::write(repo.join("index-v1.json"), index.to_string()).unwrap();
        if let Some(categories) = categories {
            fs::write(repo.join("categories.txt"), categories).unwrap();
        }
        self
    }

    fn artifact(self, file: &str, built: &str) -> Self {
        let path = self.repo_dir().join(file);
        fs::write(&path, b"apk").unwrap();
        set_modified(&path, built);
        self
    }

    fn metadata(self, id: &str, contents: &str) -> Self {
        let dir = self.root.path().join("metadata");
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join(format!("{id}.yml")), contents).unwrap();
        self
    }

    fn config(&self) -> Config {
        Config::new(self.repo_dir())
    }

    fn open(&self) -> Catalog {
        open(&self.config()).unwrap()
    }
}

fn twelve_apps() -> Fixture {
    let mut fixture = Fixture::new();
    for i in 0..12 {
        let category = if i == 7 { "None" } else { "Games" };
        let extra = match i {
            3 => json!({"summary": "Ad blocker for everyone"}),
            _ => json!({}),
        };
        fixture = fixture.app(&format!("org.example.app{i:02}"), category, "2016-01-01", "2016-02-01", extra);
    }
    fixture.write(Some("None\nGames\n"))
}

#[test]
fn test_open_index_only_repository() {
    let fixture = twelve_apps();
    let catalog = fixture.open();
    assert!(catalog.index_only());
    assert_eq!(catalog.meta().name, "Test Repo");
    assert_eq!(catalog.meta().app_count, 12);
    assert_eq!(catalog.meta().timestamp, 1_457_568_000);
    assert_eq!(catalog.categories(), ["Games", "None"]);
    assert_eq!(catalog.licenses(), ["GPL-3.0-only"]);
}

#[rstest]
#[case(0, 5, 5)]
#[case(5, 5, 5)]
#[case(10, 5, 2)]
#[case(3, 0, 9)]
#[case(-3, 0, 9)]
#[case(12, 1, 0)]
#[case(20, 0, 0)]
fn test_app_list_slices(#[case] start: i64, #[case] limit: i64, #[case] expected: usize) {
    let catalog = twelve_apps().open();
    let page = catalog.apps(Window::new(start, limit), Order::Name);
    assert_eq!(page.len(), expected);
    assert_eq!(page.total, 12);
    if let Some(first) = page.first() {
        assert_eq!(first.id, format!("org.example.app{:02}", start.unsigned_abs()));
    }
}

#[test]
fn test_category_queries() {
    let catalog = twelve_apps().open();
    let page = catalog.apps_by_category("None", Window::default());
    assert_eq!(page.ids().collect::<Vec<_>>(), ["org.example.app07"]);
    assert_eq!(page.total, 1);
    assert_eq!(catalog.full_hits(), 1);

    let first = catalog.apps_by_category("Games", Window::default());
    let second = catalog.apps_by_category("Games", Window::default());
    assert_eq!(first, second);
    assert_eq!(first.total, 11);

    let page = catalog.apps_by_license("unknown-license", Window::default());
    assert!(page.is_empty());
    assert_eq!(page.total, 0);
}

#[test]
fn test_search_requires_full_text() {
    let mut catalog = twelve_apps().open();
    let page = catalog.search("block", Window::default());
    assert!(page.is_empty());
    assert_eq!(page.total, 0);

    catalog.set_full_text(true);
    catalog.rebuild_indexes();
    let page = catalog.search("block", Window::default());
    assert_eq!(page.ids().collect::<Vec<_>>(), ["org.example.app03"]);
    assert_eq!(page.total, 1);
}

#[test]
fn test_full_text_from_config() {
    let fixture = twelve_apps();
    let mut config = fixture.config();
    config.full_text = true;
    config.limit = -4;
    let catalog = open(&config).unwrap();
    assert_eq!(catalog.limit(), 4);
    // One of the twelve has its own summary.
    assert_eq!(catalog.search("SUMMARY OF", Window::default()).len(), 4);
    assert_eq!(catalog.full_hits(), 11);
}

#[test]
fn test_added_since() {
    let catalog = Fixture::new()
        .app("org.example.a", "Games", "2016-03-09", "2016-03-09", json!({}))
        .app("org.example.b", "Games", "2016-03-09", "2016-03-09", json!({}))
        .app("org.example.c", "Games", "2016-03-10", "2016-03-10", json!({}))
        .write(None)
        .open();
    let page = catalog.apps_added_since("2016-03-10", Window::default());
    assert_eq!(page.ids().collect::<Vec<_>>(), ["org.example.c"]);
    assert_eq!(page.total, 1);
    assert!(catalog.categories().is_empty());
}

#[test]
fn test_intersect() {
    let catalog = twelve_apps().open();
    let all = catalog.apps(Window::all(), Order::Name);
    let same = catalog.intersect(all.clone(), all.iter().copied(), Window::default());
    assert_eq!(same, all);
    assert_eq!(same.total, 12);

    let games = catalog.apps_by_category("Games", Window::all());
    let none = catalog.apps_by_category("None", Window::all());
    let page = catalog.intersect(games, none, Window::default());
    assert!(page.is_empty());
    assert_eq!(page.total, 0);
}

#[test]
fn test_rebuild_is_structurally_equal() {
    let mut catalog = twelve_apps().open();
    let first = catalog.build_indexes().clone();
    let second = catalog.rebuild_indexes();
    assert_eq!(first.by_id(), second.by_id());
    assert_eq!(first.by_category(), second.by_category());
    assert_eq!(first.by_license(), second.by_license());
}

fn local_repository() -> Fixture {
    Fixture::new()
        .app("org.example.old", "System", "2016-01-01", "2016-01-10", json!({}))
        .app("org.example.root", "System", "2016-01-01", "2016-01-10", json!({}))
        .app("org.example.stale", "System", "2016-01-01", "2016-03-01", json!({}))
        .write(None)
        .artifact("org.example.old_1.apk", "2016-01-05")
        .artifact("org.example.root_1.apk", "2016-02-20")
        .artifact("org.example.stale_1.apk", "2016-02-01")
        .metadata("org.example.root", "Categories:\n  - System\nAppAdded: 2015-11-30\nRequiresRoot: yes\n")
}

#[test]
fn test_local_repository() {
    let fixture = local_repository();
    let catalog = fixture.open();
    assert!(!catalog.index_only());

    let old = catalog.app_by_id("org.example.old").unwrap();
    assert_eq!(old.built, Some(parse_date("2016-01-05").unwrap()));
    assert_eq!(old.packages[0].built, old.built);
    assert_eq!(old.last_updated, Some(parse_date("2016-01-10").unwrap()));
    assert!(old.requirements.is_empty());

    let root = catalog.app_by_id("org.example.root").unwrap();
    assert_eq!(root.added, Some(parse_date("2015-11-30").unwrap()));
    // Replacing the artifact counts as an update.
    assert_eq!(root.last_updated, Some(parse_date("2016-02-20").unwrap()));
    assert!(root.requirements.contains("root"));

    let page = catalog.apps_built_since("2016-02-01", Window::default());
    assert_eq!(page.ids().collect::<Vec<_>>(), ["org.example.root", "org.example.stale"]);
    let page = catalog.apps_updated_since("2016-02-15", Window::default());
    assert_eq!(page.ids().collect::<Vec<_>>(), ["org.example.stale", "org.example.root"]);
}

#[test]
fn test_date_order_is_independent_of_build() {
    let fixture = local_repository();
    let catalog = fixture.open();
    let before: Vec<_> = catalog.apps(Window::all(), Order::Added).ids().map(str::to_string).collect();
    catalog.build_indexes();
    let after: Vec<_> = catalog.apps(Window::all(), Order::Added).ids().map(str::to_string).collect();
    assert_eq!(before, after);
    // The metadata file dates `root` before the others.
    assert_eq!(after, ["org.example.root", "org.example.old", "org.example.stale"]);

    let updated = catalog.apps(Window::all(), Order::Updated);
    assert_eq!(updated.ids().collect::<Vec<_>>(), ["org.example.old", "org.example.root", "org.example.stale"]);
}

#[test]
fn test_index_only_override() {
    let fixture = local_repository();
    let mut config = fixture.config();
    config.index_only = Some(true);
    let catalog = open(&config).unwrap();
    assert!(catalog.index_only());
    let old = catalog.app_by_id("org.example.old").unwrap();
    assert_eq!(old.built, None);
    assert!(catalog.apps_built_since("1970-01-01", Window::default()).is_empty());
    let root = catalog.app_by_id("org.example.root").unwrap();
    assert_eq!(root.added, Some(parse_date("2016-01-01").unwrap()));
}

#[test]
fn test_open_failures() {
    let fixture = Fixture::new();
    let err = open(&fixture.config()).unwrap_err();
    assert_eq!(*err, ErrorKind::Load);

    fs::create_dir_all(fixture.repo_dir()).unwrap();
    // Well-formed, but without a `<repo>`.
    fs::write(fixture.repo_dir().join("index.xml"), "<fdroid/>").unwrap();
    let err = open(&Config::new(fixture.repo_dir().join("index.xml"))).unwrap_err();
    assert_eq!(*err, ErrorKind::Load);
    assert!(!err.is_retryable());

    fs::write(fixture.repo_dir().join("index-v1.jar"), b"PK").unwrap();
    let err = open(&Config::new(fixture.repo_dir().join("index-v1.jar"))).unwrap_err();
    assert_eq!(*err, ErrorKind::Load);
}

#[test]
fn test_open_xml_repository() {
    // The XML index wins over the JSON one in the same directory.
    let fixture = twelve_apps();
    let xml = r#"<?xml version="1.0" encoding="utf-8"?>
<fdroid>
    <repo name="XML Repo" url="https://example.org/repo" pubkey="3082" timestamp="1457568000" version="12">
        <description>Legacy index</description>
    </repo>
    <application id="org.example.first">
        <id>org.example.first</id>
        <added>2016-03-01</added>
        <lastupdated>2016-03-01</lastupdated>
        <name>First</name>
        <summary>Plays things</summary>
        <license>MIT</license>
        <categories>Games</categories>
        <package><version>1.0</version><versioncode>1</versioncode><apkname>first_1.apk</apkname></package>
    </application>
    <application id="org.example.second">
        <id>org.example.second</id>
        <added>2016-03-05</added>
        <lastupdated>2016-03-08</lastupdated>
        <name>Second</name>
        <summary>Blocks ads</summary>
        <license>GPL-3.0-only</license>
        <categories>System,Games</categories>
        <package><version>2.0</version><versioncode>2</versioncode><apkname>second_2.apk</apkname></package>
    </application>
</fdroid>
"#;
    fs::write(fixture.repo_dir().join("index.xml"), xml).unwrap();
    let mut config = fixture.config();
    config.full_text = true;
    let catalog = open(&config).unwrap();
    assert_eq!(catalog.meta().name, "XML Repo");
    assert_eq!(catalog.meta().public_key, "3082");
    assert_eq!(catalog.meta().app_count, 2);
    assert_eq!(catalog.licenses(), ["GPL-3.0-only", "MIT"]);

    let page = catalog.apps(Window::default(), Order::Added);
    assert_eq!(page.ids().collect::<Vec<_>>(), ["org.example.second", "org.example.first"]);
    let page = catalog.apps_by_category("Games", Window::default());
    assert_eq!(page.total, 2);
    let page = catalog.search("blocks", Window::default());
    assert_eq!(page.ids().collect::<Vec<_>>(), ["org.example.second"]);
}
