use std::collections::BTreeSet;
use std::fs;
use std::path::Path;

use futures_util::{StreamExt, TryStreamExt};
use regex::Regex;

use streamfs::locale::{self, Comparison, LocaleConfig};
use streamfs::{
    read_directory, read_file, read_files, write_file, FileEntry, FsError, PathOrEntry, ReadOptions,
};

// ---------------------------------------------------------------------------
// Test helpers
// ---------------------------------------------------------------------------

/// Create a temporary directory tree for testing.
///
/// Structure:
/// ```
/// tmp/
///   templateLeftPanelController.js
///   templateLeftPanelView.html
///   README.md
///   dialog/
///     templateCreationController.js
///     nested/
///       deep.html
///   node_modules/
///     lib.js
/// ```
fn setup_test_dir() -> tempfile::TempDir {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path();

    fs::write(root.join("templateLeftPanelController.js"), "angular.module('x');").unwrap();
    fs::write(root.join("templateLeftPanelView.html"), "<div>PANEL.TITLE</div>").unwrap();
    fs::write(root.join("README.md"), "# sample\nSome notes about the sample.").unwrap();

    let dialog = root.join("dialog");
    fs::create_dir(&dialog).unwrap();
    fs::write(dialog.join("templateCreationController.js"), "t('DIALOG.CREATE');").unwrap();

    let nested = dialog.join("nested");
    fs::create_dir(&nested).unwrap();
    fs::write(nested.join("deep.html"), "<b>DIALOG.NESTED</b>").unwrap();

    let modules = root.join("node_modules");
    fs::create_dir(&modules).unwrap();
    fs::write(modules.join("lib.js"), "t('LIB.ONLY');").unwrap();

    dir
}

fn names(entries: &[PathOrEntry]) -> BTreeSet<String> {
    entries
        .iter()
        .map(|e| e.path().file_name().unwrap().to_string_lossy().into_owned())
        .collect()
}

fn leaf_count(root: &Path) -> usize {
    walkdir::WalkDir::new(root)
        .into_iter()
        .filter_map(Result::ok)
        .filter(|e| !e.file_type().is_dir())
        .count()
}

async fn list(root: &Path, options: &ReadOptions) -> Vec<PathOrEntry> {
    read_directory(root, options).unwrap().try_collect().await.unwrap()
}

// ---------------------------------------------------------------------------
// Flat listing
// ---------------------------------------------------------------------------

#[tokio::test]
async fn flat_filter_yields_one_bare_path() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("a.html"), "<p/>").unwrap();
    fs::write(dir.path().join("b.js"), "1;").unwrap();

    let options = ReadOptions::new().filter(|f: &FileEntry, _: usize| f.name.ends_with(".html"));
    let out = list(dir.path(), &options).await;

    assert_eq!(out.len(), 1);
    assert!(matches!(&out[0], PathOrEntry::Bare(p) if p.ends_with("a.html")));
}

#[tokio::test]
async fn file_names_select_files_and_directories() {
    let dir = setup_test_dir();
    let options = ReadOptions::new().file_names([
        "templateLeftPanelController.js",
        "templateLeftPanelView.html",
        "dialog",
        "missing.txt",
    ]);
    let out = list(dir.path(), &options).await;

    let expected: BTreeSet<String> = [
        "templateLeftPanelController.js",
        "templateLeftPanelView.html",
        "dialog",
    ]
    .into_iter()
    .map(String::from)
    .collect();
    assert_eq!(names(&out), expected);
}

#[tokio::test]
async fn file_names_do_not_let_other_directories_through() {
    let dir = setup_test_dir();
    let options = ReadOptions::new().read_stat(true).file_names(["README.md"]);
    let out = list(dir.path(), &options).await;

    assert_eq!(names(&out), BTreeSet::from(["README.md".to_string()]));
    let entry = out.into_iter().next().unwrap().into_entry().unwrap();
    assert!(entry.is_file());
}

#[tokio::test]
async fn pattern_passes_directories_and_matching_files() {
    let dir = setup_test_dir();
    let options = ReadOptions::new()
        .read_stat(true)
        .pattern(Regex::new(r"^template\w+\.js$").unwrap());
    let out = list(dir.path(), &options).await;

    let expected: BTreeSet<String> = ["templateLeftPanelController.js", "dialog", "node_modules"]
        .into_iter()
        .map(String::from)
        .collect();
    assert_eq!(names(&out), expected);
    assert!(out.iter().all(|e| matches!(e, PathOrEntry::Record(_))));
}

#[tokio::test]
async fn pattern_without_stat_cannot_tell_directories() {
    let dir = setup_test_dir();
    let options = ReadOptions::new().pattern_str(r"\.md$");
    let out = list(dir.path(), &options).await;

    assert_eq!(names(&out), BTreeSet::from(["README.md".to_string()]));
}

#[tokio::test]
async fn only_files_counts_non_directories() {
    let dir = setup_test_dir();
    let out = list(dir.path(), &ReadOptions::new().only_files(true)).await;

    assert_eq!(out.len(), 3);
    for item in out {
        let entry = item.into_entry().expect("only_files implies records");
        assert!(!entry.is_dir());
    }
}

#[tokio::test]
async fn filter_sees_stat_when_requested() {
    let dir = setup_test_dir();
    let options = ReadOptions::new()
        .only_files(true)
        .filter(|f: &FileEntry, _: usize| f.stat.as_ref().is_some_and(|s| s.len() > 25));
    let out = list(dir.path(), &options).await;

    assert_eq!(names(&out), BTreeSet::from(["README.md".to_string()]));
}

#[tokio::test]
async fn as_object_without_stat_gives_bare_records() {
    let dir = setup_test_dir();
    let out = list(dir.path(), &ReadOptions::new().as_object(true)).await;

    assert_eq!(out.len(), 5);
    for item in out {
        let entry = item.into_entry().unwrap();
        assert!(entry.stat.is_none());
        assert!(entry.full_path.ends_with(&entry.name));
    }
}

// ---------------------------------------------------------------------------
// Recursive walk
// ---------------------------------------------------------------------------

#[tokio::test]
async fn recursive_read_emits_every_leaf_then_completes() {
    let dir = setup_test_dir();
    let mut files = read_files(dir.path(), &ReadOptions::new().recurse(true)).unwrap();

    let mut count = 0;
    while let Some(file) = files.next().await {
        let file = file.expect("no errors in a plain tree");
        assert!(file.content.is_some());
        assert!(file.is_file());
        count += 1;
    }
    assert_eq!(count, leaf_count(dir.path()));
    assert_eq!(count, 6);
}

#[tokio::test]
async fn recursive_listing_never_yields_directories() {
    let dir = setup_test_dir();
    let out = list(dir.path(), &ReadOptions::new().recurse(true).only_files(true)).await;

    assert_eq!(out.len(), leaf_count(dir.path()));
    assert!(out
        .into_iter()
        .all(|e| e.into_entry().is_some_and(|f| !f.is_dir())));
}

#[tokio::test]
async fn filter_directory_prunes_subtrees() {
    let dir = setup_test_dir();
    let options = ReadOptions::new()
        .recurse(true)
        .filter_directory(|d: &FileEntry| d.name != "dialog");
    let out = list(dir.path(), &options).await;

    assert!(!out.is_empty());
    assert!(out
        .iter()
        .all(|e| !e.path().components().any(|c| c.as_os_str() == "dialog")));
    assert!(names(&out).contains("lib.js"));
}

#[tokio::test]
async fn recursive_filter_applies_to_files_only() {
    let dir = setup_test_dir();
    let options = ReadOptions::new()
        .recurse(true)
        .filter_directory(|d: &FileEntry| d.name != "node_modules" && d.name != ".git")
        .filter(|f: &FileEntry, _: usize| f.name.ends_with(".js"));
    let out = list(dir.path(), &options).await;

    let expected: BTreeSet<String> = [
        "templateLeftPanelController.js",
        "templateCreationController.js",
    ]
    .into_iter()
    .map(String::from)
    .collect();
    assert_eq!(names(&out), expected);
}

#[tokio::test]
async fn missing_root_ends_with_one_error() {
    let dir = tempfile::tempdir().unwrap();
    let out: Vec<_> = read_files(dir.path().join("absent"), &ReadOptions::new().recurse(true))
        .unwrap()
        .collect()
        .await;

    assert_eq!(out.len(), 1);
    assert!(matches!(&out[0], Err(FsError::ReadDir { .. })));
}

/// Assert `out` ends with its only error, a stat failure on `link`.
#[cfg(unix)]
fn assert_ends_with_stat_error<T>(out: &[Result<T, FsError>], link: &Path) {
    assert_eq!(out.iter().filter(|r| r.is_err()).count(), 1);
    match out.last() {
        Some(Err(FsError::Stat { path, .. })) => assert!(path.ends_with(link)),
        _ => panic!("stream did not end with a stat error"),
    }
}

#[cfg(unix)]
#[tokio::test]
async fn dangling_link_ends_flat_listing_with_stat_error() {
    let dir = setup_test_dir();
    std::os::unix::fs::symlink(dir.path().join("no-target"), dir.path().join("dangling")).unwrap();

    let options = ReadOptions::new().only_files(true);
    let out: Vec<_> = read_directory(dir.path(), &options).unwrap().collect().await;

    assert_ends_with_stat_error(&out, Path::new("dangling"));
}

#[cfg(unix)]
#[tokio::test]
async fn dangling_link_ends_recursive_walk_with_stat_error() {
    let dir = setup_test_dir();
    let nested = dir.path().join("dialog").join("nested");
    std::os::unix::fs::symlink(nested.join("no-target"), nested.join("dangling")).unwrap();

    let options = ReadOptions::new().recurse(true);
    let out: Vec<_> = read_directory(dir.path(), &options).unwrap().collect().await;

    assert_ends_with_stat_error(&out, Path::new("nested/dangling"));
}

#[tokio::test]
async fn filter_sees_every_listing_position_once() {
    use std::sync::{Arc, Mutex};

    let dir = setup_test_dir();
    let seen = Arc::new(Mutex::new(Vec::new()));
    let record = Arc::clone(&seen);
    let options = ReadOptions::new().filter(move |_: &FileEntry, index: usize| {
        record.lock().unwrap().push(index);
        index % 2 == 0
    });

    let out = list(dir.path(), &options).await;

    let mut indices = seen.lock().unwrap().clone();
    indices.sort_unstable();
    assert_eq!(indices, (0..5).collect::<Vec<_>>());
    assert_eq!(out.len(), 3);
}

// ---------------------------------------------------------------------------
// Content
// ---------------------------------------------------------------------------

#[tokio::test]
async fn flat_read_files_skips_directories() {
    let dir = setup_test_dir();
    let files: Vec<FileEntry> = read_files(dir.path(), &ReadOptions::new())
        .unwrap()
        .try_collect()
        .await
        .unwrap();

    assert_eq!(files.len(), 3);
    let readme = files.iter().find(|f| f.name == "README.md").unwrap();
    assert_eq!(readme.text(), Some("# sample\nSome notes about the sample."));
}

#[tokio::test]
async fn reading_twice_gives_the_same_text() {
    let dir = setup_test_dir();
    let path = dir.path().join("README.md");

    let first = read_file(path.as_path(), None).await.unwrap().into_bare().unwrap();
    let second = read_file(path.as_path(), None).await.unwrap().into_bare().unwrap();
    assert_eq!(first, second);
}

#[tokio::test]
async fn written_content_reads_back() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("fresh.txt");
    let text = "line one\nligne deux é\n";

    write_file(&path, text).await.unwrap();
    let back = read_file(path.as_path(), None).await.unwrap().into_bare().unwrap();
    assert_eq!(back.as_text(), Some(text));
}

#[tokio::test]
async fn invalid_options_fail_up_front() {
    let dir = tempfile::tempdir().unwrap();
    assert!(matches!(
        read_files(dir.path(), &ReadOptions::new().pattern_str("[")),
        Err(FsError::InvalidPattern(_))
    ));
}

// ---------------------------------------------------------------------------
// Locale checker
// ---------------------------------------------------------------------------

fn locale_config(root: &Path) -> LocaleConfig {
    let locales = root.join("locales");
    fs::create_dir(&locales).unwrap();
    fs::write(
        locales.join("locale-en.json"),
        r#"{ "PANEL": { "TITLE": "Panel" }, "DIALOG": { "CREATE": "Create", "NESTED": "Nested", "UNUSED": "x" } }"#,
    )
    .unwrap();
    fs::write(
        locales.join("locale-fr.json"),
        r#"{ "PANEL": { "TITLE": "Panneau" }, "DIALOG": { "CREATE": "Créer", "NESTED": "Imbriqué" } }"#,
    )
    .unwrap();

    LocaleConfig {
        locales_dir: locales,
        other_files: vec!["locale-fr.json".into(), "locale-de.json".into()],
        source_path: root.to_path_buf(),
        ..LocaleConfig::default()
    }
}

#[tokio::test]
async fn locale_check_reports_differences_orphans_and_unknowns() {
    let dir = setup_test_dir();
    fs::write(dir.path().join("broken.js"), "t('NOT.DEFINED');").unwrap();
    let config = locale_config(dir.path());

    let report = locale::check(&config).await.unwrap();

    assert_eq!(
        report.comparisons,
        vec![
            (
                "locale-fr.json".to_string(),
                Comparison::Different {
                    missing: vec!["DIALOG.UNUSED".into()],
                    extra: vec![],
                }
            ),
            ("locale-de.json".to_string(), Comparison::Absent),
        ]
    );
    assert_eq!(report.orphans, vec!["DIALOG.UNUSED"]);
    assert_eq!(report.errors, vec!["Unknown NOT.DEFINED in broken.js"]);
    assert!(!report.files.contains(&"lib.js".to_string()));
    assert!(!report.files.contains(&"README.md".to_string()));
    assert!(!report.is_clean());
}

#[tokio::test]
async fn locale_check_fails_hard_on_bad_json() {
    let dir = tempfile::tempdir().unwrap();
    let config = locale_config(dir.path());
    fs::write(config.locales_dir.join("locale-fr.json"), "{ not json").unwrap();

    let err = locale::check(&config).await.unwrap_err();
    assert!(matches!(err, streamfs::LocaleError::Parse { .. }));
}

#[tokio::test]
async fn locale_check_needs_the_reference_file() {
    let dir = tempfile::tempdir().unwrap();
    let config = LocaleConfig {
        reference_file: "locale-xx.json".into(),
        ..locale_config(dir.path())
    };

    let err = locale::check(&config).await.unwrap_err();
    assert!(matches!(err, streamfs::LocaleError::MissingReference(_)));
}
