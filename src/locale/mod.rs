//! Locale consistency checker.
//!
//! Reads a reference localization file and its translations (JSON), checks
//! that every translation has the same keys in the same order, then scans
//! source files for key usage to find unknown keys and orphans.
//!
//! Built entirely on [`read_files`](crate::read_files): a flat read with
//! `file_names` for the localization files, a recursive read with
//! `filter_directory` and `filter` for the sources.

mod keys;
mod report;

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Instant;

use futures_util::StreamExt;
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, warn};

use crate::builder::ReadOptions;
use crate::content::Encoding;
use crate::engine::read_files;
use crate::entry::FileEntry;
use crate::error::LocaleError;

pub use keys::{find_keys, list_paths};
pub use report::{Comparison, Report};

// ---------------------------------------------------------------------------
// LocaleConfig
// ---------------------------------------------------------------------------

/// Where the localization files and sources are, and what to skip.
///
/// Every field has a default, so a config file only lists what it changes.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LocaleConfig {
    /// Directory holding the localization files.
    pub locales_dir: PathBuf,

    /// The most up-to-date file: source keys are checked against it.
    pub reference_file: String,

    /// Translations compared with the reference.
    pub other_files: Vec<String>,

    /// Encoding of every file read (`utf8`, `latin1`, `ascii`).
    pub encoding: String,

    /// Root of the source tree scanned for key usage.
    pub source_path: PathBuf,

    /// Directory names never descended into.
    pub excluded_directories: Vec<String>,

    /// File name suffixes that are scanned.
    pub source_extensions: Vec<String>,
}

impl Default for LocaleConfig {
    fn default() -> Self {
        Self {
            locales_dir:          PathBuf::from("./examples/CheckLocaleConsistency"),
            reference_file:       "locale-en.json".into(),
            other_files:          vec!["locale-de.json".into(), "locale-fr.json".into()],
            encoding:             "utf8".into(),
            source_path:          PathBuf::from("../../"),
            excluded_directories: vec!["node_modules".into(), ".git".into()],
            source_extensions:    vec![".html".into(), ".js".into()],
        }
    }
}

impl LocaleConfig {
    /// Load a JSON config file.
    pub fn load(path: &Path) -> Result<Self, LocaleError> {
        let text = std::fs::read_to_string(path).map_err(|source| LocaleError::ConfigRead {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&text).map_err(|source| LocaleError::ConfigParse {
            path: path.to_path_buf(),
            source,
        })
    }

    fn text_encoding(&self) -> Result<Encoding, LocaleError> {
        match self.encoding.parse::<Encoding>() {
            Ok(Encoding::Raw) => Err(LocaleError::Encoding(
                "localization files need a text encoding".into(),
            )),
            Ok(encoding) => Ok(encoding),
            Err(e) => Err(LocaleError::Encoding(e)),
        }
    }
}

// ---------------------------------------------------------------------------
// Check
// ---------------------------------------------------------------------------

/// Run the whole check.
///
/// # Errors
///
/// Returns `Err` only when the localization files cannot be read or parsed;
/// everything found while scanning sources lands in the [`Report`].
pub async fn check(config: &LocaleConfig) -> Result<Report, LocaleError> {
    let mut localizations = read_localizations(config).await?;
    let reference = localizations
        .remove(&config.reference_file)
        .ok_or_else(|| LocaleError::MissingReference(config.reference_file.clone()))?;
    let reference_keys = list_paths(&reference);

    let comparisons = config
        .other_files
        .iter()
        .map(|file| {
            let comparison = match localizations.get(file) {
                Some(value) => compare(&reference_keys, &list_paths(value)),
                None => Comparison::Absent,
            };
            (file.clone(), comparison)
        })
        .collect();

    let start = Instant::now();
    let scan = scan_sources(config, &reference_keys).await?;

    let orphans = reference_keys
        .iter()
        .filter(|k| scan.counts.get(k.as_str()).copied().unwrap_or(0) == 0)
        .cloned()
        .collect();

    Ok(Report {
        reference_file: config.reference_file.clone(),
        comparisons,
        errors: scan.errors,
        orphans,
        files: scan.files,
        duration: start.elapsed(),
    })
}

/// Parse the reference and translation files, keyed by file name.
pub async fn read_localizations(
    config: &LocaleConfig,
) -> Result<HashMap<String, Value>, LocaleError> {
    let mut names = vec![config.reference_file.clone()];
    names.extend(config.other_files.iter().cloned());

    let options = ReadOptions::new()
        .file_names(names)
        .encoding(config.text_encoding()?);

    let mut files = read_files(config.locales_dir.clone(), &options)?;
    let mut by_name = HashMap::new();
    while let Some(file) = files.next().await {
        let file = file?;
        let value = parse_json(&file)?;
        debug!(target: "streamfs::locale", file = %file.name, "parsed localization");
        by_name.insert(file.name, value);
    }
    Ok(by_name)
}

fn parse_json(file: &FileEntry) -> Result<Value, LocaleError> {
    serde_json::from_str(file.text().unwrap_or_default()).map_err(|source| LocaleError::Parse {
        path: file.full_path.clone(),
        source,
    })
}

/// Compare a translation's key list with the reference's.
pub fn compare(reference: &[String], other: &[String]) -> Comparison {
    if reference == other {
        return Comparison::Identical;
    }
    Comparison::Different {
        missing: keys::difference(reference, other),
        extra: keys::difference(other, reference),
    }
}

// ---------------------------------------------------------------------------
// Source scan
// ---------------------------------------------------------------------------

struct Scan {
    counts: HashMap<String, usize>,
    errors: Vec<String>,
    files:  Vec<String>,
}

async fn scan_sources(
    config: &LocaleConfig,
    reference_keys: &[String],
) -> Result<Scan, LocaleError> {
    let excluded = config.excluded_directories.clone();
    let extensions = config.source_extensions.clone();
    let options = ReadOptions::new()
        .recurse(true)
        .encoding(config.text_encoding()?)
        .filter_directory(move |d: &FileEntry| !excluded.contains(&d.name))
        .filter(move |f: &FileEntry, _: usize| {
            extensions.iter().any(|ext| f.name.ends_with(ext.as_str()))
        });

    let mut scan = Scan {
        counts: reference_keys.iter().map(|k| (k.clone(), 0)).collect(),
        errors: Vec::new(),
        files:  Vec::new(),
    };

    let mut sources = read_files(config.source_path.clone(), &options)?;
    while let Some(file) = sources.next().await {
        match file {
            Ok(file) => scan.record(&file),
            Err(e) => {
                warn!(target: "streamfs::locale", error = %e, "source scan stopped");
                scan.errors.push(error_chain(&e));
            }
        }
    }
    Ok(scan)
}

impl Scan {
    fn record(&mut self, file: &FileEntry) {
        let text = file.text().unwrap_or_default();
        if text.is_empty() {
            self.errors.push(format!("Empty {}", file.full_path.display()));
            return;
        }
        self.files.push(file.name.clone());

        for key in find_keys(text) {
            match self.counts.get_mut(key) {
                Some(count) => *count += 1,
                None => self.errors.push(format!("Unknown {key} in {}", file.name)),
            }
        }
    }
}

/// `error: cause: cause`, for one-line reporting.
fn error_chain(error: &dyn std::error::Error) -> String {
    let mut text = error.to_string();
    let mut source = error.source();
    while let Some(cause) = source {
        text.push_str(": ");
        text.push_str(&cause.to_string());
        source = cause.source();
    }
    text
}
