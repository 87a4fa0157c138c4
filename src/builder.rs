use std::sync::Arc;

use regex::Regex;

use crate::content::Encoding;
use crate::error::FsError;
use crate::filter::EntryFilter;
use crate::traits::{DirectoryMatcher, Matcher};

/// Default cap on concurrent stat/read operations within one stage.
pub const DEFAULT_CONCURRENCY: usize = 32;

// ---------------------------------------------------------------------------
// ReadOptions
// ---------------------------------------------------------------------------

/// Options for [`read_directory`](crate::read_directory) and
/// [`read_files`](crate::read_files).
///
/// Every option is independent and unset by default. Some imply others,
/// and [`resolve()`](ReadOptions::resolve) computes those implications
/// once, before any I/O, without touching this value:
///
/// - `recurse` and `only_files` imply `read_stat`
/// - `read_stat` implies `as_object`
///
/// Only one of `file_names`, `pattern` and `filter` is used, in that order.
///
/// # Example
///
/// ```rust
/// let options = streamfs::ReadOptions::new()
///     .recurse(true)
///     .filter_directory(|d: &streamfs::FileEntry| d.name != "node_modules")
///     .filter(|f: &streamfs::FileEntry, _: usize| f.name.ends_with(".js"));
/// ```
#[derive(Clone, Default)]
pub struct ReadOptions {
    recurse:          bool,
    only_files:       bool,
    read_stat:        bool,
    as_object:        bool,
    file_names:       Option<Vec<String>>,
    pattern:          Option<PatternSource>,
    filter:           Option<Arc<dyn Matcher>>,
    filter_directory: Option<Arc<dyn DirectoryMatcher>>,
    encoding:         Option<Encoding>,
    concurrency:      Option<usize>,
}

#[derive(Clone)]
enum PatternSource {
    Compiled(Regex),
    Source(String),
}

impl ReadOptions {
    pub fn new() -> Self {
        Self::default()
    }

    // ── Traversal ─────────────────────────────────────────────────────────

    /// Walk subdirectories too. Implies `read_stat`.
    pub fn recurse(mut self, yes: bool) -> Self {
        self.recurse = yes;
        self
    }

    /// Leave directories out of the output. Implies `read_stat`.
    pub fn only_files(mut self, yes: bool) -> Self {
        self.only_files = yes;
        self
    }

    /// Fetch status metadata for every entry. Implies `as_object`.
    pub fn read_stat(mut self, yes: bool) -> Self {
        self.read_stat = yes;
        self
    }

    /// Emit [`FileEntry`](crate::FileEntry) records instead of bare paths.
    pub fn as_object(mut self, yes: bool) -> Self {
        self.as_object = yes;
        self
    }

    // ── Filters ───────────────────────────────────────────────────────────

    /// Admit only entries whose base name is one of `names`, exactly.
    ///
    /// Applies to directories as well as files. An empty list is ignored.
    pub fn file_names<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.file_names = Some(names.into_iter().map(Into::into).collect());
        self
    }

    /// Admit files whose base name matches `pattern`. Directories always pass.
    pub fn pattern(mut self, pattern: Regex) -> Self {
        self.pattern = Some(PatternSource::Compiled(pattern));
        self
    }

    /// Like [`pattern`](Self::pattern), compiled by `resolve()`.
    pub fn pattern_str(mut self, pattern: impl Into<String>) -> Self {
        self.pattern = Some(PatternSource::Source(pattern.into()));
        self
    }

    /// Admit files accepted by `matcher`. Directories always pass; use
    /// `only_files` or `filter_directory` to drop them.
    pub fn filter(mut self, matcher: impl Matcher + 'static) -> Self {
        self.filter = Some(Arc::new(matcher));
        self
    }

    /// When recursing, descend only into directories accepted by `matcher`.
    pub fn filter_directory(mut self, matcher: impl DirectoryMatcher + 'static) -> Self {
        self.filter_directory = Some(Arc::new(matcher));
        self
    }

    // ── Content ───────────────────────────────────────────────────────────

    /// Encoding for content reads. Unset means UTF-8; use
    /// [`Encoding::Raw`] to get bytes.
    pub fn encoding(mut self, encoding: Encoding) -> Self {
        self.encoding = Some(encoding);
        self
    }

    /// Maximum in-flight stat or read operations per stage.
    pub fn concurrency(mut self, n: usize) -> Self {
        self.concurrency = Some(n);
        self
    }

    // ── Resolve ───────────────────────────────────────────────────────────

    /// Compute implied flags and build the entry filter.
    ///
    /// # Errors
    ///
    /// Returns `Err` for a pattern string that does not compile, or a
    /// concurrency of zero.
    pub fn resolve(&self) -> Result<ResolvedOptions, FsError> {
        let concurrency = self.concurrency.unwrap_or(DEFAULT_CONCURRENCY);
        if concurrency == 0 {
            return Err(FsError::InvalidConcurrency(concurrency));
        }

        let pattern = match &self.pattern {
            Some(PatternSource::Compiled(re)) => Some(re.clone()),
            Some(PatternSource::Source(src)) => Some(Regex::new(src)?),
            None => None,
        };

        let read_stat = self.read_stat || self.only_files || self.recurse;

        Ok(ResolvedOptions {
            recurse: self.recurse,
            only_files: self.only_files,
            read_stat,
            as_object: self.as_object || read_stat,
            filter: Arc::new(EntryFilter::from_parts(
                self.file_names.as_deref(),
                pattern,
                self.filter.clone(),
            )),
            filter_directory: self.filter_directory.clone(),
            encoding: self.encoding.unwrap_or_default(),
            concurrency,
        })
    }
}

// ---------------------------------------------------------------------------
// ResolvedOptions
// ---------------------------------------------------------------------------

/// Options with every implication applied. Immutable and cheap to clone.
#[derive(Clone)]
pub struct ResolvedOptions {
    recurse:          bool,
    only_files:       bool,
    read_stat:        bool,
    as_object:        bool,
    filter:           Arc<EntryFilter>,
    filter_directory: Option<Arc<dyn DirectoryMatcher>>,
    encoding:         Encoding,
    concurrency:      usize,
}

impl ResolvedOptions {
    pub fn recurse(&self) -> bool {
        self.recurse
    }

    pub fn only_files(&self) -> bool {
        self.only_files
    }

    pub fn read_stat(&self) -> bool {
        self.read_stat
    }

    pub fn as_object(&self) -> bool {
        self.as_object
    }

    pub fn encoding(&self) -> Encoding {
        self.encoding
    }

    pub fn concurrency(&self) -> usize {
        self.concurrency
    }

    pub(crate) fn filter(&self) -> &EntryFilter {
        &self.filter
    }

    /// No `filter_directory` means every directory is descended into.
    pub(crate) fn should_descend(&self, dir: &crate::entry::FileEntry) -> bool {
        self.filter_directory
            .as_ref()
            .map_or(true, |m| m.should_descend(dir))
    }

    /// Settings the recursive walker lists each directory with: stat on,
    /// records out, directories kept so the walker can see them.
    pub(crate) fn for_deep_listing(&self) -> Self {
        Self {
            only_files: false,
            read_stat: true,
            as_object: true,
            ..self.clone()
        }
    }

    /// A flat content read has nothing to read in a directory.
    pub(crate) fn skipping_directories(&self) -> Self {
        Self {
            only_files: true,
            read_stat: true,
            as_object: true,
            ..self.clone()
        }
    }
}
