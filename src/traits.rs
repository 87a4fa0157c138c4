use crate::entry::FileEntry;

/// Decides whether a listed entry is admitted.
///
/// Implement this for custom filtering logic, or pass a closure: any
/// `Fn(&FileEntry, usize) -> bool` is a `Matcher`.
///
/// `index` is the entry's position in its directory listing, counted
/// before filtering. `entry.stat` is set when stat was requested or implied
/// (`read_stat`, `only_files`, `recurse`).
///
/// # Thread Safety
///
/// `Send + Sync` are required — matchers live inside resolved options that
/// are shared by every stream of a walk.
///
/// # Example
///
/// ```rust
/// use streamfs::{FileEntry, Matcher};
///
/// struct LargerThan(u64);
///
/// impl Matcher for LargerThan {
///     fn is_match(&self, entry: &FileEntry, _index: usize) -> bool {
///         entry.stat.as_ref().is_some_and(|s| s.len() > self.0)
///     }
/// }
/// ```
pub trait Matcher: Send + Sync {
    /// Returns `true` if this entry should be included in results.
    fn is_match(&self, entry: &FileEntry, index: usize) -> bool;
}

impl<F> Matcher for F
where
    F: Fn(&FileEntry, usize) -> bool + Send + Sync,
{
    fn is_match(&self, entry: &FileEntry, index: usize) -> bool {
        self(entry, index)
    }
}

/// Decides whether a recursive walk descends into a directory.
///
/// Only consulted when recursing; the entry always carries `stat`.
/// Closures `Fn(&FileEntry) -> bool` implement it.
pub trait DirectoryMatcher: Send + Sync {
    fn should_descend(&self, dir: &FileEntry) -> bool;
}

impl<F> DirectoryMatcher for F
where
    F: Fn(&FileEntry) -> bool + Send + Sync,
{
    fn should_descend(&self, dir: &FileEntry) -> bool {
        self(dir)
    }
}
