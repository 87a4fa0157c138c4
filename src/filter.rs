use std::collections::HashSet;
use std::sync::Arc;

use regex::Regex;

use crate::entry::FileEntry;
use crate::traits::Matcher;

/// The single admission rule a listing applies to its entries.
///
/// Built by [`ReadOptions::resolve`](crate::ReadOptions::resolve). The
/// strategies are mutually exclusive; the first configured one wins, in
/// declaration order.
pub(crate) enum EntryFilter {
    /// Exact base-name match. Directories get no special treatment.
    Names(HashSet<String>),
    /// Regex search on the base name. Directories always pass.
    Pattern(Regex),
    /// Caller predicate. Directories always pass.
    Predicate(Arc<dyn Matcher>),
    All,
}

impl EntryFilter {
    pub(crate) fn from_parts(
        file_names: Option<&[String]>,
        pattern: Option<Regex>,
        predicate: Option<Arc<dyn Matcher>>,
    ) -> Self {
        if let Some(names) = file_names.filter(|n| !n.is_empty()) {
            return Self::Names(names.iter().cloned().collect());
        }
        if let Some(re) = pattern {
            return Self::Pattern(re);
        }
        match predicate {
            Some(m) => Self::Predicate(m),
            None => Self::All,
        }
    }

    /// `index` is the entry's position in its directory listing.
    pub(crate) fn admits(&self, entry: &FileEntry, index: usize) -> bool {
        match self {
            Self::Names(names) => names.contains(&entry.name),
            Self::Pattern(re) => entry.is_dir() || re.is_match(&entry.name),
            Self::Predicate(m) => entry.is_dir() || m.is_match(entry, index),
            Self::All => true,
        }
    }
}
