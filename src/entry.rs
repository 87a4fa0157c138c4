use std::fs::Metadata;
use std::path::{Path, PathBuf};

use crate::content::FileContent;
use crate::error::FsError;

/// One filesystem entry discovered while listing a directory.
///
/// Created bare (`name` + `full_path`) by the lister, then enriched as it
/// flows through later stages: `stat` when status metadata is requested or
/// implied, `content` once a content read has run.
#[derive(Debug, Clone)]
pub struct FileEntry {
    /// Base name of the entry, no separators.
    pub name: String,

    /// Listed directory joined with `name`. Unique within one walk.
    pub full_path: PathBuf,

    /// Status metadata (follows symlinks).
    pub stat: Option<Metadata>,

    /// Content, present only on records produced by a content read.
    pub content: Option<FileContent>,
}

impl FileEntry {
    pub fn new(name: impl Into<String>, full_path: impl Into<PathBuf>) -> Self {
        Self {
            name: name.into(),
            full_path: full_path.into(),
            stat: None,
            content: None,
        }
    }

    /// `true` only when stat is present and says "directory".
    pub fn is_dir(&self) -> bool {
        self.stat.as_ref().is_some_and(Metadata::is_dir)
    }

    /// `true` only when stat is present and says "regular file".
    pub fn is_file(&self) -> bool {
        self.stat.as_ref().is_some_and(Metadata::is_file)
    }

    /// Stat, for stages where directory/file discrimination is mandatory.
    pub fn require_stat(&self) -> Result<&Metadata, FsError> {
        self.stat
            .as_ref()
            .ok_or_else(|| FsError::MissingStat(self.full_path.clone()))
    }

    /// Content as text, if it was read with a text encoding.
    pub fn text(&self) -> Option<&str> {
        self.content.as_ref().and_then(FileContent::as_text)
    }
}

/// Input accepted by every primitive: a bare path, or a record carrying one.
#[derive(Debug, Clone)]
pub enum PathOrEntry {
    Bare(PathBuf),
    Record(FileEntry),
}

impl PathOrEntry {
    pub fn path(&self) -> &Path {
        to_path(self)
    }

    /// The record, if this is one.
    pub fn into_entry(self) -> Option<FileEntry> {
        match self {
            Self::Record(entry) => Some(entry),
            Self::Bare(_) => None,
        }
    }
}

impl From<PathBuf> for PathOrEntry {
    fn from(path: PathBuf) -> Self {
        Self::Bare(path)
    }
}

impl From<&Path> for PathOrEntry {
    fn from(path: &Path) -> Self {
        Self::Bare(path.to_path_buf())
    }
}

impl From<&str> for PathOrEntry {
    fn from(path: &str) -> Self {
        Self::Bare(PathBuf::from(path))
    }
}

impl From<FileEntry> for PathOrEntry {
    fn from(entry: FileEntry) -> Self {
        Self::Record(entry)
    }
}

/// Output of a primitive, mirroring the shape of its input.
///
/// A bare path yields the bare value; a record yields the same record with
/// the value stored on it.
#[derive(Debug, Clone)]
pub enum Attached<T> {
    Bare(T),
    Record(FileEntry),
}

impl<T> Attached<T> {
    pub fn into_bare(self) -> Option<T> {
        match self {
            Self::Bare(value) => Some(value),
            Self::Record(_) => None,
        }
    }

    pub fn into_entry(self) -> Option<FileEntry> {
        match self {
            Self::Record(entry) => Some(entry),
            Self::Bare(_) => None,
        }
    }
}

/// A value that has a home on [`FileEntry`].
pub trait EntryField {
    fn store(self, entry: &mut FileEntry);
}

impl EntryField for Metadata {
    fn store(self, entry: &mut FileEntry) {
        entry.stat = Some(self);
    }
}

impl EntryField for FileContent {
    fn store(self, entry: &mut FileEntry) {
        entry.content = Some(self);
    }
}

pub fn to_path(target: &PathOrEntry) -> &Path {
    match target {
        PathOrEntry::Bare(path) => path,
        PathOrEntry::Record(entry) => &entry.full_path,
    }
}

/// Return `value` for a bare path, or store it on the record and return that.
pub fn attach_or_return<T: EntryField>(target: PathOrEntry, value: T) -> Attached<T> {
    match target {
        PathOrEntry::Bare(_) => Attached::Bare(value),
        PathOrEntry::Record(mut entry) => {
            value.store(&mut entry);
            Attached::Record(entry)
        }
    }
}
