//! # streamfs
//!
//! Filesystem reads, stats and directory walks as lazy async streams.
//!
//! streamfs wraps `tokio::fs` so that a directory listing, a recursive walk
//! or a batch of file reads is a [`Stream`](futures_util::Stream) of
//! `Result`s. Every stream ends right after its first error.
//!
//! Primitives accept a bare path or a [`FileEntry`] and answer in the same
//! shape: a path gets the bare value back, a record gets itself back with the
//! new field set. That lets a listing feed straight into reads.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use futures_util::TryStreamExt;
//! use streamfs::{FileEntry, ReadOptions};
//!
//! # async fn demo() -> Result<(), streamfs::FsError> {
//! let options = ReadOptions::new()
//!     .recurse(true)
//!     .filter_directory(|d: &FileEntry| d.name != ".git")
//!     .filter(|f: &FileEntry, _: usize| f.name.ends_with(".rs"));
//!
//! let files: Vec<FileEntry> = streamfs::read_files("src", &options)?
//!     .try_collect()
//!     .await?;
//!
//! for file in &files {
//!     let size = file.content.as_ref().map_or(0, |c| c.as_bytes().len());
//!     println!("{} ({size} bytes)", file.full_path.display());
//! }
//! # Ok(())
//! # }
//! ```
//!
//! # Filtering
//!
//! Only one entry filter is active, picked in this order:
//!
//! 1. [`file_names`](ReadOptions::file_names): exact base names, files and
//!    directories alike
//! 2. [`pattern`](ReadOptions::pattern): regex over the base name
//! 3. [`filter`](ReadOptions::filter): any [`Matcher`]
//!
//! With a pattern or a matcher, directories always pass so that a recursive
//! walk can still descend; [`filter_directory`](ReadOptions::filter_directory)
//! decides which directories are walked.

#![forbid(unsafe_code)]

pub mod locale;

mod builder;
mod content;
mod engine;
mod entry;
mod error;
mod filter;
mod io;
mod traits;

// ── Public re-exports ─────────────────────────────────────────────────────────

pub use builder::{ReadOptions, ResolvedOptions, DEFAULT_CONCURRENCY};
pub use content::{Encoding, FileContent};
pub use engine::{
    read_directory, read_directory_deep, read_directory_flat, read_files, EntryStream,
};
pub use entry::{attach_or_return, to_path, Attached, EntryField, FileEntry, PathOrEntry};
pub use error::{FsError, LocaleError};
pub use io::{read_file, read_stat, write_file};
pub use traits::{DirectoryMatcher, Matcher};
