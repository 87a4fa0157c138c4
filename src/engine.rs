use std::collections::VecDeque;
use std::future::ready;
use std::path::PathBuf;

use futures_util::stream::{self, BoxStream, Stream, StreamExt, TryStreamExt};
use tracing::debug;

use crate::builder::{ReadOptions, ResolvedOptions};
use crate::entry::{FileEntry, PathOrEntry};
use crate::error::FsError;
use crate::io::{read_entry, stat_entry};

/// A lazy sequence of results that ends after its first error.
///
/// Items delivered before an error stay valid; nothing follows it.
pub type EntryStream<T> = BoxStream<'static, Result<T, FsError>>;

// ---------------------------------------------------------------------------
// Public entry points
// ---------------------------------------------------------------------------

/// List a directory, flat or recursively depending on `options`.
///
/// Yields bare paths by default, or [`FileEntry`] records when `as_object`,
/// `read_stat`, `only_files` or `recurse` is set. A recursive walk yields
/// only non-directory entries.
///
/// # Errors
///
/// Returns `Err` up front when the options do not resolve. I/O errors
/// arrive as the last item of the stream.
pub fn read_directory(
    path: impl Into<PathBuf>,
    options: &ReadOptions,
) -> Result<EntryStream<PathOrEntry>, FsError> {
    let resolved = options.resolve()?;
    if resolved.recurse() {
        return Ok(read_directory_deep(path, &resolved)
            .map_ok(PathOrEntry::Record)
            .boxed());
    }
    Ok(read_directory_flat(path, &resolved))
}

/// Read the content of every file under `path`.
///
/// Without `recurse`, subdirectories are skipped. Reads run concurrently
/// (up to `concurrency`) and complete in no particular order.
pub fn read_files(
    path: impl Into<PathBuf>,
    options: &ReadOptions,
) -> Result<EntryStream<FileEntry>, FsError> {
    let resolved = options.resolve()?;
    let listing = if resolved.recurse() {
        read_directory_deep(path, &resolved)
    } else {
        list_records(path.into(), resolved.skipping_directories())
    };

    let encoding = resolved.encoding();
    let reads = listing
        .map_ok(move |entry| read_entry(entry, encoding))
        .try_buffer_unordered(resolved.concurrency());
    Ok(stop_after_error(reads))
}

// ---------------------------------------------------------------------------
// Flat lister
// ---------------------------------------------------------------------------

/// List the immediate entries of one directory.
///
/// Entries keep the order the platform lists them in; it is not sorted.
pub fn read_directory_flat(
    path: impl Into<PathBuf>,
    options: &ResolvedOptions,
) -> EntryStream<PathOrEntry> {
    let as_object = options.as_object();
    list_records(path.into(), options.clone())
        .map_ok(move |entry| {
            if as_object {
                PathOrEntry::Record(entry)
            } else {
                PathOrEntry::Bare(entry.full_path)
            }
        })
        .boxed()
}

fn list_records(dir: PathBuf, options: ResolvedOptions) -> EntryStream<FileEntry> {
    let listing = stream::once(read_names(dir))
        .map_ok(move |entries| admitted(entries, options.clone()))
        .try_flatten();
    stop_after_error(listing)
}

/// Read every name in `dir` in one batch.
async fn read_names(dir: PathBuf) -> Result<Vec<FileEntry>, FsError> {
    let read_dir_error = |source| FsError::ReadDir {
        path: dir.clone(),
        source,
    };

    let base = std::path::absolute(&dir).map_err(read_dir_error)?;
    let mut reader = tokio::fs::read_dir(&dir).await.map_err(read_dir_error)?;
    let mut entries = Vec::new();
    while let Some(item) = reader.next_entry().await.map_err(read_dir_error)? {
        // The path keeps the raw OS name; only `name` is lossy.
        let raw = item.file_name();
        let full_path = base.join(&raw);
        entries.push(FileEntry::new(raw.to_string_lossy(), full_path));
    }

    debug!(
        target: "streamfs::walk",
        dir = %dir.display(),
        entries = entries.len(),
        "listed directory"
    );
    Ok(entries)
}

/// Stat (when needed), filter and drop directories (when asked).
fn admitted(entries: Vec<FileEntry>, options: ResolvedOptions) -> EntryStream<FileEntry> {
    let records = if options.read_stat() {
        stream::iter(entries)
            .map(stat_entry)
            .buffered(options.concurrency())
            .boxed()
    } else {
        stream::iter(entries.into_iter().map(Ok)).boxed()
    };

    records
        .enumerate()
        .filter_map(move |(index, item)| ready(admit(&options, index, item)))
        .boxed()
}

fn admit(
    options: &ResolvedOptions,
    index: usize,
    item: Result<FileEntry, FsError>,
) -> Option<Result<FileEntry, FsError>> {
    let entry = match item {
        Ok(entry) => entry,
        Err(e) => return Some(Err(e)),
    };

    if !options.filter().admits(&entry, index) {
        return None;
    }

    if options.only_files() {
        match entry.require_stat() {
            Ok(stat) if stat.is_dir() => return None,
            Ok(_) => {}
            Err(e) => return Some(Err(e)),
        }
    }

    Some(Ok(entry))
}

// ---------------------------------------------------------------------------
// Recursive walker
// ---------------------------------------------------------------------------

/// Walk `path` and every admitted subdirectory, yielding non-directory
/// entries only, each with `stat`.
///
/// Directories are expanded breadth-first. Symlinks are followed and
/// cycles are not detected.
pub fn read_directory_deep(
    path: impl Into<PathBuf>,
    options: &ResolvedOptions,
) -> EntryStream<FileEntry> {
    let walk = DeepWalk {
        options: options.for_deep_listing(),
        pending: VecDeque::from([path.into()]),
        current: None,
    };
    stop_after_error(stream::unfold(walk, DeepWalk::advance))
}

struct DeepWalk {
    options: ResolvedOptions,
    pending: VecDeque<PathBuf>,
    current: Option<EntryStream<FileEntry>>,
}

impl DeepWalk {
    async fn advance(mut self) -> Option<(Result<FileEntry, FsError>, Self)> {
        loop {
            if self.current.is_none() {
                let dir = self.pending.pop_front()?;
                self.current = Some(list_records(dir, self.options.clone()));
            }

            let Some(listing) = self.current.as_mut() else {
                continue;
            };
            let next = listing.next().await;
            let entry = match next {
                Some(Ok(entry)) => entry,
                Some(Err(e)) => return Some((Err(e), self)),
                None => {
                    self.current = None;
                    continue;
                }
            };

            let is_dir = match entry.require_stat() {
                Ok(stat) => stat.is_dir(),
                Err(e) => return Some((Err(e), self)),
            };
            if !is_dir {
                return Some((Ok(entry), self));
            }
            self.enqueue(entry);
        }
    }

    fn enqueue(&mut self, dir: FileEntry) {
        if self.options.should_descend(&dir) {
            self.pending.push_back(dir.full_path);
        } else {
            debug!(target: "streamfs::walk", dir = %dir.full_path.display(), "skipping directory");
        }
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// End `results` right after the first `Err` it yields.
fn stop_after_error<T, S>(results: S) -> EntryStream<T>
where
    T: Send + 'static,
    S: Stream<Item = Result<T, FsError>> + Send + 'static,
{
    results
        .scan(false, |failed, item| {
            if *failed {
                return ready(None);
            }
            *failed = item.is_err();
            ready(Some(item))
        })
        .boxed()
}
