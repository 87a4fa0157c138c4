use std::fs::Metadata;
use std::path::Path;

use tracing::trace;

use crate::content::{Encoding, FileContent};
use crate::entry::{attach_or_return, to_path, Attached, FileEntry, PathOrEntry};
use crate::error::FsError;

/// Read a file's content.
///
/// `encoding` of `None` means UTF-8; pass `Some(Encoding::Raw)` for bytes.
/// A bare path yields the content, a record yields itself with `content` set.
pub async fn read_file(
    target: impl Into<PathOrEntry>,
    encoding: Option<Encoding>,
) -> Result<Attached<FileContent>, FsError> {
    let target = target.into();
    let content = read_content(to_path(&target), encoding.unwrap_or_default()).await?;
    Ok(attach_or_return(target, content))
}

/// Read a file's status metadata, following symlinks.
///
/// A bare path yields the metadata, a record yields itself with `stat` set.
pub async fn read_stat(target: impl Into<PathOrEntry>) -> Result<Attached<Metadata>, FsError> {
    let target = target.into();
    let stat = stat_path(to_path(&target)).await?;
    Ok(attach_or_return(target, stat))
}

/// Write `contents` to `path`, replacing whatever is there.
pub async fn write_file(path: impl AsRef<Path>, contents: impl AsRef<[u8]>) -> Result<(), FsError> {
    let path = path.as_ref();
    trace!(target: "streamfs::io", path = %path.display(), "write");
    tokio::fs::write(path, contents)
        .await
        .map_err(|source| FsError::WriteFile {
            path: path.to_path_buf(),
            source,
        })
}

pub(crate) async fn stat_entry(mut entry: FileEntry) -> Result<FileEntry, FsError> {
    entry.stat = Some(stat_path(&entry.full_path).await?);
    Ok(entry)
}

pub(crate) async fn read_entry(
    mut entry: FileEntry,
    encoding: Encoding,
) -> Result<FileEntry, FsError> {
    entry.content = Some(read_content(&entry.full_path, encoding).await?);
    Ok(entry)
}

async fn stat_path(path: &Path) -> Result<Metadata, FsError> {
    tokio::fs::metadata(path)
        .await
        .map_err(|source| FsError::Stat {
            path: path.to_path_buf(),
            source,
        })
}

async fn read_content(path: &Path, encoding: Encoding) -> Result<FileContent, FsError> {
    trace!(target: "streamfs::io", path = %path.display(), ?encoding, "read");
    let bytes = tokio::fs::read(path)
        .await
        .map_err(|source| FsError::ReadFile {
            path: path.to_path_buf(),
            source,
        })?;
    Ok(encoding.decode(bytes))
}
