//! File-system abstraction for persistence.
//!
//! [`Database::persist`](crate::database::Database::persist) and
//! [`Database::restore`](crate::database::Database::restore) reach the file
//! system exclusively through this trait; everything else in the engine is
//! synchronous and in-memory, so these calls are the system's only
//! suspension points. [`DiskBackend`] is the default implementation over
//! `tokio::fs`.

use async_trait::async_trait;
use std::io;
use std::path::Path;

/// What a path currently refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathKind {
    /// Nothing exists at the path.
    Missing,
    /// A regular file (or anything that is not a directory).
    File,
    /// A directory.
    Directory,
}

/// Abstract interface over the file-system operations persistence needs.
///
/// Implementations surface I/O failures as errors; a full read or write
/// either completes or fails, with no partial-result recovery expected from
/// the caller.
#[async_trait]
pub trait FileBackend: Send + Sync {
    /// Reads the entire file at `path` as UTF-8 text.
    async fn read_text(&self, path: &Path) -> io::Result<String>;

    /// Writes `contents` to `path`, creating the file.
    async fn write_text(&self, path: &Path, contents: &str) -> io::Result<()>;

    /// Removes the file at `path`.
    async fn remove(&self, path: &Path) -> io::Result<()>;

    /// Probes what `path` refers to.
    async fn kind(&self, path: &Path) -> io::Result<PathKind>;
}

/// The default [`FileBackend`] backed by `tokio::fs`.
#[derive(Debug, Default, Clone, Copy)]
pub struct DiskBackend;

#[async_trait]
impl FileBackend for DiskBackend {
    async fn read_text(&self, path: &Path) -> io::Result<String> {
        tokio::fs::read_to_string(path).await
    }

    async fn write_text(&self, path: &Path, contents: &str) -> io::Result<()> {
        tokio::fs::write(path, contents).await
    }

    async fn remove(&self, path: &Path) -> io::Result<()> {
        tokio::fs::remove_file(path).await
    }

    async fn kind(&self, path: &Path) -> io::Result<PathKind> {
        match tokio::fs::metadata(path).await {
            Ok(metadata) if metadata.is_dir() => Ok(PathKind::Directory),
            Ok(_) => Ok(PathKind::File),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(PathKind::Missing),
            Err(err) => Err(err),
        }
    }
}
