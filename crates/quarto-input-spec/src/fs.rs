//! Filesystem checks used by path specs.
//!
//! `directory_spec` and `filename_spec` only need to ask whether a path
//! exists and what kind of thing it is. The checks go through the
//! [`FileSystem`] trait so that hosts (and tests) can substitute their own
//! view of the filesystem.
//!
//! A path that isn't there is `Ok(false)`. Anything else that stops the
//! check (permissions, I/O failures) is an `Err`, so callers never mistake
//! an unreadable path for a missing one.

use std::fmt;
use std::io;
use std::path::Path;

/// Type of filesystem path
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathKind {
    /// Regular file
    File,
    /// Directory
    Directory,
}

/// Synchronous existence checks.
pub trait FileSystem: fmt::Debug + Send + Sync {
    /// Check if a path exists, optionally requiring a specific kind.
    fn path_exists(&self, path: &Path, kind: Option<PathKind>) -> io::Result<bool>;

    /// Check if anything exists at `path`.
    fn exists(&self, path: &Path) -> io::Result<bool> {
        self.path_exists(path, None)
    }

    /// Check if path exists and is a file.
    ///
    /// Convenience method that calls `path_exists` with `PathKind::File`.
    fn is_file(&self, path: &Path) -> io::Result<bool> {
        self.path_exists(path, Some(PathKind::File))
    }

    /// Check if path exists and is a directory.
    ///
    /// Convenience method that calls `path_exists` with `PathKind::Directory`.
    fn is_dir(&self, path: &Path) -> io::Result<bool> {
        self.path_exists(path, Some(PathKind::Directory))
    }
}

/// The host filesystem, via `std::fs`.
#[derive(Debug, Clone, Copy, Default)]
pub struct NativeFileSystem;

impl FileSystem for NativeFileSystem {
    fn path_exists(&self, path: &Path, kind: Option<PathKind>) -> io::Result<bool> {
        match std::fs::metadata(path) {
            Ok(metadata) => Ok(match kind {
                None => true,
                Some(PathKind::File) => metadata.is_file(),
                Some(PathKind::Directory) => metadata.is_dir(),
            }),
            // a file used as a directory component means nothing is there either
            Err(error)
                if matches!(
                    error.kind(),
                    io::ErrorKind::NotFound | io::ErrorKind::NotADirectory
                ) =>
            {
                Ok(false)
            }
            Err(error) => {
                tracing::debug!(path = ?path, %error, "could not check path");
                Err(error)
            }
        }
    }
}
