//! Specs for strings naming existing filesystem paths.

use super::Spec;
use crate::error::{SpecError, SpecResult};
use crate::fs::{FileSystem, NativeFileSystem, PathKind};
use crate::meta::Meta;
use crate::value::Value;
use std::io;
use std::path::Path;
use std::sync::Arc;

type MakeError = fn(Meta, &'static str) -> SpecError;

/// Check that `val` is a string naming an existing path of `kind`.
///
/// `make_error` builds the kind-specific error for a message.
fn check_path(
    fs: &dyn FileSystem,
    meta: &Meta,
    val: Value,
    kind: PathKind,
    make_error: MakeError,
) -> SpecResult<Value> {
    let path = match val {
        Value::String(path) => path,
        other => {
            return Err(make_error(meta.clone(), "Didn't even get a string").with_got_type(&other));
        }
    };

    let checked = |result| answer(result, meta, &path, make_error);

    if !checked(fs.exists(Path::new(&path)))? {
        return Err(make_error(meta.clone(), "Got something that didn't exist").with_path(path.as_str()));
    }

    let (matches, message) = match kind {
        PathKind::Directory => (
            checked(fs.is_dir(Path::new(&path)))?,
            "Got something that exists but isn't a directory",
        ),
        PathKind::File => (
            checked(fs.is_file(Path::new(&path)))?,
            "Got something that exists but isn't a file",
        ),
    };
    if !matches {
        return Err(make_error(meta.clone(), message).with_path(path));
    }

    Ok(Value::String(path))
}

/// A failed check is its own error, never "didn't exist".
fn answer(result: io::Result<bool>, meta: &Meta, path: &str, make_error: MakeError) -> SpecResult<bool> {
    result.map_err(|error| {
        tracing::debug!(%meta, path, %error, "path check failed");
        make_error(meta.clone(), "Couldn't check whether the path exists")
            .with_path(path)
            .with_val(Value::from(error.to_string()))
    })
}

/// A string naming an existing directory.
#[derive(Debug, Clone)]
pub struct DirectorySpec {
    fs: Arc<dyn FileSystem>,
}

pub fn directory_spec() -> DirectorySpec {
    DirectorySpec::new()
}

impl DirectorySpec {
    pub fn new() -> Self {
        Self {
            fs: Arc::new(NativeFileSystem),
        }
    }

    /// Check paths against `fs` instead of the host filesystem.
    pub fn with_file_system(mut self, fs: Arc<dyn FileSystem>) -> Self {
        self.fs = fs;
        self
    }
}

impl Default for DirectorySpec {
    fn default() -> Self {
        Self::new()
    }
}

impl Spec for DirectorySpec {
    fn normalise_filled(&self, meta: &Meta, val: Value) -> SpecResult<Value> {
        check_path(
            self.fs.as_ref(),
            meta,
            val,
            PathKind::Directory,
            |meta, message| SpecError::bad_directory(meta, message),
        )
    }
}

/// A string naming an existing file.
#[derive(Debug, Clone)]
pub struct FilenameSpec {
    fs: Arc<dyn FileSystem>,
}

pub fn filename_spec() -> FilenameSpec {
    FilenameSpec::new()
}

impl FilenameSpec {
    pub fn new() -> Self {
        Self {
            fs: Arc::new(NativeFileSystem),
        }
    }

    /// Check paths against `fs` instead of the host filesystem.
    pub fn with_file_system(mut self, fs: Arc<dyn FileSystem>) -> Self {
        self.fs = fs;
        self
    }
}

impl Default for FilenameSpec {
    fn default() -> Self {
        Self::new()
    }
}

impl Spec for FilenameSpec {
    fn normalise_filled(&self, meta: &Meta, val: Value) -> SpecResult<Value> {
        check_path(
            self.fs.as_ref(),
            meta,
            val,
            PathKind::File,
            |meta, message| SpecError::bad_filename(meta, message),
        )
    }
}
