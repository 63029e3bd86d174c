//! File storage under a single root directory.
//!
//! Names come straight from the request path. Only names made of plain path
//! components are accepted; anything with `..`, a root or a prefix is
//! reported as [`io::ErrorKind::InvalidInput`] and never touches the
//! filesystem. Errors from the filesystem itself are passed through as-is, so
//! a missing file reads as [`io::ErrorKind::NotFound`].
//!
//! Writers are not coordinated: two concurrent writes to the same name race
//! and the last one to finish wins.

use std::io;
use std::path::{Component, Path, PathBuf};

/// Reads and writes files below a storage root.
#[derive(Clone, Debug)]
pub struct FileStore {
    root: PathBuf,
}

impl FileStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Returns the full contents of `name`.
    pub async fn read(&self, name: &str) -> io::Result<Vec<u8>> {
        tokio::fs::read(self.resolve(name)?).await
    }

    /// Creates or truncates `name` and writes `contents` to it.
    pub async fn write(&self, name: &str, contents: &[u8]) -> io::Result<()> {
        tokio::fs::write(self.resolve(name)?, contents).await
    }

    fn resolve(&self, name: &str) -> io::Result<PathBuf> {
        let rel = Path::new(name);
        let contained = !name.is_empty()
            && rel.components().all(|c| matches!(c, Component::Normal(_)));
        if !contained {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("file name {name:?} escapes the storage root"),
            ));
        }
        Ok(self.root.join(rel))
    }
}
