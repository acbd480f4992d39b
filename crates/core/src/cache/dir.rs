//! On-disk cache directory and bucket file I/O.
//!
//! Every write goes to a temporary file in the target directory and is then
//! renamed over the destination, so readers never observe a half-written
//! result list. Two invocations racing on one bucket still resolve to
//! last-writer-wins.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};

use chrono::{DateTime, Utc};
use tempfile::NamedTempFile;

use crate::Error;

/// Handle to an existing cache directory.
#[derive(Debug, Clone)]
pub struct CacheDir {
    root: PathBuf,
}

impl CacheDir {
    /// Open `root`, creating it (and its parents) if needed.
    pub fn open(root: impl Into<PathBuf>) -> Result<Self, Error> {
        let root = root.into();
        fs::create_dir_all(&root).map_err(Error::cache_io(&root))?;
        Ok(Self { root })
    }

    /// Open a child directory, e.g. one per provider.
    pub fn subdir(&self, name: &str) -> Result<Self, Error> {
        Self::open(self.root.join(name))
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn join(&self, relative: impl AsRef<Path>) -> PathBuf {
        self.root.join(relative)
    }

    /// Modification time of `path`, or `None` if it cannot be read.
    pub fn modified(&self, path: &Path) -> Option<SystemTime> {
        fs::metadata(path).and_then(|m| m.modified()).ok()
    }

    /// True if `path` exists and `now < modified + ttl`.
    ///
    /// Expiry is exclusive: at exactly `modified + ttl` the file is stale.
    /// Precision is bounded by the filesystem's timestamp granularity.
    pub fn is_fresh(&self, path: &Path, ttl: Duration, now: DateTime<Utc>) -> bool {
        let Some(modified) = self.modified(path) else {
            return false;
        };

        match modified.checked_add(ttl) {
            Some(expires_at) => SystemTime::from(now) < expires_at,
            None => true,
        }
    }

    /// Read a file relative to the root; `Ok(None)` if it does not exist.
    pub fn read_string(&self, relative: impl AsRef<Path>) -> Result<Option<String>, Error> {
        let path = self.join(relative);
        match fs::read_to_string(&path) {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(Error::CacheIo { path, source: e }),
        }
    }

    pub fn write_string(&self, relative: impl AsRef<Path>, content: &str) -> Result<(), Error> {
        self.write_bytes(relative, content.as_bytes())
    }

    /// Overwrite a file with one entry per line.
    pub fn write_lines(&self, relative: impl AsRef<Path>, lines: &[String]) -> Result<(), Error> {
        let mut content = String::with_capacity(lines.iter().map(|l| l.len() + 1).sum());
        for line in lines {
            content.push_str(line);
            content.push('\n');
        }
        self.write_bytes(relative, content.as_bytes())
    }

    /// Atomically replace a file relative to the root.
    pub fn write_bytes(&self, relative: impl AsRef<Path>, content: &[u8]) -> Result<(), Error> {
        let path = self.join(relative);
        let parent = path.parent().unwrap_or(&self.root);
        fs::create_dir_all(parent).map_err(Error::cache_io(parent))?;

        let mut tmp = NamedTempFile::new_in(parent).map_err(Error::cache_io(parent))?;
        tmp.write_all(content).map_err(Error::cache_io(tmp.path()))?;
        tmp.persist(&path)
            .map_err(|e| Error::CacheIo { path: path.clone(), source: e.error })?;

        tracing::trace!(path = %path.display(), bytes = content.len(), "wrote cache file");
        Ok(())
    }

    /// Remove everything under the root. The root itself is recreated empty.
    pub fn clear(&self) -> Result<(), Error> {
        match fs::remove_dir_all(&self.root) {
            Ok(()) => {}
            Err(e) if e.kind() == io::ErrorKind::NotFound => {}
            Err(e) => return Err(Error::CacheIo { path: self.root.clone(), source: e }),
        }
        fs::create_dir_all(&self.root).map_err(Error::cache_io(&self.root))
    }
}
