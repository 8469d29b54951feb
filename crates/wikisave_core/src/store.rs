//! Content store for the primary document.
//!
//! Reads and writes the document as opaque bytes. Writes truncate and
//! overwrite in place; a crash mid-write can leave a truncated file.

use std::io::ErrorKind;
use std::path::Path;

use log::{debug, warn};

use crate::error::{Result, WikisaveError};
use crate::fingerprint::{Fingerprint, fingerprint};
use crate::fs::FileSystem;

/// Step used to move a file's mtime forward when a write did not change its tag.
const MTIME_NUDGE_MILLIS: i64 = 100;

/// Upper bound on nudges, for filesystems that store coarser times than they are given.
const MAX_NUDGES: usize = 20;

/// Document content together with the fingerprint observed before reading it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredDocument {
    /// Raw bytes of the file
    pub content: Vec<u8>,
    /// Fingerprint taken just before the read
    pub fingerprint: Fingerprint,
}

/// Reads and writes whole documents through a [`FileSystem`].
#[derive(Debug, Clone)]
pub struct ContentStore<FS: FileSystem> {
    fs: FS,
}

impl<FS: FileSystem> ContentStore<FS> {
    /// Create a store over `fs`
    pub fn new(fs: FS) -> Self {
        Self { fs }
    }

    /// The underlying filesystem
    pub fn fs(&self) -> &FS {
        &self.fs
    }

    /// Current fingerprint of `path`
    pub fn fingerprint(&self, path: &Path) -> Fingerprint {
        fingerprint(&self.fs, path)
    }

    /// Read the document at `path`, or `None` if there is no file.
    pub fn read(&self, path: &Path) -> Result<Option<StoredDocument>> {
        let fingerprint = self.fingerprint(path);
        if fingerprint.is_absent() {
            debug!("No document at {:?}", path);
            return Ok(None);
        }

        match self.fs.read_binary(path) {
            Ok(content) => Ok(Some(StoredDocument {
                content,
                fingerprint,
            })),
            // Removed between the stat and the read
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(source) => Err(WikisaveError::FileRead {
                path: path.to_path_buf(),
                source,
            }),
        }
    }

    /// Replace the content at `path` and return the new fingerprint.
    ///
    /// The file's mtime only ever moves forward: when the filesystem clock
    /// stamps the new content at or before the previous mtime, or too close
    /// to it to change the tag, the mtime is set past the previous one.
    /// Successive writes therefore hand out strictly increasing fingerprints
    /// and never repeat an earlier one.
    pub fn write(&self, path: &Path, content: &[u8]) -> Result<Fingerprint> {
        let before = self.fingerprint(path);
        let before_millis = self.fs.get_modified_time(path);

        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
            && !self.fs.exists(parent)
        {
            self.fs
                .create_dir_all(parent)
                .map_err(|source| WikisaveError::FileWrite {
                    path: parent.to_path_buf(),
                    source,
                })?;
        }

        self.fs
            .write_binary(path, content)
            .map_err(|source| WikisaveError::FileWrite {
                path: path.to_path_buf(),
                source,
            })?;

        let after = self.fingerprint(path);
        match (before_millis, self.fs.get_modified_time(path)) {
            (Some(previous), Some(stamped)) if stamped <= previous || after == before => {
                Ok(self.advance_past(path, previous, stamped.max(previous), &before))
            }
            _ => Ok(after),
        }
    }

    /// Move the mtime of `path` forward from `from` until it is later than
    /// `previous` and its tag differs from `stale`.
    fn advance_past(
        &self,
        path: &Path,
        previous: i64,
        from: i64,
        stale: &Fingerprint,
    ) -> Fingerprint {
        let mut millis = from;

        for _ in 0..MAX_NUDGES {
            millis += MTIME_NUDGE_MILLIS;
            if let Err(e) = self.fs.set_modified_time(path, millis) {
                warn!(
                    "Could not advance mtime of {:?} past {}: {}; ETag may repeat",
                    path, stale, e
                );
                break;
            }
            let current = self.fingerprint(path);
            let stored_later = self
                .fs
                .get_modified_time(path)
                .is_some_and(|stored| stored > previous);
            if stored_later && current != *stale {
                debug!("Advanced mtime of {:?} to distinguish from {}", path, stale);
                return current;
            }
        }

        self.fingerprint(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fs::{InMemoryFileSystem, RealFileSystem};
    use crate::test_utils::FailingFileSystem;

    const DOC: &str = "/wiki/current.html";

    #[test]
    fn test_read_missing_is_none() {
        let store = ContentStore::new(InMemoryFileSystem::new());
        assert!(store.read(Path::new(DOC)).unwrap().is_none());
    }

    #[test]
    fn test_write_then_read() {
        let store = ContentStore::new(InMemoryFileSystem::new());
        let tag = store.write(Path::new(DOC), b"<html>v1</html>").unwrap();

        let doc = store.read(Path::new(DOC)).unwrap().unwrap();
        assert_eq!(doc.content, b"<html>v1</html>");
        assert_eq!(doc.fingerprint, tag);
        assert!(!tag.is_absent());
    }

    #[test]
    fn test_write_creates_parent_directory() {
        let fs = InMemoryFileSystem::new();
        let store = ContentStore::new(fs.clone());
        store.write(Path::new("/a/b/current.html"), b"x").unwrap();
        assert!(fs.is_dir(Path::new("/a/b")));
    }

    #[test]
    fn test_write_advances_fingerprint() {
        let store = ContentStore::new(InMemoryFileSystem::new());
        let first = store.write(Path::new(DOC), b"one").unwrap();
        let second = store.write(Path::new(DOC), b"two").unwrap();
        assert_ne!(first, second);
    }

    #[test]
    fn test_write_advances_fingerprint_with_coarse_clock() {
        let fs = InMemoryFileSystem::with_clock_step(0);
        let store = ContentStore::new(fs.clone());

        let first = store.write(Path::new(DOC), b"one").unwrap();
        let second = store.write(Path::new(DOC), b"two").unwrap();
        let third = store.write(Path::new(DOC), b"three").unwrap();

        assert_ne!(first, second);
        assert_ne!(second, third);
        assert_eq!(store.fingerprint(Path::new(DOC)), third);
        assert_eq!(fs.content(DOC).unwrap(), b"three");
    }

    #[test]
    fn test_mtime_never_moves_backwards() {
        // 30 ms per write: the clock keeps stamping times behind the nudged ones
        let fs = InMemoryFileSystem::with_clock_step(30);
        let store = ContentStore::new(fs.clone());
        let path = Path::new(DOC);

        let mut tags = Vec::new();
        let mut last_mtime = None;
        for i in 0..6 {
            tags.push(store.write(path, format!("v{i}").as_bytes()).unwrap());
            let mtime = fs.get_modified_time(path).unwrap();
            if let Some(last) = last_mtime {
                assert!(mtime > last, "mtime went from {last} to {mtime}");
            }
            last_mtime = Some(mtime);
        }

        for (i, tag) in tags.iter().enumerate() {
            assert!(!tags[i + 1..].contains(tag), "tag {tag} was issued twice");
        }
    }

    #[test]
    fn test_native_rapid_writes_advance_fingerprint() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("current.html");
        let store = ContentStore::new(RealFileSystem);

        let first = store.write(&path, b"one").unwrap();
        let second = store.write(&path, b"two").unwrap();

        assert_ne!(first, second);
        assert_eq!(std::fs::read(&path).unwrap(), b"two");
    }

    #[test]
    fn test_write_failure_is_file_write_error() {
        let store = ContentStore::new(FailingFileSystem::new());
        let err = store.write(Path::new(DOC), b"x").unwrap_err();
        assert!(matches!(err, WikisaveError::FileWrite { .. }));
    }

    #[test]
    fn test_read_failure_is_file_read_error() {
        let fs = FailingFileSystem::new().with_existing(DOC);
        let store = ContentStore::new(fs);
        let err = store.read(Path::new(DOC)).unwrap_err();
        assert!(matches!(err, WikisaveError::FileRead { .. }));
    }
}
