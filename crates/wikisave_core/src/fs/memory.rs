//! In-memory filesystem implementation.
//!
//! Modification times come from a logical clock instead of the wall clock.
//! Every write stamps the file with the current clock value and then moves
//! the clock forward by a fixed step, which lets tests choose between a
//! fine-grained clock (each write gets a distinct time) and a coarse one
//! (several writes share the same time).

use std::collections::{HashMap, HashSet};
use std::io::{Error, ErrorKind, Result};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use super::FileSystem;

/// Starting point of the logical clock: 2025-10-14T00:00:00Z.
const CLOCK_START_MILLIS: i64 = 1_760_400_000_000;

#[derive(Debug)]
struct MemoryFile {
    content: Vec<u8>,
    modified: i64,
}

#[derive(Debug)]
struct Inner {
    files: HashMap<PathBuf, MemoryFile>,
    dirs: HashSet<PathBuf>,
    clock: i64,
    step: i64,
}

/// A filesystem held entirely in memory.
///
/// Cloning shares the same underlying storage.
#[derive(Clone, Debug)]
pub struct InMemoryFileSystem {
    inner: Arc<Mutex<Inner>>,
}

impl Default for InMemoryFileSystem {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryFileSystem {
    /// Create an empty filesystem whose clock advances one second per write.
    pub fn new() -> Self {
        Self::with_clock_step(1_000)
    }

    /// Create an empty filesystem whose clock advances `step_millis` per write.
    ///
    /// A step of zero simulates a clock too coarse to tell writes apart.
    pub fn with_clock_step(step_millis: i64) -> Self {
        Self {
            inner: Arc::new(Mutex::new(Inner {
                files: HashMap::new(),
                dirs: HashSet::new(),
                clock: CLOCK_START_MILLIS,
                step: step_millis,
            })),
        }
    }

    /// Add a file (builder pattern).
    pub fn with_file(self, path: impl Into<PathBuf>, content: impl Into<Vec<u8>>) -> Self {
        {
            let mut inner = self.lock();
            let modified = inner.tick();
            inner.files.insert(
                path.into(),
                MemoryFile {
                    content: content.into(),
                    modified,
                },
            );
        }
        self
    }

    /// Add a directory (builder pattern).
    pub fn with_dir(self, path: impl Into<PathBuf>) -> Self {
        self.lock().dirs.insert(path.into());
        self
    }

    /// Get the content of a file, for assertions.
    pub fn content(&self, path: impl AsRef<Path>) -> Option<Vec<u8>> {
        self.lock()
            .files
            .get(path.as_ref())
            .map(|f| f.content.clone())
    }

    /// Number of files currently stored.
    pub fn file_count(&self) -> usize {
        self.lock().files.len()
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Inner {
    fn tick(&mut self) -> i64 {
        let now = self.clock;
        self.clock += self.step;
        now
    }
}

fn not_found(path: &Path) -> Error {
    Error::new(ErrorKind::NotFound, format!("File not found: {:?}", path))
}

impl FileSystem for InMemoryFileSystem {
    fn read_binary(&self, path: &Path) -> Result<Vec<u8>> {
        self.lock()
            .files
            .get(path)
            .map(|f| f.content.clone())
            .ok_or_else(|| not_found(path))
    }

    fn write_binary(&self, path: &Path, content: &[u8]) -> Result<()> {
        let mut inner = self.lock();
        if inner.dirs.contains(path) {
            return Err(Error::new(
                ErrorKind::IsADirectory,
                format!("Is a directory: {:?}", path),
            ));
        }
        let modified = inner.tick();
        inner.files.insert(
            path.to_path_buf(),
            MemoryFile {
                content: content.to_vec(),
                modified,
            },
        );
        Ok(())
    }

    fn create_new(&self, path: &Path, content: &[u8]) -> Result<()> {
        let mut inner = self.lock();
        if inner.files.contains_key(path) || inner.dirs.contains(path) {
            return Err(Error::new(ErrorKind::AlreadyExists, "File exists"));
        }
        let modified = inner.tick();
        inner.files.insert(
            path.to_path_buf(),
            MemoryFile {
                content: content.to_vec(),
                modified,
            },
        );
        Ok(())
    }

    fn exists(&self, path: &Path) -> bool {
        let inner = self.lock();
        inner.files.contains_key(path) || inner.dirs.contains(path)
    }

    fn is_dir(&self, path: &Path) -> bool {
        self.lock().dirs.contains(path)
    }

    fn create_dir_all(&self, path: &Path) -> Result<()> {
        let mut inner = self.lock();
        for ancestor in path.ancestors() {
            if !ancestor.as_os_str().is_empty() {
                inner.dirs.insert(ancestor.to_path_buf());
            }
        }
        Ok(())
    }

    fn get_modified_time(&self, path: &Path) -> Option<i64> {
        self.lock().files.get(path).map(|f| f.modified)
    }

    fn set_modified_time(&self, path: &Path, millis: i64) -> Result<()> {
        let mut inner = self.lock();
        let file = inner.files.get_mut(path).ok_or_else(|| not_found(path))?;
        file.modified = millis;
        Ok(())
    }
}
