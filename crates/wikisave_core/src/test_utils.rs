//! Test utilities for wikisave_core
//!
//! Provides a filesystem whose reads and writes always fail, for exercising
//! storage-fault paths.

use std::collections::HashSet;
use std::io;
use std::path::{Path, PathBuf};

use crate::fs::FileSystem;

/// A filesystem where every read and write fails with `PermissionDenied`.
///
/// Paths registered with [`FailingFileSystem::with_existing`] report a
/// modification time, so they look present to the fingerprint provider.
#[derive(Clone, Default)]
pub struct FailingFileSystem {
    existing: HashSet<PathBuf>,
}

impl FailingFileSystem {
    /// Create a failing filesystem with no files.
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark a path as existing (builder pattern).
    pub fn with_existing(mut self, path: &str) -> Self {
        self.existing.insert(PathBuf::from(path));
        self
    }
}

fn denied() -> io::Error {
    io::Error::new(io::ErrorKind::PermissionDenied, "Permission denied")
}

impl FileSystem for FailingFileSystem {
    fn read_binary(&self, _path: &Path) -> io::Result<Vec<u8>> {
        Err(denied())
    }

    fn write_binary(&self, _path: &Path, _content: &[u8]) -> io::Result<()> {
        Err(denied())
    }

    fn create_new(&self, _path: &Path, _content: &[u8]) -> io::Result<()> {
        Err(denied())
    }

    fn exists(&self, path: &Path) -> bool {
        self.existing.contains(path)
    }

    fn is_dir(&self, _path: &Path) -> bool {
        false
    }

    fn create_dir_all(&self, _path: &Path) -> io::Result<()> {
        // Mock implementation - directories are implicit
        Ok(())
    }

    fn get_modified_time(&self, path: &Path) -> Option<i64> {
        self.existing.contains(path).then_some(1_760_400_000_000)
    }
}
