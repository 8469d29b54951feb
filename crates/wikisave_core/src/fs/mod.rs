//! Filesystem abstraction module.
//!
//! This module provides the `FileSystem` trait for abstracting the few
//! filesystem operations the save protocol needs, so the protocol can run
//! against the real disk or against an in-memory map in tests.
//!
//! - [`RealFileSystem`]: maps straight onto `std::fs`
//! - [`InMemoryFileSystem`]: shared map with a logical clock for modification times

mod memory;
mod native;

pub use memory::InMemoryFileSystem;
pub use native::RealFileSystem;

use std::io::{Error, ErrorKind, Result};
use std::path::Path;

/// Abstraction over filesystem operations.
/// Send + Sync required because the HTTP layer shares one store across tasks.
pub trait FileSystem: Send + Sync {
    /// Read the full content of a file
    fn read_binary(&self, path: &Path) -> Result<Vec<u8>>;

    /// Truncate and overwrite a file, creating it if needed
    fn write_binary(&self, path: &Path, content: &[u8]) -> Result<()>;

    /// Creates a file ONLY if it doesn't exist.
    /// Should return an `AlreadyExists` error if the file exists.
    fn create_new(&self, path: &Path, content: &[u8]) -> Result<()>;

    /// Checks if a file exists
    fn exists(&self, path: &Path) -> bool;

    /// Checks if a path is a directory
    fn is_dir(&self, path: &Path) -> bool;

    /// Creates a directory and all parent directories
    fn create_dir_all(&self, path: &Path) -> Result<()>;

    /// Get file modification time as milliseconds since Unix epoch,
    /// negative for times before it.
    ///
    /// Returns `None` if the file doesn't exist or the modification time
    /// cannot be determined.
    fn get_modified_time(&self, _path: &Path) -> Option<i64> {
        None
    }

    /// Set file modification time, in milliseconds since Unix epoch.
    fn set_modified_time(&self, _path: &Path, _millis: i64) -> Result<()> {
        Err(Error::new(
            ErrorKind::Unsupported,
            "Setting modification time not supported",
        ))
    }
}

// Blanket implementation for references to FileSystem
impl<T: FileSystem> FileSystem for &T {
    fn read_binary(&self, path: &Path) -> Result<Vec<u8>> {
        (*self).read_binary(path)
    }

    fn write_binary(&self, path: &Path, content: &[u8]) -> Result<()> {
        (*self).write_binary(path, content)
    }

    fn create_new(&self, path: &Path, content: &[u8]) -> Result<()> {
        (*self).create_new(path, content)
    }

    fn exists(&self, path: &Path) -> bool {
        (*self).exists(path)
    }

    fn is_dir(&self, path: &Path) -> bool {
        (*self).is_dir(path)
    }

    fn create_dir_all(&self, path: &Path) -> Result<()> {
        (*self).create_dir_all(path)
    }

    fn get_modified_time(&self, path: &Path) -> Option<i64> {
        (*self).get_modified_time(path)
    }

    fn set_modified_time(&self, path: &Path, millis: i64) -> Result<()> {
        (*self).set_modified_time(path, millis)
    }
}
