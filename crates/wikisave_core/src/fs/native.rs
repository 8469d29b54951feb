//! Native filesystem implementation.

use std::fs::{self, File, OpenOptions};
use std::io::{Error, ErrorKind, Result, Write};
use std::path::Path;
use std::time::{Duration, UNIX_EPOCH};

use super::FileSystem;

#[derive(Clone, Copy, Debug, Default)]
/// This is a simple filesystem implementation that simply maps to std::fs methods
pub struct RealFileSystem;

impl FileSystem for RealFileSystem {
    fn read_binary(&self, path: &Path) -> Result<Vec<u8>> {
        fs::read(path)
    }

    fn write_binary(&self, path: &Path, content: &[u8]) -> Result<()> {
        fs::write(path, content)
    }

    fn create_new(&self, path: &Path, content: &[u8]) -> Result<()> {
        // This atomic check prevents race conditions
        let mut file = OpenOptions::new().write(true).create_new(true).open(path)?;
        file.write_all(content)
    }

    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn is_dir(&self, path: &Path) -> bool {
        path.is_dir()
    }

    fn create_dir_all(&self, path: &Path) -> Result<()> {
        fs::create_dir_all(path)
    }

    fn get_modified_time(&self, path: &Path) -> Option<i64> {
        fs::metadata(path)
            .ok()
            .and_then(|m| m.modified().ok())
            .map(|t| match t.duration_since(UNIX_EPOCH) {
                Ok(after) => after.as_millis() as i64,
                Err(before) => -(before.duration().as_millis() as i64),
            })
    }

    fn set_modified_time(&self, path: &Path, millis: i64) -> Result<()> {
        let offset = Duration::from_millis(millis.unsigned_abs());
        let when = match millis {
            ..0 => UNIX_EPOCH.checked_sub(offset),
            _ => UNIX_EPOCH.checked_add(offset),
        };
        let when = when.ok_or_else(|| Error::new(ErrorKind::InvalidInput, "mtime out of range"))?;
        let file = File::options().write(true).open(path)?;
        file.set_modified(when)
    }
}
