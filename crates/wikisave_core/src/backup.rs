//! Monthly backup snapshots of the document.
//!
//! The first successful save of each period also writes a copy of the new
//! content beside the document, named after the *previous* calendar month:
//! a save on 2026-10-19 to `current.html` produces `current-2026-09.html`.
//! Once that file exists, later saves leave it untouched until the label
//! rolls over.

use std::ffi::OsString;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use chrono::{Datelike, Local, NaiveDate};
use log::info;

use crate::error::{Result, WikisaveError};
use crate::fs::FileSystem;

/// Label of the period preceding `today`, as `YYYY-MM`.
pub fn backup_label(today: NaiveDate) -> String {
    let (year, month) = if today.month() == 1 {
        (today.year() - 1, 12)
    } else {
        (today.year(), today.month() - 1)
    };
    format!("{:04}-{:02}", year, month)
}

/// Backup path for `storage_path` on `today`.
///
/// The label goes between the file stem and the extension:
/// `wiki/current.html` becomes `wiki/current-2026-09.html`.
pub fn backup_path(storage_path: &Path, today: NaiveDate) -> PathBuf {
    let label = backup_label(today);

    let mut name = storage_path
        .file_stem()
        .map(OsString::from)
        .unwrap_or_default();
    name.push("-");
    name.push(&label);
    if let Some(ext) = storage_path.extension() {
        name.push(".");
        name.push(ext);
    }

    storage_path.with_file_name(name)
}

/// Decides whether a save also writes a backup snapshot.
#[derive(Debug, Clone)]
pub struct BackupPolicy {
    enabled: bool,
    fixed_date: Option<NaiveDate>,
}

impl Default for BackupPolicy {
    fn default() -> Self {
        Self::new()
    }
}

impl BackupPolicy {
    /// Enabled policy using the local calendar date.
    pub fn new() -> Self {
        Self {
            enabled: true,
            fixed_date: None,
        }
    }

    /// Policy that never writes snapshots.
    pub fn disabled() -> Self {
        Self {
            enabled: false,
            fixed_date: None,
        }
    }

    /// Pin the date used for labels instead of reading the clock.
    pub fn at_date(mut self, date: NaiveDate) -> Self {
        self.fixed_date = Some(date);
        self
    }

    /// Whether saves write snapshots
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// The date labels are computed from
    pub fn today(&self) -> NaiveDate {
        self.fixed_date
            .unwrap_or_else(|| Local::now().date_naive())
    }

    /// Backup path for `storage_path` as of [`BackupPolicy::today`]
    pub fn path_for(&self, storage_path: &Path) -> PathBuf {
        backup_path(storage_path, self.today())
    }

    /// Write `content` to the current period's backup unless it already exists.
    ///
    /// Returns the path written, or `None` if the backup for this period was
    /// already taken (or the policy is disabled). The file is created with
    /// exclusive-create semantics, so an existing backup is never overwritten.
    pub fn maybe_snapshot<FS: FileSystem + ?Sized>(
        &self,
        fs: &FS,
        storage_path: &Path,
        content: &[u8],
    ) -> Result<Option<PathBuf>> {
        if !self.enabled {
            return Ok(None);
        }

        let path = self.path_for(storage_path);
        if fs.exists(&path) {
            return Ok(None);
        }

        match fs.create_new(&path, content) {
            Ok(()) => {
                info!("Wrote backup {:?}", path);
                Ok(Some(path))
            }
            Err(e) if e.kind() == ErrorKind::AlreadyExists => Ok(None),
            Err(source) => Err(WikisaveError::FileWrite { path, source }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fs::InMemoryFileSystem;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_label_is_previous_month() {
        assert_eq!(backup_label(date(2026, 10, 19)), "2026-09");
        assert_eq!(backup_label(date(2026, 3, 31)), "2026-02");
        assert_eq!(backup_label(date(2026, 12, 1)), "2026-11");
    }

    #[test]
    fn test_label_rolls_back_over_new_year() {
        assert_eq!(backup_label(date(2027, 1, 5)), "2026-12");
    }

    #[test]
    fn test_path_inserts_label_before_extension() {
        assert_eq!(
            backup_path(Path::new("/wiki/current.html"), date(2026, 10, 19)),
            PathBuf::from("/wiki/current-2026-09.html")
        );
    }

    #[test]
    fn test_path_without_extension() {
        assert_eq!(
            backup_path(Path::new("/wiki/current"), date(2026, 10, 19)),
            PathBuf::from("/wiki/current-2026-09")
        );
    }

    #[test]
    fn test_path_with_multiple_dots() {
        assert_eq!(
            backup_path(Path::new("notes.v2.html"), date(2026, 10, 19)),
            PathBuf::from("notes.v2-2026-09.html")
        );
    }

    #[test]
    fn test_snapshot_written_once_per_period() {
        let fs = InMemoryFileSystem::new();
        let policy = BackupPolicy::new().at_date(date(2026, 10, 19));
        let storage = Path::new("/wiki/current.html");

        let first = policy.maybe_snapshot(&fs, storage, b"first").unwrap();
        let second = policy.maybe_snapshot(&fs, storage, b"second").unwrap();

        assert_eq!(first, Some(PathBuf::from("/wiki/current-2026-09.html")));
        assert_eq!(second, None);
        assert_eq!(fs.content("/wiki/current-2026-09.html").unwrap(), b"first");
    }

    #[test]
    fn test_new_period_gets_new_snapshot() {
        let fs = InMemoryFileSystem::new();
        let storage = Path::new("/wiki/current.html");

        BackupPolicy::new()
            .at_date(date(2026, 10, 19))
            .maybe_snapshot(&fs, storage, b"october")
            .unwrap();
        BackupPolicy::new()
            .at_date(date(2026, 11, 2))
            .maybe_snapshot(&fs, storage, b"november")
            .unwrap();

        assert_eq!(fs.content("/wiki/current-2026-09.html").unwrap(), b"october");
        assert_eq!(fs.content("/wiki/current-2026-10.html").unwrap(), b"november");
    }

    #[test]
    fn test_disabled_policy_writes_nothing() {
        let fs = InMemoryFileSystem::new();
        let result = BackupPolicy::disabled()
            .maybe_snapshot(&fs, Path::new("/wiki/current.html"), b"x")
            .unwrap();
        assert_eq!(result, None);
        assert_eq!(fs.file_count(), 0);
    }
}
