//! Storage configuration for a wikisave store.
//!
//! [`StorageConfig`] names every file the store touches. It is built once at
//! startup and handed to [`crate::WikiStore::new`], so a store can be pointed
//! at any directory (including a temporary one in tests).
//!
//! # Layout
//!
//! Inside a storage directory:
//!
//! - `current.html`: the document
//! - `empty.html`: placeholder served before the first save
//! - `current-YYYY-MM.html`: monthly backups
//! - `rejected.html`: body of the most recent PUT rejected with 412
//!
//! # Example
//!
//! ```
//! use wikisave_core::config::StorageConfig;
//! use std::path::Path;
//!
//! let config = StorageConfig::in_dir("/srv/wiki");
//! assert_eq!(config.document_path, Path::new("/srv/wiki/current.html"));
//! assert_eq!(config.placeholder_path, Path::new("/srv/wiki/empty.html"));
//! ```

use std::path::{Path, PathBuf};

use crate::backup::BackupPolicy;

/// Default file name of the document inside a storage directory
pub const DOCUMENT_FILE_NAME: &str = "current.html";

/// File name of the placeholder served before the first save
pub const PLACEHOLDER_FILE_NAME: &str = "empty.html";

/// File name that receives rejected PUT bodies
pub const REJECTED_FILE_NAME: &str = "rejected.html";

/// Paths and policies for one stored document.
#[derive(Debug, Clone)]
pub struct StorageConfig {
    /// The document itself
    pub document_path: PathBuf,

    /// Fallback content served by GET while the document does not exist
    pub placeholder_path: PathBuf,

    /// Where the body of the latest conflicting PUT is kept.
    /// `None` disables keeping rejected payloads.
    pub rejected_path: Option<PathBuf>,

    /// Monthly backup behaviour
    pub backup: BackupPolicy,
}

impl StorageConfig {
    /// Standard layout inside `dir`.
    pub fn in_dir(dir: impl AsRef<Path>) -> Self {
        Self::for_document(dir.as_ref().join(DOCUMENT_FILE_NAME))
    }

    /// Layout for an explicit document path; the placeholder and the
    /// rejected payload live next to it.
    pub fn for_document(document_path: impl Into<PathBuf>) -> Self {
        let document_path = document_path.into();
        let dir = document_path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_default();

        Self {
            placeholder_path: dir.join(PLACEHOLDER_FILE_NAME),
            rejected_path: Some(dir.join(REJECTED_FILE_NAME)),
            document_path,
            backup: BackupPolicy::new(),
        }
    }

    /// Replace the backup policy
    pub fn with_backup(mut self, backup: BackupPolicy) -> Self {
        self.backup = backup;
        self
    }

    /// Stop keeping rejected payloads
    pub fn without_rejected_copy(mut self) -> Self {
        self.rejected_path = None;
        self
    }

    /// Directory holding the document
    pub fn dir(&self) -> &Path {
        self.document_path.parent().unwrap_or_else(|| Path::new(""))
    }
}
