use std::path::{Path, PathBuf};

use thiserror::Error;

/// Unified error type for wikisave storage operations.
///
/// A missing document is not an error (it is `None`), and a stale
/// `If-Match` is not an error either (it is a `SaveOutcome::Conflict`).
/// What remains are storage faults.
#[derive(Debug, Error)]
pub enum WikisaveError {
    /// Reading an existing file failed
    #[error("Failed to read file '{path}': {source}")]
    FileRead {
        /// File that could not be read
        path: PathBuf,
        /// Underlying I/O error
        source: std::io::Error,
    },

    /// Writing a file or creating its directory failed
    #[error("Failed to write file '{path}': {source}")]
    FileWrite {
        /// File or directory that could not be written
        path: PathBuf,
        /// Underlying I/O error
        source: std::io::Error,
    },
}

impl WikisaveError {
    /// Path involved in the failure
    pub fn path(&self) -> &Path {
        match self {
            WikisaveError::FileRead { path, .. } | WikisaveError::FileWrite { path, .. } => path,
        }
    }
}

/// Result type alias for wikisave operations
pub type Result<T> = std::result::Result<T, WikisaveError>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    #[test]
    fn test_error_display_includes_path() {
        let err = WikisaveError::FileWrite {
            path: PathBuf::from("/wiki/current.html"),
            source: io::Error::new(io::ErrorKind::PermissionDenied, "denied"),
        };
        let msg = err.to_string();
        assert!(msg.contains("/wiki/current.html"));
        assert!(msg.contains("denied"));
        assert_eq!(err.path(), Path::new("/wiki/current.html"));
    }
}
