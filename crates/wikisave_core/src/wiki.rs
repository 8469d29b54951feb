//! The save protocol.
//!
//! [`WikiStore`] ties the fingerprint provider, content store and backup
//! policy together into the three things the HTTP layer asks for: load the
//! document to serve it, report the current fingerprint, and save a new
//! version guarded by the client's `If-Match` claim.

use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

use log::{debug, info, warn};

use crate::config::StorageConfig;
use crate::error::Result;
use crate::fingerprint::Fingerprint;
use crate::fs::FileSystem;
use crate::store::ContentStore;

/// Where the bytes returned by [`WikiStore::load`] came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Source {
    /// The saved document
    Document,
    /// The placeholder, because nothing has been saved yet
    Placeholder,
    /// Neither file exists
    Empty,
}

/// Content to serve for a GET.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Loaded {
    /// Bytes to send
    pub content: Vec<u8>,
    /// Fingerprint of the file that was served, `None` for [`Source::Empty`]
    pub fingerprint: Option<Fingerprint>,
    /// Which file the content came from
    pub source: Source,
}

/// Result of a save attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SaveOutcome {
    /// The content was written.
    Saved {
        /// Fingerprint of the newly written document
        fingerprint: Fingerprint,
        /// Backup file created by this save, if any
        backup: Option<PathBuf>,
    },
    /// The claim did not match; nothing was written to the document.
    Conflict {
        /// The document's fingerprint, unchanged by the request
        current: Fingerprint,
    },
}

/// A single wiki document on disk with conflict-checked saves.
pub struct WikiStore<FS: FileSystem> {
    store: ContentStore<FS>,
    config: StorageConfig,
    write_lock: Mutex<()>,
}

impl<FS: FileSystem> WikiStore<FS> {
    /// Create a store over `fs` with the given layout
    pub fn new(fs: FS, config: StorageConfig) -> Self {
        Self {
            store: ContentStore::new(fs),
            config,
            write_lock: Mutex::new(()),
        }
    }

    /// Storage layout in use
    pub fn config(&self) -> &StorageConfig {
        &self.config
    }

    /// Path of the stored document
    pub fn document_path(&self) -> &Path {
        &self.config.document_path
    }

    /// Fingerprint of the document path (never of the placeholder)
    pub fn current_fingerprint(&self) -> Fingerprint {
        self.store.fingerprint(&self.config.document_path)
    }

    /// Load the document, falling back to the placeholder, then to nothing.
    pub fn load(&self) -> Result<Loaded> {
        if let Some(doc) = self.store.read(&self.config.document_path)? {
            return Ok(Loaded {
                content: doc.content,
                fingerprint: Some(doc.fingerprint),
                source: Source::Document,
            });
        }

        if let Some(doc) = self.store.read(&self.config.placeholder_path)? {
            debug!(
                "Serving placeholder {:?} in place of {:?}",
                self.config.placeholder_path, self.config.document_path
            );
            return Ok(Loaded {
                content: doc.content,
                fingerprint: Some(doc.fingerprint),
                source: Source::Placeholder,
            });
        }

        warn!(
            "Neither {:?} nor {:?} exists; serving an empty document",
            self.config.document_path, self.config.placeholder_path
        );
        Ok(Loaded {
            content: Vec::new(),
            fingerprint: None,
            source: Source::Empty,
        })
    }

    /// Save `content` if `if_match` matches the document's current fingerprint.
    ///
    /// The fingerprint check, the write and the backup run under one lock,
    /// so concurrent saves cannot both pass the check against the same
    /// version.
    pub fn save(&self, if_match: Option<&str>, content: &[u8]) -> Result<SaveOutcome> {
        let _guard = self
            .write_lock
            .lock()
            .unwrap_or_else(PoisonError::into_inner);

        let current = self.current_fingerprint();
        if !current.matches(if_match) {
            warn!(
                "Rejected save of {} bytes: If-Match {:?} does not match current {}",
                content.len(),
                if_match,
                current
            );
            self.keep_rejected(content);
            return Ok(SaveOutcome::Conflict { current });
        }

        let path = &self.config.document_path;
        let fingerprint = self.store.write(path, content)?;
        let backup = self
            .config
            .backup
            .maybe_snapshot(self.store.fs(), path, content)?;

        info!(
            "Saved {} bytes to {:?} (ETag {} -> {})",
            content.len(),
            path,
            current,
            fingerprint
        );
        Ok(SaveOutcome::Saved {
            fingerprint,
            backup,
        })
    }

    fn keep_rejected(&self, content: &[u8]) {
        let Some(path) = &self.config.rejected_path else {
            return;
        };
        match self.store.fs().write_binary(path, content) {
            Ok(()) => debug!("Kept rejected payload at {:?}", path),
            Err(e) => warn!("Could not keep rejected payload at {:?}: {}", path, e),
        }
    }
}
