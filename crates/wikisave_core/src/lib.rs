#![doc = include_str!("../README.md")]
#![warn(missing_docs)]

/// Monthly backup snapshots
pub mod backup;

/// Storage layout and policies
pub mod config;

/// Error (common error types)
pub mod error;

/// Document fingerprints (ETags)
pub mod fingerprint;

/// Filesystem abstraction
pub mod fs;

/// Whole-document reads and writes
pub mod store;

/// Conflict-checked load/save protocol
pub mod wiki;

#[cfg(test)]
pub mod test_utils;

pub use config::StorageConfig;
pub use error::{Result, WikisaveError};
pub use fingerprint::Fingerprint;
pub use wiki::{Loaded, SaveOutcome, Source, WikiStore};
