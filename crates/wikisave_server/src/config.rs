use std::env;
use std::path::{Path, PathBuf};

use thiserror::Error;
use wikisave_core::backup::BackupPolicy;
use wikisave_core::config::{DOCUMENT_FILE_NAME, StorageConfig};

use crate::args::Cli;

/// Default port TiddlyWiki PUT savers listen on
pub const DEFAULT_PORT: u16 = 17293;

const DEFAULT_MAX_BODY_MB: usize = 256;

/// Server configuration loaded from environment variables and the command line
#[derive(Debug, Clone)]
pub struct Config {
    /// Server host (default: localhost)
    pub host: String,
    /// Server port (default: 17293)
    pub port: u16,
    /// Document file (default: ./current.html)
    pub document_path: PathBuf,
    /// Write monthly backups (default: true)
    pub backups: bool,
    /// Keep the body of the latest rejected save (default: true)
    pub keep_rejected: bool,
    /// Largest accepted PUT body in bytes (default: 256 MiB)
    pub max_body_bytes: usize,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration from any key/value source
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let host = lookup("HOST").unwrap_or_else(|| "localhost".to_string());

        let port = match lookup("PORT") {
            Some(value) => value.parse().map_err(|_| ConfigError::InvalidPort(value))?,
            None => DEFAULT_PORT,
        };

        let document_path = match lookup("WIKISAVE_STORAGE") {
            Some(value) => resolve_document_path(Path::new(&value)),
            None => PathBuf::from(".").join(DOCUMENT_FILE_NAME),
        };

        let backups = parse_flag(&lookup, "WIKISAVE_BACKUPS", true)?;
        let keep_rejected = parse_flag(&lookup, "WIKISAVE_KEEP_REJECTED", true)?;

        let max_body_mb = match lookup("WIKISAVE_MAX_BODY_MB") {
            Some(value) => value
                .parse::<usize>()
                .ok()
                .filter(|mb| *mb > 0)
                .ok_or(ConfigError::InvalidBodyLimit(value))?,
            None => DEFAULT_MAX_BODY_MB,
        };

        Ok(Config {
            host,
            port,
            document_path,
            backups,
            keep_rejected,
            max_body_bytes: max_body_mb.saturating_mul(1024 * 1024),
        })
    }

    /// Apply command-line overrides
    pub fn with_cli(mut self, cli: &Cli) -> Self {
        if let Some(storage) = &cli.storage {
            self.document_path = resolve_document_path(storage);
        }
        if let Some(host) = &cli.host {
            self.host = host.clone();
        }
        if let Some(port) = cli.port {
            self.port = port;
        }
        if cli.no_backups {
            self.backups = false;
        }
        self
    }

    /// Get the server address
    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Storage layout handed to the document store
    pub fn storage_config(&self) -> StorageConfig {
        let mut storage = StorageConfig::for_document(&self.document_path);
        if !self.backups {
            storage = storage.with_backup(BackupPolicy::disabled());
        }
        if !self.keep_rejected {
            storage = storage.without_rejected_copy();
        }
        storage
    }
}

/// Turn the storage argument into a document path.
///
/// An existing directory, or a path without an extension, is a storage
/// directory holding `current.html`. Anything else names the document.
pub fn resolve_document_path(storage: &Path) -> PathBuf {
    if storage.is_dir() {
        return storage.join(DOCUMENT_FILE_NAME);
    }
    if storage.is_file() || storage.extension().is_some() {
        return storage.to_path_buf();
    }
    storage.join(DOCUMENT_FILE_NAME)
}

fn parse_flag<F>(lookup: &F, key: &'static str, default: bool) -> Result<bool, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let Some(value) = lookup(key) else {
        return Ok(default);
    };
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::InvalidFlag { key, value }),
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid PORT environment variable: {0:?}")]
    InvalidPort(String),
    #[error("Invalid WIKISAVE_MAX_BODY_MB environment variable: {0:?}")]
    InvalidBodyLimit(String),
    #[error("Invalid {key} environment variable: {value:?} (expected true or false)")]
    InvalidFlag { key: &'static str, value: String },
}
