#![doc = include_str!("../README.md")]

//! wikisave server
//!
//! An HTTP endpoint that lets a self-saving wiki (TiddlyWiki's PUT saver)
//! write its whole document back to disk.
//!
//! ## Routes
//!
//! - `GET /`: the document, or `empty.html` before the first save
//! - `HEAD /`: the document's current ETag
//! - `PUT /`: save, guarded by `If-Match` (204 on success, 412 on conflict)
//! - `OPTIONS *`: advertises PUT support
//!
//! ## Environment Variables
//!
//! - `HOST`: Server host (default: localhost)
//! - `PORT`: Server port (default: 17293)
//! - `WIKISAVE_STORAGE`: Storage directory or document file (default: .)
//! - `WIKISAVE_BACKUPS`: Write monthly backups (default: true)
//! - `WIKISAVE_KEEP_REJECTED`: Keep the latest rejected save in rejected.html (default: true)
//! - `WIKISAVE_MAX_BODY_MB`: Largest accepted save (default: 256)

pub mod args;
pub mod config;
pub mod error;
pub mod handlers;

pub use args::Cli;
pub use config::Config;
pub use error::ApiError;

use axum::{Router, extract::DefaultBodyLimit};
use handlers::{DocumentState, document_routes, fallback};
use wikisave_core::WikiStore;
use wikisave_core::fs::RealFileSystem;

/// Build the router for a document state
pub fn router(state: DocumentState, max_body_bytes: usize) -> Router {
    document_routes(state)
        .fallback(fallback)
        .layer(DefaultBodyLimit::max(max_body_bytes))
}

/// Build the router for a configuration, backed by the real filesystem
pub fn app(config: &Config) -> Router {
    let store = WikiStore::new(RealFileSystem, config.storage_config());
    router(DocumentState::new(store), config.max_body_bytes)
}
