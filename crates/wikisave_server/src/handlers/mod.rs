pub mod document;
pub mod options;

pub use document::{DocumentState, document_routes};
pub use options::{fallback, options};
