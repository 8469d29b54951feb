use axum::{
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};
use thiserror::Error;
use wikisave_core::WikisaveError;

/// Failures surfaced to HTTP clients.
///
/// A stale `If-Match` is not here: it is an ordinary 412 response.
#[derive(Debug, Error)]
pub enum ApiError {
    /// PUT without a `Content-Length` header
    #[error("Content-Length header is required")]
    LengthRequired,

    /// Unparsable or inconsistent request headers
    #[error("Malformed request: {0}")]
    MalformedRequest(String),

    /// Filesystem failure while reading or writing the document
    #[error(transparent)]
    Storage(#[from] WikisaveError),
}

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::LengthRequired => StatusCode::LENGTH_REQUIRED,
            ApiError::MalformedRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!("Storage failure: {}", self);
        } else {
            tracing::warn!("Rejected request: {}", self);
        }
        (
            status,
            [(header::CONTENT_TYPE, "text/plain; charset=UTF-8")],
            self.to_string(),
        )
            .into_response()
    }
}
