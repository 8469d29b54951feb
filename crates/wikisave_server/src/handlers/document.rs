use crate::error::ApiError;
use crate::handlers::options::options;
use axum::{
    Router,
    body::Bytes,
    extract::State,
    http::{HeaderMap, HeaderValue, StatusCode, header},
    response::{IntoResponse, Response},
    routing::get,
};
use std::sync::Arc;
use tracing::debug;
use wikisave_core::fs::RealFileSystem;
use wikisave_core::{Fingerprint, SaveOutcome, WikiStore};

/// Content type of the document and the placeholder
pub const HTML_CONTENT_TYPE: &str = "text/html; charset=UTF-8";

/// Shared state for document handlers
#[derive(Clone)]
pub struct DocumentState {
    pub store: Arc<WikiStore<RealFileSystem>>,
}

impl DocumentState {
    pub fn new(store: WikiStore<RealFileSystem>) -> Self {
        Self {
            store: Arc::new(store),
        }
    }
}

/// Create the routes for `/`
pub fn document_routes(state: DocumentState) -> Router {
    Router::new()
        .route(
            "/",
            get(get_document)
                .head(head_document)
                .put(put_document)
                .options(options),
        )
        .with_state(state)
}

fn etag_value(fingerprint: &Fingerprint) -> Option<HeaderValue> {
    fingerprint
        .as_header()
        .and_then(|tag| HeaderValue::from_str(tag).ok())
}

fn insert_etag(headers: &mut HeaderMap, fingerprint: &Fingerprint) {
    if let Some(value) = etag_value(fingerprint) {
        headers.insert(header::ETAG, value);
    }
}

/// GET / - Serve the document, or the placeholder before the first save
async fn get_document(State(state): State<DocumentState>) -> Result<Response, ApiError> {
    let loaded = state.store.load()?;
    debug!(
        "Serving {:?} ({} bytes)",
        loaded.source,
        loaded.content.len()
    );

    let mut headers = HeaderMap::new();
    headers.insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static(HTML_CONTENT_TYPE),
    );
    headers.insert(header::CONTENT_LENGTH, HeaderValue::from(loaded.content.len()));
    if let Some(fingerprint) = &loaded.fingerprint {
        insert_etag(&mut headers, fingerprint);
    }

    Ok((StatusCode::OK, headers, loaded.content).into_response())
}

/// HEAD / - Report the document's current ETag
async fn head_document(State(state): State<DocumentState>) -> Response {
    let mut headers = HeaderMap::new();
    headers.insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static(HTML_CONTENT_TYPE),
    );
    insert_etag(&mut headers, &state.store.current_fingerprint());

    (StatusCode::OK, headers).into_response()
}

/// PUT / - Save the document if `If-Match` names the current version
async fn put_document(
    State(state): State<DocumentState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Response, ApiError> {
    // hyper holds the body to the declared length; only its presence is checked here
    headers
        .get(header::CONTENT_LENGTH)
        .ok_or(ApiError::LengthRequired)?
        .to_str()
        .ok()
        .and_then(|v| v.trim().parse::<usize>().ok())
        .ok_or_else(|| ApiError::MalformedRequest("invalid Content-Length".to_string()))?;

    let if_match = headers
        .get(header::IF_MATCH)
        .map(|v| v.to_str())
        .transpose()
        .map_err(|_| ApiError::MalformedRequest("If-Match is not visible ASCII".to_string()))?;

    let mut response_headers = HeaderMap::new();
    response_headers.insert(header::CONTENT_LENGTH, HeaderValue::from(0usize));

    match state.store.save(if_match, &body)? {
        SaveOutcome::Saved {
            fingerprint,
            backup,
        } => {
            if let Some(backup) = backup {
                debug!("PUT / took monthly backup {:?}", backup);
            }
            debug!("PUT / stored {} bytes, ETag {}", body.len(), fingerprint);
            insert_etag(&mut response_headers, &fingerprint);
            Ok((StatusCode::NO_CONTENT, response_headers).into_response())
        }
        SaveOutcome::Conflict { current } => {
            debug!("PUT / answered 412, current ETag {}", current);
            insert_etag(&mut response_headers, &current);
            Ok((StatusCode::PRECONDITION_FAILED, response_headers).into_response())
        }
    }
}
