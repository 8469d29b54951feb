use axum::{
    http::{HeaderName, Method, StatusCode, header},
    response::{IntoResponse, Response},
};

/// Methods advertised to the wiki's saver detection
pub const ALLOWED_METHODS: &str = "GET,HEAD,POST,OPTIONS,CONNECT,PUT,DAV,dav";

/// OPTIONS (any path) - advertise PUT support. Touches no files.
pub async fn options() -> Response {
    (
        StatusCode::OK,
        [
            (header::ALLOW, ALLOWED_METHODS),
            (HeaderName::from_static("x-api-access-type"), "file"),
            (HeaderName::from_static("dav"), "tw5/put"),
            (header::CONTENT_LENGTH, "0"),
        ],
    )
        .into_response()
}

/// Every path other than `/`: 404 for all methods except OPTIONS.
pub async fn fallback(method: Method) -> Response {
    if method == Method::OPTIONS {
        return options().await;
    }
    not_found()
}

pub fn not_found() -> Response {
    (
        StatusCode::NOT_FOUND,
        [(header::CONTENT_TYPE, "text/plain")],
    )
        .into_response()
}
