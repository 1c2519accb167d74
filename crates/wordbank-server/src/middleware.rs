//! CORS and request logging.

use axum::{
    extract::Request,
    http::{header, Method},
    middleware::Next,
    response::Response,
};
use tower_http::cors::{Any, CorsLayer};
use tracing::{info, warn};

/// Browsers may call the API from anywhere, with the methods it serves.
pub fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([header::CONTENT_TYPE])
}

/// Learner addressed by a `/users/:username/...` path.
fn learner(path: &str) -> Option<&str> {
    let mut segments = path.trim_start_matches('/').split('/');
    match (segments.next(), segments.next()) {
        (Some("users"), Some(username)) if !username.is_empty() => Some(username),
        _ => None,
    }
}

/// Log each request with its learner, if any. Server errors log at warn.
pub async fn logging_middleware(request: Request, next: Next) -> Response {
    let method = request.method().clone();
    let path = request.uri().path().to_string();
    let username = learner(&path).unwrap_or("-").to_string();
    let start = std::time::Instant::now();

    let response = next.run(request).await;
    let status = response.status();
    let elapsed_ms = start.elapsed().as_millis() as u64;

    if status.is_server_error() {
        warn!(%method, %path, %username, status = status.as_u16(), elapsed_ms, "Request failed");
    } else {
        info!(%method, %path, %username, status = status.as_u16(), elapsed_ms, "Request handled");
    }

    response
}
