use axum::{extract::Request, middleware::Next, response::Response};
use std::time::Instant;

/// Request logging middleware
///
/// Server errors log at error level and client errors at warn.
pub async fn log_request(req: Request, next: Next) -> Response {
    let method = req.method().clone();
    let path = req.uri().path().to_string();
    let start = Instant::now();

    let response = next.run(req).await;

    let duration_ms = start.elapsed().as_millis() as u64;
    let status = response.status();

    if status.is_server_error() {
        tracing::error!(method = %method, path = %path, status = %status, duration_ms, "Request failed");
    } else if status.is_client_error() {
        tracing::warn!(method = %method, path = %path, status = %status, duration_ms, "Request rejected");
    } else {
        tracing::info!(method = %method, path = %path, status = %status, duration_ms, "Request processed");
    }

    response
}
