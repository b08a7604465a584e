//! Audit logging middleware for mutations

use axum::{extract::Request, http::Method, middleware::Next, response::Response};

use super::request_id::RequestId;

/// Log every write attempt (POST, PUT, PATCH) with its outcome
pub async fn audit_middleware(request: Request, next: Next) -> Response {
    let method = request.method().clone();
    let path = request.uri().path().to_string();
    let request_id = request
        .extensions()
        .get::<RequestId>()
        .map(|r| r.0.clone())
        .unwrap_or_else(|| "unknown".to_string());

    let response = next.run(request).await;

    if matches!(method, Method::POST | Method::PUT | Method::PATCH) {
        tracing::info!(
            target: "audit",
            request_id = %request_id,
            method = %method,
            path = %path,
            status = response.status().as_u16(),
            "Patient write"
        );
    }

    response
}
