//! Prometheus request metrics
//!
//! Records `http_requests_total` (counter) and `http_request_duration_seconds`
//! (histogram) for every request, with method/path/status labels, and renders
//! them on `GET /metrics`.

use std::time::Instant;

use axum::{Extension, extract::Request, middleware::Next, response::Response};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};

/// Install the global Prometheus recorder and return a handle for rendering.
///
/// Only the first install wins; later calls (several apps in one test
/// process) still get a handle, it just renders an empty registry.
pub fn install_recorder() -> PrometheusHandle {
    let recorder = PrometheusBuilder::new().build_recorder();
    let handle = recorder.handle();
    if metrics::set_global_recorder(recorder).is_err() {
        tracing::debug!("Metrics recorder already installed");
    }
    handle
}

/// GET /metrics - Render collected metrics in Prometheus text format
pub async fn render(Extension(handle): Extension<PrometheusHandle>) -> String {
    handle.render()
}

/// Collapse numeric path segments to `:id` to keep label cardinality bounded
fn normalize_path(path: &str) -> String {
    path.split('/')
        .map(|seg| {
            if !seg.is_empty() && seg.bytes().all(|b| b.is_ascii_digit()) {
                ":id"
            } else {
                seg
            }
        })
        .collect::<Vec<_>>()
        .join("/")
}

/// Middleware that records request count and duration metrics.
pub async fn metrics_middleware(request: Request, next: Next) -> Response {
    let method = request.method().to_string();
    let path = normalize_path(request.uri().path());

    let start = Instant::now();
    let response = next.run(request).await;
    let elapsed = start.elapsed().as_secs_f64();

    let status = response.status().as_u16().to_string();

    metrics::counter!(
        "http_requests_total",
        "method" => method.clone(),
        "path" => path.clone(),
        "status" => status
    )
    .increment(1);

    metrics::histogram!(
        "http_request_duration_seconds",
        "method" => method,
        "path" => path
    )
    .record(elapsed);

    response
}

#[cfg(test)]
mod tests {
    use super::normalize_path;

    #[test]
    fn numeric_ids_are_collapsed() {
        assert_eq!(normalize_path("/patients/42"), "/patients/:id");
        assert_eq!(normalize_path("/patients"), "/patients");
        assert_eq!(normalize_path("/patients/foo"), "/patients/foo");
        assert_eq!(normalize_path("/"), "/");
    }
}
