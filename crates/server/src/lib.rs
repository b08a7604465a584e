//! symptom-server library crate
//!
//! Exposes `build_app`, `config` and the store implementations for
//! integration tests. The actual binary entrypoint is in `main.rs`.

pub mod config;
pub mod db;
mod error;
mod middleware;
mod routes;

pub use error::AppError;
pub use middleware::REQUEST_ID_HEADER;
pub use routes::PAGINATION_HEADER;

use axum::{Extension, Router, middleware as axum_mw, routing::get};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use config::Config;
use db::SharedStore;

/// Build the full application router with all routes and middleware.
///
/// Extracted from `main()` so integration tests can construct the app
/// without binding to a TCP port.
pub fn build_app(store: SharedStore, config: &Config) -> Router {
    let prometheus_handle = middleware::metrics::install_recorder();

    // Operational routes
    let ops_routes = Router::new()
        .route("/health", get(routes::health::check))
        .route("/metrics", get(middleware::metrics::render))
        .layer(Extension(prometheus_handle));

    // Build CORS layer; browsers only see custom headers that are exposed
    let cors = if config.cors_origins.iter().any(|o| o == "*") {
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any)
            .expose_headers([PAGINATION_HEADER, REQUEST_ID_HEADER])
    } else {
        let origins: Vec<_> = config
            .cors_origins
            .iter()
            .filter_map(|o| o.parse().ok())
            .collect();
        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods(Any)
            .allow_headers(Any)
            .expose_headers([PAGINATION_HEADER, REQUEST_ID_HEADER])
    };

    Router::new()
        .merge(ops_routes)
        .merge(routes::patient_routes())
        .with_state(store)
        .layer(axum_mw::from_fn(middleware::audit_middleware))
        .layer(axum_mw::from_fn(middleware::request_id_middleware))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .layer(axum_mw::from_fn(middleware::metrics_middleware))
}
