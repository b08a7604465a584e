//! symptom-server: Patient registry HTTP server binary entrypoint.

use std::error::Error;
use std::net::SocketAddr;
use std::sync::Arc;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use symptom_server::config::Config;
use symptom_server::db::{self, MemoryPatientStore, PatientRepository, SharedStore};

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info,tower_http=debug".into()),
        ))
        .with(tracing_subscriber::fmt::layer().json())
        .init();

    // Load configuration
    let config = Config::from_env();

    // Select the patient store
    let store: SharedStore = match config.database_url.as_deref() {
        Some(url) => {
            let pool = db::create_pool(url).await?;
            let repo = PatientRepository::new(pool);
            repo.migrate().await?;
            tracing::info!("Using PostgreSQL patient store");
            Arc::new(repo)
        }
        None => {
            tracing::warn!("DATABASE_URL not set, using in-memory patient store");
            Arc::new(MemoryPatientStore::new())
        }
    };

    if config.seed_demo_data {
        let seeded = db::seed_demo_data(store.as_ref()).await?;
        tracing::info!(count = seeded, "Demo patients seeded");
    }

    // Build application
    let app = symptom_server::build_app(store, &config);

    // Start server
    let addr: SocketAddr = config.bind_address.parse()?;
    tracing::info!("Starting patient registry on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server shutdown complete");
    Ok(())
}

/// Wait for shutdown signal (SIGTERM or SIGINT)
async fn shutdown_signal() {
    use tokio::signal;

    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C, starting graceful shutdown");
        }
        _ = terminate => {
            tracing::info!("Received SIGTERM, starting graceful shutdown");
        }
    }
}
