mod memory;
mod repository;

pub use memory::MemoryPatientStore;
pub use repository::PatientRepository;

use std::sync::Arc;

use async_trait::async_trait;
use deadpool_postgres::{Config, Pool, Runtime};
use symptom_core::{ListQuery, NewPatient, Page, Patient, demo_patients};
use tokio_postgres::NoTls;

use crate::error::AppError;

/// Persistence contract used by the HTTP handlers
#[async_trait]
pub trait PatientStore: Send + Sync {
    /// Look up a patient by id
    async fn get(&self, id: i64) -> Result<Option<Patient>, AppError>;

    /// Sort the whole collection (if requested), then cut out the requested page
    async fn list(&self, query: &ListQuery) -> Result<Page<Patient>, AppError>;

    /// Insert a new patient and return it with its assigned id
    async fn create(&self, data: NewPatient) -> Result<Patient, AppError>;

    /// Replace every field of an existing patient; `None` if the id is unknown
    async fn update(&self, id: i64, data: NewPatient) -> Result<Option<Patient>, AppError>;

    /// Check that the backing storage is reachable
    async fn ping(&self) -> Result<(), AppError>;
}

/// Store handle shared by all requests
pub type SharedStore = Arc<dyn PatientStore>;

/// Create a connection pool from a database URL
pub async fn create_pool(database_url: &str) -> Result<Pool, deadpool_postgres::CreatePoolError> {
    let mut cfg = Config::new();
    cfg.url = Some(database_url.to_string());
    cfg.create_pool(Some(Runtime::Tokio1), NoTls)
}

/// Insert the demo patients if the store is empty. Returns how many were added.
pub async fn seed_demo_data(store: &dyn PatientStore) -> Result<usize, AppError> {
    let existing = store.list(&ListQuery::default()).await?;
    if existing.total_elements > 0 {
        return Ok(0);
    }

    let patients = demo_patients();
    let count = patients.len();
    for patient in patients {
        store.create(patient).await?;
    }
    Ok(count)
}
