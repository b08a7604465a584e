mod extract;
pub mod health;
mod patient;

pub use patient::PAGINATION_HEADER;

use axum::{Router, routing::get};

use crate::db::SharedStore;

/// Build patient resource routes
pub fn patient_routes() -> Router<SharedStore> {
    Router::new()
        .route("/patients", get(patient::list).post(patient::create))
        .route("/patients/{id}", get(patient::read).put(patient::update))
}
