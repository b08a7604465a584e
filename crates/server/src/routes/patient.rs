//! Patient resource HTTP handlers
//!
//! PATCH is not routed: partial update is an unsupported operation and
//! such requests get the router's 405 Method Not Allowed.

use axum::{
    Json,
    extract::State,
    http::{HeaderMap, HeaderName, HeaderValue},
    response::IntoResponse,
};
use symptom_core::{Patient, ValidationContext, today};

use super::extract::{ListParams, PatientBody, PatientId};
use crate::db::SharedStore;
use crate::error::AppError;

/// Response header carrying pagination metadata as compact JSON
pub const PAGINATION_HEADER: HeaderName = HeaderName::from_static("x-meta-pagination");

/// GET /patients/{id} - Read a patient
pub async fn read(
    State(store): State<SharedStore>,
    PatientId(id): PatientId,
) -> Result<Json<Patient>, AppError> {
    store
        .get(id)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("Patient/{} not found", id)))
}

/// GET /patients - List patients, optionally sorted and paginated
pub async fn list(
    State(store): State<SharedStore>,
    ListParams(query): ListParams,
) -> Result<impl IntoResponse, AppError> {
    let page = store.list(&query).await?;

    let mut headers = HeaderMap::new();
    if query.is_pageable() {
        let meta = serde_json::to_string(&page.meta())
            .map_err(|e| AppError::Internal(format!("Failed to encode page metadata: {}", e)))?;
        let value = HeaderValue::from_str(&meta)
            .map_err(|e| AppError::Internal(format!("Invalid page metadata header: {}", e)))?;
        headers.insert(PAGINATION_HEADER, value);
    }

    Ok((headers, Json(page.items)))
}

/// POST /patients - Create a new patient
pub async fn create(
    State(store): State<SharedStore>,
    PatientBody(input): PatientBody,
) -> Result<Json<Patient>, AppError> {
    let data = input.validate(&ValidationContext::new(today()))?;
    let patient = store.create(data).await?;

    tracing::info!(patient_id = patient.id, "Patient created");
    Ok(Json(patient))
}

/// PUT /patients/{id} - Replace a patient; the path id always wins over the body
pub async fn update(
    State(store): State<SharedStore>,
    PatientId(id): PatientId,
    PatientBody(input): PatientBody,
) -> Result<Json<Patient>, AppError> {
    if input.id.is_some_and(|body_id| body_id != id) {
        tracing::debug!(patient_id = id, body_id = ?input.id, "Ignoring id in update body");
    }

    let data = input.validate(&ValidationContext::new(today()))?;

    match store.update(id, data).await? {
        Some(patient) => {
            tracing::info!(patient_id = id, "Patient updated");
            Ok(Json(patient))
        }
        None => Err(AppError::NotFound(format!("Patient/{} not found", id))),
    }
}
