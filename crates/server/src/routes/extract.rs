//! Request extractors that reject malformed input with structured 400s

use axum::{
    body::Bytes,
    extract::{FromRequest, FromRequestParts, Path, Query, Request},
    http::request::Parts,
};
use serde::Deserialize;
use symptom_core::{ErrorKind, ListQuery, PatientInput};

use crate::error::AppError;

/// Integer `{id}` path segment
#[derive(Debug, Clone, Copy)]
pub struct PatientId(pub i64);

impl<S> FromRequestParts<S> for PatientId
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(raw) = Path::<String>::from_request_parts(parts, state)
            .await
            .map_err(|e| AppError::BadRequest(ErrorKind::ArgumentTypeMismatch, e.body_text()))?;

        raw.parse::<i64>().map(PatientId).map_err(|_| {
            AppError::BadRequest(
                ErrorKind::ArgumentTypeMismatch,
                format!("Failed to convert path value '{}' to an integer id", raw),
            )
        })
    }
}

/// Patient JSON body. An empty body reads as an empty payload so that it
/// fails field validation rather than parsing.
#[derive(Debug, Clone)]
pub struct PatientBody(pub PatientInput);

impl<S> FromRequest<S> for PatientBody
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let bytes = Bytes::from_request(req, state)
            .await
            .map_err(|e| AppError::BadRequest(ErrorKind::MessageNotReadable, e.body_text()))?;

        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(PatientBody(PatientInput::default()));
        }

        serde_json::from_slice(&bytes).map(PatientBody).map_err(|e| {
            AppError::BadRequest(
                ErrorKind::MessageNotReadable,
                format!("Malformed patient payload: {}", e),
            )
        })
    }
}

#[derive(Debug, Deserialize)]
struct RawListParams {
    page: Option<u32>,
    size: Option<u32>,
    sort: Option<String>,
}

/// `page`, `size` and `sort` query parameters
#[derive(Debug, Clone, Copy)]
pub struct ListParams(pub ListQuery);

impl<S> FromRequestParts<S> for ListParams
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Query(raw) = Query::<RawListParams>::from_request_parts(parts, state)
            .await
            .map_err(|e| AppError::BadRequest(ErrorKind::InvalidPaging, e.body_text()))?;

        let query = ListQuery::from_parts(raw.page, raw.size, raw.sort.as_deref())?;
        Ok(ListParams(query))
    }
}
