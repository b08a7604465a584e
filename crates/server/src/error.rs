//! Application error handling

use std::fmt;

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use symptom_core::{ErrorBody, ErrorKind, QueryError, Violation};

/// Application error type
#[derive(Debug)]
pub enum AppError {
    /// No record for the requested id; answered with an empty 404
    NotFound(String),
    BadRequest(ErrorKind, String),
    Invalid(Vec<Violation>),
    Internal(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::NotFound(msg) | AppError::Internal(msg) => f.write_str(msg),
            AppError::BadRequest(kind, msg) => write!(f, "{}: {}", kind.as_str(), msg),
            AppError::Invalid(violations) => {
                write!(f, "{} validation error(s)", violations.len())
            }
        }
    }
}

impl std::error::Error for AppError {}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            AppError::NotFound(msg) => {
                tracing::debug!(reason = %msg, "Not found");
                return StatusCode::NOT_FOUND.into_response();
            }
            AppError::BadRequest(kind, msg) => {
                (StatusCode::BAD_REQUEST, ErrorBody::new(400, "Bad Request", kind, &msg))
            }
            AppError::Invalid(violations) => (StatusCode::BAD_REQUEST, ErrorBody::invalid(violations)),
            AppError::Internal(msg) => {
                tracing::error!(error = %msg, "Request failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorBody::new(
                        500,
                        "Internal Server Error",
                        ErrorKind::InternalError,
                        "An unexpected error occurred",
                    ),
                )
            }
        };

        (status, Json(body)).into_response()
    }
}

impl From<Vec<Violation>> for AppError {
    fn from(violations: Vec<Violation>) -> Self {
        AppError::Invalid(violations)
    }
}

impl From<QueryError> for AppError {
    fn from(err: QueryError) -> Self {
        let kind = match err {
            QueryError::ZeroPageSize => ErrorKind::InvalidPaging,
            _ => ErrorKind::InvalidSort,
        };
        AppError::BadRequest(kind, err.to_string())
    }
}

impl From<deadpool_postgres::PoolError> for AppError {
    fn from(err: deadpool_postgres::PoolError) -> Self {
        AppError::Internal(format!("Database pool error: {}", err))
    }
}

impl From<tokio_postgres::Error> for AppError {
    fn from(err: tokio_postgres::Error) -> Self {
        AppError::Internal(format!("Database error: {}", err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http_body_util::BodyExt;
    use serde_json::Value as JsonValue;

    async fn body_of(response: Response) -> Vec<u8> {
        response.into_body().collect().await.unwrap().to_bytes().to_vec()
    }

    #[tokio::test]
    async fn not_found_has_empty_body() {
        let response = AppError::NotFound("Patient/9 not found".into()).into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert!(body_of(response).await.is_empty());
    }

    #[tokio::test]
    async fn internal_error_hides_details() {
        let response = AppError::Internal("connection refused".into()).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let body: JsonValue = serde_json::from_slice(&body_of(response).await).unwrap();
        assert_eq!(body["exception"], "InternalError");
        assert!(!body["message"].as_str().unwrap().contains("connection"));
    }

    #[tokio::test]
    async fn query_errors_map_to_bad_request_kinds() {
        let response = AppError::from(QueryError::ZeroPageSize).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body: JsonValue = serde_json::from_slice(&body_of(response).await).unwrap();
        assert_eq!(body["exception"], "InvalidPaging");

        let response = AppError::from(QueryError::UnknownSortField("x".into())).into_response();
        let body: JsonValue = serde_json::from_slice(&body_of(response).await).unwrap();
        assert_eq!(body["exception"], "InvalidSort");
    }
}
