use serde::{Deserialize, Serialize};

use crate::validation::Violation;

/// Discriminator naming the class of failure in an error body
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum ErrorKind {
    /// Payload failed one or more validation rules
    ArgumentNotValid,
    /// A path parameter could not be converted to its declared type
    ArgumentTypeMismatch,
    /// Request body was not readable as a Patient payload
    MessageNotReadable,
    /// `page` / `size` query parameters were malformed
    InvalidPaging,
    /// `sort` query parameter was malformed
    InvalidSort,
    InternalError,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::ArgumentNotValid => "ArgumentNotValid",
            ErrorKind::ArgumentTypeMismatch => "ArgumentTypeMismatch",
            ErrorKind::MessageNotReadable => "MessageNotReadable",
            ErrorKind::InvalidPaging => "InvalidPaging",
            ErrorKind::InvalidSort => "InvalidSort",
            ErrorKind::InternalError => "InternalError",
        }
    }
}

/// Structured JSON body returned with 4xx/5xx responses
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorBody {
    pub status: u16,
    pub error: String,
    pub exception: ErrorKind,
    pub message: String,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<Violation>,
}

impl ErrorBody {
    /// Create a body without field-level details
    pub fn new(status: u16, error: &str, exception: ErrorKind, message: &str) -> Self {
        Self {
            status,
            error: error.to_string(),
            exception,
            message: message.to_string(),
            errors: Vec::new(),
        }
    }

    /// Create a 400 body for a set of validation violations
    pub fn invalid(violations: Vec<Violation>) -> Self {
        let message = format!("Validation failed with {} error(s)", violations.len());
        Self {
            status: 400,
            error: "Bad Request".to_string(),
            exception: ErrorKind::ArgumentNotValid,
            message,
            errors: violations,
        }
    }
}
