use thiserror::Error;

/// Errors raised while parsing list query inputs
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum QueryError {
    #[error("Unknown sort property: {0}")]
    UnknownSortField(String),

    #[error("Unknown sort direction: {0}")]
    UnknownDirection(String),

    #[error("Empty sort expression")]
    EmptySort,

    #[error("Page size must be greater than zero")]
    ZeroPageSize,
}
