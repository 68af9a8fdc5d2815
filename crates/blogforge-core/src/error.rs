//! Domain-level error types.

use thiserror::Error;

use crate::validation::ValidationErrors;

/// Failures of the post write and read paths visible to callers.
///
/// Cache failures never show up here; they are logged and absorbed.
#[derive(Debug, Error)]
pub enum PostError {
    #[error("Validation failed: {0}")]
    Validation(ValidationErrors),

    #[error("Persistence failed: {0}")]
    Persistence(#[from] RepoError),
}

/// Repository-level errors.
#[derive(Debug, Error)]
pub enum RepoError {
    #[error("Database connection failed: {0}")]
    Connection(String),

    #[error("Query execution failed: {0}")]
    Query(String),

    #[error("Entity not found")]
    NotFound,

    #[error("Constraint violation: {0}")]
    Constraint(String),
}
