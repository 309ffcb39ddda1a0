//! Domain-level error types.

use thiserror::Error;

/// Domain errors - business logic failures.
#[derive(Debug, Error)]
pub enum DomainError {
    /// Malformed or out-of-range input that never reached domain rules.
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// Well-formed input that breaks a domain rule.
    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("{entity_type} not found")]
    NotFound { entity_type: &'static str, id: i64 },

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl DomainError {
    pub fn not_found(entity_type: &'static str, id: i64) -> Self {
        Self::NotFound { entity_type, id }
    }
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

impl From<RepoError> for DomainError {
    fn from(err: RepoError) -> Self {
        match err {
            RepoError::Constraint(detail) => {
                let message = if detail.contains("email") {
                    "An author with this email already exists."
                } else {
                    "A record with this value already exists."
                };
                DomainError::Conflict(message.to_string())
            }
            RepoError::NotFound => {
                DomainError::Internal("record vanished during write".to_string())
            }
            RepoError::Connection(msg) | RepoError::Query(msg) => DomainError::Internal(msg),
        }
    }
}
