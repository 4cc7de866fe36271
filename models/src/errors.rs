// models/src/errors.rs

use std::collections::HashMap;

pub use thiserror::Error;

/// Domain-wide error taxonomy. Every controller-level failure funnels into
/// one of these categories; the REST layer maps each variant onto its HTTP
/// status (400/401/403/404/409/500).
#[derive(Debug, Error)]
pub enum ClinicError {
    #[error("{0}")]
    Validation(String),
    #[error("validation failed")]
    FieldValidation(HashMap<String, String>),
    #[error("{0}")]
    Unauthorized(String),
    #[error("{0}")]
    Forbidden(String),
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    Conflict(String),
    #[error("missing reference: {0}")]
    Reference(String),
    #[error("internal error: {0}")]
    Internal(String),
}

impl ClinicError {
    pub fn not_found(entity: &str) -> Self {
        ClinicError::NotFound(format!("{entity} not found"))
    }

    pub fn forbidden(action: &str) -> Self {
        ClinicError::Forbidden(format!("You don't have permission to {action}"))
    }
}

impl From<bcrypt::BcryptError> for ClinicError {
    fn from(err: bcrypt::BcryptError) -> Self {
        ClinicError::Internal(format!("password hashing failed: {err}"))
    }
}

impl From<serde_json::Error> for ClinicError {
    fn from(err: serde_json::Error) -> Self {
        ClinicError::Internal(format!("JSON processing error: {err}"))
    }
}

impl From<anyhow::Error> for ClinicError {
    fn from(err: anyhow::Error) -> Self {
        ClinicError::Internal(format!("{err:#}"))
    }
}

/// A type alias for a `Result` that returns a `ClinicError` on failure.
pub type ClinicResult<T> = Result<T, ClinicError>;
