// storage/src/errors.rs

use models::errors::ClinicError;
use thiserror::Error;

/// Store-level failures. Constraint violations (unique index, missing
/// foreign key) carry enough context to be translated into the domain
/// taxonomy without inspecting sled internals at the call site.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error(transparent)]
    Sled(#[from] sled::Error),
    #[error("serialization error: {0}")]
    Serde(#[from] serde_json::Error),
    #[error("{0} not found")]
    NotFound(&'static str),
    #[error("{0}")]
    Conflict(String),
    #[error("missing reference: {0}")]
    Reference(String),
    #[error("{0}")]
    Invalid(String),
}

pub type StoreResult<T> = Result<T, StoreError>;

// The centralized translator: constraint errors become 409/400-category
// domain errors, everything unexpected becomes a 500-category internal.
impl From<StoreError> for ClinicError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound(entity) => ClinicError::not_found(entity),
            StoreError::Conflict(msg) => ClinicError::Conflict(msg),
            StoreError::Reference(msg) => ClinicError::Reference(msg),
            StoreError::Invalid(msg) => ClinicError::Validation(msg),
            StoreError::Sled(e) => ClinicError::Internal(format!("store error: {e}")),
            StoreError::Serde(e) => ClinicError::Internal(format!("store codec error: {e}")),
        }
    }
}
