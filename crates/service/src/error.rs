use core_types::Field;
use database::DbError;
use thiserror::Error;

/// Caller-supplied data failed a precondition. Always fixable by the caller.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{message}")]
pub struct ValidationError {
    pub field: Field,
    pub message: String,
}

impl ValidationError {
    pub fn new(field: Field, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

#[derive(Error, Debug)]
pub enum ServiceError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Anything the repository reported, untouched.
    #[error(transparent)]
    Repository(#[from] DbError),
}

impl ServiceError {
    pub fn is_validation(&self) -> bool {
        matches!(self, ServiceError::Validation(_))
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, ServiceError::Repository(e) if e.is_not_found())
    }

    pub fn is_constraint_violation(&self) -> bool {
        matches!(self, ServiceError::Repository(e) if e.is_constraint_violation())
    }
}
