//! Party domain errors

use thiserror::Error;

use core_kernel::StoreError;

/// Errors that can occur in the party domain
#[derive(Debug, Error)]
pub enum PartyError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Storage error: {0}")]
    Store(#[from] StoreError),
}

impl PartyError {
    pub fn validation(message: impl Into<String>) -> Self {
        PartyError::Validation(message.into())
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        PartyError::Forbidden(message.into())
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        PartyError::NotFound(message.into())
    }
}
