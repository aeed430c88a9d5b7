//! Ledger domain errors
//!
//! The taxonomy callers act on: `Validation` means fix the input and
//! resubmit, `Forbidden` is never retried, `InvalidTransition` usually
//! means another approver won the race (re-fetch and re-decide),
//! `Conflict` is permanent, and `Store` errors may be retried when
//! `StoreError::is_transient` holds.

use thiserror::Error;

use core_kernel::{MoneyError, StoreError};

use crate::entry::EntryStatus;

/// Errors that can occur in the ledger domain
#[derive(Debug, Error)]
pub enum LedgerError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Invalid transition: cannot {action} an entry in {from:?} state")]
    InvalidTransition { from: EntryStatus, action: String },

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Money error: {0}")]
    Money(#[from] MoneyError),

    #[error("Storage error: {0}")]
    Store(#[from] StoreError),
}

impl LedgerError {
    pub fn validation(message: impl Into<String>) -> Self {
        LedgerError::Validation(message.into())
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        LedgerError::Forbidden(message.into())
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        LedgerError::NotFound(message.into())
    }

    pub fn invalid_transition(from: EntryStatus, action: impl Into<String>) -> Self {
        LedgerError::InvalidTransition {
            from,
            action: action.into(),
        }
    }
}
