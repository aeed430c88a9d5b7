//! Port infrastructure shared by domain storage traits
//!
//! Each domain defines a port trait (`LedgerStore`, `PartyStore`) describing
//! what it needs from its data source; adapters implement the trait either
//! in-memory (mock) or against PostgreSQL (infra_db). All adapters report
//! failures through [`StoreError`] so callers can apply a uniform retry
//! policy: transient failures may be retried with backoff, everything else
//! must surface to the actor.

use std::fmt;
use thiserror::Error;

/// Error type for port operations
#[derive(Debug, Error)]
pub enum StoreError {
    /// The requested record was not found
    #[error("Not found: {entity_type} with id {id}")]
    NotFound { entity_type: String, id: String },

    /// The operation conflicts with existing data (e.g. duplicate key)
    #[error("Conflict: {message}")]
    Conflict { message: String },

    /// Connection to the underlying storage failed
    #[error("Connection error: {message}")]
    Connection {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// The operation timed out
    #[error("Timeout after {duration_ms}ms: {operation}")]
    Timeout { operation: String, duration_ms: u64 },

    /// A serialization or data mapping error occurred
    #[error("Data mapping error: {message}")]
    Mapping { message: String },

    /// An internal storage error occurred
    #[error("Internal error: {message}")]
    Internal {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },
}

impl StoreError {
    /// Creates a NotFound error
    pub fn not_found(entity_type: impl Into<String>, id: impl fmt::Display) -> Self {
        StoreError::NotFound {
            entity_type: entity_type.into(),
            id: id.to_string(),
        }
    }

    /// Creates a Conflict error
    pub fn conflict(message: impl Into<String>) -> Self {
        StoreError::Conflict {
            message: message.into(),
        }
    }

    /// Creates a Connection error
    pub fn connection(message: impl Into<String>) -> Self {
        StoreError::Connection {
            message: message.into(),
            source: None,
        }
    }

    /// Creates a Mapping error
    pub fn mapping(message: impl Into<String>) -> Self {
        StoreError::Mapping {
            message: message.into(),
        }
    }

    /// Creates an Internal error
    pub fn internal(message: impl Into<String>) -> Self {
        StoreError::Internal {
            message: message.into(),
            source: None,
        }
    }

    /// Returns true if this error indicates a transient failure that may
    /// succeed on retry
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            StoreError::Connection { .. } | StoreError::Timeout { .. }
        )
    }

    /// Returns true if this error indicates the record was not found
    pub fn is_not_found(&self) -> bool {
        matches!(self, StoreError::NotFound { .. })
    }
}

/// Marker trait for all domain ports
///
/// Port traits extend this marker so adapters are thread-safe and usable
/// from async contexts behind `Arc<dyn Port>`.
pub trait DomainPort: Send + Sync + 'static {}
