//! Database error types
//!
//! Adapter-level errors, classified from PostgreSQL error codes. The
//! repositories convert these into the domain-facing [`StoreError`] so the
//! domain layer never sees SQLx types.

use thiserror::Error;

use core_kernel::StoreError;

/// Errors that can occur during database operations
#[derive(Debug, Error)]
pub enum DatabaseError {
    /// Failed to establish a database connection
    #[error("Failed to connect to database: {0}")]
    ConnectionFailed(String),

    /// Query execution failed
    #[error("Query failed: {0}")]
    QueryFailed(String),

    /// Entity not found in database
    #[error("Entity not found: {0}")]
    NotFound(String),

    /// Unique constraint violation
    #[error("Duplicate entry: {0}")]
    DuplicateEntry(String),

    /// Foreign key constraint violation
    #[error("Foreign key violation: {0}")]
    ForeignKeyViolation(String),

    /// Check constraint violation
    #[error("Constraint violation: {0}")]
    ConstraintViolation(String),

    /// A stored value could not be mapped to its domain type
    #[error("Mapping error: {0}")]
    MappingError(String),

    /// Pool exhaustion - no available connections
    #[error("Connection pool exhausted")]
    PoolExhausted,
}

impl DatabaseError {
    /// Creates a not found error for a specific entity type and identifier
    pub fn not_found(entity: &str, id: impl std::fmt::Display) -> Self {
        DatabaseError::NotFound(format!("{} with id '{}' not found", entity, id))
    }

    /// Creates a mapping error for a bad stored value
    pub fn mapping(message: impl Into<String>) -> Self {
        DatabaseError::MappingError(message.into())
    }

    /// Checks if this error indicates a record was not found
    pub fn is_not_found(&self) -> bool {
        matches!(self, DatabaseError::NotFound(_))
    }

    /// Checks if this error is a constraint violation
    pub fn is_constraint_violation(&self) -> bool {
        matches!(
            self,
            DatabaseError::DuplicateEntry(_)
                | DatabaseError::ForeignKeyViolation(_)
                | DatabaseError::ConstraintViolation(_)
        )
    }
}

/// Classifies SQLx errors by PostgreSQL error code
impl From<sqlx::Error> for DatabaseError {
    fn from(error: sqlx::Error) -> Self {
        match &error {
            sqlx::Error::RowNotFound => DatabaseError::NotFound("Record not found".to_string()),
            sqlx::Error::PoolTimedOut => DatabaseError::PoolExhausted,
            sqlx::Error::Io(_) => DatabaseError::ConnectionFailed(error.to_string()),
            sqlx::Error::Database(db_err) => {
                // https://www.postgresql.org/docs/current/errcodes-appendix.html
                if let Some(code) = db_err.code() {
                    match code.as_ref() {
                        "23505" => DatabaseError::DuplicateEntry(db_err.message().to_string()),
                        "23503" => {
                            DatabaseError::ForeignKeyViolation(db_err.message().to_string())
                        }
                        "23514" => {
                            DatabaseError::ConstraintViolation(db_err.message().to_string())
                        }
                        _ => DatabaseError::QueryFailed(db_err.message().to_string()),
                    }
                } else {
                    DatabaseError::QueryFailed(db_err.message().to_string())
                }
            }
            _ => DatabaseError::QueryFailed(error.to_string()),
        }
    }
}

/// Lifts adapter errors into the domain-facing port error
impl From<DatabaseError> for StoreError {
    fn from(error: DatabaseError) -> Self {
        match error {
            DatabaseError::NotFound(message) => StoreError::not_found("Record", message),
            DatabaseError::DuplicateEntry(message)
            | DatabaseError::ForeignKeyViolation(message)
            | DatabaseError::ConstraintViolation(message) => StoreError::conflict(message),
            DatabaseError::ConnectionFailed(message) => StoreError::connection(message),
            DatabaseError::PoolExhausted => {
                StoreError::connection("connection pool exhausted")
            }
            DatabaseError::MappingError(message) => StoreError::mapping(message),
            DatabaseError::QueryFailed(message) => StoreError::internal(message),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classification_helpers() {
        assert!(DatabaseError::not_found("Customer", "123").is_not_found());
        assert!(DatabaseError::DuplicateEntry("account number".into())
            .is_constraint_violation());
        assert!(!DatabaseError::PoolExhausted.is_constraint_violation());
    }

    #[test]
    fn test_store_error_lifting() {
        let store: StoreError = DatabaseError::PoolExhausted.into();
        assert!(store.is_transient());

        let store: StoreError = DatabaseError::DuplicateEntry("dup".into()).into();
        assert!(matches!(store, StoreError::Conflict { .. }));

        let store: StoreError = DatabaseError::not_found("Entry", "abc").into();
        assert!(store.is_not_found());
    }
}
