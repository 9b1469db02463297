//! # Database Error Types
//!
//! Error types for record store operations.
//!
//! ## Error Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Propagation                                    │
//! │                                                                         │
//! │  SQLite Error (sqlx::Error)          Snapshot Error (CoreError)        │
//! │       │                                   │  MemoryStore only          │
//! │       ▼                                   ▼                             │
//! │  DbError (this module) ← Adds context and categorization               │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ApiError (in apps/shop) ← Serialized for the rendering layer          │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Both store implementations report the same failures with the same
//! variants, so callers never need to know which one they are talking to.

use dukaan_core::CoreError;
use thiserror::Error;

/// Record store errors.
#[derive(Debug, Error)]
pub enum DbError {
    /// Entity not found in the store.
    ///
    /// ## When This Occurs
    /// - An update, adjustment or delete matched zero rows
    /// - The id was never created, or was deleted
    #[error("{entity} not found: {id}")]
    NotFound { entity: String, id: String },

    /// A stock adjustment would take stock below zero.
    ///
    /// Raised from the `CHECK (stock >= 0)` constraint on `products`.
    #[error("Insufficient stock for {product_id} (requested {requested})")]
    InsufficientStock { product_id: String, requested: i64 },

    /// Unique constraint violation.
    ///
    /// ## When This Occurs
    /// - Inserting a record with an id that already exists
    #[error("Duplicate {field}: '{value}' already exists")]
    UniqueViolation { field: String, value: String },

    /// CHECK constraint violation other than the stock floor.
    #[error("Constraint violation: {message}")]
    CheckViolation { message: String },

    /// Database connection failed.
    ///
    /// ## When This Occurs
    /// - Database file doesn't exist and can't be created
    /// - File permissions issue
    /// - Disk full
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    /// Migration failed.
    #[error("Migration failed: {0}")]
    MigrationFailed(String),

    /// Query execution failed.
    #[error("Query failed: {0}")]
    QueryFailed(String),

    /// Transaction failed (begin/commit, or an injected fault in tests).
    #[error("Transaction failed: {0}")]
    TransactionFailed(String),

    /// A stored value could not be decoded (e.g. malformed `items_json`).
    #[error("Corrupt record: {0}")]
    Corrupt(String),

    /// Pool exhausted (all connections in use).
    #[error("Connection pool exhausted")]
    PoolExhausted,

    /// Internal database error.
    #[error("Internal database error: {0}")]
    Internal(String),
}

impl DbError {
    /// Creates a NotFound error for a given entity type and ID.
    pub fn not_found(entity: impl Into<String>, id: impl Into<String>) -> Self {
        DbError::NotFound {
            entity: entity.into(),
            id: id.into(),
        }
    }

    /// Creates a UniqueViolation error.
    pub fn duplicate(field: impl Into<String>, value: impl Into<String>) -> Self {
        DbError::UniqueViolation {
            field: field.into(),
            value: value.into(),
        }
    }
}

/// Convert sqlx errors to DbError.
///
/// ## Error Mapping
/// ```text
/// sqlx::Error::RowNotFound    → DbError::NotFound
/// sqlx::Error::Database       → Analyze message for constraint type
/// sqlx::Error::PoolTimedOut   → DbError::PoolExhausted
/// Other                       → DbError::Internal
/// ```
impl From<sqlx::Error> for DbError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => DbError::NotFound {
                entity: "Record".to_string(),
                id: "unknown".to_string(),
            },

            sqlx::Error::Database(db_err) => {
                let msg = db_err.message();

                // SQLite constraint messages:
                // "UNIQUE constraint failed: <table>.<column>"
                // "CHECK constraint failed: <expr>"
                if msg.contains("UNIQUE constraint failed") {
                    let field = msg
                        .split("UNIQUE constraint failed: ")
                        .nth(1)
                        .unwrap_or("unknown")
                        .to_string();
                    DbError::UniqueViolation {
                        field,
                        value: "unknown".to_string(),
                    }
                } else if msg.contains("CHECK constraint failed") {
                    DbError::CheckViolation {
                        message: msg.to_string(),
                    }
                } else {
                    DbError::QueryFailed(msg.to_string())
                }
            }

            sqlx::Error::PoolTimedOut => DbError::PoolExhausted,

            sqlx::Error::PoolClosed => DbError::ConnectionFailed("Pool is closed".to_string()),

            _ => DbError::Internal(err.to_string()),
        }
    }
}

impl From<sqlx::migrate::MigrateError> for DbError {
    fn from(err: sqlx::migrate::MigrateError) -> Self {
        DbError::MigrationFailed(err.to_string())
    }
}

impl From<serde_json::Error> for DbError {
    fn from(err: serde_json::Error) -> Self {
        DbError::Corrupt(err.to_string())
    }
}

/// Snapshot failures, as raised by [`crate::MemoryStore`].
impl From<CoreError> for DbError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::ProductNotFound(id) => DbError::not_found("Product", id),
            CoreError::CustomerNotFound(id) => DbError::not_found("Customer", id),
            CoreError::SupplierNotFound(id) => DbError::not_found("Supplier", id),
            CoreError::InsufficientStock {
                product_id,
                requested,
                ..
            } => DbError::InsufficientStock {
                product_id,
                requested,
            },
            CoreError::DuplicateId { entity, id } => DbError::duplicate(format!("{}.id", entity), id),
            other => DbError::Internal(other.to_string()),
        }
    }
}

/// Result type for database operations.
pub type DbResult<T> = Result<T, DbError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_core_errors_map_to_store_errors() {
        let err: DbError = CoreError::CustomerNotFound("c-1".to_string()).into();
        assert!(matches!(err, DbError::NotFound { ref entity, ref id } if entity == "Customer" && id == "c-1"));

        let err: DbError = CoreError::InsufficientStock {
            product_id: "p-1".to_string(),
            available: 2,
            requested: 5,
        }
        .into();
        assert!(matches!(err, DbError::InsufficientStock { requested: 5, .. }));
    }

    #[test]
    fn test_not_found_message() {
        let err = DbError::not_found("Product", "p-9");
        assert_eq!(err.to_string(), "Product not found: p-9");
    }
}
