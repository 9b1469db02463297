//! # API Error Type
//!
//! Unified error type for shop commands.
//!
//! ## Error Handling Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Flow in Dukaan                                 │
//! │                                                                         │
//! │  Rendering layer              Rust Backend                              │
//! │  ───────────────              ────────────                              │
//! │                                                                         │
//! │  checkout(form)                                                         │
//! │         │                                                               │
//! │         ▼                                                               │
//! │  ┌──────────────────────────────────────────────────────────────────┐  │
//! │  │  Command Function → Result<T, ApiError>                          │  │
//! │  │         │                                                        │  │
//! │  │  Form won't parse?  ── ValidationError ─────────┐                │  │
//! │  │  Plan rejected?     ── CoreError ───────────────┼──► ApiError ──►│  │
//! │  │  Store failed?      ── DbError ─────────────────┤                │  │
//! │  │  Cart rule?         ── CartError ───────────────┘                │  │
//! │  └──────────────────────────────────────────────────────────────────┘  │
//! │                                                                         │
//! │  { "code": "INSUFFICIENT_STOCK", "message": "..." }                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::Serialize;
use dukaan_core::{CoreError, ValidationError};
use dukaan_db::DbError;

use crate::state::CartError;

/// API error returned from shop commands.
///
/// ## Serialization
/// ```json
/// {
///   "code": "NOT_FOUND",
///   "message": "Customer not found: 6f1c..."
/// }
/// ```
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiError {
    /// Machine-readable error code for programmatic handling
    pub code: ErrorCode,

    /// Human-readable error message for display
    pub message: String,
}

/// Error codes for API responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Record not found
    NotFound,

    /// Input validation failed
    ValidationError,

    /// Record store failed
    DatabaseError,

    /// A ledger rule rejected the operation
    BusinessLogic,

    /// Internal error
    Internal,

    /// Cart operation failed
    CartError,

    /// Stock would go below zero
    InsufficientStock,

    /// Payment form rejected
    PaymentError,
}

/// Result type for shop commands.
pub type ApiResult<T> = Result<T, ApiError>;

impl ApiError {
    /// Creates a new API error.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        ApiError {
            code,
            message: message.into(),
        }
    }

    /// Creates a not found error.
    pub fn not_found(resource: &str, id: &str) -> Self {
        ApiError::new(ErrorCode::NotFound, format!("{} not found: {}", resource, id))
    }

    /// Creates a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::ValidationError, message)
    }

    /// Creates a payment error.
    pub fn payment(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::PaymentError, message)
    }

    /// Creates an internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::Internal, message)
    }
}

/// Converts record store errors to API errors.
impl From<DbError> for ApiError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::NotFound { entity, id } => ApiError::not_found(&entity, &id),
            DbError::InsufficientStock {
                product_id,
                requested,
            } => ApiError::new(
                ErrorCode::InsufficientStock,
                format!("Not enough stock for {} ({} requested)", product_id, requested),
            ),
            DbError::UniqueViolation { field, value } => ApiError::new(
                ErrorCode::ValidationError,
                format!("{} '{}' already exists", field, value),
            ),
            DbError::CheckViolation { message } => {
                tracing::error!("Constraint violation: {}", message);
                ApiError::new(ErrorCode::ValidationError, "Invalid value rejected by the database")
            }
            DbError::ConnectionFailed(_) => {
                ApiError::new(ErrorCode::DatabaseError, "Database connection failed")
            }
            DbError::MigrationFailed(_) => {
                ApiError::new(ErrorCode::DatabaseError, "Database migration failed")
            }
            DbError::QueryFailed(e) => {
                // Log the actual error but return a generic message
                tracing::error!("Database query failed: {}", e);
                ApiError::new(ErrorCode::DatabaseError, "Database operation failed")
            }
            DbError::TransactionFailed(e) => {
                tracing::error!("Transaction failed: {}", e);
                ApiError::new(ErrorCode::DatabaseError, "Database transaction failed")
            }
            DbError::Corrupt(e) => {
                tracing::error!("Corrupt record: {}", e);
                ApiError::new(ErrorCode::DatabaseError, "Stored record could not be read")
            }
            DbError::PoolExhausted => ApiError::new(ErrorCode::DatabaseError, "Database pool exhausted"),
            DbError::Internal(e) => {
                tracing::error!("Internal database error: {}", e);
                ApiError::new(ErrorCode::DatabaseError, "Database operation failed")
            }
        }
    }
}

/// Converts core errors to API errors.
impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::ProductNotFound(id) => ApiError::not_found("Product", &id),
            CoreError::CustomerNotFound(id) => ApiError::not_found("Customer", &id),
            CoreError::SupplierNotFound(id) => ApiError::not_found("Supplier", &id),
            CoreError::InsufficientStock {
                product_id,
                available,
                requested,
            } => ApiError::new(
                ErrorCode::InsufficientStock,
                format!(
                    "Insufficient stock for {}: {} available, {} requested",
                    product_id, available, requested
                ),
            ),
            CoreError::DuplicateId { entity, id } => {
                ApiError::validation(format!("{} '{}' already exists", entity, id))
            }
            e @ CoreError::Overflow { .. } => ApiError::validation(e.to_string()),
            CoreError::EmptyCart => ApiError::new(ErrorCode::CartError, "Cart is empty"),
            e @ CoreError::CustomerRequiredForCredit => ApiError::new(ErrorCode::BusinessLogic, e.to_string()),
            CoreError::Validation(e) => ApiError::validation(e.to_string()),
        }
    }
}

impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        ApiError::validation(err.to_string())
    }
}

impl From<CartError> for ApiError {
    fn from(err: CartError) -> Self {
        ApiError::new(ErrorCode::CartError, err.to_string())
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{:?}] {}", self.code, self.message)
    }
}

impl std::error::Error for ApiError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serializes_screaming_code() {
        let err = ApiError::from(CoreError::EmptyCart);
        let json = serde_json::to_value(&err).unwrap();

        assert_eq!(json["code"], "CART_ERROR");
        assert_eq!(json["message"], "Cart is empty");
    }

    #[test]
    fn test_store_and_core_stock_errors_share_code() {
        let from_db = ApiError::from(DbError::InsufficientStock {
            product_id: "p-1".to_string(),
            requested: 4,
        });
        let from_core = ApiError::from(CoreError::InsufficientStock {
            product_id: "p-1".to_string(),
            available: 3,
            requested: 4,
        });

        assert_eq!(from_db.code, ErrorCode::InsufficientStock);
        assert_eq!(from_core.code, ErrorCode::InsufficientStock);
    }

    #[test]
    fn test_not_found_from_store() {
        let err = ApiError::from(DbError::not_found("Customer", "c-9"));
        assert_eq!(err.code, ErrorCode::NotFound);
        assert_eq!(err.message, "Customer not found: c-9");
    }
}
