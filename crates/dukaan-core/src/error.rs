//! # Error Types
//!
//! Domain-specific error types for dukaan-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  dukaan-core errors (this file)                                        │
//! │  ├── CoreError        - Ledger and lookup failures                     │
//! │  └── ValidationError  - Input validation failures                      │
//! │                                                                         │
//! │  dukaan-db errors (separate crate)                                     │
//! │  └── DbError          - Record store failures                          │
//! │                                                                         │
//! │  apps/shop errors                                                      │
//! │  └── ApiError         - What the rendering layer sees (serialized)     │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → ApiError ← DbError                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Design Principles
//! 1. Use `thiserror` for derive macros (not manual impl)
//! 2. Include context in error messages (id, field, quantities)
//! 3. Errors are enum variants, never String
//! 4. Validation errors are raised before any mutation is planned

use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Core business logic errors.
///
/// Lookups that fail while a plan is applied to a [`crate::ShopSnapshot`]
/// surface here too, because the snapshot enforces the same rules as the
/// record store.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Product id does not exist (never created, or deleted).
    #[error("Product not found: {0}")]
    ProductNotFound(String),

    /// Customer id does not exist.
    #[error("Customer not found: {0}")]
    CustomerNotFound(String),

    /// Supplier id does not exist.
    #[error("Supplier not found: {0}")]
    SupplierNotFound(String),

    /// A stock adjustment would take stock below zero.
    ///
    /// ## When This Occurs
    /// ```text
    /// Cart built: Rice × 5 (stock was 5)
    ///      │
    ///      ▼
    /// Meanwhile: stock drops to 3
    ///      │
    ///      ▼
    /// Checkout applies -5
    ///      │
    ///      ▼
    /// InsufficientStock { product_id, available: 3, requested: 5 }
    /// ```
    #[error("Insufficient stock for {product_id}: available {available}, requested {requested}")]
    InsufficientStock {
        product_id: String,
        available: i64,
        requested: i64,
    },

    /// A record with this id already exists in its table.
    #[error("{entity} already exists: {id}")]
    DuplicateId { entity: &'static str, id: String },

    /// A stock or balance adjustment would leave the representable range.
    #[error("{entity} {id}: {field} out of range")]
    Overflow {
        entity: &'static str,
        id: String,
        field: &'static str,
    },

    /// Checkout was attempted with no cart lines.
    #[error("Cart is empty")]
    EmptyCart,

    /// An unpaid (udhaar) sale needs a customer to carry the balance.
    #[error("Select a customer for a credit (udhaar) sale")]
    CustomerRequiredForCredit,

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// Raised while checking an input struct, before a plan exists.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// Value must be strictly positive.
    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// Value must be zero or more.
    #[error("{field} must not be negative")]
    MustNotBeNegative { field: String },

    /// Invalid format (e.g., an amount that does not parse).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },
}

impl ValidationError {
    /// Shorthand for [`ValidationError::Required`].
    pub fn required(field: &str) -> Self {
        ValidationError::Required {
            field: field.to_string(),
        }
    }
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = CoreError::InsufficientStock {
            product_id: "rice-5kg".to_string(),
            available: 3,
            requested: 5,
        };
        assert_eq!(
            err.to_string(),
            "Insufficient stock for rice-5kg: available 3, requested 5"
        );

        let err = CoreError::DuplicateId {
            entity: "Customer",
            id: "c-1".to_string(),
        };
        assert_eq!(err.to_string(), "Customer already exists: c-1");
    }

    #[test]
    fn test_validation_error_messages() {
        assert_eq!(ValidationError::required("name").to_string(), "name is required");

        let err = ValidationError::MustBePositive {
            field: "amount".to_string(),
        };
        assert_eq!(err.to_string(), "amount must be positive");
    }

    #[test]
    fn test_validation_converts_to_core_error() {
        let core_err: CoreError = ValidationError::required("name").into();
        assert!(matches!(core_err, CoreError::Validation(_)));
    }
}
