//! # Validation Module
//!
//! Field-level rules used by the input structs in [`crate::input`].
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Rendering layer                                              │
//! │  └── Type coercion (numbers, booleans), immediate feedback             │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: Input structs (dukaan-core)                                  │
//! │  └── THIS MODULE: field rules, run before any plan is built            │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Plan application (snapshot + SQLite)                         │
//! │  ├── Existence of referenced ids                                       │
//! │  └── CHECK (stock >= 0)                                                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use crate::error::ValidationError;
use crate::money::Money;
use crate::{MAX_AMOUNT, MAX_CART_ITEMS, MAX_QUANTITY};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Longest accepted name (product, customer, supplier, contact person).
pub const MAX_NAME_LEN: usize = 120;

/// Longest accepted free-text field (address, category, phone).
pub const MAX_TEXT_LEN: usize = 250;

// =============================================================================
// String Validators
// =============================================================================

/// Validates a required name and returns it trimmed.
///
/// ## Example
/// ```rust
/// use dukaan_core::validation::validate_name;
///
/// assert_eq!(validate_name("name", "  Ali Traders ").unwrap(), "Ali Traders");
/// assert!(validate_name("name", "   ").is_err());
/// ```
pub fn validate_name(field: &str, value: &str) -> ValidationResult<String> {
    let value = value.trim();

    if value.is_empty() {
        return Err(ValidationError::required(field));
    }

    if value.chars().count() > MAX_NAME_LEN {
        return Err(ValidationError::TooLong {
            field: field.to_string(),
            max: MAX_NAME_LEN,
        });
    }

    Ok(value.to_string())
}

/// Validates an optional free-text field and returns it trimmed.
///
/// Empty is allowed: phone numbers and addresses are often left blank.
pub fn validate_text(field: &str, value: &str) -> ValidationResult<String> {
    let value = value.trim();

    if value.chars().count() > MAX_TEXT_LEN {
        return Err(ValidationError::TooLong {
            field: field.to_string(),
            max: MAX_TEXT_LEN,
        });
    }

    Ok(value.to_string())
}

/// Validates a record id reference.
///
/// Ids are opaque; only emptiness is checked. Existence is checked when the
/// plan is applied.
pub fn validate_id(field: &str, id: &str) -> ValidationResult<()> {
    if id.trim().is_empty() {
        return Err(ValidationError::required(field));
    }

    Ok(())
}

/// Normalizes an optional id reference: blank strings mean "none".
///
/// Select boxes submit `""` for "no supplier" / "walk-in".
pub fn normalize_optional_id(id: Option<String>) -> Option<String> {
    id.map(|s| s.trim().to_string()).filter(|s| !s.is_empty())
}

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates a strictly positive quantity (restock, cart line).
///
/// ```rust
/// use dukaan_core::validation::validate_quantity;
///
/// assert!(validate_quantity(5).is_ok());
/// assert!(validate_quantity(0).is_err());
/// assert!(validate_quantity(-1).is_err());
/// ```
pub fn validate_quantity(qty: i64) -> ValidationResult<()> {
    if qty <= 0 {
        return Err(ValidationError::MustBePositive {
            field: "quantity".to_string(),
        });
    }

    if qty > MAX_QUANTITY {
        return Err(ValidationError::OutOfRange {
            field: "quantity".to_string(),
            min: 1,
            max: MAX_QUANTITY,
        });
    }

    Ok(())
}

/// Validates an initial stock level (zero allowed).
pub fn validate_stock(stock: i64) -> ValidationResult<()> {
    if stock < 0 {
        return Err(ValidationError::MustNotBeNegative {
            field: "stock".to_string(),
        });
    }

    if stock > MAX_QUANTITY {
        return Err(ValidationError::OutOfRange {
            field: "stock".to_string(),
            min: 0,
            max: MAX_QUANTITY,
        });
    }

    Ok(())
}

/// Validates a unit price. Zero is allowed (free samples).
pub fn validate_price(field: &str, price: Money) -> ValidationResult<()> {
    if price.is_negative() {
        return Err(ValidationError::MustNotBeNegative {
            field: field.to_string(),
        });
    }

    if price > MAX_AMOUNT {
        return Err(amount_out_of_range(field, 0));
    }

    Ok(())
}

/// Validates a payment amount. Zero and negative amounts are rejected.
pub fn validate_payment_amount(amount: Money) -> ValidationResult<()> {
    if !amount.is_positive() {
        return Err(ValidationError::MustBePositive {
            field: "amount".to_string(),
        });
    }

    if amount > MAX_AMOUNT {
        return Err(amount_out_of_range("amount", 1));
    }

    Ok(())
}

/// Validates an opening balance. Negative means credit in the party's favour.
pub fn validate_opening_balance(balance: Money) -> ValidationResult<()> {
    if balance.abs() > MAX_AMOUNT {
        return Err(amount_out_of_range("opening balance", -MAX_AMOUNT.minor()));
    }

    Ok(())
}

fn amount_out_of_range(field: &str, min: i64) -> ValidationError {
    ValidationError::OutOfRange {
        field: field.to_string(),
        min,
        max: MAX_AMOUNT.minor(),
    }
}

// =============================================================================
// Collection Validators
// =============================================================================

/// Validates cart size (number of distinct lines).
pub fn validate_cart_size(lines: usize) -> ValidationResult<()> {
    if lines > MAX_CART_ITEMS {
        return Err(ValidationError::OutOfRange {
            field: "cart items".to_string(),
            min: 1,
            max: MAX_CART_ITEMS as i64,
        });
    }

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_name() {
        assert_eq!(validate_name("name", "Sugar 1kg").unwrap(), "Sugar 1kg");
        assert!(validate_name("name", "").is_err());
        assert!(validate_name("name", &"A".repeat(MAX_NAME_LEN + 1)).is_err());
        assert!(validate_name("name", &"A".repeat(MAX_NAME_LEN)).is_ok());
    }

    #[test]
    fn test_validate_text_allows_blank() {
        assert_eq!(validate_text("phone", "  ").unwrap(), "");
        assert!(validate_text("address", &"x".repeat(MAX_TEXT_LEN + 1)).is_err());
    }

    #[test]
    fn test_normalize_optional_id() {
        assert_eq!(normalize_optional_id(None), None);
        assert_eq!(normalize_optional_id(Some("".to_string())), None);
        assert_eq!(normalize_optional_id(Some("  ".to_string())), None);
        assert_eq!(
            normalize_optional_id(Some(" s-1 ".to_string())),
            Some("s-1".to_string())
        );
    }

    #[test]
    fn test_validate_quantity() {
        assert!(validate_quantity(1).is_ok());
        assert!(validate_quantity(MAX_QUANTITY).is_ok());

        assert!(validate_quantity(0).is_err());
        assert!(validate_quantity(-1).is_err());
        assert!(validate_quantity(MAX_QUANTITY + 1).is_err());
    }

    #[test]
    fn test_validate_stock() {
        assert!(validate_stock(0).is_ok());
        assert!(validate_stock(20).is_ok());
        assert!(validate_stock(-1).is_err());
    }

    #[test]
    fn test_validate_price() {
        assert!(validate_price("price", Money::zero()).is_ok());
        assert!(validate_price("price", Money::from_minor(1099)).is_ok());
        assert!(validate_price("price", Money::from_minor(-1)).is_err());
    }

    #[test]
    fn test_validate_payment_amount() {
        assert!(validate_payment_amount(Money::from_minor(1)).is_ok());
        assert!(validate_payment_amount(Money::zero()).is_err());
        assert!(validate_payment_amount(Money::from_minor(-100)).is_err());
    }

    #[test]
    fn test_validate_cart_size() {
        assert!(validate_cart_size(1).is_ok());
        assert!(validate_cart_size(MAX_CART_ITEMS).is_ok());
        assert!(validate_cart_size(MAX_CART_ITEMS + 1).is_err());
    }

    #[test]
    fn test_amount_bounds() {
        assert!(validate_price("selling price", MAX_AMOUNT).is_ok());
        assert!(validate_price("selling price", Money::from_minor(MAX_AMOUNT.minor() + 1)).is_err());
        assert!(validate_payment_amount(Money::from_minor(MAX_AMOUNT.minor() + 1)).is_err());
        assert!(validate_opening_balance(-MAX_AMOUNT).is_ok());
        assert!(validate_opening_balance(Money::from_minor(-MAX_AMOUNT.minor() - 1)).is_err());
    }
}
