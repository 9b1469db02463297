//! # Operation Inputs
//!
//! One typed input struct per operation. The rendering layer submits these
//! (already type-coerced), and each is checked with `validate()` before a
//! plan is built, so malformed input never reaches the ledger.
//!
//! ```text
//! form fields ──► NewProduct { .. } ──► validate() ──► ledger::plan_create_product
//!                                          │
//!                                          └── Err(ValidationError): nothing planned,
//!                                              nothing written
//! ```
//!
//! `validate()` consumes the input and hands back a normalized copy
//! (trimmed strings, blank optional ids turned into `None`).

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::{CoreError, CoreResult};
use crate::money::Money;
use crate::types::{PartyType, PaymentStatus, SaleItem};
use crate::validation::{
    normalize_optional_id, validate_cart_size, validate_id, validate_name, validate_payment_amount,
    validate_opening_balance, validate_price, validate_quantity, validate_stock, validate_text, ValidationResult,
};

// =============================================================================
// Products
// =============================================================================

/// Input for adding a product to inventory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct NewProduct {
    pub name: String,
    pub category: String,
    pub supplier_id: Option<String>,
    /// Opening stock. Zero is allowed.
    pub stock: i64,
    pub purchase_price: Money,
    pub selling_price: Money,
}

impl NewProduct {
    pub fn validate(self) -> ValidationResult<Self> {
        validate_stock(self.stock)?;
        validate_price("purchase price", self.purchase_price)?;
        validate_price("selling price", self.selling_price)?;

        Ok(NewProduct {
            name: validate_name("name", &self.name)?,
            category: validate_text("category", &self.category)?,
            supplier_id: normalize_optional_id(self.supplier_id),
            ..self
        })
    }
}

/// Input for editing a product's descriptive fields.
///
/// Stock and purchase price are absent on purpose: only restock and checkout
/// move them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ProductEdit {
    pub name: String,
    pub category: String,
    pub supplier_id: Option<String>,
    pub selling_price: Money,
}

impl ProductEdit {
    pub fn validate(self) -> ValidationResult<Self> {
        validate_price("selling price", self.selling_price)?;

        Ok(ProductEdit {
            name: validate_name("name", &self.name)?,
            category: validate_text("category", &self.category)?,
            supplier_id: normalize_optional_id(self.supplier_id),
            ..self
        })
    }
}

/// Input for receiving more units of an existing product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct RestockRequest {
    pub product_id: String,
    /// Units received. Must be positive.
    pub quantity: i64,
    /// New unit purchase price; replaces the old one (no averaging).
    pub purchase_price: Money,
    /// Defer payment to the product's supplier.
    pub on_credit: bool,
}

impl RestockRequest {
    pub fn validate(self) -> ValidationResult<Self> {
        validate_id("product", &self.product_id)?;
        validate_quantity(self.quantity)?;
        validate_price("purchase price", self.purchase_price)?;

        Ok(RestockRequest {
            product_id: self.product_id.trim().to_string(),
            ..self
        })
    }
}

// =============================================================================
// Customers
// =============================================================================

/// Input for registering a customer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct NewCustomer {
    pub name: String,
    pub phone: String,
    pub address: String,
    /// Udhaar carried over from before the shop used this system.
    #[serde(default)]
    pub opening_balance: Money,
}

impl NewCustomer {
    pub fn validate(self) -> ValidationResult<Self> {
        validate_opening_balance(self.opening_balance)?;

        Ok(NewCustomer {
            name: validate_name("name", &self.name)?,
            phone: validate_text("phone", &self.phone)?,
            address: validate_text("address", &self.address)?,
            opening_balance: self.opening_balance,
        })
    }
}

/// Input for editing a customer. The balance is not editable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct CustomerEdit {
    pub name: String,
    pub phone: String,
    pub address: String,
}

impl CustomerEdit {
    pub fn validate(self) -> ValidationResult<Self> {
        Ok(CustomerEdit {
            name: validate_name("name", &self.name)?,
            phone: validate_text("phone", &self.phone)?,
            address: validate_text("address", &self.address)?,
        })
    }
}

// =============================================================================
// Suppliers
// =============================================================================

/// Input for registering a supplier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct NewSupplier {
    pub name: String,
    pub contact_person: String,
    pub phone: String,
    /// Amount already owed to the supplier.
    #[serde(default)]
    pub opening_balance: Money,
}

impl NewSupplier {
    pub fn validate(self) -> ValidationResult<Self> {
        validate_opening_balance(self.opening_balance)?;

        Ok(NewSupplier {
            name: validate_name("name", &self.name)?,
            contact_person: validate_text("contact person", &self.contact_person)?,
            phone: validate_text("phone", &self.phone)?,
            opening_balance: self.opening_balance,
        })
    }
}

/// Input for editing a supplier. The balance is not editable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct SupplierEdit {
    pub name: String,
    pub contact_person: String,
    pub phone: String,
}

impl SupplierEdit {
    pub fn validate(self) -> ValidationResult<Self> {
        Ok(SupplierEdit {
            name: validate_name("name", &self.name)?,
            contact_person: validate_text("contact person", &self.contact_person)?,
            phone: validate_text("phone", &self.phone)?,
        })
    }
}

// =============================================================================
// Checkout
// =============================================================================

/// A cart ready to be sold.
///
/// ## Rules
/// ```text
/// items empty?                         → CoreError::EmptyCart
/// unpaid and no customer?              → CoreError::CustomerRequiredForCredit
/// any line qty <= 0 or price < 0?      → CoreError::Validation
/// ```
/// Stock is NOT checked here: the cart builder checks it when lines are
/// added, against the stock it saw at that moment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct CheckoutRequest {
    pub items: Vec<SaleItem>,
    pub customer_id: Option<String>,
    pub payment_status: PaymentStatus,
}

impl CheckoutRequest {
    pub fn validate(self) -> CoreResult<Self> {
        if self.items.is_empty() {
            return Err(CoreError::EmptyCart);
        }
        validate_cart_size(self.items.len())?;

        let customer_id = normalize_optional_id(self.customer_id);
        if self.payment_status == PaymentStatus::Unpaid && customer_id.is_none() {
            return Err(CoreError::CustomerRequiredForCredit);
        }

        for item in &self.items {
            validate_id("product", &item.product_id)?;
            validate_quantity(item.quantity)?;
            validate_price("purchase price", item.purchase_price)?;
            validate_price("selling price", item.selling_price)?;
        }

        Ok(CheckoutRequest {
            customer_id,
            ..self
        })
    }
}

// =============================================================================
// Payments
// =============================================================================

/// A payment received from a customer or made to a supplier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct PaymentRequest {
    pub party: PartyType,
    pub party_id: String,
    pub amount: Money,
}

impl PaymentRequest {
    /// Builds a request from the raw amount typed into the payment box.
    ///
    /// ```rust
    /// use dukaan_core::input::PaymentRequest;
    /// use dukaan_core::PartyType;
    ///
    /// let req = PaymentRequest::from_form(PartyType::Customer, "c-1", "250.50").unwrap();
    /// assert_eq!(req.amount.minor(), 25_050);
    ///
    /// assert!(PaymentRequest::from_form(PartyType::Customer, "c-1", "0").is_err());
    /// assert!(PaymentRequest::from_form(PartyType::Customer, "c-1", "abc").is_err());
    /// ```
    pub fn from_form(party: PartyType, party_id: &str, raw_amount: &str) -> ValidationResult<Self> {
        PaymentRequest {
            party,
            party_id: party_id.to_string(),
            amount: Money::parse(raw_amount)?,
        }
        .validate()
    }

    pub fn validate(self) -> ValidationResult<Self> {
        validate_id("party", &self.party_id)?;
        validate_payment_amount(self.amount)?;

        Ok(PaymentRequest {
            party_id: self.party_id.trim().to_string(),
            ..self
        })
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ValidationError;

    fn line(qty: i64) -> SaleItem {
        SaleItem {
            product_id: "p-1".to_string(),
            product_name: "Tea 500g".to_string(),
            quantity: qty,
            purchase_price: Money::from_minor(300),
            selling_price: Money::from_minor(450),
        }
    }

    #[test]
    fn test_new_product_normalizes() {
        let input = NewProduct {
            name: "  Tea 500g ".to_string(),
            category: " Beverages".to_string(),
            supplier_id: Some("".to_string()),
            stock: 0,
            purchase_price: Money::zero(),
            selling_price: Money::from_minor(450),
        }
        .validate()
        .unwrap();

        assert_eq!(input.name, "Tea 500g");
        assert_eq!(input.category, "Beverages");
        assert_eq!(input.supplier_id, None);
    }

    #[test]
    fn test_new_product_rejects_bad_numbers() {
        let base = NewProduct {
            name: "Tea".to_string(),
            category: String::new(),
            supplier_id: None,
            stock: 1,
            purchase_price: Money::from_minor(1),
            selling_price: Money::from_minor(1),
        };

        assert!(NewProduct { stock: -1, ..base.clone() }.validate().is_err());
        assert!(NewProduct {
            purchase_price: Money::from_minor(-1),
            ..base.clone()
        }
        .validate()
        .is_err());
        assert!(NewProduct {
            name: " ".to_string(),
            ..base
        }
        .validate()
        .is_err());
    }

    #[test]
    fn test_restock_requires_positive_quantity() {
        let req = RestockRequest {
            product_id: "p-1".to_string(),
            quantity: 0,
            purchase_price: Money::from_minor(100),
            on_credit: false,
        };
        assert!(matches!(
            req.validate(),
            Err(ValidationError::MustBePositive { .. })
        ));
    }

    #[test]
    fn test_checkout_rejects_empty_cart() {
        let req = CheckoutRequest {
            items: vec![],
            customer_id: None,
            payment_status: PaymentStatus::Paid,
        };
        assert!(matches!(req.validate(), Err(CoreError::EmptyCart)));
    }

    #[test]
    fn test_checkout_unpaid_requires_customer() {
        let req = CheckoutRequest {
            items: vec![line(1)],
            customer_id: Some("   ".to_string()),
            payment_status: PaymentStatus::Unpaid,
        };
        assert!(matches!(
            req.validate(),
            Err(CoreError::CustomerRequiredForCredit)
        ));
    }

    #[test]
    fn test_checkout_paid_walk_in_is_fine() {
        let req = CheckoutRequest {
            items: vec![line(2)],
            customer_id: Some(String::new()),
            payment_status: PaymentStatus::Paid,
        }
        .validate()
        .unwrap();
        assert_eq!(req.customer_id, None);
    }

    #[test]
    fn test_checkout_rejects_bad_line() {
        let req = CheckoutRequest {
            items: vec![line(1), line(0)],
            customer_id: None,
            payment_status: PaymentStatus::Paid,
        };
        assert!(matches!(req.validate(), Err(CoreError::Validation(_))));
    }

    #[test]
    fn test_payment_request_from_form() {
        let req = PaymentRequest::from_form(PartyType::Supplier, " s-1 ", "1000").unwrap();
        assert_eq!(req.party_id, "s-1");
        assert_eq!(req.amount.minor(), 100_000);

        assert!(PaymentRequest::from_form(PartyType::Supplier, "s-1", "-5").is_err());
        assert!(PaymentRequest::from_form(PartyType::Supplier, "", "5").is_err());
    }

    #[test]
    fn test_new_customer_opening_balance_defaults_to_zero() {
        let input: NewCustomer =
            serde_json::from_str(r#"{"name":"Bilal","phone":"","address":""}"#).unwrap();
        assert!(input.opening_balance.is_zero());
    }
}
