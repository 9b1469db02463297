//! # Domain Types
//!
//! The four record tables of the shop and the enums that travel with them.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │    Product      │   │    Customer     │   │    Supplier     │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  id             │   │  id             │   │  id             │       │
//! │  │  supplier_id ───┼───┼─────────────────┼──►│  balance        │       │
//! │  │  stock          │   │  balance        │   │  (shop owes)    │       │
//! │  │  purchase_price │   │  (owes shop)    │   └─────────────────┘       │
//! │  │  selling_price  │   └────────▲────────┘                             │
//! │  └─────────────────┘            │ customer_id (None = walk-in)         │
//! │                        ┌────────┴────────┐   ┌─────────────────┐       │
//! │                        │      Sale       │   │    SaleItem     │       │
//! │                        │  ─────────────  │   │  ─────────────  │       │
//! │                        │  items ─────────┼──►│  frozen name    │       │
//! │                        │  total_amount   │   │  frozen prices  │       │
//! │                        │  total_cost     │   │  quantity       │       │
//! │                        │  profit         │   └─────────────────┘       │
//! │                        │  payment_status │                              │
//! │                        └─────────────────┘                              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Ids are opaque strings. Tables keep insertion order; display order is a
//! report concern (see [`crate::report`]).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::money::Money;

// =============================================================================
// Product
// =============================================================================

/// A stocked product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Product {
    /// Unique identifier.
    pub id: String,

    /// Display name shown at the counter and on sale items.
    pub name: String,

    /// Free-form category ("Grocery", "Beverages", ...).
    pub category: String,

    /// Supplier this product is bought from, if any.
    pub supplier_id: Option<String>,

    /// Units on hand. Never negative.
    pub stock: i64,

    /// Last purchase price per unit (last-price-wins on restock).
    pub purchase_price: Money,

    /// Price per unit charged at checkout.
    pub selling_price: Money,

    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
}

impl Product {
    /// Value of the units on hand at purchase price.
    #[inline]
    pub fn stock_value(&self) -> Money {
        self.purchase_price.multiply_quantity(self.stock)
    }

    /// Checks if `quantity` units can be taken from stock.
    pub fn can_sell(&self, quantity: i64) -> bool {
        quantity > 0 && self.stock >= quantity
    }
}

// =============================================================================
// Customer
// =============================================================================

/// A customer who may buy on credit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Customer {
    pub id: String,
    pub name: String,
    pub phone: String,
    pub address: String,
    /// Positive: the customer owes the shop (udhaar).
    pub balance: Money,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
}

// =============================================================================
// Supplier
// =============================================================================

/// A supplier the shop buys stock from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Supplier {
    pub id: String,
    pub name: String,
    pub contact_person: String,
    pub phone: String,
    /// Positive: the shop owes the supplier.
    pub balance: Money,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
}

// =============================================================================
// Payment Status
// =============================================================================

/// How a sale was settled at the counter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[ts(export)]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
    /// Settled in cash at the counter.
    Paid,
    /// Added to the customer's balance (udhaar).
    Unpaid,
}

impl PaymentStatus {
    /// Lowercase name, as stored and as shown in reports.
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentStatus::Paid => "paid",
            PaymentStatus::Unpaid => "unpaid",
        }
    }
}

// =============================================================================
// Party Type
// =============================================================================

/// Which ledger a payment settles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "lowercase")]
pub enum PartyType {
    /// Payment received from a customer.
    Customer,
    /// Payment made to a supplier.
    Supplier,
}

// =============================================================================
// Sale Item
// =============================================================================

/// A line in a sale (and in a cart before checkout).
///
/// Uses the snapshot pattern: name and prices are frozen when the line is
/// created, so later product edits never rewrite history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct SaleItem {
    pub product_id: String,
    /// Product name at time of sale (frozen).
    pub product_name: String,
    pub quantity: i64,
    /// Purchase price per unit at time of sale (frozen).
    pub purchase_price: Money,
    /// Selling price per unit at time of sale (frozen).
    pub selling_price: Money,
}

impl SaleItem {
    /// Freezes a product's current name and prices into a line.
    pub fn from_product(product: &Product, quantity: i64) -> Self {
        SaleItem {
            product_id: product.id.clone(),
            product_name: product.name.clone(),
            quantity,
            purchase_price: product.purchase_price,
            selling_price: product.selling_price,
        }
    }

    /// selling_price × quantity.
    #[inline]
    pub fn line_total(&self) -> Money {
        self.selling_price.multiply_quantity(self.quantity)
    }

    /// purchase_price × quantity.
    #[inline]
    pub fn line_cost(&self) -> Money {
        self.purchase_price.multiply_quantity(self.quantity)
    }
}

// =============================================================================
// Sale
// =============================================================================

/// A completed checkout. Created once; never edited or deleted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Sale {
    pub id: String,
    /// None for walk-in customers.
    pub customer_id: Option<String>,
    pub items: Vec<SaleItem>,
    pub total_amount: Money,
    pub total_cost: Money,
    /// Always `total_amount - total_cost`.
    pub profit: Money,
    #[ts(as = "String")]
    pub date: DateTime<Utc>,
    pub payment_status: PaymentStatus,
}

impl Sale {
    /// Number of lines (not units).
    pub fn item_count(&self) -> usize {
        self.items.len()
    }

    pub fn is_walk_in(&self) -> bool {
        self.customer_id.is_none()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
