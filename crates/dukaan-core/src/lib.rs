//! # dukaan-core: Pure Business Logic for Dukaan
//!
//! This crate is the **heart** of Dukaan. It owns the ledger-consistent
//! transaction model that keeps product stock and customer/supplier balances
//! in agreement, as pure functions with zero I/O.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Dukaan Architecture                             │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                  Rendering layer (external)                     │   │
//! │  │     Stock UI ──► POS UI ──► Customers/Suppliers ──► Reports     │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │ form payloads / DTOs                   │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                 apps/shop (state owner + commands)              │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ dukaan-core (THIS CRATE) ★                      │   │
//! │  │                                                                 │   │
//! │  │   ┌─────────┐ ┌─────────┐ ┌──────────┐ ┌──────────┐ ┌────────┐  │   │
//! │  │   │  types  │ │  money  │ │  ledger  │ │ snapshot │ │ report │  │   │
//! │  │   └─────────┘ └─────────┘ └──────────┘ └──────────┘ └────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO CLOCK • PURE FUNCTIONS              │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │ RecordStore contract                   │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                  dukaan-db (SQLite record store)                │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Entities (Product, Customer, Supplier, Sale)
//! - [`money`] - Money type with integer arithmetic (no floating point!)
//! - [`error`] - Domain error types
//! - [`validation`] - Field-level rules
//! - [`input`] - Validated input structs, one per operation
//! - [`ledger`] - Planners that turn inputs into atomic [`LedgerPlan`]s
//! - [`snapshot`] - The four tables held in memory, with atomic plan application
//! - [`report`] - Dashboard and sales aggregates
//! - [`store`] - The [`RecordStore`] contract implemented by storage engines
//!
//! ## Example Usage
//!
//! ```rust
//! use chrono::Utc;
//! use dukaan_core::input::NewProduct;
//! use dukaan_core::ledger;
//! use dukaan_core::{Money, ShopSnapshot};
//!
//! let input = NewProduct {
//!     name: "Basmati Rice 5kg".to_string(),
//!     category: "Grocery".to_string(),
//!     supplier_id: None,
//!     stock: 10,
//!     purchase_price: Money::from_minor(5_000),
//!     selling_price: Money::from_minor(8_000),
//! };
//!
//! let plan = ledger::plan_create_product(input, false, "p-1".to_string(), Utc::now()).unwrap();
//!
//! let mut snapshot = ShopSnapshot::default();
//! snapshot.apply(&plan).unwrap();
//! assert_eq!(snapshot.product("p-1").unwrap().stock, 10);
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod input;
pub mod ledger;
pub mod money;
pub mod report;
pub mod snapshot;
pub mod store;
pub mod types;
pub mod validation;

#[cfg(test)]
mod snapshot_props;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use error::{CoreError, CoreResult, ValidationError};
pub use ledger::{LedgerOp, LedgerPlan, Mutation};
pub use money::Money;
pub use snapshot::ShopSnapshot;
pub use store::RecordStore;
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Maximum distinct lines allowed in a single cart.
pub const MAX_CART_ITEMS: usize = 100;

/// Upper bound for any single quantity (stock, restock, cart line).
///
/// Catches typing slips like an extra few zeros before they hit the ledger.
pub const MAX_QUANTITY: i64 = 1_000_000;

/// Largest accepted unit price, payment or opening balance: 100,000,000.00.
///
/// With [`MAX_QUANTITY`] and [`MAX_CART_ITEMS`] this keeps every line total
/// and sale total well inside `i64`.
pub const MAX_AMOUNT: Money = Money::from_minor(10_000_000_000);

/// Label shown for sales without a customer record.
pub const WALK_IN_LABEL: &str = "Walk-in";
