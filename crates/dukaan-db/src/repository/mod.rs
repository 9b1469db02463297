//! # Repository Module
//!
//! Database repository implementations for Dukaan.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Reads and Writes                                     │
//! │                                                                         │
//! │  Reads                           Writes                                 │
//! │  ─────                           ──────                                 │
//! │  db.products().list()            RecordStore::apply(plan)               │
//! │  db.sales().get_by_id(id)            │ BEGIN                            │
//! │       │                              ▼                                  │
//! │       │                         product::insert(&mut tx, ..)            │
//! │       │                         product::adjust_stock(&mut tx, ..)      │
//! │       │                         customer::adjust_balance(&mut tx, ..)   │
//! │       ▼                              │ COMMIT (or ROLLBACK on any Err)  │
//! │  SqlitePool                          ▼                                  │
//! │                                 SqliteConnection                        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Repository structs own a pool handle and only read. Write functions are
//! crate-private and take a connection, so they can only run inside the
//! transaction opened by [`crate::store`].
//!
//! Rows are read in insertion order (`ORDER BY rowid`).
//!
//! ## Available Repositories
//!
//! - [`ProductRepository`](product::ProductRepository)
//! - [`CustomerRepository`](customer::CustomerRepository)
//! - [`SupplierRepository`](supplier::SupplierRepository)
//! - [`SaleRepository`](sale::SaleRepository)

use uuid::Uuid;

pub mod customer;
pub mod product;
pub mod sale;
pub mod supplier;

/// Generates a new record id (UUID v4).
///
/// ## Usage
/// ```rust
/// let id = dukaan_db::generate_id();
/// assert_eq!(id.len(), 36);
/// ```
pub fn generate_id() -> String {
    Uuid::new_v4().to_string()
}
