//! # dukaan-db: Record Store for Dukaan
//!
//! SQLite persistence for the four record tables, plus an in-memory store
//! for tests. Both implement [`dukaan_core::RecordStore`].
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Dukaan Data Flow                                 │
//! │                                                                         │
//! │  Shop::checkout(..) (apps/shop)                                        │
//! │       │  LedgerPlan                                                     │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                     dukaan-db (THIS CRATE)                      │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐    ┌───────────────┐    ┌──────────────┐    │   │
//! │  │   │   Database    │    │  Repositories │    │  Migrations  │    │   │
//! │  │   │   (pool.rs)   │    │               │    │  (embedded)  │    │   │
//! │  │   │               │    │ ProductRepo   │    │              │    │   │
//! │  │   │ SqlitePool    │◄───│ CustomerRepo  │    │ 001_initial  │    │   │
//! │  │   │ store.rs:     │    │ SupplierRepo  │    │ _schema.sql  │    │   │
//! │  │   │ 1 plan = 1 tx │    │ SaleRepo      │    │              │    │   │
//! │  │   └───────────────┘    └───────────────┘    └──────────────┘    │   │
//! │  │                                                                 │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  SQLite database file (DUKAAN_DB_PATH)                                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`pool`] - Connection pool creation and configuration
//! - [`migrations`] - Embedded database migrations
//! - [`error`] - Database error types
//! - [`repository`] - Per-table reads and transactional writes
//! - [`store`] - `RecordStore` for `Database`
//! - [`memory`] - `RecordStore` in memory, with fault injection
//!
//! ## Usage
//!
//! ```rust,ignore
//! use dukaan_core::RecordStore;
//! use dukaan_db::{Database, DbConfig};
//!
//! let db = Database::new(DbConfig::new("dukaan.db")).await?;
//! let snapshot = db.load().await?;
//! db.apply(&plan).await?;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod memory;
pub mod migrations;
pub mod pool;
pub mod repository;
pub mod store;

// =============================================================================
// Re-exports
// =============================================================================

pub use error::{DbError, DbResult};
pub use memory::MemoryStore;
pub use pool::{Database, DbConfig};
pub use repository::generate_id;

// Repository re-exports for convenience
pub use repository::customer::CustomerRepository;
pub use repository::product::ProductRepository;
pub use repository::sale::SaleRepository;
pub use repository::supplier::SupplierRepository;
