//! # Record Store Contract
//!
//! The seam between the pure core and persistence.
//!
//! ```text
//! ┌──────────────┐  load()                ┌─────────────────────────┐
//! │ state owner  │ ◄───────────────────── │      RecordStore        │
//! │ (apps/shop)  │                        │  ─────────────────────  │
//! │              │  apply(&LedgerPlan)    │  SQLite (dukaan-db)     │
//! │              │ ─────────────────────► │  MemoryStore (tests)    │
//! └──────────────┘   all or nothing       └─────────────────────────┘
//! ```

use std::future::Future;

use crate::ledger::LedgerPlan;
use crate::snapshot::ShopSnapshot;

/// A durable home for the four record tables.
///
/// ## Contract
/// - `load` returns every record in insertion order.
/// - `apply` commits every mutation of the plan or none of them. A missing id
///   or a stock level below zero must fail the plan and leave the store
///   exactly as it was.
pub trait RecordStore {
    type Error: std::error::Error + Send + Sync + 'static;

    fn load(&self) -> impl Future<Output = Result<ShopSnapshot, Self::Error>> + Send;

    fn apply(&self, plan: &LedgerPlan) -> impl Future<Output = Result<(), Self::Error>> + Send;
}
