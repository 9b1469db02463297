//! # In-Memory Record Store
//!
//! A [`RecordStore`] backed by a [`ShopSnapshot`] behind a mutex, with fault
//! injection. Applies plans with the same atomic rules as SQLite and reports
//! failures with the same [`DbError`] variants.
//!
//! ## Usage
//! ```rust,ignore
//! let store = MemoryStore::new();
//! store.fail_next_apply();            // next apply() returns TransactionFailed
//! assert!(store.apply(&plan).await.is_err());
//! assert_eq!(store.applied_count(), 0);
//! ```

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;

use tokio::sync::Mutex;
use tracing::{debug, warn};

use crate::error::{DbError, DbResult};
use dukaan_core::{LedgerPlan, RecordStore, ShopSnapshot};

#[derive(Debug, Default)]
struct Inner {
    records: Mutex<ShopSnapshot>,
    fail_next: AtomicBool,
    applied: AtomicUsize,
}

/// Shared handle to an in-memory store. Clones see the same records.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    inner: Arc<Inner>,
}

impl MemoryStore {
    pub fn new() -> Self {
        MemoryStore::default()
    }

    /// Starts from existing records.
    pub fn with_snapshot(snapshot: ShopSnapshot) -> Self {
        MemoryStore {
            inner: Arc::new(Inner {
                records: Mutex::new(snapshot),
                ..Inner::default()
            }),
        }
    }

    /// Makes the next `apply` fail without touching any record.
    pub fn fail_next_apply(&self) {
        self.inner.fail_next.store(true, Ordering::SeqCst);
    }

    /// True while an injected fault is waiting for the next `apply`.
    pub fn fault_pending(&self) -> bool {
        self.inner.fail_next.load(Ordering::SeqCst)
    }

    /// Number of plans committed so far.
    pub fn applied_count(&self) -> usize {
        self.inner.applied.load(Ordering::SeqCst)
    }
}

impl RecordStore for MemoryStore {
    type Error = DbError;

    async fn load(&self) -> DbResult<ShopSnapshot> {
        Ok(self.inner.records.lock().await.clone())
    }

    async fn apply(&self, plan: &LedgerPlan) -> DbResult<()> {
        if self.inner.fail_next.swap(false, Ordering::SeqCst) {
            warn!(op = plan.op.as_str(), "Injected store fault");
            return Err(DbError::TransactionFailed("injected fault".to_string()));
        }

        let mut records = self.inner.records.lock().await;
        records.apply(plan)?;
        self.inner.applied.fetch_add(1, Ordering::SeqCst);

        debug!(op = plan.op.as_str(), mutations = plan.len(), "Applied ledger plan in memory");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dukaan_core::ledger::plan_delete_product;

    #[tokio::test]
    async fn test_injected_fault_is_one_shot() {
        let store = MemoryStore::new();
        store.fail_next_apply();
        assert!(store.fault_pending());

        let plan = plan_delete_product("p-1");
        let err = store.apply(&plan).await.unwrap_err();
        assert!(matches!(err, DbError::TransactionFailed(_)));
        assert!(!store.fault_pending());

        // Next attempt reaches the records and fails on the missing id instead.
        let err = store.apply(&plan).await.unwrap_err();
        assert!(matches!(err, DbError::NotFound { .. }));
        assert_eq!(store.applied_count(), 0);
    }

    #[tokio::test]
    async fn test_clones_share_records() {
        let store = MemoryStore::new();
        let other = store.clone();

        assert_eq!(other.load().await.unwrap(), store.load().await.unwrap());
        other.fail_next_apply();
        assert!(store.apply(&plan_delete_product("x")).await.is_err());
    }
}
