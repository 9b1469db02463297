//! # Shop State
//!
//! The single owner of shop records: a [`RecordStore`] plus an in-memory
//! mirror used for rendering and for planning.
//!
//! ## Commit Sequence
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  operation(input)                                                       │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  mirror.write()  ◄── serializes every write; reads wait at most one op  │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  plan = ledger::plan_*(input, &mirror)   ── Err? ─► nothing changed     │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  next = mirror.clone(); next.apply(&plan) ── Err? ─► nothing changed    │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  store.apply(&plan)                       ── Err? ─► nothing changed    │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  *mirror = next                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The mirror only ever changes by applying a plan the store has already
//! committed, so after every operation `store.load()` equals the mirror.

use chrono::{DateTime, SubsecRound, Utc};
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

use crate::error::{ApiError, ApiResult};
use dukaan_core::input::{
    CheckoutRequest, CustomerEdit, NewCustomer, NewProduct, NewSupplier, PaymentRequest, ProductEdit,
    RestockRequest, SupplierEdit,
};
use dukaan_core::ledger::{self, LedgerPlan};
use dukaan_core::report::DashboardStats;
use dukaan_core::{CoreError, CoreResult, Customer, Product, RecordStore, Sale, ShopSnapshot, Supplier};
use dukaan_db::{generate_id, Database};

/// Record timestamps are kept at millisecond precision so they survive a
/// round trip through SQLite text columns unchanged.
fn now() -> DateTime<Utc> {
    Utc::now().trunc_subsecs(3)
}

/// Store plus mirror.
///
/// ## Usage
/// ```rust,ignore
/// let shop = ShopState::open(db).await?;
/// let sale = shop.checkout(request).await?;
/// let stats = shop.dashboard().await;
/// ```
#[derive(Debug)]
pub struct ShopState<S = Database> {
    store: S,
    mirror: RwLock<ShopSnapshot>,
}

impl<S> ShopState<S>
where
    S: RecordStore,
    ApiError: From<S::Error>,
{
    /// Loads every record from `store` and takes ownership of it.
    pub async fn open(store: S) -> ApiResult<Self> {
        let snapshot = store.load().await?;

        info!(
            products = snapshot.products.len(),
            customers = snapshot.customers.len(),
            suppliers = snapshot.suppliers.len(),
            sales = snapshot.sales.len(),
            "Shop records loaded"
        );

        Ok(ShopState {
            store,
            mirror: RwLock::new(snapshot),
        })
    }

    /// Returns the underlying store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Replaces the mirror with a fresh load from the store.
    pub async fn reload(&self) -> ApiResult<()> {
        let mut mirror = self.mirror.write().await;
        *mirror = self.store.load().await?;
        debug!("Mirror reloaded from store");
        Ok(())
    }

    // =========================================================================
    // Commit
    // =========================================================================

    async fn commit<F>(&self, build: F) -> ApiResult<LedgerPlan>
    where
        F: FnOnce(&ShopSnapshot) -> CoreResult<LedgerPlan>,
    {
        let mut mirror = self.mirror.write().await;

        let plan = build(&mirror).map_err(|e| {
            warn!(error = %e, "Ledger operation rejected");
            <ApiError as From<CoreError>>::from(e)
        })?;

        let mut next = mirror.clone();
        if let Err(e) = next.apply(&plan) {
            warn!(op = plan.op.as_str(), error = %e, "Ledger plan does not apply");
            return Err(e.into());
        }

        if let Err(e) = self.store.apply(&plan).await {
            warn!(op = plan.op.as_str(), error = %e, "Record store rejected ledger plan");
            return Err(e.into());
        }

        *mirror = next;

        info!(op = plan.op.as_str(), mutations = plan.len(), "Ledger operation committed");
        Ok(plan)
    }

    // =========================================================================
    // Ledger Operations
    // =========================================================================

    /// Adds a product. With `credit_purchase`, its supplier is charged for
    /// the opening stock.
    pub async fn create_product(&self, input: NewProduct, credit_purchase: bool) -> ApiResult<Product> {
        let id = generate_id();
        let at = now();
        self.commit(|_| ledger::plan_create_product(input, credit_purchase, id.clone(), at))
            .await?;
        self.product(&id).await.ok_or_else(|| ApiError::not_found("Product", &id))
    }

    /// Adds stock at a new purchase price.
    pub async fn restock_product(&self, req: RestockRequest) -> ApiResult<Product> {
        let id = req.product_id.clone();
        self.commit(|snapshot| ledger::plan_restock(snapshot, req)).await?;
        self.product(&id).await.ok_or_else(|| ApiError::not_found("Product", &id))
    }

    /// Records a sale, takes its lines out of stock and, when unpaid, adds
    /// the total to the customer's balance.
    pub async fn checkout(&self, req: CheckoutRequest) -> ApiResult<Sale> {
        let sale_id = generate_id();
        let at = now();
        let plan = self
            .commit(|_| ledger::plan_checkout(req, sale_id.clone(), at))
            .await?;

        plan.sale()
            .cloned()
            .ok_or_else(|| ApiError::internal("Checkout plan without a sale"))
    }

    /// Settles (part of) a customer or supplier balance.
    pub async fn receive_payment(&self, req: PaymentRequest) -> ApiResult<()> {
        self.commit(|_| ledger::plan_receive_payment(req)).await?;
        Ok(())
    }

    // =========================================================================
    // Record Maintenance
    // =========================================================================

    pub async fn update_product(&self, id: &str, edit: ProductEdit) -> ApiResult<Product> {
        self.commit(|_| ledger::plan_update_product(id, edit)).await?;
        self.product(id).await.ok_or_else(|| ApiError::not_found("Product", id))
    }

    pub async fn delete_product(&self, id: &str) -> ApiResult<()> {
        self.commit(|_| Ok(ledger::plan_delete_product(id))).await?;
        Ok(())
    }

    pub async fn create_customer(&self, input: NewCustomer) -> ApiResult<Customer> {
        let id = generate_id();
        let at = now();
        self.commit(|_| ledger::plan_create_customer(input, id.clone(), at)).await?;
        self.customer(&id).await.ok_or_else(|| ApiError::not_found("Customer", &id))
    }

    pub async fn update_customer(&self, id: &str, edit: CustomerEdit) -> ApiResult<Customer> {
        self.commit(|_| ledger::plan_update_customer(id, edit)).await?;
        self.customer(id).await.ok_or_else(|| ApiError::not_found("Customer", id))
    }

    pub async fn delete_customer(&self, id: &str) -> ApiResult<()> {
        self.commit(|_| Ok(ledger::plan_delete_customer(id))).await?;
        Ok(())
    }

    pub async fn create_supplier(&self, input: NewSupplier) -> ApiResult<Supplier> {
        let id = generate_id();
        let at = now();
        self.commit(|_| ledger::plan_create_supplier(input, id.clone(), at)).await?;
        self.supplier(&id).await.ok_or_else(|| ApiError::not_found("Supplier", &id))
    }

    pub async fn update_supplier(&self, id: &str, edit: SupplierEdit) -> ApiResult<Supplier> {
        self.commit(|_| ledger::plan_update_supplier(id, edit)).await?;
        self.supplier(id).await.ok_or_else(|| ApiError::not_found("Supplier", id))
    }

    pub async fn delete_supplier(&self, id: &str) -> ApiResult<()> {
        self.commit(|_| Ok(ledger::plan_delete_supplier(id))).await?;
        Ok(())
    }

    // =========================================================================
    // Reads
    // =========================================================================

    /// Runs `f` against the mirror.
    pub async fn read<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&ShopSnapshot) -> R,
    {
        let mirror = self.mirror.read().await;
        f(&mirror)
    }

    /// A copy of every record.
    pub async fn snapshot(&self) -> ShopSnapshot {
        self.mirror.read().await.clone()
    }

    pub async fn product(&self, id: &str) -> Option<Product> {
        self.read(|s| s.product(id).cloned()).await
    }

    pub async fn customer(&self, id: &str) -> Option<Customer> {
        self.read(|s| s.customer(id).cloned()).await
    }

    pub async fn supplier(&self, id: &str) -> Option<Supplier> {
        self.read(|s| s.supplier(id).cloned()).await
    }

    pub async fn sale(&self, id: &str) -> Option<Sale> {
        self.read(|s| s.sale(id).cloned()).await
    }

    pub async fn dashboard(&self) -> DashboardStats {
        self.read(DashboardStats::compute).await
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;
    use dukaan_core::{Money, PartyType, PaymentStatus, SaleItem};
    use dukaan_db::{DbConfig, MemoryStore};

    fn rice(supplier_id: Option<String>) -> NewProduct {
        NewProduct {
            name: "Basmati Rice 5kg".to_string(),
            category: "Grocery".to_string(),
            supplier_id,
            stock: 10,
            purchase_price: Money::from_minor(5_000),
            selling_price: Money::from_minor(8_000),
        }
    }

    fn bilal() -> NewCustomer {
        NewCustomer {
            name: "Bilal".to_string(),
            phone: String::new(),
            address: String::new(),
            opening_balance: Money::zero(),
        }
    }

    fn ali_traders() -> NewSupplier {
        NewSupplier {
            name: "Ali Traders".to_string(),
            contact_person: "Ali".to_string(),
            phone: String::new(),
            opening_balance: Money::zero(),
        }
    }

    fn checkout_of(product: &Product, qty: i64, customer: Option<&Customer>, status: PaymentStatus) -> CheckoutRequest {
        CheckoutRequest {
            items: vec![SaleItem::from_product(product, qty)],
            customer_id: customer.map(|c| c.id.clone()),
            payment_status: status,
        }
    }

    async fn assert_mirror_matches_store<S>(shop: &ShopState<S>)
    where
        S: RecordStore,
        S::Error: std::fmt::Debug,
        ApiError: From<S::Error>,
    {
        let stored = shop.store().load().await.unwrap();
        assert_eq!(stored, shop.snapshot().await);
    }

    #[tokio::test]
    async fn test_udhaar_sale_then_payment() {
        let shop = ShopState::open(MemoryStore::new()).await.unwrap();
        let customer = shop.create_customer(bilal()).await.unwrap();
        let product = shop.create_product(rice(None), false).await.unwrap();

        let sale = shop
            .checkout(checkout_of(&product, 3, Some(&customer), PaymentStatus::Unpaid))
            .await
            .unwrap();

        assert_eq!(sale.total_amount.minor(), 24_000);
        assert_eq!(shop.product(&product.id).await.unwrap().stock, 7);
        assert_eq!(shop.customer(&customer.id).await.unwrap().balance.minor(), 24_000);

        shop.receive_payment(PaymentRequest {
            party: PartyType::Customer,
            party_id: customer.id.clone(),
            amount: Money::from_minor(50_000),
        })
        .await
        .unwrap();

        assert_eq!(shop.customer(&customer.id).await.unwrap().balance.minor(), -26_000);
        assert_mirror_matches_store(&shop).await;
    }

    #[tokio::test]
    async fn test_store_failure_leaves_mirror_untouched() {
        let store = MemoryStore::new();
        let shop = ShopState::open(store.clone()).await.unwrap();
        let customer = shop.create_customer(bilal()).await.unwrap();
        let product = shop.create_product(rice(None), false).await.unwrap();
        let before = shop.snapshot().await;

        store.fail_next_apply();
        let err = shop
            .checkout(checkout_of(&product, 2, Some(&customer), PaymentStatus::Unpaid))
            .await
            .unwrap_err();

        assert_eq!(err.code, ErrorCode::DatabaseError);
        assert_eq!(shop.snapshot().await, before);
        assert_mirror_matches_store(&shop).await;
    }

    #[tokio::test]
    async fn test_oversell_is_rejected_before_the_store() {
        let store = MemoryStore::new();
        let shop = ShopState::open(store.clone()).await.unwrap();
        let product = shop.create_product(rice(None), false).await.unwrap();
        let committed = store.applied_count();

        let err = shop
            .checkout(checkout_of(&product, 11, None, PaymentStatus::Paid))
            .await
            .unwrap_err();

        assert_eq!(err.code, ErrorCode::InsufficientStock);
        assert_eq!(store.applied_count(), committed);
        assert!(shop.snapshot().await.sales.is_empty());
    }

    #[tokio::test]
    async fn test_unpaid_walk_in_is_rejected() {
        let shop = ShopState::open(MemoryStore::new()).await.unwrap();
        let product = shop.create_product(rice(None), false).await.unwrap();

        let err = shop
            .checkout(checkout_of(&product, 1, None, PaymentStatus::Unpaid))
            .await
            .unwrap_err();

        assert_eq!(err.code, ErrorCode::BusinessLogic);
        assert_eq!(shop.product(&product.id).await.unwrap().stock, 10);
    }

    #[tokio::test]
    async fn test_credit_purchase_and_restock_charge_supplier() {
        let shop = ShopState::open(MemoryStore::new()).await.unwrap();
        let supplier = shop.create_supplier(ali_traders()).await.unwrap();
        let product = shop
            .create_product(rice(Some(supplier.id.clone())), true)
            .await
            .unwrap();

        assert_eq!(shop.supplier(&supplier.id).await.unwrap().balance.minor(), 50_000);

        let restocked = shop
            .restock_product(RestockRequest {
                product_id: product.id.clone(),
                quantity: 5,
                purchase_price: Money::from_minor(6_000),
                on_credit: true,
            })
            .await
            .unwrap();

        assert_eq!(restocked.stock, 15);
        assert_eq!(restocked.purchase_price.minor(), 6_000);
        assert_eq!(shop.supplier(&supplier.id).await.unwrap().balance.minor(), 80_000);
    }

    #[tokio::test]
    async fn test_edits_never_touch_ledger_fields() {
        let shop = ShopState::open(MemoryStore::new()).await.unwrap();
        let product = shop.create_product(rice(None), false).await.unwrap();

        let edited = shop
            .update_product(
                &product.id,
                ProductEdit {
                    name: "Rice Premium".to_string(),
                    category: "Grocery".to_string(),
                    supplier_id: None,
                    selling_price: Money::from_minor(9_000),
                },
            )
            .await
            .unwrap();

        assert_eq!(edited.name, "Rice Premium");
        assert_eq!(edited.stock, product.stock);
        assert_eq!(edited.purchase_price, product.purchase_price);
    }

    #[tokio::test]
    async fn test_deletes_keep_history() {
        let shop = ShopState::open(MemoryStore::new()).await.unwrap();
        let customer = shop.create_customer(bilal()).await.unwrap();
        let product = shop.create_product(rice(None), false).await.unwrap();
        let sale = shop
            .checkout(checkout_of(&product, 1, Some(&customer), PaymentStatus::Paid))
            .await
            .unwrap();

        shop.delete_customer(&customer.id).await.unwrap();
        shop.delete_product(&product.id).await.unwrap();

        assert!(shop.sale(&sale.id).await.is_some());

        let err = shop.delete_customer(&customer.id).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::NotFound);
    }

    #[tokio::test]
    async fn test_sqlite_store_reload_matches_mirror() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let shop = ShopState::open(db).await.unwrap();

        let supplier = shop.create_supplier(ali_traders()).await.unwrap();
        let customer = shop.create_customer(bilal()).await.unwrap();
        let product = shop
            .create_product(rice(Some(supplier.id.clone())), true)
            .await
            .unwrap();
        shop.checkout(checkout_of(&product, 4, Some(&customer), PaymentStatus::Unpaid))
            .await
            .unwrap();

        let err = shop
            .checkout(checkout_of(&product, 7, Some(&customer), PaymentStatus::Unpaid))
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::InsufficientStock);

        let before = shop.snapshot().await;
        shop.reload().await.unwrap();
        assert_eq!(shop.snapshot().await, before);
        assert_eq!(shop.dashboard().await.receivables.minor(), 32_000);
    }
}
