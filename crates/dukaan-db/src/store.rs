//! # SQLite Record Store
//!
//! [`RecordStore`] for [`Database`]: every ledger plan runs in exactly one
//! SQLite transaction.
//!
//! ```text
//! apply(plan)
//!   BEGIN
//!   ├── mutation 1 ──► repository write ──► Err? ──► drop tx (ROLLBACK)
//!   ├── mutation 2 ──► ...
//!   └── mutation n
//!   COMMIT
//! ```

use sqlx::SqliteConnection;
use tracing::{debug, warn};

use crate::error::{DbError, DbResult};
use crate::pool::Database;
use crate::repository::{customer, product, sale, supplier};
use dukaan_core::{LedgerPlan, Mutation, RecordStore, ShopSnapshot};

impl RecordStore for Database {
    type Error = DbError;

    async fn load(&self) -> DbResult<ShopSnapshot> {
        let snapshot = ShopSnapshot {
            products: self.products().list().await?,
            customers: self.customers().list().await?,
            suppliers: self.suppliers().list().await?,
            sales: self.sales().list().await?,
        };

        debug!(
            products = snapshot.products.len(),
            customers = snapshot.customers.len(),
            suppliers = snapshot.suppliers.len(),
            sales = snapshot.sales.len(),
            "Loaded shop records"
        );

        Ok(snapshot)
    }

    async fn apply(&self, plan: &LedgerPlan) -> DbResult<()> {
        debug!(op = plan.op.as_str(), mutations = plan.len(), "Applying ledger plan");

        let mut tx = self
            .pool()
            .begin()
            .await
            .map_err(|e| DbError::TransactionFailed(e.to_string()))?;

        for mutation in &plan.mutations {
            if let Err(err) = apply_mutation(&mut *tx, mutation).await {
                warn!(op = plan.op.as_str(), error = %err, "Ledger plan rolled back");
                return Err(err);
            }
        }

        tx.commit()
            .await
            .map_err(|e| DbError::TransactionFailed(e.to_string()))?;

        Ok(())
    }
}

async fn apply_mutation(conn: &mut SqliteConnection, mutation: &Mutation) -> DbResult<()> {
    match mutation {
        Mutation::InsertProduct(p) => product::insert(conn, p).await,
        Mutation::UpdateProductDetails {
            product_id,
            name,
            category,
            supplier_id,
            selling_price,
        } => {
            product::update_details(
                conn,
                product_id,
                name,
                category,
                supplier_id.as_deref(),
                *selling_price,
            )
            .await
        }
        Mutation::AdjustStock { product_id, delta } => product::adjust_stock(conn, product_id, *delta).await,
        Mutation::SetPurchasePrice {
            product_id,
            purchase_price,
        } => product::set_purchase_price(conn, product_id, *purchase_price).await,
        Mutation::DeleteProduct { product_id } => product::delete(conn, product_id).await,

        Mutation::InsertCustomer(c) => customer::insert(conn, c).await,
        Mutation::UpdateCustomerDetails {
            customer_id,
            name,
            phone,
            address,
        } => customer::update_details(conn, customer_id, name, phone, address).await,
        Mutation::AdjustCustomerBalance { customer_id, delta } => {
            customer::adjust_balance(conn, customer_id, *delta).await
        }
        Mutation::DeleteCustomer { customer_id } => customer::delete(conn, customer_id).await,

        Mutation::InsertSupplier(s) => supplier::insert(conn, s).await,
        Mutation::UpdateSupplierDetails {
            supplier_id,
            name,
            contact_person,
            phone,
        } => supplier::update_details(conn, supplier_id, name, contact_person, phone).await,
        Mutation::AdjustSupplierBalance { supplier_id, delta } => {
            supplier::adjust_balance(conn, supplier_id, *delta).await
        }
        Mutation::DeleteSupplier { supplier_id } => supplier::delete(conn, supplier_id).await,

        Mutation::InsertSale(s) => sale::insert(conn, s).await,
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
