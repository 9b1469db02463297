//! # Shop Snapshot
//!
//! The four record tables held in memory, in insertion order.
//!
//! A snapshot is what the state owner mirrors for rendering, and what a
//! record store hands back from `load`. It applies [`LedgerPlan`]s with the
//! same rules the SQLite store enforces:
//!
//! - a mutation naming a missing id fails the plan
//! - an insert reusing an id fails the plan
//! - stock may never go below zero
//!
//! Application is atomic: the plan runs against a copy which replaces `self`
//! only if every mutation succeeded.

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult};
use crate::ledger::{LedgerPlan, Mutation};
use crate::types::{Customer, Product, Sale, Supplier};

/// All shop records.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShopSnapshot {
    pub products: Vec<Product>,
    pub customers: Vec<Customer>,
    pub suppliers: Vec<Supplier>,
    pub sales: Vec<Sale>,
}

impl ShopSnapshot {
    // =========================================================================
    // Lookups
    // =========================================================================

    pub fn product(&self, id: &str) -> Option<&Product> {
        self.products.iter().find(|p| p.id == id)
    }

    pub fn customer(&self, id: &str) -> Option<&Customer> {
        self.customers.iter().find(|c| c.id == id)
    }

    pub fn supplier(&self, id: &str) -> Option<&Supplier> {
        self.suppliers.iter().find(|s| s.id == id)
    }

    pub fn sale(&self, id: &str) -> Option<&Sale> {
        self.sales.iter().find(|s| s.id == id)
    }

    fn product_mut(&mut self, id: &str) -> CoreResult<&mut Product> {
        self.products
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or_else(|| CoreError::ProductNotFound(id.to_string()))
    }

    fn customer_mut(&mut self, id: &str) -> CoreResult<&mut Customer> {
        self.customers
            .iter_mut()
            .find(|c| c.id == id)
            .ok_or_else(|| CoreError::CustomerNotFound(id.to_string()))
    }

    fn supplier_mut(&mut self, id: &str) -> CoreResult<&mut Supplier> {
        self.suppliers
            .iter_mut()
            .find(|s| s.id == id)
            .ok_or_else(|| CoreError::SupplierNotFound(id.to_string()))
    }

    // =========================================================================
    // Plan Application
    // =========================================================================

    /// Applies every mutation in `plan`, or none of them.
    ///
    /// ## Example
    /// ```rust
    /// use dukaan_core::ledger::plan_delete_customer;
    /// use dukaan_core::{CoreError, ShopSnapshot};
    ///
    /// let mut snapshot = ShopSnapshot::default();
    /// let err = snapshot.apply(&plan_delete_customer("ghost")).unwrap_err();
    /// assert!(matches!(err, CoreError::CustomerNotFound(_)));
    /// ```
    pub fn apply(&mut self, plan: &LedgerPlan) -> CoreResult<()> {
        let mut next = self.clone();

        for mutation in &plan.mutations {
            next.apply_one(mutation)?;
        }

        *self = next;
        Ok(())
    }

    fn apply_one(&mut self, mutation: &Mutation) -> CoreResult<()> {
        match mutation {
            Mutation::InsertProduct(product) => {
                if self.product(&product.id).is_some() {
                    return Err(duplicate("product", &product.id));
                }
                self.products.push(product.clone());
            }
            Mutation::UpdateProductDetails {
                product_id,
                name,
                category,
                supplier_id,
                selling_price,
            } => {
                let product = self.product_mut(product_id)?;
                product.name = name.clone();
                product.category = category.clone();
                product.supplier_id = supplier_id.clone();
                product.selling_price = *selling_price;
            }
            Mutation::AdjustStock { product_id, delta } => {
                let product = self.product_mut(product_id)?;
                let next = product
                    .stock
                    .checked_add(*delta)
                    .ok_or_else(|| overflow("product", product_id, "stock"))?;
                if next < 0 {
                    return Err(CoreError::InsufficientStock {
                        product_id: product_id.clone(),
                        available: product.stock,
                        requested: -delta,
                    });
                }
                product.stock = next;
            }
            Mutation::SetPurchasePrice {
                product_id,
                purchase_price,
            } => {
                self.product_mut(product_id)?.purchase_price = *purchase_price;
            }
            Mutation::DeleteProduct { product_id } => {
                let before = self.products.len();
                self.products.retain(|p| &p.id != product_id);
                if self.products.len() == before {
                    return Err(CoreError::ProductNotFound(product_id.clone()));
                }
            }

            Mutation::InsertCustomer(customer) => {
                if self.customer(&customer.id).is_some() {
                    return Err(duplicate("customer", &customer.id));
                }
                self.customers.push(customer.clone());
            }
            Mutation::UpdateCustomerDetails {
                customer_id,
                name,
                phone,
                address,
            } => {
                let customer = self.customer_mut(customer_id)?;
                customer.name = name.clone();
                customer.phone = phone.clone();
                customer.address = address.clone();
            }
            Mutation::AdjustCustomerBalance { customer_id, delta } => {
                let customer = self.customer_mut(customer_id)?;
                customer.balance = customer
                    .balance
                    .checked_add(*delta)
                    .ok_or_else(|| overflow("customer", customer_id, "balance"))?;
            }
            Mutation::DeleteCustomer { customer_id } => {
                let before = self.customers.len();
                self.customers.retain(|c| &c.id != customer_id);
                if self.customers.len() == before {
                    return Err(CoreError::CustomerNotFound(customer_id.clone()));
                }
            }

            Mutation::InsertSupplier(supplier) => {
                if self.supplier(&supplier.id).is_some() {
                    return Err(duplicate("supplier", &supplier.id));
                }
                self.suppliers.push(supplier.clone());
            }
            Mutation::UpdateSupplierDetails {
                supplier_id,
                name,
                contact_person,
                phone,
            } => {
                let supplier = self.supplier_mut(supplier_id)?;
                supplier.name = name.clone();
                supplier.contact_person = contact_person.clone();
                supplier.phone = phone.clone();
            }
            Mutation::AdjustSupplierBalance { supplier_id, delta } => {
                let supplier = self.supplier_mut(supplier_id)?;
                supplier.balance = supplier
                    .balance
                    .checked_add(*delta)
                    .ok_or_else(|| overflow("supplier", supplier_id, "balance"))?;
            }
            Mutation::DeleteSupplier { supplier_id } => {
                let before = self.suppliers.len();
                self.suppliers.retain(|s| &s.id != supplier_id);
                if self.suppliers.len() == before {
                    return Err(CoreError::SupplierNotFound(supplier_id.clone()));
                }
            }

            Mutation::InsertSale(sale) => {
                if self.sale(&sale.id).is_some() {
                    return Err(duplicate("sale", &sale.id));
                }
                self.sales.push(sale.clone());
            }
        }

        Ok(())
    }
}

fn overflow(entity: &'static str, id: &str, field: &'static str) -> CoreError {
    CoreError::Overflow {
        entity,
        id: id.to_string(),
        field,
    }
}

fn duplicate(entity: &'static str, id: &str) -> CoreError {
    CoreError::DuplicateId {
        entity,
        id: id.to_string(),
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
