//! # Ledger Transaction Core
//!
//! Turns validated inputs into [`LedgerPlan`]s: the complete, ordered list
//! of record mutations one operation performs. A plan is the unit of
//! atomicity: the record store applies all of it in one transaction, and the
//! in-memory [`ShopSnapshot`] applies the very same plan after the store
//! commits. Nothing else writes `stock` or `balance`.
//!
//! ## The Four Ledger Operations
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  CreateProduct(credit)     InsertProduct                                │
//! │                            + AdjustSupplierBalance(+stock × price)      │
//! │                              only if credit && supplier && stock > 0    │
//! │                                                                         │
//! │  RestockProduct            AdjustStock(+qty)                            │
//! │                            SetPurchasePrice(new)      (last price wins) │
//! │                            + AdjustSupplierBalance(+qty × new)          │
//! │                              only if on_credit && product has supplier  │
//! │                                                                         │
//! │  Checkout                  InsertSale(snapshot of cart)                 │
//! │                            AdjustStock(−qty) per line                   │
//! │                            + AdjustCustomerBalance(+total_amount)       │
//! │                              only if unpaid                             │
//! │                                                                         │
//! │  ReceivePayment            AdjustCustomerBalance(−amount)               │
//! │                         or AdjustSupplierBalance(−amount)  (no floor)   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Plain record maintenance (customer/supplier CRUD, product edits and
//! deletes) is planned here too, so every write reaches the store through
//! the same atomic path.
//!
//! Ids and timestamps are parameters: planners never read a clock.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult};
use crate::input::{
    CheckoutRequest, CustomerEdit, NewCustomer, NewProduct, NewSupplier, PaymentRequest,
    ProductEdit, RestockRequest, SupplierEdit,
};
use crate::money::Money;
use crate::snapshot::ShopSnapshot;
use crate::types::{Customer, PartyType, PaymentStatus, Product, Sale, SaleItem, Supplier};

// =============================================================================
// Plan Types
// =============================================================================

/// The operation a plan was built for. Used for logging and tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LedgerOp {
    CreateProduct,
    UpdateProduct,
    RestockProduct,
    DeleteProduct,
    Checkout,
    ReceivePayment,
    CreateCustomer,
    UpdateCustomer,
    DeleteCustomer,
    CreateSupplier,
    UpdateSupplier,
    DeleteSupplier,
}

impl LedgerOp {
    pub fn as_str(&self) -> &'static str {
        match self {
            LedgerOp::CreateProduct => "create_product",
            LedgerOp::UpdateProduct => "update_product",
            LedgerOp::RestockProduct => "restock_product",
            LedgerOp::DeleteProduct => "delete_product",
            LedgerOp::Checkout => "checkout",
            LedgerOp::ReceivePayment => "receive_payment",
            LedgerOp::CreateCustomer => "create_customer",
            LedgerOp::UpdateCustomer => "update_customer",
            LedgerOp::DeleteCustomer => "delete_customer",
            LedgerOp::CreateSupplier => "create_supplier",
            LedgerOp::UpdateSupplier => "update_supplier",
            LedgerOp::DeleteSupplier => "delete_supplier",
        }
    }
}

/// A single record mutation.
///
/// Adjustments are deltas, not absolute values, so applying a plan never
/// depends on the caller having a fresh copy of the row. Every variant that
/// names an existing id fails the whole plan when the id is missing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Mutation {
    InsertProduct(Product),
    UpdateProductDetails {
        product_id: String,
        name: String,
        category: String,
        supplier_id: Option<String>,
        selling_price: Money,
    },
    /// Fails the plan if stock would drop below zero.
    AdjustStock {
        product_id: String,
        delta: i64,
    },
    SetPurchasePrice {
        product_id: String,
        purchase_price: Money,
    },
    DeleteProduct {
        product_id: String,
    },

    InsertCustomer(Customer),
    UpdateCustomerDetails {
        customer_id: String,
        name: String,
        phone: String,
        address: String,
    },
    AdjustCustomerBalance {
        customer_id: String,
        delta: Money,
    },
    DeleteCustomer {
        customer_id: String,
    },

    InsertSupplier(Supplier),
    UpdateSupplierDetails {
        supplier_id: String,
        name: String,
        contact_person: String,
        phone: String,
    },
    AdjustSupplierBalance {
        supplier_id: String,
        delta: Money,
    },
    DeleteSupplier {
        supplier_id: String,
    },

    InsertSale(Sale),
}

/// An all-or-nothing batch of mutations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerPlan {
    pub op: LedgerOp,
    pub mutations: Vec<Mutation>,
}

impl LedgerPlan {
    pub fn new(op: LedgerOp) -> Self {
        LedgerPlan {
            op,
            mutations: Vec::new(),
        }
    }

    fn with(mut self, mutation: Mutation) -> Self {
        self.mutations.push(mutation);
        self
    }

    pub fn len(&self) -> usize {
        self.mutations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.mutations.is_empty()
    }

    /// Net balance change this plan makes to one customer.
    pub fn customer_balance_delta(&self, customer_id: &str) -> Money {
        self.mutations
            .iter()
            .filter_map(|m| match m {
                Mutation::AdjustCustomerBalance { customer_id: id, delta } if id == customer_id => {
                    Some(*delta)
                }
                _ => None,
            })
            .sum()
    }

    /// Net balance change this plan makes to one supplier.
    pub fn supplier_balance_delta(&self, supplier_id: &str) -> Money {
        self.mutations
            .iter()
            .filter_map(|m| match m {
                Mutation::AdjustSupplierBalance { supplier_id: id, delta } if id == supplier_id => {
                    Some(*delta)
                }
                _ => None,
            })
            .sum()
    }

    /// The sale this plan inserts, if it is a checkout.
    pub fn sale(&self) -> Option<&Sale> {
        self.mutations.iter().find_map(|m| match m {
            Mutation::InsertSale(sale) => Some(sale),
            _ => None,
        })
    }
}

// =============================================================================
// Sale Totals
// =============================================================================

/// Totals of a set of sale lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SaleTotals {
    /// Σ selling_price × quantity
    pub total_amount: Money,
    /// Σ purchase_price × quantity
    pub total_cost: Money,
    /// total_amount − total_cost, exactly.
    pub profit: Money,
}

impl SaleTotals {
    pub fn from_items(items: &[SaleItem]) -> Self {
        let total_amount: Money = items.iter().map(SaleItem::line_total).sum();
        let total_cost: Money = items.iter().map(SaleItem::line_cost).sum();

        SaleTotals {
            total_amount,
            total_cost,
            profit: total_amount - total_cost,
        }
    }
}

// =============================================================================
// Product Planners
// =============================================================================

/// Plans adding a product, optionally bought on credit from its supplier.
///
/// The supplier is charged `stock × purchase_price` only when
/// `credit_purchase` is set, the product names a supplier, and the opening
/// stock is above zero.
pub fn plan_create_product(
    input: NewProduct,
    credit_purchase: bool,
    id: String,
    now: DateTime<Utc>,
) -> CoreResult<LedgerPlan> {
    let input = input.validate()?;

    let credit = match (&input.supplier_id, credit_purchase && input.stock > 0) {
        (Some(supplier_id), true) => Some(Mutation::AdjustSupplierBalance {
            supplier_id: supplier_id.clone(),
            delta: input.purchase_price.multiply_quantity(input.stock),
        }),
        _ => None,
    };

    let product = Product {
        id,
        name: input.name,
        category: input.category,
        supplier_id: input.supplier_id,
        stock: input.stock,
        purchase_price: input.purchase_price,
        selling_price: input.selling_price,
        created_at: now,
    };

    let mut plan = LedgerPlan::new(LedgerOp::CreateProduct).with(Mutation::InsertProduct(product));
    if let Some(mutation) = credit {
        plan.mutations.push(mutation);
    }

    Ok(plan)
}

/// Plans an edit of a product's descriptive fields.
pub fn plan_update_product(product_id: &str, edit: ProductEdit) -> CoreResult<LedgerPlan> {
    let edit = edit.validate()?;

    Ok(
        LedgerPlan::new(LedgerOp::UpdateProduct).with(Mutation::UpdateProductDetails {
            product_id: product_id.to_string(),
            name: edit.name,
            category: edit.category,
            supplier_id: edit.supplier_id,
            selling_price: edit.selling_price,
        }),
    )
}

/// Plans a restock of an existing product.
///
/// Reads the product from `snapshot` to find its supplier. A product with no
/// supplier restocked `on_credit` simply gets no balance mutation.
pub fn plan_restock(snapshot: &ShopSnapshot, req: RestockRequest) -> CoreResult<LedgerPlan> {
    let req = req.validate()?;

    let product = snapshot
        .product(&req.product_id)
        .ok_or_else(|| CoreError::ProductNotFound(req.product_id.clone()))?;

    let mut plan = LedgerPlan::new(LedgerOp::RestockProduct)
        .with(Mutation::AdjustStock {
            product_id: product.id.clone(),
            delta: req.quantity,
        })
        .with(Mutation::SetPurchasePrice {
            product_id: product.id.clone(),
            purchase_price: req.purchase_price,
        });

    if req.on_credit {
        if let Some(supplier_id) = &product.supplier_id {
            plan.mutations.push(Mutation::AdjustSupplierBalance {
                supplier_id: supplier_id.clone(),
                delta: req.purchase_price.multiply_quantity(req.quantity),
            });
        }
    }

    Ok(plan)
}

/// Plans removing a product. Past sales keep their item snapshots.
pub fn plan_delete_product(product_id: &str) -> LedgerPlan {
    LedgerPlan::new(LedgerOp::DeleteProduct).with(Mutation::DeleteProduct {
        product_id: product_id.to_string(),
    })
}

// =============================================================================
// Checkout
// =============================================================================

/// Plans a checkout.
///
/// ## Steps
/// 1. Validate (empty cart, unpaid without customer) before anything is built
/// 2. Compute totals from the frozen line prices
/// 3. InsertSale with a copy of the cart lines
/// 4. AdjustStock(−quantity) for each line
/// 5. AdjustCustomerBalance(+total_amount) when unpaid
pub fn plan_checkout(req: CheckoutRequest, sale_id: String, now: DateTime<Utc>) -> CoreResult<LedgerPlan> {
    let req = req.validate()?;
    let totals = SaleTotals::from_items(&req.items);

    let stock_moves: Vec<Mutation> = req
        .items
        .iter()
        .map(|item| Mutation::AdjustStock {
            product_id: item.product_id.clone(),
            delta: -item.quantity,
        })
        .collect();

    let credit = match (req.payment_status, &req.customer_id) {
        (PaymentStatus::Unpaid, Some(customer_id)) => Some(Mutation::AdjustCustomerBalance {
            customer_id: customer_id.clone(),
            delta: totals.total_amount,
        }),
        (PaymentStatus::Unpaid, None) => return Err(CoreError::CustomerRequiredForCredit),
        (PaymentStatus::Paid, _) => None,
    };

    let sale = Sale {
        id: sale_id,
        customer_id: req.customer_id,
        items: req.items,
        total_amount: totals.total_amount,
        total_cost: totals.total_cost,
        profit: totals.profit,
        date: now,
        payment_status: req.payment_status,
    };

    let mut plan = LedgerPlan::new(LedgerOp::Checkout).with(Mutation::InsertSale(sale));
    plan.mutations.extend(stock_moves);
    if let Some(mutation) = credit {
        plan.mutations.push(mutation);
    }

    Ok(plan)
}

// =============================================================================
// Payments
// =============================================================================

/// Plans a payment. The balance may go negative (overpayment is kept).
pub fn plan_receive_payment(req: PaymentRequest) -> CoreResult<LedgerPlan> {
    let req = req.validate()?;

    let mutation = match req.party {
        PartyType::Customer => Mutation::AdjustCustomerBalance {
            customer_id: req.party_id,
            delta: -req.amount,
        },
        PartyType::Supplier => Mutation::AdjustSupplierBalance {
            supplier_id: req.party_id,
            delta: -req.amount,
        },
    };

    Ok(LedgerPlan::new(LedgerOp::ReceivePayment).with(mutation))
}

// =============================================================================
// Customer / Supplier Planners
// =============================================================================

pub fn plan_create_customer(input: NewCustomer, id: String, now: DateTime<Utc>) -> CoreResult<LedgerPlan> {
    let input = input.validate()?;

    Ok(
        LedgerPlan::new(LedgerOp::CreateCustomer).with(Mutation::InsertCustomer(Customer {
            id,
            name: input.name,
            phone: input.phone,
            address: input.address,
            balance: input.opening_balance,
            created_at: now,
        })),
    )
}

pub fn plan_update_customer(customer_id: &str, edit: CustomerEdit) -> CoreResult<LedgerPlan> {
    let edit = edit.validate()?;

    Ok(
        LedgerPlan::new(LedgerOp::UpdateCustomer).with(Mutation::UpdateCustomerDetails {
            customer_id: customer_id.to_string(),
            name: edit.name,
            phone: edit.phone,
            address: edit.address,
        }),
    )
}

/// Removing a customer leaves their sales (and any open udhaar) untouched.
pub fn plan_delete_customer(customer_id: &str) -> LedgerPlan {
    LedgerPlan::new(LedgerOp::DeleteCustomer).with(Mutation::DeleteCustomer {
        customer_id: customer_id.to_string(),
    })
}

pub fn plan_create_supplier(input: NewSupplier, id: String, now: DateTime<Utc>) -> CoreResult<LedgerPlan> {
    let input = input.validate()?;

    Ok(
        LedgerPlan::new(LedgerOp::CreateSupplier).with(Mutation::InsertSupplier(Supplier {
            id,
            name: input.name,
            contact_person: input.contact_person,
            phone: input.phone,
            balance: input.opening_balance,
            created_at: now,
        })),
    )
}

pub fn plan_update_supplier(supplier_id: &str, edit: SupplierEdit) -> CoreResult<LedgerPlan> {
    let edit = edit.validate()?;

    Ok(
        LedgerPlan::new(LedgerOp::UpdateSupplier).with(Mutation::UpdateSupplierDetails {
            supplier_id: supplier_id.to_string(),
            name: edit.name,
            contact_person: edit.contact_person,
            phone: edit.phone,
        }),
    )
}

pub fn plan_delete_supplier(supplier_id: &str) -> LedgerPlan {
    LedgerPlan::new(LedgerOp::DeleteSupplier).with(Mutation::DeleteSupplier {
        supplier_id: supplier_id.to_string(),
    })
}

// =============================================================================
// Unit Tests
// =============================================================================
