//! # Cart State
//!
//! The counter's cart before checkout.
//!
//! ## Cart Operations Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Cart State Operations                                │
//! │                                                                         │
//! │  Counter Action           Command                 Cart State Change     │
//! │  ──────────────           ───────                 ─────────────────     │
//! │                                                                         │
//! │  Click Product ──────────► add_to_cart() ───────► qty + 1 (≤ stock)    │
//! │                                                                         │
//! │  Change Quantity ────────► set_cart_quantity() ─► qty = min(n, stock)  │
//! │                                                   n ≤ 0 removes line   │
//! │                                                                         │
//! │  Click Remove ───────────► remove_from_cart() ──► line removed         │
//! │                                                                         │
//! │  Checkout ok ────────────► checkout() ──────────► cleared              │
//! │  Checkout failed ────────► checkout() ──────────► kept as is           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Lines are [`SaleItem`]s: name and prices are frozen when the product is
//! first added. Quantities are clamped to the stock seen at that moment; the
//! ledger still rejects the checkout if stock has dropped since.

use std::sync::{Arc, Mutex, MutexGuard};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use dukaan_core::input::CheckoutRequest;
use dukaan_core::{Money, PaymentStatus, Product, SaleItem, MAX_CART_ITEMS};

/// Cart rule violations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CartError {
    #[error("{0} is out of stock")]
    OutOfStock(String),

    #[error("Product {0} not in cart")]
    NotInCart(String),

    #[error("Cart cannot have more than {0} items")]
    TooManyLines(usize),
}

/// The shopping cart.
///
/// ## Invariants
/// - Lines are unique by `product_id` (adding again increases quantity)
/// - 0 < quantity ≤ stock at the time of the last change
/// - At most [`MAX_CART_ITEMS`] lines
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Cart {
    pub items: Vec<SaleItem>,

    /// When the cart was created/last cleared
    pub created_at: DateTime<Utc>,
}

impl Default for Cart {
    fn default() -> Self {
        Cart::new()
    }
}

impl Cart {
    pub fn new() -> Self {
        Cart {
            items: Vec::new(),
            created_at: Utc::now(),
        }
    }

    /// Adds one unit of `product`, never beyond its stock.
    ///
    /// A product that has run out is refused, and its existing line dropped.
    pub fn add_item(&mut self, product: &Product) -> Result<(), CartError> {
        if product.stock <= 0 {
            self.items.retain(|l| l.product_id != product.id);
            return Err(CartError::OutOfStock(product.name.clone()));
        }

        if let Some(line) = self.items.iter_mut().find(|l| l.product_id == product.id) {
            line.quantity = (line.quantity + 1).min(product.stock);
            return Ok(());
        }

        if self.items.len() >= MAX_CART_ITEMS {
            return Err(CartError::TooManyLines(MAX_CART_ITEMS));
        }

        self.items.push(SaleItem::from_product(product, 1));
        Ok(())
    }

    /// Sets a line's quantity, clamped to `product`'s stock.
    ///
    /// A quantity of zero or less (or zero stock) removes the line.
    pub fn set_quantity(&mut self, product: &Product, quantity: i64) -> Result<(), CartError> {
        let clamped = quantity.min(product.stock);
        if clamped <= 0 {
            return self.remove_item(&product.id);
        }

        let line = self
            .items
            .iter_mut()
            .find(|l| l.product_id == product.id)
            .ok_or_else(|| CartError::NotInCart(product.id.clone()))?;
        line.quantity = clamped;
        Ok(())
    }

    pub fn remove_item(&mut self, product_id: &str) -> Result<(), CartError> {
        let initial_len = self.items.len();
        self.items.retain(|l| l.product_id != product_id);

        if self.items.len() == initial_len {
            Err(CartError::NotInCart(product_id.to_string()))
        } else {
            Ok(())
        }
    }

    pub fn clear(&mut self) {
        self.items.clear();
        self.created_at = Utc::now();
    }

    pub fn item_count(&self) -> usize {
        self.items.len()
    }

    pub fn total_quantity(&self) -> i64 {
        self.items.iter().map(|l| l.quantity).sum()
    }

    /// Σ selling price × quantity.
    pub fn total(&self) -> Money {
        self.items.iter().map(SaleItem::line_total).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Builds the checkout request for this cart.
    pub fn to_checkout(&self, customer_id: Option<String>, payment_status: PaymentStatus) -> CheckoutRequest {
        CheckoutRequest {
            items: self.items.clone(),
            customer_id,
            payment_status,
        }
    }
}

/// Cart totals summary for responses.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartTotals {
    pub item_count: usize,
    pub total_quantity: i64,
    pub total: Money,
}

impl From<&Cart> for CartTotals {
    fn from(cart: &Cart) -> Self {
        CartTotals {
            item_count: cart.item_count(),
            total_quantity: cart.total_quantity(),
            total: cart.total(),
        }
    }
}

/// Shared cart state.
///
/// Cart operations are short and never await, so a std mutex is enough.
#[derive(Debug, Default)]
pub struct CartState {
    cart: Arc<Mutex<Cart>>,
}

impl CartState {
    pub fn new() -> Self {
        CartState::default()
    }

    fn lock(&self) -> MutexGuard<'_, Cart> {
        // Every Cart method leaves it consistent, so a poisoned lock is still usable.
        self.cart.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Executes a function with read access to the cart.
    pub fn with_cart<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&Cart) -> R,
    {
        f(&*self.lock())
    }

    /// Executes a function with write access to the cart.
    ///
    /// ## Usage
    /// ```rust,ignore
    /// cart_state.with_cart_mut(|cart| cart.add_item(&product))?;
    /// ```
    pub fn with_cart_mut<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&mut Cart) -> R,
    {
        f(&mut *self.lock())
    }
}
