//! # Cart Commands
//!
//! Cart manipulation at the counter.
//!
//! ## Cart Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  ┌──────────┐     ┌──────────┐     ┌──────────┐                         │
//! │  │  Empty   │────►│ In Cart  │────►│  Sale    │                         │
//! │  │  Cart    │     │          │     │ recorded │                         │
//! │  └──────────┘     └──────────┘     └──────────┘                         │
//! │                        │                 ▲                              │
//! │                   add_to_cart        checkout                           │
//! │                   set_cart_quantity  (sale.rs)                          │
//! │                   remove_from_cart                                      │
//! │                        │                                                │
//! │                        ▼                                                │
//! │                   clear_cart ──────► (back to empty)                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Stock limits are read from the shop's mirror at the moment of each change.

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::product::ProductDto;
use crate::error::{ApiError, ApiResult};
use crate::state::{Cart, CartState, CartTotals, ShopState};
use dukaan_core::{report, RecordStore, SaleItem};

/// Cart response including items and totals.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartResponse {
    pub items: Vec<SaleItem>,
    pub totals: CartTotals,
}

impl From<&Cart> for CartResponse {
    fn from(cart: &Cart) -> Self {
        CartResponse {
            items: cart.items.clone(),
            totals: CartTotals::from(cart),
        }
    }
}

pub fn get_cart(cart: &CartState) -> CartResponse {
    debug!("get_cart command");
    cart.with_cart(|c| CartResponse::from(c))
}

/// Adds one unit of a product, up to its stock.
pub async fn add_to_cart<S>(shop: &ShopState<S>, cart: &CartState, product_id: &str) -> ApiResult<CartResponse>
where
    S: RecordStore,
    ApiError: From<S::Error>,
{
    debug!(product_id = %product_id, "add_to_cart command");

    let product = shop
        .product(product_id)
        .await
        .ok_or_else(|| ApiError::not_found("Product", product_id))?;

    cart.with_cart_mut(|c| {
        c.add_item(&product)?;
        Ok(CartResponse::from(&*c))
    })
}

/// Sets a line's quantity, clamped to stock. Zero or less removes the line.
pub async fn set_cart_quantity<S>(
    shop: &ShopState<S>,
    cart: &CartState,
    product_id: &str,
    quantity: i64,
) -> ApiResult<CartResponse>
where
    S: RecordStore,
    ApiError: From<S::Error>,
{
    debug!(product_id = %product_id, quantity, "set_cart_quantity command");

    let product = shop
        .product(product_id)
        .await
        .ok_or_else(|| ApiError::not_found("Product", product_id))?;

    cart.with_cart_mut(|c| {
        c.set_quantity(&product, quantity)?;
        Ok(CartResponse::from(&*c))
    })
}

pub fn remove_from_cart(cart: &CartState, product_id: &str) -> ApiResult<CartResponse> {
    debug!(product_id = %product_id, "remove_from_cart command");

    cart.with_cart_mut(|c| {
        c.remove_item(product_id)?;
        Ok(CartResponse::from(&*c))
    })
}

pub fn clear_cart(cart: &CartState) -> CartResponse {
    debug!("clear_cart command");

    cart.with_cart_mut(|c| {
        c.clear();
        CartResponse::from(&*c)
    })
}

/// Products the counter can sell: in stock, matching `query`, newest first.
pub async fn sellable_products<S>(shop: &ShopState<S>, query: Option<String>) -> Vec<ProductDto>
where
    S: RecordStore,
    ApiError: From<S::Error>,
{
    let query = query.unwrap_or_default();
    shop.read(|s| {
        report::sellable_products(&s.products, &query)
            .into_iter()
            .map(ProductDto::from)
            .collect()
    })
    .await
}
