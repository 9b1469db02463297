//! # Shop Commands
//!
//! Every operation the rendering layer can invoke.
//!
//! ## Command Organization
//! ```text
//! commands/
//! ├── mod.rs      ◄─── You are here (exports, form helpers)
//! ├── product.rs  ◄─── Product CRUD, restock
//! ├── customer.rs ◄─── Customer CRUD, purchase history
//! ├── supplier.rs ◄─── Supplier CRUD
//! ├── cart.rs     ◄─── Cart manipulation, sellable products
//! ├── sale.rs     ◄─── Checkout, payments, sale list
//! ├── report.rs   ◄─── Dashboard, monthly performance
//! └── config.rs   ◄─── Configuration retrieval
//! ```
//!
//! ## How Commands Work
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Rendering layer                                                        │
//! │  ───────────────                                                        │
//! │  { "name": "Sugar 1kg", "stock": 20, "purchasePrice": "140.00", ... }   │
//! │         │                                                               │
//! │         │ (JSON, camelCase)                                             │
//! │         ▼                                                               │
//! │  create_product(&shop, form)                                            │
//! │      form.into_input()?      ◄── raw amounts parsed here               │
//! │      shop.create_product()   ◄── ledger plan, store, mirror             │
//! │         │                                                               │
//! │         ▼                                                               │
//! │  Result<ProductDto, ApiError>                                           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Each command takes only the state it needs: `&ShopState<S>`,
//! `&CartState`, `&ConfigState`.

pub mod cart;
pub mod config;
pub mod customer;
pub mod product;
pub mod report;
pub mod sale;
pub mod supplier;

use dukaan_core::Money;

use crate::error::{ApiError, ApiResult};

/// Parses an amount typed into a form field.
pub(crate) fn parse_amount(field: &str, raw: &str) -> ApiResult<Money> {
    Money::parse(raw).map_err(|e| ApiError::validation(format!("{}: {}", field, e)))
}

/// Parses an optional opening balance. Blank means zero.
pub(crate) fn parse_opening_balance(raw: &str) -> ApiResult<Money> {
    if raw.trim().is_empty() {
        Ok(Money::zero())
    } else {
        parse_amount("opening balance", raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;

    #[test]
    fn test_parse_amount_names_the_field() {
        let err = parse_amount("selling price", "12.345").unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationError);
        assert!(err.message.starts_with("selling price:"));
    }

    #[test]
    fn test_blank_opening_balance_is_zero() {
        assert_eq!(parse_opening_balance("  ").unwrap(), Money::zero());
        assert_eq!(parse_opening_balance("1250").unwrap().minor(), 125_000);
    }
}
