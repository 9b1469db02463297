//! # Product Commands
//!
//! Product listing, CRUD and restock.
//!
//! ## Restock Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Goods arrive from the supplier                                        │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  restock_product({ productId, quantity: 20,                             │
//! │                    purchasePrice: "145.00", onCredit: true })           │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌───────────────────────────────────────────┐                          │
//! │  │  stock          += 20                     │                          │
//! │  │  purchase_price  = 145.00 (last wins)     │  one transaction         │
//! │  │  supplier.balance += 20 × 145.00          │  (only when on credit)   │
//! │  └───────────────────────────────────────────┘                          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::parse_amount;
use crate::error::{ApiError, ApiResult};
use crate::state::ShopState;
use dukaan_core::input::{NewProduct, ProductEdit, RestockRequest};
use dukaan_core::{report, Money, Product, RecordStore};

/// Product DTO for the rendering layer.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductDto {
    pub id: String,
    pub name: String,
    pub category: String,
    pub supplier_id: Option<String>,
    pub stock: i64,
    pub purchase_price: Money,
    pub selling_price: Money,
    /// stock × purchase price
    pub stock_value: Money,
    pub created_at: DateTime<Utc>,
}

impl From<Product> for ProductDto {
    fn from(p: Product) -> Self {
        ProductDto {
            stock_value: p.stock_value(),
            id: p.id,
            name: p.name,
            category: p.category,
            supplier_id: p.supplier_id,
            stock: p.stock,
            purchase_price: p.purchase_price,
            selling_price: p.selling_price,
            created_at: p.created_at,
        }
    }
}

impl From<&Product> for ProductDto {
    fn from(p: &Product) -> Self {
        ProductDto::from(p.clone())
    }
}

/// "Add product" form. Prices arrive as typed.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductForm {
    pub name: String,
    pub category: String,
    pub supplier_id: Option<String>,
    #[serde(default)]
    pub stock: i64,
    pub purchase_price: String,
    pub selling_price: String,
    /// Opening stock was bought on credit from the supplier.
    #[serde(default)]
    pub credit_purchase: bool,
}

impl ProductForm {
    fn into_input(self) -> ApiResult<(NewProduct, bool)> {
        let input = NewProduct {
            purchase_price: parse_amount("purchase price", &self.purchase_price)?,
            selling_price: parse_amount("selling price", &self.selling_price)?,
            name: self.name,
            category: self.category,
            supplier_id: self.supplier_id,
            stock: self.stock,
        };
        Ok((input, self.credit_purchase))
    }
}

/// "Edit product" form. Stock and purchase price are not editable here.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductEditForm {
    pub name: String,
    pub category: String,
    pub supplier_id: Option<String>,
    pub selling_price: String,
}

impl ProductEditForm {
    fn into_input(self) -> ApiResult<ProductEdit> {
        Ok(ProductEdit {
            selling_price: parse_amount("selling price", &self.selling_price)?,
            name: self.name,
            category: self.category,
            supplier_id: self.supplier_id,
        })
    }
}

/// "Restock" form.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RestockForm {
    pub product_id: String,
    pub quantity: i64,
    pub purchase_price: String,
    #[serde(default)]
    pub on_credit: bool,
}

impl RestockForm {
    fn into_input(self) -> ApiResult<RestockRequest> {
        Ok(RestockRequest {
            purchase_price: parse_amount("purchase price", &self.purchase_price)?,
            product_id: self.product_id,
            quantity: self.quantity,
            on_credit: self.on_credit,
        })
    }
}

/// Lists products newest first, filtered by name.
pub async fn list_products<S>(shop: &ShopState<S>, query: Option<String>) -> Vec<ProductDto>
where
    S: RecordStore,
    ApiError: From<S::Error>,
{
    let query = query.unwrap_or_default();
    debug!(query = %query, "list_products command");

    shop.read(|s| {
        report::search(&s.products, &query)
            .into_iter()
            .map(ProductDto::from)
            .collect()
    })
    .await
}

pub async fn get_product<S>(shop: &ShopState<S>, id: &str) -> ApiResult<ProductDto>
where
    S: RecordStore,
    ApiError: From<S::Error>,
{
    debug!(id = %id, "get_product command");
    shop.product(id)
        .await
        .map(ProductDto::from)
        .ok_or_else(|| ApiError::not_found("Product", id))
}

/// Adds a product. With `creditPurchase`, the supplier is charged for the
/// opening stock at purchase price.
pub async fn create_product<S>(shop: &ShopState<S>, form: ProductForm) -> ApiResult<ProductDto>
where
    S: RecordStore,
    ApiError: From<S::Error>,
{
    debug!(name = %form.name, "create_product command");
    let (input, credit_purchase) = form.into_input()?;
    let product = shop.create_product(input, credit_purchase).await?;
    Ok(product.into())
}

pub async fn update_product<S>(shop: &ShopState<S>, id: &str, form: ProductEditForm) -> ApiResult<ProductDto>
where
    S: RecordStore,
    ApiError: From<S::Error>,
{
    debug!(id = %id, "update_product command");
    let product = shop.update_product(id, form.into_input()?).await?;
    Ok(product.into())
}

pub async fn restock_product<S>(shop: &ShopState<S>, form: RestockForm) -> ApiResult<ProductDto>
where
    S: RecordStore,
    ApiError: From<S::Error>,
{
    debug!(product_id = %form.product_id, quantity = form.quantity, "restock_product command");
    let product = shop.restock_product(form.into_input()?).await?;
    Ok(product.into())
}

/// Deletes a product. Past sales keep their frozen copy of it.
pub async fn delete_product<S>(shop: &ShopState<S>, id: &str) -> ApiResult<()>
where
    S: RecordStore,
    ApiError: From<S::Error>,
{
    debug!(id = %id, "delete_product command");
    shop.delete_product(id).await
}
