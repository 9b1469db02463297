//! # Supplier Commands
//!
//! Supplier CRUD. A supplier's balance is what the shop owes them; it moves
//! only through credit purchases and payments made.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::parse_opening_balance;
use super::product::ProductDto;
use crate::error::{ApiError, ApiResult};
use crate::state::ShopState;
use dukaan_core::input::{NewSupplier, SupplierEdit};
use dukaan_core::{report, Money, RecordStore, Supplier};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SupplierDto {
    pub id: String,
    pub name: String,
    pub contact_person: String,
    pub phone: String,
    pub balance: Money,
    pub created_at: DateTime<Utc>,
}

impl From<&Supplier> for SupplierDto {
    fn from(s: &Supplier) -> Self {
        SupplierDto {
            id: s.id.clone(),
            name: s.name.clone(),
            contact_person: s.contact_person.clone(),
            phone: s.phone.clone(),
            balance: s.balance,
            created_at: s.created_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SupplierForm {
    pub name: String,
    #[serde(default)]
    pub contact_person: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub opening_balance: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SupplierEditForm {
    pub name: String,
    #[serde(default)]
    pub contact_person: String,
    #[serde(default)]
    pub phone: String,
}

pub async fn list_suppliers<S>(shop: &ShopState<S>, query: Option<String>) -> Vec<SupplierDto>
where
    S: RecordStore,
    ApiError: From<S::Error>,
{
    let query = query.unwrap_or_default();
    debug!(query = %query, "list_suppliers command");

    shop.read(|s| {
        report::search(&s.suppliers, &query)
            .into_iter()
            .map(SupplierDto::from)
            .collect()
    })
    .await
}

pub async fn get_supplier<S>(shop: &ShopState<S>, id: &str) -> ApiResult<SupplierDto>
where
    S: RecordStore,
    ApiError: From<S::Error>,
{
    shop.supplier(id)
        .await
        .map(|s| SupplierDto::from(&s))
        .ok_or_else(|| ApiError::not_found("Supplier", id))
}

pub async fn create_supplier<S>(shop: &ShopState<S>, form: SupplierForm) -> ApiResult<SupplierDto>
where
    S: RecordStore,
    ApiError: From<S::Error>,
{
    debug!(name = %form.name, "create_supplier command");
    let input = NewSupplier {
        opening_balance: parse_opening_balance(&form.opening_balance)?,
        name: form.name,
        contact_person: form.contact_person,
        phone: form.phone,
    };
    let supplier = shop.create_supplier(input).await?;
    Ok(SupplierDto::from(&supplier))
}

pub async fn update_supplier<S>(shop: &ShopState<S>, id: &str, form: SupplierEditForm) -> ApiResult<SupplierDto>
where
    S: RecordStore,
    ApiError: From<S::Error>,
{
    debug!(id = %id, "update_supplier command");
    let edit = SupplierEdit {
        name: form.name,
        contact_person: form.contact_person,
        phone: form.phone,
    };
    let supplier = shop.update_supplier(id, edit).await?;
    Ok(SupplierDto::from(&supplier))
}

/// Deletes a supplier. Products keep pointing at the old id.
pub async fn delete_supplier<S>(shop: &ShopState<S>, id: &str) -> ApiResult<()>
where
    S: RecordStore,
    ApiError: From<S::Error>,
{
    debug!(id = %id, "delete_supplier command");
    shop.delete_supplier(id).await
}

/// Products bought from a supplier, newest first.
pub async fn get_supplier_products<S>(shop: &ShopState<S>, id: &str) -> Vec<ProductDto>
where
    S: RecordStore,
    ApiError: From<S::Error>,
{
    shop.read(|s| {
        report::newest_first(&s.products)
            .into_iter()
            .filter(|p| p.supplier_id.as_deref() == Some(id))
            .map(ProductDto::from)
            .collect()
    })
    .await
}
