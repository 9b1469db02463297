//! # Customer Commands
//!
//! Customer CRUD and purchase history.
//!
//! A customer's balance is what they owe the shop (udhaar). It starts at the
//! opening balance and afterwards only moves through unpaid checkouts and
//! received payments; the edit form cannot touch it.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::parse_opening_balance;
use super::sale::SaleDto;
use crate::error::{ApiError, ApiResult};
use crate::state::ShopState;
use dukaan_core::input::{CustomerEdit, NewCustomer};
use dukaan_core::{report, Customer, Money, RecordStore};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerDto {
    pub id: String,
    pub name: String,
    pub phone: String,
    pub address: String,
    pub balance: Money,
    pub created_at: DateTime<Utc>,
}

impl From<&Customer> for CustomerDto {
    fn from(c: &Customer) -> Self {
        CustomerDto {
            id: c.id.clone(),
            name: c.name.clone(),
            phone: c.phone.clone(),
            address: c.address.clone(),
            balance: c.balance,
            created_at: c.created_at,
        }
    }
}

/// "Add customer" form.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerForm {
    pub name: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub address: String,
    /// Blank for none.
    #[serde(default)]
    pub opening_balance: String,
}

/// "Edit customer" form.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerEditForm {
    pub name: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub address: String,
}

/// Lists customers newest first, filtered by name.
pub async fn list_customers<S>(shop: &ShopState<S>, query: Option<String>) -> Vec<CustomerDto>
where
    S: RecordStore,
    ApiError: From<S::Error>,
{
    let query = query.unwrap_or_default();
    debug!(query = %query, "list_customers command");

    shop.read(|s| {
        report::search(&s.customers, &query)
            .into_iter()
            .map(CustomerDto::from)
            .collect()
    })
    .await
}

pub async fn get_customer<S>(shop: &ShopState<S>, id: &str) -> ApiResult<CustomerDto>
where
    S: RecordStore,
    ApiError: From<S::Error>,
{
    shop.customer(id)
        .await
        .map(|c| CustomerDto::from(&c))
        .ok_or_else(|| ApiError::not_found("Customer", id))
}

pub async fn create_customer<S>(shop: &ShopState<S>, form: CustomerForm) -> ApiResult<CustomerDto>
where
    S: RecordStore,
    ApiError: From<S::Error>,
{
    debug!(name = %form.name, "create_customer command");
    let input = NewCustomer {
        opening_balance: parse_opening_balance(&form.opening_balance)?,
        name: form.name,
        phone: form.phone,
        address: form.address,
    };
    let customer = shop.create_customer(input).await?;
    Ok(CustomerDto::from(&customer))
}

pub async fn update_customer<S>(shop: &ShopState<S>, id: &str, form: CustomerEditForm) -> ApiResult<CustomerDto>
where
    S: RecordStore,
    ApiError: From<S::Error>,
{
    debug!(id = %id, "update_customer command");
    let edit = CustomerEdit {
        name: form.name,
        phone: form.phone,
        address: form.address,
    };
    let customer = shop.update_customer(id, edit).await?;
    Ok(CustomerDto::from(&customer))
}

/// Deletes a customer. Their sales stay, shown as walk-in.
pub async fn delete_customer<S>(shop: &ShopState<S>, id: &str) -> ApiResult<()>
where
    S: RecordStore,
    ApiError: From<S::Error>,
{
    debug!(id = %id, "delete_customer command");
    shop.delete_customer(id).await
}

/// A customer's sales, newest first.
pub async fn get_customer_history<S>(shop: &ShopState<S>, id: &str) -> ApiResult<Vec<SaleDto>>
where
    S: RecordStore,
    ApiError: From<S::Error>,
{
    debug!(id = %id, "get_customer_history command");
    shop.read(|s| {
        if s.customer(id).is_none() {
            return Err(ApiError::not_found("Customer", id));
        }
        Ok(report::customer_history(&s.sales, id)
            .into_iter()
            .map(|sale| SaleDto::new(s, sale))
            .collect())
    })
    .await
}
