//! # Sale Commands
//!
//! Checkout, payments and the sale list.
//!
//! ## Checkout Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Cart (CartState)                                                      │
//! │       │  to_checkout(customer, paid/unpaid)                             │
//! │       ▼                                                                 │
//! │  ShopState::checkout()                                                  │
//! │       │                                                                 │
//! │       ├── Err ──► cart kept, nothing recorded                           │
//! │       │                                                                 │
//! │       ▼ Ok                                                              │
//! │  sale recorded, stock reduced, unpaid total on the customer's balance  │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  cart cleared, SaleDto returned                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::{ApiError, ApiResult};
use crate::state::{Cart, CartState, ShopState};
use dukaan_core::input::PaymentRequest;
use dukaan_core::{report, Money, PartyType, PaymentStatus, RecordStore, Sale, SaleItem, ShopSnapshot};

/// One line of a sale as shown on the receipt.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaleLineDto {
    pub product_id: String,
    pub product_name: String,
    pub quantity: i64,
    pub selling_price: Money,
    pub line_total: Money,
}

impl From<&SaleItem> for SaleLineDto {
    fn from(item: &SaleItem) -> Self {
        SaleLineDto {
            product_id: item.product_id.clone(),
            product_name: item.product_name.clone(),
            quantity: item.quantity,
            selling_price: item.selling_price,
            line_total: item.line_total(),
        }
    }
}

/// Sale DTO with the customer's name resolved.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaleDto {
    pub id: String,
    pub customer_id: Option<String>,
    /// "Walk-in" when there is no customer or it was deleted.
    pub customer_name: String,
    pub items: Vec<SaleLineDto>,
    pub item_count: usize,
    pub total_amount: Money,
    pub total_cost: Money,
    pub profit: Money,
    pub date: DateTime<Utc>,
    pub payment_status: PaymentStatus,
}

impl SaleDto {
    pub fn new(snapshot: &ShopSnapshot, sale: &Sale) -> Self {
        SaleDto {
            id: sale.id.clone(),
            customer_id: sale.customer_id.clone(),
            customer_name: report::customer_name(snapshot, sale.customer_id.as_deref()).to_string(),
            items: sale.items.iter().map(SaleLineDto::from).collect(),
            item_count: sale.item_count(),
            total_amount: sale.total_amount,
            total_cost: sale.total_cost,
            profit: sale.profit,
            date: sale.date,
            payment_status: sale.payment_status,
        }
    }
}

/// Checkout choices made at the counter.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutForm {
    pub customer_id: Option<String>,
    pub payment_status: PaymentStatus,
}

/// Payment box: who, and the amount as typed.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentForm {
    pub party: PartyType,
    pub party_id: String,
    pub amount: String,
}

/// Balance after a payment.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentReceipt {
    pub party: PartyType,
    pub party_id: String,
    pub amount: Money,
    pub balance: Money,
}

/// All sales, newest first.
pub async fn list_sales<S>(shop: &ShopState<S>) -> Vec<SaleDto>
where
    S: RecordStore,
    ApiError: From<S::Error>,
{
    debug!("list_sales command");
    shop.read(|s| {
        report::newest_first(&s.sales)
            .into_iter()
            .map(|sale| SaleDto::new(s, sale))
            .collect()
    })
    .await
}

pub async fn get_sale<S>(shop: &ShopState<S>, id: &str) -> ApiResult<SaleDto>
where
    S: RecordStore,
    ApiError: From<S::Error>,
{
    shop.read(|s| {
        s.sale(id)
            .map(|sale| SaleDto::new(s, sale))
            .ok_or_else(|| ApiError::not_found("Sale", id))
    })
    .await
}

/// Sells the cart. The cart is cleared only when the sale is recorded.
pub async fn checkout<S>(shop: &ShopState<S>, cart: &CartState, form: CheckoutForm) -> ApiResult<SaleDto>
where
    S: RecordStore,
    ApiError: From<S::Error>,
{
    let req = cart.with_cart(|c| c.to_checkout(form.customer_id, form.payment_status));
    debug!(
        lines = req.items.len(),
        status = req.payment_status.as_str(),
        "checkout command"
    );

    let sale = shop.checkout(req).await?;
    cart.with_cart_mut(Cart::clear);

    info!(
        sale_id = %sale.id,
        total = %sale.total_amount,
        status = sale.payment_status.as_str(),
        "Sale recorded"
    );

    Ok(shop.read(|s| SaleDto::new(s, &sale)).await)
}

/// Records a payment from a customer or to a supplier.
///
/// An amount that is not a positive number is refused before anything is
/// written.
pub async fn receive_payment<S>(shop: &ShopState<S>, form: PaymentForm) -> ApiResult<PaymentReceipt>
where
    S: RecordStore,
    ApiError: From<S::Error>,
{
    debug!(party = ?form.party, party_id = %form.party_id, "receive_payment command");

    let req = PaymentRequest::from_form(form.party, &form.party_id, &form.amount)
        .map_err(|e| ApiError::payment(e.to_string()))?;
    let (party, party_id, amount) = (req.party, req.party_id.clone(), req.amount);

    shop.receive_payment(req).await?;

    let balance = match party {
        PartyType::Customer => shop.customer(&party_id).await.map(|c| c.balance),
        PartyType::Supplier => shop.supplier(&party_id).await.map(|s| s.balance),
    }
    .ok_or_else(|| ApiError::internal("Payment recorded for a missing party"))?;

    Ok(PaymentReceipt {
        party,
        party_id,
        amount,
        balance,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::customer::{create_customer, CustomerForm};
    use crate::error::ErrorCode;
    use dukaan_core::input::NewProduct;
    use dukaan_db::MemoryStore;

    async fn shop_with_rice() -> (ShopState<MemoryStore>, dukaan_core::Product) {
        let shop = ShopState::open(MemoryStore::new()).await.unwrap();
        let product = shop
            .create_product(
                NewProduct {
                    name: "Basmati Rice 5kg".to_string(),
                    category: "Grocery".to_string(),
                    supplier_id: None,
                    stock: 5,
                    purchase_price: Money::from_minor(140_000),
                    selling_price: Money::from_minor(165_000),
                },
                false,
            )
            .await
            .unwrap();
        (shop, product)
    }

    fn customer_form(name: &str) -> CustomerForm {
        CustomerForm {
            name: name.to_string(),
            phone: String::new(),
            address: String::new(),
            opening_balance: String::new(),
        }
    }

    #[tokio::test]
    async fn test_paid_checkout_clears_cart() {
        let (shop, rice) = shop_with_rice().await;
        let cart = CartState::new();
        cart.with_cart_mut(|c| c.add_item(&rice)).unwrap();
        cart.with_cart_mut(|c| c.add_item(&rice)).unwrap();

        let sale = checkout(
            &shop,
            &cart,
            CheckoutForm {
                customer_id: None,
                payment_status: PaymentStatus::Paid,
            },
        )
        .await
        .unwrap();

        assert_eq!(sale.customer_name, "Walk-in");
        assert_eq!(sale.total_amount.minor(), 330_000);
        assert_eq!(sale.profit.minor(), 50_000);
        assert_eq!(sale.items[0].line_total.minor(), 330_000);
        assert!(cart.with_cart(Cart::is_empty));
        assert_eq!(shop.product(&rice.id).await.unwrap().stock, 3);
    }

    #[tokio::test]
    async fn test_failed_checkout_keeps_cart() {
        let (shop, rice) = shop_with_rice().await;
        let cart = CartState::new();
        cart.with_cart_mut(|c| c.add_item(&rice)).unwrap();

        let err = checkout(
            &shop,
            &cart,
            CheckoutForm {
                customer_id: None,
                payment_status: PaymentStatus::Unpaid,
            },
        )
        .await
        .unwrap_err();

        assert_eq!(err.code, ErrorCode::BusinessLogic);
        assert_eq!(cart.with_cart(Cart::item_count), 1);
        assert!(list_sales(&shop).await.is_empty());
    }

    #[tokio::test]
    async fn test_empty_cart_checkout() {
        let (shop, _) = shop_with_rice().await;
        let err = checkout(
            &shop,
            &CartState::new(),
            CheckoutForm {
                customer_id: None,
                payment_status: PaymentStatus::Paid,
            },
        )
        .await
        .unwrap_err();

        assert_eq!(err.code, ErrorCode::CartError);
    }

    #[tokio::test]
    async fn test_udhaar_and_payment_receipt() {
        let (shop, rice) = shop_with_rice().await;
        let customer = create_customer(&shop, customer_form("Bilal")).await.unwrap();
        let cart = CartState::new();
        cart.with_cart_mut(|c| c.add_item(&rice)).unwrap();

        let sale = checkout(
            &shop,
            &cart,
            CheckoutForm {
                customer_id: Some(customer.id.clone()),
                payment_status: PaymentStatus::Unpaid,
            },
        )
        .await
        .unwrap();
        assert_eq!(sale.customer_name, "Bilal");

        let receipt = receive_payment(
            &shop,
            PaymentForm {
                party: PartyType::Customer,
                party_id: customer.id.clone(),
                amount: "1000".to_string(),
            },
        )
        .await
        .unwrap();

        assert_eq!(receipt.amount.minor(), 100_000);
        assert_eq!(receipt.balance.minor(), 65_000);
    }

    #[tokio::test]
    async fn test_bad_payment_amount_changes_nothing() {
        let (shop, _) = shop_with_rice().await;
        let customer = create_customer(&shop, customer_form("Usman")).await.unwrap();
        let before = shop.snapshot().await;

        for amount in ["abc", "0", "-50", ""] {
            let err = receive_payment(
                &shop,
                PaymentForm {
                    party: PartyType::Customer,
                    party_id: customer.id.clone(),
                    amount: amount.to_string(),
                },
            )
            .await
            .unwrap_err();
            assert_eq!(err.code, ErrorCode::PaymentError);
        }

        assert_eq!(shop.snapshot().await, before);
    }

    #[tokio::test]
    async fn test_payment_to_unknown_supplier() {
        let (shop, _) = shop_with_rice().await;
        let err = receive_payment(
            &shop,
            PaymentForm {
                party: PartyType::Supplier,
                party_id: "gone".to_string(),
                amount: "10".to_string(),
            },
        )
        .await
        .unwrap_err();

        assert_eq!(err.code, ErrorCode::NotFound);
    }
}
