//! # Sale Repository
//!
//! Database operations for sales.
//!
//! ## Storage Layout
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  sales                                                                  │
//! │  ─────────────────────────────────────────────────────────────────────  │
//! │  id | customer_id | items_json | total_amount | total_cost | profit |  │
//! │     date | payment_status                                               │
//! │                                                                         │
//! │  items_json = [{"product_id":..,"product_name":..,"quantity":..,       │
//! │                 "purchase_price":..,"selling_price":..}, ...]           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Sales are insert-only: there is no update or delete.

use chrono::{DateTime, Utc};
use sqlx::{SqliteConnection, SqlitePool};
use tracing::debug;

use crate::error::DbResult;
use dukaan_core::{Money, PaymentStatus, Sale, SaleItem};

#[derive(Debug, sqlx::FromRow)]
struct SaleRow {
    id: String,
    customer_id: Option<String>,
    items_json: String,
    total_amount: i64,
    total_cost: i64,
    profit: i64,
    date: DateTime<Utc>,
    payment_status: PaymentStatus,
}

impl TryFrom<SaleRow> for Sale {
    type Error = crate::DbError;

    fn try_from(row: SaleRow) -> Result<Self, Self::Error> {
        let items: Vec<SaleItem> = serde_json::from_str(&row.items_json)?;

        Ok(Sale {
            id: row.id,
            customer_id: row.customer_id,
            items,
            total_amount: Money::from_minor(row.total_amount),
            total_cost: Money::from_minor(row.total_cost),
            profit: Money::from_minor(row.profit),
            date: row.date,
            payment_status: row.payment_status,
        })
    }
}

const SELECT_SALE: &str = r#"
    SELECT
        id,
        customer_id,
        items_json,
        total_amount,
        total_cost,
        profit,
        date,
        payment_status
    FROM sales
"#;

/// Repository for sale reads.
#[derive(Debug, Clone)]
pub struct SaleRepository {
    pool: SqlitePool,
}

impl SaleRepository {
    /// Creates a new SaleRepository.
    pub fn new(pool: SqlitePool) -> Self {
        SaleRepository { pool }
    }

    /// Lists every sale in insertion order.
    pub async fn list(&self) -> DbResult<Vec<Sale>> {
        let rows: Vec<SaleRow> = sqlx::query_as(&format!("{} ORDER BY rowid", SELECT_SALE))
            .fetch_all(&self.pool)
            .await?;

        debug!(count = rows.len(), "Loaded sales");
        rows.into_iter().map(Sale::try_from).collect()
    }

    /// Gets a sale by ID, items included.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Sale>> {
        let row: Option<SaleRow> = sqlx::query_as(&format!("{} WHERE id = ?1", SELECT_SALE))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        row.map(Sale::try_from).transpose()
    }

    /// A customer's sales in insertion order.
    pub async fn list_for_customer(&self, customer_id: &str) -> DbResult<Vec<Sale>> {
        let rows: Vec<SaleRow> = sqlx::query_as(&format!(
            "{} WHERE customer_id = ?1 ORDER BY rowid",
            SELECT_SALE
        ))
        .bind(customer_id)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(Sale::try_from).collect()
    }

    /// Σ profit over all sales.
    pub async fn total_profit(&self) -> DbResult<Money> {
        let total: i64 = sqlx::query_scalar("SELECT COALESCE(SUM(profit), 0) FROM sales")
            .fetch_one(&self.pool)
            .await?;

        Ok(Money::from_minor(total))
    }
}

// =============================================================================
// Transactional Writes
// =============================================================================

pub(crate) async fn insert(conn: &mut SqliteConnection, sale: &Sale) -> DbResult<()> {
    debug!(
        id = %sale.id,
        items = sale.items.len(),
        total = %sale.total_amount,
        status = sale.payment_status.as_str(),
        "Inserting sale"
    );

    let items_json = serde_json::to_string(&sale.items)?;

    sqlx::query(
        r#"
        INSERT INTO sales (
            id, customer_id, items_json, total_amount, total_cost,
            profit, date, payment_status
        ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
        "#,
    )
    .bind(&sale.id)
    .bind(&sale.customer_id)
    .bind(items_json)
    .bind(sale.total_amount.minor())
    .bind(sale.total_cost.minor())
    .bind(sale.profit.minor())
    .bind(sale.date)
    .bind(sale.payment_status)
    .execute(&mut *conn)
    .await?;

    Ok(())
}
