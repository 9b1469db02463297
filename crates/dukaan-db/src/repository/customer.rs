//! # Customer Repository
//!
//! Database operations for customers and their udhaar balances.

use chrono::{DateTime, Utc};
use sqlx::{SqliteConnection, SqlitePool};
use tracing::debug;

use crate::error::{DbError, DbResult};
use dukaan_core::{Customer, Money};

#[derive(Debug, sqlx::FromRow)]
struct CustomerRow {
    id: String,
    name: String,
    phone: String,
    address: String,
    balance: i64,
    created_at: DateTime<Utc>,
}

impl From<CustomerRow> for Customer {
    fn from(row: CustomerRow) -> Self {
        Customer {
            id: row.id,
            name: row.name,
            phone: row.phone,
            address: row.address,
            balance: Money::from_minor(row.balance),
            created_at: row.created_at,
        }
    }
}

const SELECT_CUSTOMER: &str = r#"
    SELECT id, name, phone, address, balance, created_at
    FROM customers
"#;

/// Repository for customer reads.
#[derive(Debug, Clone)]
pub struct CustomerRepository {
    pool: SqlitePool,
}

impl CustomerRepository {
    pub fn new(pool: SqlitePool) -> Self {
        CustomerRepository { pool }
    }

    /// Lists every customer in insertion order.
    pub async fn list(&self) -> DbResult<Vec<Customer>> {
        let rows: Vec<CustomerRow> = sqlx::query_as(&format!("{} ORDER BY rowid", SELECT_CUSTOMER))
            .fetch_all(&self.pool)
            .await?;

        debug!(count = rows.len(), "Loaded customers");
        Ok(rows.into_iter().map(Customer::from).collect())
    }

    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Customer>> {
        let row: Option<CustomerRow> = sqlx::query_as(&format!("{} WHERE id = ?1", SELECT_CUSTOMER))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.map(Customer::from))
    }

    /// Σ balances: what customers owe the shop.
    pub async fn total_receivables(&self) -> DbResult<Money> {
        let total: i64 = sqlx::query_scalar("SELECT COALESCE(SUM(balance), 0) FROM customers")
            .fetch_one(&self.pool)
            .await?;

        Ok(Money::from_minor(total))
    }
}

// =============================================================================
// Transactional Writes
// =============================================================================

pub(crate) async fn insert(conn: &mut SqliteConnection, customer: &Customer) -> DbResult<()> {
    debug!(id = %customer.id, name = %customer.name, "Inserting customer");

    sqlx::query(
        r#"
        INSERT INTO customers (id, name, phone, address, balance, created_at)
        VALUES (?1, ?2, ?3, ?4, ?5, ?6)
        "#,
    )
    .bind(&customer.id)
    .bind(&customer.name)
    .bind(&customer.phone)
    .bind(&customer.address)
    .bind(customer.balance.minor())
    .bind(customer.created_at)
    .execute(&mut *conn)
    .await?;

    Ok(())
}

pub(crate) async fn update_details(
    conn: &mut SqliteConnection,
    id: &str,
    name: &str,
    phone: &str,
    address: &str,
) -> DbResult<()> {
    debug!(id = %id, "Updating customer details");

    let result = sqlx::query("UPDATE customers SET name = ?2, phone = ?3, address = ?4 WHERE id = ?1")
        .bind(id)
        .bind(name)
        .bind(phone)
        .bind(address)
        .execute(&mut *conn)
        .await?;

    if result.rows_affected() == 0 {
        return Err(DbError::not_found("Customer", id));
    }

    Ok(())
}

/// Adds `delta` to the balance. No floor: overpayment leaves it negative.
pub(crate) async fn adjust_balance(conn: &mut SqliteConnection, id: &str, delta: Money) -> DbResult<()> {
    debug!(id = %id, delta = %delta, "Adjusting customer balance");

    let result = sqlx::query("UPDATE customers SET balance = balance + ?2 WHERE id = ?1")
        .bind(id)
        .bind(delta.minor())
        .execute(&mut *conn)
        .await?;

    if result.rows_affected() == 0 {
        return Err(DbError::not_found("Customer", id));
    }

    Ok(())
}

pub(crate) async fn delete(conn: &mut SqliteConnection, id: &str) -> DbResult<()> {
    debug!(id = %id, "Deleting customer");

    let result = sqlx::query("DELETE FROM customers WHERE id = ?1")
        .bind(id)
        .execute(&mut *conn)
        .await?;

    if result.rows_affected() == 0 {
        return Err(DbError::not_found("Customer", id));
    }

    Ok(())
}
