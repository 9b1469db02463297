//! # Supplier Repository
//!
//! Database operations for suppliers and what the shop owes them.

use chrono::{DateTime, Utc};
use sqlx::{SqliteConnection, SqlitePool};
use tracing::debug;

use crate::error::{DbError, DbResult};
use dukaan_core::{Money, Supplier};

#[derive(Debug, sqlx::FromRow)]
struct SupplierRow {
    id: String,
    name: String,
    contact_person: String,
    phone: String,
    balance: i64,
    created_at: DateTime<Utc>,
}

impl From<SupplierRow> for Supplier {
    fn from(row: SupplierRow) -> Self {
        Supplier {
            id: row.id,
            name: row.name,
            contact_person: row.contact_person,
            phone: row.phone,
            balance: Money::from_minor(row.balance),
            created_at: row.created_at,
        }
    }
}

const SELECT_SUPPLIER: &str = r#"
    SELECT id, name, contact_person, phone, balance, created_at
    FROM suppliers
"#;

/// Repository for supplier reads.
#[derive(Debug, Clone)]
pub struct SupplierRepository {
    pool: SqlitePool,
}

impl SupplierRepository {
    pub fn new(pool: SqlitePool) -> Self {
        SupplierRepository { pool }
    }

    /// Lists every supplier in insertion order.
    pub async fn list(&self) -> DbResult<Vec<Supplier>> {
        let rows: Vec<SupplierRow> = sqlx::query_as(&format!("{} ORDER BY rowid", SELECT_SUPPLIER))
            .fetch_all(&self.pool)
            .await?;

        debug!(count = rows.len(), "Loaded suppliers");
        Ok(rows.into_iter().map(Supplier::from).collect())
    }

    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Supplier>> {
        let row: Option<SupplierRow> = sqlx::query_as(&format!("{} WHERE id = ?1", SELECT_SUPPLIER))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.map(Supplier::from))
    }

    /// Σ balances: what the shop owes its suppliers.
    pub async fn total_payables(&self) -> DbResult<Money> {
        let total: i64 = sqlx::query_scalar("SELECT COALESCE(SUM(balance), 0) FROM suppliers")
            .fetch_one(&self.pool)
            .await?;

        Ok(Money::from_minor(total))
    }
}

// =============================================================================
// Transactional Writes
// =============================================================================

pub(crate) async fn insert(conn: &mut SqliteConnection, supplier: &Supplier) -> DbResult<()> {
    debug!(id = %supplier.id, name = %supplier.name, "Inserting supplier");

    sqlx::query(
        r#"
        INSERT INTO suppliers (id, name, contact_person, phone, balance, created_at)
        VALUES (?1, ?2, ?3, ?4, ?5, ?6)
        "#,
    )
    .bind(&supplier.id)
    .bind(&supplier.name)
    .bind(&supplier.contact_person)
    .bind(&supplier.phone)
    .bind(supplier.balance.minor())
    .bind(supplier.created_at)
    .execute(&mut *conn)
    .await?;

    Ok(())
}

pub(crate) async fn update_details(
    conn: &mut SqliteConnection,
    id: &str,
    name: &str,
    contact_person: &str,
    phone: &str,
) -> DbResult<()> {
    debug!(id = %id, "Updating supplier details");

    let result =
        sqlx::query("UPDATE suppliers SET name = ?2, contact_person = ?3, phone = ?4 WHERE id = ?1")
            .bind(id)
            .bind(name)
            .bind(contact_person)
            .bind(phone)
            .execute(&mut *conn)
            .await?;

    if result.rows_affected() == 0 {
        return Err(DbError::not_found("Supplier", id));
    }

    Ok(())
}

pub(crate) async fn adjust_balance(conn: &mut SqliteConnection, id: &str, delta: Money) -> DbResult<()> {
    debug!(id = %id, delta = %delta, "Adjusting supplier balance");

    let result = sqlx::query("UPDATE suppliers SET balance = balance + ?2 WHERE id = ?1")
        .bind(id)
        .bind(delta.minor())
        .execute(&mut *conn)
        .await?;

    if result.rows_affected() == 0 {
        return Err(DbError::not_found("Supplier", id));
    }

    Ok(())
}

/// Products keep their `supplier_id`; no cascade.
pub(crate) async fn delete(conn: &mut SqliteConnection, id: &str) -> DbResult<()> {
    debug!(id = %id, "Deleting supplier");

    let result = sqlx::query("DELETE FROM suppliers WHERE id = ?1")
        .bind(id)
        .execute(&mut *conn)
        .await?;

    if result.rows_affected() == 0 {
        return Err(DbError::not_found("Supplier", id));
    }

    Ok(())
}
