//! # Product Repository
//!
//! Database operations for products.
//!
//! ## Key Operations
//! - Listing and lookup (reads, through the pool)
//! - Insert, detail edits, stock and purchase-price adjustments, delete
//!   (writes, inside a ledger transaction)

use chrono::{DateTime, Utc};
use sqlx::{SqliteConnection, SqlitePool};
use tracing::debug;

use crate::error::{DbError, DbResult};
use dukaan_core::{Money, Product};

/// Row shape of the `products` table.
#[derive(Debug, sqlx::FromRow)]
struct ProductRow {
    id: String,
    name: String,
    category: String,
    supplier_id: Option<String>,
    stock: i64,
    purchase_price: i64,
    selling_price: i64,
    created_at: DateTime<Utc>,
}

impl From<ProductRow> for Product {
    fn from(row: ProductRow) -> Self {
        Product {
            id: row.id,
            name: row.name,
            category: row.category,
            supplier_id: row.supplier_id,
            stock: row.stock,
            purchase_price: Money::from_minor(row.purchase_price),
            selling_price: Money::from_minor(row.selling_price),
            created_at: row.created_at,
        }
    }
}

const SELECT_PRODUCT: &str = r#"
    SELECT
        id,
        name,
        category,
        supplier_id,
        stock,
        purchase_price,
        selling_price,
        created_at
    FROM products
"#;

/// Repository for product reads.
///
/// ## Usage
/// ```rust,ignore
/// let repo = db.products();
/// let all = repo.list().await?;
/// let rice = repo.get_by_id("uuid-here").await?;
/// ```
#[derive(Debug, Clone)]
pub struct ProductRepository {
    pool: SqlitePool,
}

impl ProductRepository {
    /// Creates a new ProductRepository.
    pub fn new(pool: SqlitePool) -> Self {
        ProductRepository { pool }
    }

    /// Lists every product in insertion order.
    pub async fn list(&self) -> DbResult<Vec<Product>> {
        let rows: Vec<ProductRow> = sqlx::query_as(&format!("{} ORDER BY rowid", SELECT_PRODUCT))
            .fetch_all(&self.pool)
            .await?;

        debug!(count = rows.len(), "Loaded products");
        Ok(rows.into_iter().map(Product::from).collect())
    }

    /// Gets a product by its ID.
    ///
    /// ## Returns
    /// * `Ok(Some(Product))` - Product found
    /// * `Ok(None)` - Product not found
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Product>> {
        let row: Option<ProductRow> = sqlx::query_as(&format!("{} WHERE id = ?1", SELECT_PRODUCT))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.map(Product::from))
    }

    /// Lists the products bought from one supplier.
    pub async fn list_by_supplier(&self, supplier_id: &str) -> DbResult<Vec<Product>> {
        let rows: Vec<ProductRow> = sqlx::query_as(&format!(
            "{} WHERE supplier_id = ?1 ORDER BY rowid",
            SELECT_PRODUCT
        ))
        .bind(supplier_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(Product::from).collect())
    }

    /// Counts products (for diagnostics).
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM products")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}

// =============================================================================
// Transactional Writes
// =============================================================================

pub(crate) async fn insert(conn: &mut SqliteConnection, product: &Product) -> DbResult<()> {
    debug!(id = %product.id, name = %product.name, "Inserting product");

    sqlx::query(
        r#"
        INSERT INTO products (
            id, name, category, supplier_id, stock,
            purchase_price, selling_price, created_at
        ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
        "#,
    )
    .bind(&product.id)
    .bind(&product.name)
    .bind(&product.category)
    .bind(&product.supplier_id)
    .bind(product.stock)
    .bind(product.purchase_price.minor())
    .bind(product.selling_price.minor())
    .bind(product.created_at)
    .execute(&mut *conn)
    .await?;

    Ok(())
}

pub(crate) async fn update_details(
    conn: &mut SqliteConnection,
    id: &str,
    name: &str,
    category: &str,
    supplier_id: Option<&str>,
    selling_price: Money,
) -> DbResult<()> {
    debug!(id = %id, "Updating product details");

    let result = sqlx::query(
        r#"
        UPDATE products
        SET name = ?2, category = ?3, supplier_id = ?4, selling_price = ?5
        WHERE id = ?1
        "#,
    )
    .bind(id)
    .bind(name)
    .bind(category)
    .bind(supplier_id)
    .bind(selling_price.minor())
    .execute(&mut *conn)
    .await?;

    if result.rows_affected() == 0 {
        return Err(DbError::not_found("Product", id));
    }

    Ok(())
}

/// Adds `delta` to stock (negative for sales, positive for restocking).
///
/// The `CHECK (stock >= 0)` constraint turns an oversell into
/// [`DbError::InsufficientStock`], which aborts the surrounding transaction.
pub(crate) async fn adjust_stock(conn: &mut SqliteConnection, id: &str, delta: i64) -> DbResult<()> {
    debug!(id = %id, delta = %delta, "Adjusting stock");

    let result = sqlx::query("UPDATE products SET stock = stock + ?2 WHERE id = ?1")
        .bind(id)
        .bind(delta)
        .execute(&mut *conn)
        .await
        .map_err(|e| match DbError::from(e) {
            DbError::CheckViolation { .. } => DbError::InsufficientStock {
                product_id: id.to_string(),
                requested: -delta,
            },
            other => other,
        })?;

    if result.rows_affected() == 0 {
        return Err(DbError::not_found("Product", id));
    }

    Ok(())
}

/// Overwrites the purchase price (last price wins).
pub(crate) async fn set_purchase_price(conn: &mut SqliteConnection, id: &str, price: Money) -> DbResult<()> {
    debug!(id = %id, price = %price, "Setting purchase price");

    let result = sqlx::query("UPDATE products SET purchase_price = ?2 WHERE id = ?1")
        .bind(id)
        .bind(price.minor())
        .execute(&mut *conn)
        .await?;

    if result.rows_affected() == 0 {
        return Err(DbError::not_found("Product", id));
    }

    Ok(())
}

/// Hard delete. Sales keep their item snapshots.
pub(crate) async fn delete(conn: &mut SqliteConnection, id: &str) -> DbResult<()> {
    debug!(id = %id, "Deleting product");

    let result = sqlx::query("DELETE FROM products WHERE id = ?1")
        .bind(id)
        .execute(&mut *conn)
        .await?;

    if result.rows_affected() == 0 {
        return Err(DbError::not_found("Product", id));
    }

    Ok(())
}
