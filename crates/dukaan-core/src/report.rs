//! # Reports
//!
//! Read-only aggregates over a [`ShopSnapshot`]: dashboard totals, monthly
//! performance, customer history, list ordering and name search.
//!
//! Nothing here mutates records. Currency formatting is left to the caller.

use std::collections::BTreeMap;

use chrono::{DateTime, Datelike, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::money::Money;
use crate::snapshot::ShopSnapshot;
use crate::types::{Customer, Product, Sale, Supplier};
use crate::WALK_IN_LABEL;

// =============================================================================
// Dashboard
// =============================================================================

/// Headline numbers for the dashboard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct DashboardStats {
    /// Σ stock × purchase_price over all products.
    pub inventory_value: Money,
    /// Σ profit over all sales.
    pub total_profit: Money,
    /// Σ customer balances (what customers owe the shop).
    pub receivables: Money,
    /// Σ supplier balances (what the shop owes suppliers).
    pub payables: Money,
    pub product_count: usize,
    pub sale_count: usize,
}

impl DashboardStats {
    pub fn compute(snapshot: &ShopSnapshot) -> Self {
        DashboardStats {
            inventory_value: snapshot.products.iter().map(Product::stock_value).sum(),
            total_profit: snapshot.sales.iter().map(|s| s.profit).sum(),
            receivables: snapshot.customers.iter().map(|c| c.balance).sum(),
            payables: snapshot.suppliers.iter().map(|s| s.balance).sum(),
            product_count: snapshot.products.len(),
            sale_count: snapshot.sales.len(),
        }
    }
}

// =============================================================================
// Monthly Performance
// =============================================================================

/// Sales and profit for one calendar month.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct MonthlyPerformance {
    /// Short label, e.g. "Mar 25".
    pub label: String,
    pub year: i32,
    pub month: u32,
    pub sales: Money,
    pub profit: Money,
}

/// Groups sales by calendar month (UTC) and returns the latest `months`
/// months that have sales, oldest first.
///
/// Months without sales are not filled in.
pub fn monthly_performance(sales: &[Sale], months: usize) -> Vec<MonthlyPerformance> {
    let mut buckets: BTreeMap<(i32, u32), (Money, Money)> = BTreeMap::new();

    for sale in sales {
        let entry = buckets
            .entry((sale.date.year(), sale.date.month()))
            .or_insert((Money::zero(), Money::zero()));
        entry.0 += sale.total_amount;
        entry.1 += sale.profit;
    }

    let skip = buckets.len().saturating_sub(months);

    buckets
        .into_iter()
        .skip(skip)
        .map(|((year, month), (sales, profit))| MonthlyPerformance {
            label: month_label(year, month),
            year,
            month,
            sales,
            profit,
        })
        .collect()
}

fn month_label(year: i32, month: u32) -> String {
    chrono::NaiveDate::from_ymd_opt(year, month, 1)
        .map(|d| d.format("%b %y").to_string())
        .unwrap_or_else(|| format!("{:02}/{}", month, year))
}

// =============================================================================
// Ordering
// =============================================================================

/// Records that carry the timestamp lists are ordered by.
pub trait Dated {
    fn dated_at(&self) -> DateTime<Utc>;
}

impl Dated for Product {
    fn dated_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

impl Dated for Customer {
    fn dated_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

impl Dated for Supplier {
    fn dated_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

impl Dated for Sale {
    fn dated_at(&self) -> DateTime<Utc> {
        self.date
    }
}

/// Newest first. Ties keep insertion order.
pub fn newest_first<T: Dated>(records: &[T]) -> Vec<&T> {
    let mut sorted: Vec<&T> = records.iter().collect();
    sorted.sort_by(|a, b| b.dated_at().cmp(&a.dated_at()));
    sorted
}

// =============================================================================
// Search
// =============================================================================

/// Records with a display name.
pub trait Named {
    fn display_name(&self) -> &str;
}

impl Named for Product {
    fn display_name(&self) -> &str {
        &self.name
    }
}

impl Named for Customer {
    fn display_name(&self) -> &str {
        &self.name
    }
}

impl Named for Supplier {
    fn display_name(&self) -> &str {
        &self.name
    }
}

/// Case-insensitive substring match on the name. A blank query matches all.
pub fn name_matches<T: Named>(record: &T, query: &str) -> bool {
    let query = query.trim();
    query.is_empty()
        || record
            .display_name()
            .to_lowercase()
            .contains(&query.to_lowercase())
}

/// Filters by name, newest first.
pub fn search<'a, T: Named + Dated>(records: &'a [T], query: &str) -> Vec<&'a T> {
    newest_first(records)
        .into_iter()
        .filter(|r| name_matches(*r, query))
        .collect()
}

/// Products the counter may sell: stock above zero, matching `query`.
pub fn sellable_products<'a>(products: &'a [Product], query: &str) -> Vec<&'a Product> {
    search(products, query)
        .into_iter()
        .filter(|p| p.stock > 0)
        .collect()
}

// =============================================================================
// Sale Details
// =============================================================================

/// A customer's sales, newest first.
pub fn customer_history<'a>(sales: &'a [Sale], customer_id: &str) -> Vec<&'a Sale> {
    newest_first(sales)
        .into_iter()
        .filter(|s| s.customer_id.as_deref() == Some(customer_id))
        .collect()
}

/// Name shown for a sale's customer: "Walk-in" for none or an unknown id.
pub fn customer_name<'a>(snapshot: &'a ShopSnapshot, customer_id: Option<&str>) -> &'a str {
    customer_id
        .and_then(|id| snapshot.customer(id))
        .map(|c| c.name.as_str())
        .unwrap_or(WALK_IN_LABEL)
}

// =============================================================================
// Unit Tests
// =============================================================================
