//! # Report Commands
//!
//! Dashboard totals and monthly performance, computed from the mirror.

use tracing::debug;

use crate::error::ApiError;
use crate::state::{ConfigState, ShopState};
use dukaan_core::report::{self, DashboardStats, MonthlyPerformance};
use dukaan_core::RecordStore;

/// Inventory value, profit, receivables and payables.
pub async fn get_dashboard<S>(shop: &ShopState<S>) -> DashboardStats
where
    S: RecordStore,
    ApiError: From<S::Error>,
{
    debug!("get_dashboard command");
    shop.dashboard().await
}

/// Sales and profit for the most recent months that had sales, oldest first.
pub async fn get_monthly_performance<S>(shop: &ShopState<S>, config: &ConfigState) -> Vec<MonthlyPerformance>
where
    S: RecordStore,
    ApiError: From<S::Error>,
{
    debug!(months = config.recent_months, "get_monthly_performance command");
    shop.read(|s| report::monthly_performance(&s.sales, config.recent_months))
        .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use dukaan_core::{Money, PaymentStatus, Sale, ShopSnapshot};
    use dukaan_db::MemoryStore;

    fn sale(id: &str, year: i32, month: u32, total: i64, profit: i64) -> Sale {
        Sale {
            id: id.to_string(),
            customer_id: None,
            items: Vec::new(),
            total_amount: Money::from_minor(total),
            total_cost: Money::from_minor(total - profit),
            profit: Money::from_minor(profit),
            date: Utc.with_ymd_and_hms(year, month, 10, 12, 0, 0).unwrap(),
            payment_status: PaymentStatus::Paid,
        }
    }

    #[tokio::test]
    async fn test_monthly_window_follows_config() {
        let snapshot = ShopSnapshot {
            sales: vec![
                sale("s1", 2025, 1, 1_000, 100),
                sale("s2", 2025, 2, 2_000, 200),
                sale("s3", 2025, 2, 3_000, 300),
                sale("s4", 2025, 4, 4_000, 400),
            ],
            ..ShopSnapshot::default()
        };
        let shop = ShopState::open(MemoryStore::with_snapshot(snapshot)).await.unwrap();
        let config = ConfigState {
            recent_months: 2,
            ..ConfigState::default()
        };

        let months = get_monthly_performance(&shop, &config).await;

        assert_eq!(months.len(), 2);
        assert_eq!(months[0].month, 2);
        assert_eq!(months[0].sales.minor(), 5_000);
        assert_eq!(months[1].month, 4);
        assert_eq!(months[1].profit.minor(), 400);
    }

    #[tokio::test]
    async fn test_dashboard_of_empty_shop() {
        let shop = ShopState::open(MemoryStore::new()).await.unwrap();
        let stats = get_dashboard(&shop).await;

        assert!(stats.inventory_value.is_zero());
        assert!(stats.receivables.is_zero());
        assert_eq!(stats.sale_count, 0);
    }
}
