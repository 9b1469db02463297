//! # Configuration State
//!
//! Application configuration loaded at startup.
//!
//! ## Configuration Sources (Priority Order)
//! 1. Environment variables (`DUKAAN_*`)
//! 2. Defaults (this file)
//!
//! Configuration is read-only after initialization, so no lock is needed.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use dukaan_core::Money;

/// Application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigState {
    /// Shop name (shown in the report header)
    pub shop_name: String,

    /// Currency symbol (for display)
    pub currency_symbol: String,

    /// Decimal places shown for amounts (0 to 2).
    /// Amounts are always stored in hundredths.
    pub currency_decimals: u8,

    /// SQLite database file
    pub database_path: PathBuf,

    /// How many months the performance report covers
    pub recent_months: usize,
}

impl Default for ConfigState {
    /// ## Default Values
    /// - Shop: "Dukaan"
    /// - Currency: Rs, 2 decimals
    /// - Database: `./dukaan.db`
    /// - Report window: 6 months
    fn default() -> Self {
        ConfigState {
            shop_name: "Dukaan".to_string(),
            currency_symbol: "Rs".to_string(),
            currency_decimals: 2,
            database_path: PathBuf::from("dukaan.db"),
            recent_months: 6,
        }
    }
}

impl ConfigState {
    /// Creates a ConfigState from environment variables and defaults.
    ///
    /// ## Environment Variables
    /// - `DUKAAN_SHOP_NAME`: Override shop name
    /// - `DUKAAN_CURRENCY_SYMBOL`: Override currency symbol
    /// - `DUKAAN_DB_PATH`: Database file path
    /// - `DUKAAN_RECENT_MONTHS`: Performance report window (e.g., "12")
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = ConfigState::default();

        if let Some(shop_name) = lookup("DUKAAN_SHOP_NAME") {
            config.shop_name = shop_name;
        }

        if let Some(symbol) = lookup("DUKAAN_CURRENCY_SYMBOL") {
            config.currency_symbol = symbol;
        }

        if let Some(path) = lookup("DUKAAN_DB_PATH") {
            config.database_path = PathBuf::from(path);
        }

        if let Some(months) = lookup("DUKAAN_RECENT_MONTHS") {
            match months.trim().parse::<usize>() {
                Ok(n) if n > 0 => config.recent_months = n,
                _ => tracing::warn!(value = %months, "Ignoring invalid DUKAAN_RECENT_MONTHS"),
            }
        }

        config
    }

    /// Formats an amount for display.
    ///
    /// ## Example
    /// ```rust,ignore
    /// let config = ConfigState::default();
    /// assert_eq!(config.format_currency(Money::from_minor(123_450)), "Rs 1234.50");
    /// ```
    pub fn format_currency(&self, amount: Money) -> String {
        let sign = if amount.is_negative() { "-" } else { "" };
        let major = amount.major().abs();
        let minor = amount.minor_part().abs();

        let number = match self.currency_decimals {
            0 => major.to_string(),
            1 => format!("{}.{}", major, minor / 10),
            _ => format!("{}.{:02}", major, minor),
        };

        format!("{}{} {}", sign, self.currency_symbol, number)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(vars: &[(&str, &str)]) -> ConfigState {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        ConfigState::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_format_currency_positive() {
        let config = ConfigState::default();
        assert_eq!(config.format_currency(Money::from_minor(123_450)), "Rs 1234.50");
        assert_eq!(config.format_currency(Money::from_minor(100)), "Rs 1.00");
        assert_eq!(config.format_currency(Money::from_minor(5)), "Rs 0.05");
        assert_eq!(config.format_currency(Money::zero()), "Rs 0.00");
    }

    #[test]
    fn test_format_currency_negative() {
        let config = ConfigState::default();
        assert_eq!(config.format_currency(Money::from_minor(-1_234)), "-Rs 12.34");
        assert_eq!(config.format_currency(Money::from_minor(-5)), "-Rs 0.05");
    }

    #[test]
    fn test_format_currency_whole_units() {
        let config = ConfigState {
            currency_decimals: 0,
            ..ConfigState::default()
        };
        assert_eq!(config.format_currency(Money::from_minor(123_499)), "Rs 1234");
    }

    #[test]
    fn test_env_overrides() {
        let config = config_from(&[
            ("DUKAAN_SHOP_NAME", "Rehman General Store"),
            ("DUKAAN_CURRENCY_SYMBOL", "PKR"),
            ("DUKAAN_DB_PATH", "/tmp/shop.db"),
            ("DUKAAN_RECENT_MONTHS", "12"),
        ]);

        assert_eq!(config.shop_name, "Rehman General Store");
        assert_eq!(config.currency_symbol, "PKR");
        assert_eq!(config.database_path, PathBuf::from("/tmp/shop.db"));
        assert_eq!(config.recent_months, 12);
    }

    #[test]
    fn test_invalid_months_keeps_default() {
        assert_eq!(config_from(&[("DUKAAN_RECENT_MONTHS", "0")]).recent_months, 6);
        assert_eq!(config_from(&[("DUKAAN_RECENT_MONTHS", "six")]).recent_months, 6);
    }
}
