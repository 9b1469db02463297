//! # Dukaan Shop
//!
//! Application layer for the Dukaan shop ledger: state, commands and startup.
//!
//! ## Module Organization
//! ```text
//! dukaan_shop/
//! ├── lib.rs          ◄─── You are here (logging & startup)
//! ├── state/
//! │   ├── mod.rs      ◄─── State type exports
//! │   ├── shop.rs     ◄─── Record store + mirror, the only writer
//! │   ├── cart.rs     ◄─── Cart state management
//! │   └── config.rs   ◄─── Configuration state
//! ├── commands/
//! │   ├── mod.rs      ◄─── Command exports
//! │   ├── product.rs  ◄─── Product CRUD and restock
//! │   ├── customer.rs ◄─── Customer CRUD and history
//! │   ├── supplier.rs ◄─── Supplier CRUD
//! │   ├── cart.rs     ◄─── Cart manipulation
//! │   ├── sale.rs     ◄─── Checkout and payments
//! │   ├── report.rs   ◄─── Dashboard and monthly performance
//! │   └── config.rs   ◄─── Configuration retrieval
//! └── error.rs        ◄─── API error type for commands
//! ```
//!
//! ## Startup Sequence
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  1. init_tracing()        RUST_LOG or "info,dukaan=debug,sqlx=warn"     │
//! │  2. ConfigState::from_env()                                             │
//! │  3. open_shop(&config)    SQLite (WAL) + migrations, then load mirror   │
//! │  4. CartState::new()                                                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

pub mod commands;
pub mod error;
pub mod state;

use tracing::info;
use tracing_subscriber::EnvFilter;

use dukaan_db::{Database, DbConfig};
use error::ApiResult;
use state::{ConfigState, ShopState};

/// Initializes the tracing subscriber for structured logging.
///
/// ## Log Levels
/// - `RUST_LOG=debug` - Show debug messages
/// - `RUST_LOG=dukaan_db=trace` - Show trace for the record store only
/// - Default: INFO, DEBUG for dukaan crates
///
/// Calling it twice is harmless; the second call keeps the first subscriber.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,dukaan=debug,sqlx=warn"));

    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}

/// Opens the SQLite database named by `config` and loads every record.
pub async fn open_shop(config: &ConfigState) -> ApiResult<ShopState<Database>> {
    info!(path = ?config.database_path, "Opening shop database");

    let db = Database::new(DbConfig::new(&config.database_path)).await?;
    let shop = ShopState::open(db).await?;

    info!(shop = %config.shop_name, "Shop ready");
    Ok(shop)
}
