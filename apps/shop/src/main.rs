//! # Dukaan Entry Point
//!
//! Opens the shop database and prints the headline numbers.
//!
//! ```bash
//! DUKAAN_DB_PATH=./dukaan_dev.db cargo run -p dukaan-shop --bin dukaan
//! ```

use std::process::ExitCode;

use dukaan_shop::commands::report;
use dukaan_shop::state::ConfigState;
use dukaan_shop::{init_tracing, open_shop};

#[tokio::main]
async fn main() -> ExitCode {
    init_tracing();

    let config = ConfigState::from_env();

    let shop = match open_shop(&config).await {
        Ok(shop) => shop,
        Err(e) => {
            tracing::error!(error = %e, "Could not open shop");
            return ExitCode::FAILURE;
        }
    };

    let stats = report::get_dashboard(&shop).await;
    let months = report::get_monthly_performance(&shop, &config).await;

    println!("{}", config.shop_name);
    println!("{}", "=".repeat(config.shop_name.chars().count()));
    println!("Products:        {}", stats.product_count);
    println!("Sales:           {}", stats.sale_count);
    println!("Inventory value: {}", config.format_currency(stats.inventory_value));
    println!("Total profit:    {}", config.format_currency(stats.total_profit));
    println!("Receivables:     {}", config.format_currency(stats.receivables));
    println!("Payables:        {}", config.format_currency(stats.payables));

    if !months.is_empty() {
        println!();
        println!("Month      Sales              Profit");
        for m in &months {
            println!(
                "{:<10} {:<18} {}",
                m.label,
                config.format_currency(m.sales),
                config.format_currency(m.profit)
            );
        }
    }

    ExitCode::SUCCESS
}
