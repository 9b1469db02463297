//! # Seed Data Generator
//!
//! Populates a database with a demo shop for development.
//!
//! ## Usage
//! ```bash
//! # Seed ./dukaan_dev.db
//! cargo run -p dukaan-db --bin seed
//!
//! # Specify database path
//! cargo run -p dukaan-db --bin seed -- --db ./data/dukaan.db
//! ```
//!
//! ## Generated Records
//! - 3 suppliers, each with a product range bought on credit
//! - 4 customers, one with an opening udhaar balance
//!
//! Every record goes through a ledger plan, so supplier balances match the
//! stock that was bought on credit.

use chrono::Utc;
use dukaan_core::input::{NewCustomer, NewProduct, NewSupplier};
use dukaan_core::ledger;
use dukaan_core::{Money, RecordStore};
use dukaan_db::{generate_id, Database, DbConfig};
use std::env;

/// (supplier, contact, [(product, category, stock, purchase, selling)])
const SUPPLIERS: &[(&str, &str, &[(&str, &str, i64, i64, i64)])] = &[
    (
        "Ali Traders",
        "Ali Raza",
        &[
            ("Basmati Rice 5kg", "Grocery", 40, 140_000, 165_000),
            ("Sugar 1kg", "Grocery", 80, 14_000, 16_000),
            ("Daal Chana 1kg", "Grocery", 30, 28_000, 32_000),
            ("Atta 10kg", "Grocery", 25, 95_000, 110_000),
        ],
    ),
    (
        "Karachi Beverages",
        "Sana Iqbal",
        &[
            ("Cola 1.5L", "Beverages", 48, 18_000, 22_000),
            ("Mineral Water 1.5L", "Beverages", 60, 8_000, 11_000),
            ("Mango Juice 1L", "Beverages", 24, 22_000, 28_000),
        ],
    ),
    (
        "City Dairy",
        "Hamid",
        &[
            ("Milk Pack 1L", "Dairy", 36, 24_000, 28_000),
            ("Yogurt 500g", "Dairy", 20, 15_000, 19_000),
            ("Butter 200g", "Dairy", 0, 45_000, 52_000),
        ],
    ),
];

/// (name, phone, address, opening balance)
const CUSTOMERS: &[(&str, &str, &str, i64)] = &[
    ("Bilal Ahmed", "0300-1111111", "Gali 4, Main Bazaar", 0),
    ("Ayesha Khan", "0301-2222222", "Block B", 125_000),
    ("Usman", "", "", 0),
    ("Fatima Noor", "0333-4444444", "Near Masjid", 0),
];

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Vec<String> = env::args().collect();
    let mut db_path = String::from("./dukaan_dev.db");

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--db" | "-d" => {
                if i + 1 < args.len() {
                    db_path = args[i + 1].clone();
                    i += 1;
                }
            }
            "--help" | "-h" => {
                println!("Dukaan Seed Data Generator");
                println!();
                println!("Usage: seed [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -d, --db <PATH>    Database file path (default: ./dukaan_dev.db)");
                println!("  -h, --help         Show this help message");
                return Ok(());
            }
            _ => {}
        }
        i += 1;
    }

    println!("🌱 Dukaan Seed Data Generator");
    println!("============================");
    println!("Database: {}", db_path);
    println!();

    let db = Database::new(DbConfig::new(&db_path)).await?;

    println!("✓ Connected to database");
    println!("✓ Migrations applied");

    let existing = db.products().count().await?;
    if existing > 0 {
        println!("⚠ Database already has {} products", existing);
        println!("  Skipping seed to avoid duplicates.");
        println!("  Delete the database file to regenerate.");
        return Ok(());
    }

    let mut products = 0;

    for (name, contact, range) in SUPPLIERS {
        let supplier_id = generate_id();
        let plan = ledger::plan_create_supplier(
            NewSupplier {
                name: name.to_string(),
                contact_person: contact.to_string(),
                phone: String::new(),
                opening_balance: Money::zero(),
            },
            supplier_id.clone(),
            Utc::now(),
        )?;
        db.apply(&plan).await?;

        for (product, category, stock, purchase, selling) in range.iter() {
            let plan = ledger::plan_create_product(
                NewProduct {
                    name: product.to_string(),
                    category: category.to_string(),
                    supplier_id: Some(supplier_id.clone()),
                    stock: *stock,
                    purchase_price: Money::from_minor(*purchase),
                    selling_price: Money::from_minor(*selling),
                },
                true,
                generate_id(),
                Utc::now(),
            )?;
            db.apply(&plan).await?;
            products += 1;
        }
    }

    for (name, phone, address, opening) in CUSTOMERS {
        let plan = ledger::plan_create_customer(
            NewCustomer {
                name: name.to_string(),
                phone: phone.to_string(),
                address: address.to_string(),
                opening_balance: Money::from_minor(*opening),
            },
            generate_id(),
            Utc::now(),
        )?;
        db.apply(&plan).await?;
    }

    println!();
    println!("✓ Seeded {} suppliers, {} products, {} customers", SUPPLIERS.len(), products, CUSTOMERS.len());
    println!("  Payables:    {}", db.suppliers().total_payables().await?);
    println!("  Receivables: {}", db.customers().total_receivables().await?);
    println!();
    println!("✓ Seed complete!");

    Ok(())
}
