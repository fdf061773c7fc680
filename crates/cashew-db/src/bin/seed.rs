//! # Seed Data Generator
//!
//! Populates the database with the demo catalog for development.
//!
//! ## Usage
//! ```bash
//! # Seed the default development database
//! cargo run -p cashew-db --bin seed
//!
//! # Specify database path
//! cargo run -p cashew-db --bin seed -- --db ./data/cashew.db
//! ```
//!
//! ## Generated Products
//! A small fixed catalog of electronics, enough to exercise every checkout
//! path by hand: multiple tax rates, a big-ticket item for change-counting
//! and a low-stock item for rejection testing.
//!
//! Seeding is skipped when the catalog already has products, so running it
//! twice never duplicates codes.

use std::env;

use cashew_core::NewProduct;
use cashew_db::{Database, DbConfig};
use tracing_subscriber::EnvFilter;

/// Demo catalog: (code, name, stock, price_cents, tax_rate_bps).
const DEMO_PRODUCTS: &[(&str, &str, i64, i64, u32)] = &[
    ("P001", "Laptop", 50, 120_000, 1800),
    ("P002", "Mouse", 200, 2_500, 1800),
    ("P003", "Keyboard", 100, 7_500, 1800),
    ("P004", "Monitor", 30, 30_000, 1800),
    ("P005", "Webcam", 150, 5_000, 1800),
    ("P006", "Speaker", 80, 8_000, 1200),
];

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    // Parse command line arguments
    let args: Vec<String> = env::args().collect();

    let mut db_path = String::from("./cashew_dev.db");

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
                println!("Cashew POS Seed Data Generator");
                println!();
                println!("Usage: seed [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -d, --db <PATH>    Database file path (default: ./cashew_dev.db)");
                println!("  -h, --help         Show this help message");
                return Ok(());
            }
            _ => {}
        }
        i += 1;
    }

    println!("🌱 Cashew POS Seed Data Generator");
    println!("=================================");
    println!("Database: {}", db_path);
    println!();

    // Connect to database
    let config = DbConfig::new(&db_path);
    let db = Database::new(config).await?;

    println!("✓ Connected to database");
    println!("✓ Migrations applied");

    // Check existing products
    let existing = db.products().count().await?;
    if existing > 0 {
        println!("⚠ Database already has {} products", existing);
        println!("  Skipping seed to avoid duplicates.");
        println!("  Delete the database file to regenerate.");
        return Ok(());
    }

    // Insert the demo catalog
    println!();
    println!("Seeding demo catalog...");

    for &(code, name, stock, price_cents, tax_rate_bps) in DEMO_PRODUCTS {
        let new_product = NewProduct {
            code: code.to_string(),
            name: name.to_string(),
            stock,
            price_cents,
            tax_rate_bps,
        };

        let product = db.products().create(&new_product).await?;
        println!(
            "  {} {:<10} {:>10} x{:<4} ({}% tax)",
            product.code,
            product.name,
            product.price(),
            product.stock,
            product.tax_rate().percentage()
        );
    }

    println!();
    println!("✓ Seeded {} products", DEMO_PRODUCTS.len());

    Ok(())
}
