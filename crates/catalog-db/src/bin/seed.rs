//! # Seed Data Generator
//!
//! Populates the database with a demo catalog for development.
//!
//! ## Usage
//! ```bash
//! # Seed the default database
//! cargo run -p catalog-db --bin seed
//!
//! # Specify database path
//! cargo run -p catalog-db --bin seed -- --db ./data/catalog.db
//! ```
//!
//! ## Generated Data
//! - A two-level category tree (Electronics > Laptops, Phones, ...)
//! - Several products per leaf category with prices from 9.99 upward
//! - A mix of percentage and fixed discounts, some inactive or expired

use catalog_core::validation::slugify;
use catalog_core::{
    DiscountStatus, DiscountType, Money, NewCategory, NewDiscount, NewProduct, ProductStatus,
};
use catalog_db::{Database, DbConfig};
use chrono::{DateTime, Duration, Utc};
use rust_decimal::Decimal;
use std::env;

/// Root categories and their children.
const TREE: &[(&str, &[&str])] = &[
    ("Electronics", &["Laptops", "Phones", "Audio"]),
    ("Home", &["Kitchen", "Furniture"]),
    ("Outdoors", &["Camping", "Cycling"]),
];

/// Product base names, paired with a base price in cents.
const PRODUCTS: &[(&str, i64)] = &[
    ("Standard", 999),
    ("Plus", 4999),
    ("Pro", 24999),
    ("Ultra", 250099),
];

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Vec<String> = env::args().collect();

    let mut db_path = String::from("./catalog_dev.db");

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
                println!("Catalog Seed Data Generator");
                println!();
                println!("Usage: seed [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -d, --db <PATH>    Database file path (default: ./catalog_dev.db)");
                println!("  -h, --help         Show this help message");
                return Ok(());
            }
            _ => {}
        }
        i += 1;
    }

    println!("🌱 Catalog Seed Data Generator");
    println!("==============================");
    println!("Database: {}", db_path);
    println!();

    let db = Database::new(DbConfig::new(&db_path)).await?;

    println!("✓ Connected to database");
    println!("✓ Migrations applied");

    let existing = db.categories().count().await?;
    if existing > 0 {
        println!("⚠ Database already has {} categories", existing);
        println!("  Skipping seed to avoid duplicates.");
        println!("  Delete the database file to regenerate.");
        return Ok(());
    }

    let start = std::time::Instant::now();
    let mut products = 0;
    let mut discounts = 0;

    for (root_title, children) in TREE {
        let root = db.categories().insert(&new_category(root_title, None)).await?;

        for child_title in children.iter() {
            let child = db
                .categories()
                .insert(&new_category(child_title, Some(root.id)))
                .await?;

            for (idx, (tier, base_cents)) in PRODUCTS.iter().enumerate() {
                let product = db
                    .products()
                    .insert(&NewProduct {
                        name: format!("{} {}", child_title, tier),
                        description: format!("{} tier {}", tier, child_title.to_lowercase()),
                        price: Money::from_cents(*base_cents),
                        quantity: (idx as i64 * 7) % 25,
                        status: if idx == 0 {
                            ProductStatus::OutOfStock
                        } else {
                            ProductStatus::Active
                        },
                        category: child.id,
                    })
                    .await?;
                products += 1;

                for discount in demo_discounts(product.id, idx) {
                    db.discounts().insert(&discount).await?;
                    discounts += 1;
                }
            }
        }
    }

    println!();
    println!(
        "✓ Generated {} products and {} discounts in {:?}",
        products,
        discounts,
        start.elapsed()
    );
    println!("✓ Seed complete!");

    Ok(())
}

fn new_category(title: &str, parent: Option<i64>) -> NewCategory {
    NewCategory {
        title: title.to_string(),
        description: format!("All things {}", title.to_lowercase()),
        parent,
        slug: Some(slugify(title)),
    }
}

/// A varied set of discounts so the best-price selection has work to do.
fn demo_discounts(product_id: i64, idx: usize) -> Vec<NewDiscount> {
    let now = Utc::now();
    let discount = |discount_type: DiscountType,
                    value: i64,
                    status: DiscountStatus,
                    expires_at: Option<DateTime<Utc>>| NewDiscount {
        product: product_id,
        discount_type,
        value: Decimal::from(value),
        status,
        expires_at,
    };

    match idx % 4 {
        0 => vec![],
        1 => vec![discount(DiscountType::Percentage, 20, DiscountStatus::Active, None)],
        2 => vec![
            discount(DiscountType::Fixed, 200, DiscountStatus::Active, Some(now + Duration::days(30))),
            discount(DiscountType::Percentage, 10, DiscountStatus::Active, None),
        ],
        _ => vec![
            discount(DiscountType::Percentage, 50, DiscountStatus::Inactive, None),
            discount(DiscountType::Fixed, 100, DiscountStatus::Active, Some(now - Duration::days(1))),
        ],
    }
}
