//! Seed data script - populates the database with a demo jewelry catalog
//!
//! Run with: cargo run --bin seed-data -- --sales 120
//!
//! This creates:
//! - 12 products across rings, necklaces, earrings, bracelets and watches
//! - Randomized sales spread over the last few months
//! - An inventory log entry for every initial stock level

use anyhow::Context;
use chrono::{Duration, Utc};
use clap::Parser;
use rand::{rngs::StdRng, Rng, SeedableRng};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use sea_orm::{ActiveModelTrait, DatabaseConnection, Set};
use tracing::info;
use uuid::Uuid;

use jewelry_store_api::{
    db::{establish_connection_with_config, run_migrations, DbConfig},
    entities::{inventory_log, product, sale},
};

#[derive(Debug, Parser)]
#[command(name = "seed-data", about = "Populate the jewelry store with demo data")]
struct Args {
    /// Database URL; falls back to DATABASE_URL, then a local SQLite file
    #[arg(long)]
    database_url: Option<String>,

    /// Number of sales to generate
    #[arg(long, default_value_t = 80)]
    sales: u32,

    /// Spread sales over this many past months
    #[arg(long, default_value_t = 6)]
    months: u32,

    /// RNG seed for reproducible data
    #[arg(long, default_value_t = 7)]
    seed: u64,

    /// Run migrations before inserting
    #[arg(long)]
    migrate: bool,
}

const CUSTOMERS: &[&str] = &[
    "Amelia Hart",
    "Noah Brennan",
    "Sofia Marchetti",
    "Liam O'Connell",
    "Priya Raman",
    "Hugo Lefèvre",
];

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .init();

    let args = Args::parse();
    let database_url = args
        .database_url
        .clone()
        .or_else(|| std::env::var("DATABASE_URL").ok())
        .unwrap_or_else(|| "sqlite://jewelry_store.db?mode=rwc".to_string());

    info!("=== Jewelry Store Seed Data ===");
    info!("Connecting to database: {}", database_url);
    let db = establish_connection_with_config(&DbConfig {
        url: database_url,
        max_connections: 5,
        min_connections: 1,
        ..DbConfig::default()
    })
    .await
    .context("failed to connect")?;

    if args.migrate {
        run_migrations(&db).await.context("failed to run migrations")?;
    }

    let mut rng = StdRng::seed_from_u64(args.seed);

    info!("Creating products...");
    let products = create_products(&db).await?;
    info!("  Created {} products", products.len());

    info!("Creating inventory logs...");
    let logs = create_inventory_logs(&db, &products).await?;
    info!("  Created {} inventory log entries", logs);

    info!("Creating sales...");
    let sales = create_sales(&db, &products, &args, &mut rng).await?;
    info!("  Created {} sales", sales);

    info!("=== Seed Data Complete ===");
    info!("Try these API calls:");
    info!("  curl http://localhost:8080/api/v1/products");
    info!("  curl http://localhost:8080/api/v1/admin/dashboard");
    info!("  curl http://localhost:8080/api/v1/admin/analytics");
    info!("Or explore interactively at: http://localhost:8080/swagger-ui");

    Ok(())
}

async fn create_products(db: &DatabaseConnection) -> anyhow::Result<Vec<product::Model>> {
    let products_data = vec![
        ("Classic Solitaire Ring", "Rings", "Gold", Some("Solitaire"), dec!(1299.00), dec!(3.2), 4, true),
        ("Eternity Band", "Rings", "Platinum", Some("Eternity"), dec!(2450.00), dec!(4.1), 2, true),
        ("Stacking Ring", "Rings", "Silver", None, dec!(89.00), dec!(1.8), 25, false),
        ("Pearl Strand Necklace", "Necklaces", "Pearl", Some("Strand"), dec!(640.00), dec!(32.0), 6, true),
        ("Herringbone Chain", "Necklaces", "Gold", Some("Chain"), dec!(780.00), dec!(9.5), 0, false),
        ("Diamond Pendant", "Necklaces", "White Gold", Some("Pendant"), dec!(1890.00), dec!(2.7), 3, true),
        ("Opal Drop Earrings", "Earrings", "Silver", Some("Drop"), dec!(149.99), dec!(2.4), 12, false),
        ("Diamond Studs", "Earrings", "White Gold", Some("Stud"), dec!(990.00), dec!(1.6), 8, true),
        ("Tennis Bracelet", "Bracelets", "White Gold", Some("Tennis"), dec!(3200.00), dec!(11.2), 1, true),
        ("Charm Bracelet", "Bracelets", "Silver", Some("Charm"), dec!(210.00), dec!(14.0), 18, false),
        ("Rose Gold Bangle", "Bracelets", "Rose Gold", Some("Bangle"), dec!(540.00), dec!(12.5), 9, false),
        ("Automatic Dress Watch", "Watches", "Stainless Steel", Some("Dress"), dec!(2100.00), dec!(68.0), 5, true),
    ];

    let mut created = Vec::new();
    let now = Utc::now();

    for (i, (name, category, material, model, price, weight, stock, featured)) in
        products_data.into_iter().enumerate()
    {
        let created_at = now - Duration::days(i as i64);
        let row = product::ActiveModel {
            id: Set(Uuid::new_v4()),
            name: Set(name.to_string()),
            description: Set(Some(format!("{} in {}", name, material.to_lowercase()))),
            category: Set(category.to_string()),
            material: Set(material.to_string()),
            model: Set(model.map(str::to_string)),
            price: Set(price),
            weight_grams: Set(weight),
            stock_quantity: Set(stock),
            is_active: Set(true),
            is_featured: Set(featured),
            image_url: Set(None),
            created_at: Set(created_at),
            updated_at: Set(created_at),
        };
        created.push(row.insert(db).await?);
    }

    Ok(created)
}

async fn create_inventory_logs(
    db: &DatabaseConnection,
    products: &[product::Model],
) -> anyhow::Result<usize> {
    let mut count = 0;
    for product in products.iter().filter(|p| p.stock_quantity > 0) {
        inventory_log::ActiveModel {
            id: Set(Uuid::new_v4()),
            product_id: Set(product.id),
            quantity_change: Set(product.stock_quantity),
            change_reason: Set("Initial stock".to_string()),
            created_at: Set(product.created_at),
        }
        .insert(db)
        .await?;
        count += 1;
    }
    Ok(count)
}

async fn create_sales(
    db: &DatabaseConnection,
    products: &[product::Model],
    args: &Args,
    rng: &mut StdRng,
) -> anyhow::Result<u32> {
    if products.is_empty() {
        return Ok(0);
    }

    let now = Utc::now();
    let span_days = i64::from(args.months.max(1)) * 30;

    for _ in 0..args.sales {
        let product = &products[rng.gen_range(0..products.len())];
        let quantity: i32 = rng.gen_range(1..=3);
        let subtotal = product.price * Decimal::from(quantity);
        let discount = if rng.gen_bool(0.2) {
            (subtotal * dec!(0.10)).round_dp(2)
        } else {
            Decimal::ZERO
        };
        let customer = CUSTOMERS[rng.gen_range(0..CUSTOMERS.len())];
        let sale_date = now
            - Duration::days(rng.gen_range(0..span_days))
            - Duration::minutes(rng.gen_range(0..24 * 60));

        sale::ActiveModel {
            id: Set(Uuid::new_v4()),
            product_id: Set(product.id),
            customer_name: Set(customer.to_string()),
            customer_email: Set(Some(format!(
                "{}@example.com",
                customer.to_lowercase().replace([' ', '\''], ".")
            ))),
            customer_phone: Set(None),
            quantity: Set(quantity),
            discount_amount: Set(discount),
            total_amount: Set(subtotal - discount),
            notes: Set(None),
            sale_date: Set(sale_date),
        }
        .insert(db)
        .await?;
    }

    Ok(args.sales)
}
