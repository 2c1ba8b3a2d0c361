//! Seed data script - populates the database with a demo plastics catalog
//!
//! Run with: cargo run --bin seed-data -- --database-url sqlite://plastics.db?mode=rwc
//!
//! This creates:
//! - 3 categories with their grades
//! - a product per category
//! - two series per grade
//! - a thickness and size grid
//! - a price for every series, thickness and size combination

use std::sync::Arc;

use clap::Parser;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use tracing::info;

use plastics_quote_api::{
    db::{self, DbConfig},
    services::{
        category::{CategoryInput, CategoryService},
        grade::{CreateGradeInput, GradeService},
        pricing::{CreatePriceInput, PricingService},
        product::{ProductInput, ProductService},
        product_detail::{CreateProductDetailInput, ProductDetailService},
        size::{SizeInput, SizeService},
        thickness::{ThicknessInput, ThicknessService},
        CrudService,
    },
};

#[derive(Debug, Parser)]
#[command(name = "seed-data", about = "Populate the database with a demo catalog")]
struct Args {
    /// Database to seed
    #[arg(long, default_value = "sqlite://plastics.db?mode=rwc")]
    database_url: String,

    /// Seed even when categories already exist
    #[arg(long)]
    force: bool,
}

const CATALOG: &[(&str, &str, &[&str])] = &[
    (
        "Acrylic",
        "Cast and extruded PMMA sheet",
        &["CAST", "EXTRUDED"],
    ),
    (
        "Polycarbonate",
        "Impact resistant clear sheet",
        &["SOLID", "MULTIWALL"],
    ),
    ("HDPE", "High density polyethylene board", &["NATURAL"]),
];

const SERIES: &[&str] = &["Standard", "Premium"];

const THICKNESSES: &[Decimal] = &[dec!(2), dec!(3), dec!(5), dec!(8)];

const SIZES: &[(i32, i32)] = &[(8, 4), (6, 4)];

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .init();

    let args = Args::parse();

    info!("=== Plastics catalog seed data ===");

    let pool = db::establish_connection_with_config(&DbConfig {
        url: args.database_url.clone(),
        max_connections: 5,
        ..Default::default()
    })
    .await?;
    db::run_migrations(&pool).await?;
    let db = Arc::new(pool);

    let categories = CategoryService::new(db.clone());
    if !args.force && !categories.get_all().await?.is_empty() {
        info!("Catalog already has categories; pass --force to seed anyway");
        return Ok(());
    }

    let grades = GradeService::new(db.clone());
    let products = ProductService::new(db.clone());
    let details = ProductDetailService::new(db.clone());
    let thicknesses = ThicknessService::new(db.clone());
    let sizes = SizeService::new(db.clone());
    let pricing = PricingService::new(db.clone());

    info!("Creating thicknesses and sizes...");
    let mut thickness_ids = Vec::new();
    for value in THICKNESSES {
        let created = thicknesses
            .create(ThicknessInput {
                thickness: Some(*value),
            })
            .await?;
        thickness_ids.push((created.id, *value));
    }
    let mut size_ids = Vec::new();
    for (length, breadth) in SIZES {
        let created = sizes
            .create(SizeInput {
                length: Some(*length),
                breadth: Some(*breadth),
            })
            .await?;
        size_ids.push((created.id, length * breadth));
    }

    info!("Creating categories, grades, series and prices...");
    let mut price_count = 0;
    for (category_name, description, type_codes) in CATALOG {
        let category = categories
            .create(CategoryInput {
                name: category_name.to_string(),
            })
            .await?;

        products
            .create(ProductInput {
                product_name: format!("{} Sheet", category_name),
                description: Some(description.to_string()),
                category_name: category.name.clone(),
            })
            .await?;

        for type_code in type_codes.iter() {
            let grade = grades
                .create(CreateGradeInput {
                    category_id: category.id,
                    type_code: type_code.to_string(),
                })
                .await?;

            for (tier, series) in SERIES.iter().enumerate() {
                let detail = details
                    .create(CreateProductDetailInput {
                        grade_id: grade.id,
                        series: series.to_string(),
                    })
                    .await?;

                for (thickness_id, mm) in &thickness_ids {
                    for (size_id, area) in &size_ids {
                        pricing
                            .create_price(CreatePriceInput {
                                product_detail_id: detail.id,
                                thickness_id: *thickness_id,
                                size_id: *size_id,
                                price: Some(demo_price(*mm, *area, tier)),
                            })
                            .await?;
                        price_count += 1;
                    }
                }
            }
        }
    }

    info!("  Created {} prices", price_count);
    info!("=== Seed Data Complete ===");
    info!("Try: curl http://localhost:8080/api/v1/categories/with-grades");
    info!("Or explore interactively at: http://localhost:8080/swagger-ui");

    Ok(())
}

/// Rough sheet price scaling with thickness and area; premium series cost 25% more.
fn demo_price(thickness_mm: Decimal, area: i32, tier: usize) -> Decimal {
    let base = thickness_mm * Decimal::from(area) * dec!(12.5);
    if tier == 0 {
        base
    } else {
        base * dec!(1.25)
    }
}
