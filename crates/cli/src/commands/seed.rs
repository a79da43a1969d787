//! Development seed data.
//!
//! Inserts a small catalog of categories and products. Idempotent: rows
//! are keyed by slug and re-running the command leaves existing data
//! untouched.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use tracing::info;

use clover_core::slug::slugify;

use super::{CommandError, connect};

struct SeedProduct {
    name: &'static str,
    description: &'static str,
    price: Decimal,
    category: &'static str,
    stock: i32,
    featured: bool,
}

const CATEGORIES: &[(&str, &str)] = &[
    ("Home & Living", "Everyday objects for the house"),
    ("Kitchen", "Cookware and tableware"),
    ("Apparel", "Clothing and accessories"),
];

fn seed_products() -> Vec<SeedProduct> {
    vec![
        SeedProduct {
            name: "Linen Throw Blanket",
            description: "Stonewashed linen, 130x170cm.",
            price: dec!(59.99),
            category: "Home & Living",
            stock: 24,
            featured: true,
        },
        SeedProduct {
            name: "Soy Candle",
            description: "Cedar and bergamot, 40h burn time.",
            price: dec!(18.00),
            category: "Home & Living",
            stock: 60,
            featured: false,
        },
        SeedProduct {
            name: "Stoneware Mug",
            description: "Hand-glazed 350ml mug.",
            price: dec!(12.50),
            category: "Kitchen",
            stock: 80,
            featured: true,
        },
        SeedProduct {
            name: "Carbon Steel Pan",
            description: "26cm, pre-seasoned.",
            price: dec!(64.00),
            category: "Kitchen",
            stock: 15,
            featured: false,
        },
        SeedProduct {
            name: "Organic Cotton Tee",
            description: "Unisex, garment-dyed.",
            price: dec!(28.00),
            category: "Apparel",
            stock: 120,
            featured: false,
        },
        SeedProduct {
            name: "Wool Beanie",
            description: "Merino rib knit.",
            price: dec!(24.00),
            category: "Apparel",
            stock: 45,
            featured: true,
        },
    ]
}

/// Seed categories and products.
///
/// # Errors
///
/// Returns `CommandError` on database failures.
pub async fn run() -> Result<(), CommandError> {
    let pool = connect().await?;

    for (name, description) in CATEGORIES {
        sqlx::query(
            "INSERT INTO categories (name, slug, description) VALUES ($1, $2, $3) \
             ON CONFLICT (slug) DO NOTHING",
        )
        .bind(name)
        .bind(slugify(name))
        .bind(description)
        .execute(&pool)
        .await?;
    }
    info!(count = CATEGORIES.len(), "Seeded categories");

    let products = seed_products();
    for product in &products {
        sqlx::query(
            "INSERT INTO products \
             (name, slug, description, price, category_id, stock_quantity, is_featured) \
             SELECT $1, $2, $3, $4, c.id, $6, $7 \
             FROM categories c WHERE c.slug = $5 \
             ON CONFLICT (slug) DO NOTHING",
        )
        .bind(product.name)
        .bind(slugify(product.name))
        .bind(product.description)
        .bind(product.price)
        .bind(slugify(product.category))
        .bind(product.stock)
        .bind(product.featured)
        .execute(&pool)
        .await?;
    }
    info!(count = products.len(), "Seeded products");

    Ok(())
}
