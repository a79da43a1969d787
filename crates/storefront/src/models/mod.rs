//! Entity models decoded at the database boundary.
//!
//! Every struct here mirrors one table (or one joined row shape) and derives
//! `sqlx::FromRow`, so a malformed row fails decoding instead of leaking a
//! loosely-typed value into the application.

pub mod session;

pub use session::CurrentUser;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use sqlx::FromRow;
use sqlx::types::Json;

use clover_core::{
    AddressId, CategoryId, OrderId, OrderItemId, OrderStatus, ProductId, ProductImageId, ReviewId,
    ShippingAddress, UserId, WishlistItemId,
};

/// Catalog product.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub slug: String,
    pub description: Option<String>,
    pub price: Decimal,
    pub compare_at_price: Option<Decimal>,
    pub category_id: Option<CategoryId>,
    pub stock_quantity: i32,
    pub is_featured: bool,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Ordered product image.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct ProductImage {
    pub id: ProductImageId,
    pub product_id: ProductId,
    pub url: String,
    pub alt_text: Option<String>,
    pub position: i32,
    pub created_at: DateTime<Utc>,
}

/// Product category (single-level hierarchy in practice).
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Category {
    pub id: CategoryId,
    pub name: String,
    pub slug: String,
    pub description: Option<String>,
    pub image_url: Option<String>,
    pub parent_id: Option<CategoryId>,
    pub created_at: DateTime<Utc>,
}

/// A product with its resolved category and position-ordered images.
#[derive(Debug, Clone, Serialize)]
pub struct ProductWithRelations {
    #[serde(flatten)]
    pub product: Product,
    pub category: Option<Category>,
    pub images: Vec<ProductImage>,
}

/// Customer order header. Totals and the shipping address are frozen at
/// creation time.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Order {
    pub id: OrderId,
    pub user_id: Option<UserId>,
    pub status: OrderStatus,
    pub subtotal: Decimal,
    pub shipping_cost: Decimal,
    pub tax: Decimal,
    pub total: Decimal,
    pub shipping_address: Json<ShippingAddress>,
    pub payment_intent_id: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Order line item. `product_name` and `product_price` are snapshots taken
/// at order creation; `product_id` is nullable because products may be
/// deleted afterwards.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct OrderItem {
    pub id: OrderItemId,
    pub order_id: OrderId,
    pub product_id: Option<ProductId>,
    pub product_name: String,
    pub product_price: Decimal,
    pub quantity: i32,
    pub created_at: DateTime<Utc>,
}

/// Registered shopper.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct User {
    pub id: UserId,
    pub email: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Shopper profile, keyed by user.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Profile {
    pub user_id: UserId,
    pub full_name: Option<String>,
    pub phone: Option<String>,
    pub avatar_url: Option<String>,
    pub updated_at: DateTime<Utc>,
}

/// Saved shipping/billing address.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Address {
    pub id: AddressId,
    pub user_id: UserId,
    pub label: String,
    pub street_address: String,
    pub city: String,
    pub state: Option<String>,
    pub postal_code: String,
    pub country: String,
    pub is_default: bool,
    pub created_at: DateTime<Utc>,
}

/// Product review joined with the reviewer's display name.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Review {
    pub id: ReviewId,
    pub product_id: ProductId,
    pub user_id: UserId,
    pub rating: i32,
    pub title: Option<String>,
    pub content: Option<String>,
    pub reviewer_name: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Wishlist entry with its resolved product (if still in the catalog).
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct WishlistEntry {
    pub id: WishlistItemId,
    pub product_id: ProductId,
    pub product_name: Option<String>,
    pub product_slug: Option<String>,
    pub price: Option<Decimal>,
    pub image_url: Option<String>,
    pub created_at: DateTime<Utc>,
}
