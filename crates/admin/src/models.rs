//! Database row types for the admin service.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use sqlx::types::Json;

use clover_core::{
    CategoryId, OrderId, OrderItemId, OrderStatus, ProductId, ProductImageId, ShippingAddress,
    UserId,
};

/// Product row, including inactive products (admin sees everything).
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

/// Product image row, ordered by `position`.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct ProductImage {
    pub id: ProductImageId,
    pub product_id: ProductId,
    pub url: String,
    pub alt_text: Option<String>,
    pub position: i32,
    pub created_at: DateTime<Utc>,
}

/// Product with its images attached.
#[derive(Debug, Clone, Serialize)]
pub struct ProductWithImages {
    #[serde(flatten)]
    pub product: Product,
    pub images: Vec<ProductImage>,
}

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

/// Order header joined with the customer email for back-office display.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct AdminOrder {
    pub id: OrderId,
    pub user_id: Option<UserId>,
    /// Null when the customer account has since been deleted.
    pub customer_email: Option<String>,
    pub status: OrderStatus,
    pub subtotal: Decimal,
    pub shipping_cost: Decimal,
    pub tax: Decimal,
    pub total: Decimal,
    pub shipping_address: Json<ShippingAddress>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

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

/// Session-stored admin identity. Role membership is checked at login;
/// the session carries the verdict until it expires.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurrentAdmin {
    pub id: UserId,
    pub email: String,
}

/// Session keys.
pub mod session_keys {
    /// Key for the signed-in admin.
    pub const CURRENT_ADMIN: &str = "current_admin";
}
