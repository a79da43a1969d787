//! Order repository: creation and shopper-facing reads.

use rust_decimal::Decimal;
use sqlx::PgPool;
use sqlx::types::Json;

use clover_core::pricing::Quote;
use clover_core::{OrderId, ProductId, ShippingAddress, UserId};

use super::RepositoryError;
use crate::models::{Order, OrderItem};

const ORDER_COLUMNS: &str = "id, user_id, status, subtotal, shipping_cost, tax, total, \
                             shipping_address, payment_intent_id, created_at, updated_at";

/// Input line for order creation: the product snapshot frozen at this
/// instant. `product_id` is `None` when the cart line's product has already
/// vanished.
#[derive(Debug, Clone)]
pub struct OrderLineSnapshot {
    pub product_id: Option<ProductId>,
    pub product_name: String,
    pub product_price: Decimal,
    pub quantity: u32,
}

/// Repository for order writes and shopper reads.
pub struct OrderRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> OrderRepository<'a> {
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Create a `pending` order and its line items in a single transaction.
    ///
    /// The transaction is the whole point: an order header without its
    /// items must never become visible, so a failed item insert rolls the
    /// header back too.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if any statement fails; nothing
    /// is persisted in that case.
    pub async fn create_with_items(
        &self,
        user_id: UserId,
        quote: &Quote,
        shipping_address: &ShippingAddress,
        lines: &[OrderLineSnapshot],
    ) -> Result<Order, RepositoryError> {
        let mut tx = self.pool.begin().await?;

        let order: Order = sqlx::query_as(&format!(
            "INSERT INTO orders \
             (user_id, status, subtotal, shipping_cost, tax, total, shipping_address) \
             VALUES ($1, 'pending', $2, $3, $4, $5, $6) \
             RETURNING {ORDER_COLUMNS}"
        ))
        .bind(user_id)
        .bind(quote.subtotal)
        .bind(quote.shipping)
        .bind(quote.tax)
        .bind(quote.total)
        .bind(Json(shipping_address))
        .fetch_one(&mut *tx)
        .await?;

        for line in lines {
            sqlx::query(
                "INSERT INTO order_items \
                 (order_id, product_id, product_name, product_price, quantity) \
                 VALUES ($1, $2, $3, $4, $5)",
            )
            .bind(order.id)
            .bind(line.product_id)
            .bind(&line.product_name)
            .bind(line.product_price)
            .bind(i32::try_from(line.quantity).unwrap_or(i32::MAX))
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        Ok(order)
    }

    /// All orders for a user, newest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_for_user(&self, user_id: UserId) -> Result<Vec<Order>, RepositoryError> {
        let rows = sqlx::query_as(&format!(
            "SELECT {ORDER_COLUMNS} FROM orders \
             WHERE user_id = $1 ORDER BY created_at DESC"
        ))
        .bind(user_id)
        .fetch_all(self.pool)
        .await?;
        Ok(rows)
    }

    /// One order with its items, scoped to the owning user. Returns `None`
    /// both for missing orders and for orders belonging to someone else -
    /// callers render the same not-found view either way.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if a query fails.
    pub async fn get_for_user(
        &self,
        order_id: OrderId,
        user_id: UserId,
    ) -> Result<Option<(Order, Vec<OrderItem>)>, RepositoryError> {
        let order: Option<Order> = sqlx::query_as(&format!(
            "SELECT {ORDER_COLUMNS} FROM orders WHERE id = $1 AND user_id = $2"
        ))
        .bind(order_id)
        .bind(user_id)
        .fetch_optional(self.pool)
        .await?;

        let Some(order) = order else {
            return Ok(None);
        };

        let items = self.items_for_order(order.id).await?;
        Ok(Some((order, items)))
    }

    /// Line items for an order, in insertion order.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn items_for_order(
        &self,
        order_id: OrderId,
    ) -> Result<Vec<OrderItem>, RepositoryError> {
        let rows = sqlx::query_as(
            "SELECT id, order_id, product_id, product_name, product_price, quantity, created_at \
             FROM order_items WHERE order_id = $1 ORDER BY created_at, id",
        )
        .bind(order_id)
        .fetch_all(self.pool)
        .await?;
        Ok(rows)
    }
}
