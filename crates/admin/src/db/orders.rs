//! Back-office order repository.

use sqlx::PgPool;

use clover_core::{OrderId, OrderStatus};

use super::RepositoryError;
use crate::models::{AdminOrder, OrderItem};

const ORDER_COLUMNS: &str = "o.id, o.user_id, u.email AS customer_email, o.status, o.subtotal, \
                             o.shipping_cost, o.tax, o.total, o.shipping_address, \
                             o.created_at, o.updated_at";

/// Outcome of a status update attempt.
#[derive(Debug)]
pub enum StatusUpdate {
    Updated(AdminOrder),
    /// The state machine rejected the move; carries the current status.
    Rejected(OrderStatus),
}

/// Repository for order management.
pub struct OrderRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> OrderRepository<'a> {
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// All orders, newest first, optionally filtered by status.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list(
        &self,
        status: Option<OrderStatus>,
    ) -> Result<Vec<AdminOrder>, RepositoryError> {
        let rows = sqlx::query_as(&format!(
            "SELECT {ORDER_COLUMNS} FROM orders o \
             LEFT JOIN users u ON u.id = o.user_id \
             WHERE ($1::order_status IS NULL OR o.status = $1) \
             ORDER BY o.created_at DESC"
        ))
        .bind(status)
        .fetch_all(self.pool)
        .await?;
        Ok(rows)
    }

    /// One order with items, unscoped (back-office sees every order).
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if a query fails.
    pub async fn get(
        &self,
        order_id: OrderId,
    ) -> Result<Option<(AdminOrder, Vec<OrderItem>)>, RepositoryError> {
        let order: Option<AdminOrder> = sqlx::query_as(&format!(
            "SELECT {ORDER_COLUMNS} FROM orders o \
             LEFT JOIN users u ON u.id = o.user_id \
             WHERE o.id = $1"
        ))
        .bind(order_id)
        .fetch_optional(self.pool)
        .await?;

        let Some(order) = order else {
            return Ok(None);
        };

        let items: Vec<OrderItem> = sqlx::query_as(
            "SELECT id, order_id, product_id, product_name, product_price, quantity, created_at \
             FROM order_items WHERE order_id = $1 ORDER BY created_at, id",
        )
        .bind(order_id)
        .fetch_all(self.pool)
        .await?;

        Ok(Some((order, items)))
    }

    /// Move an order to a new status, enforcing the transition rules: the
    /// update runs conditionally inside one statement so a concurrent change
    /// between read and write cannot slip an illegal move through.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` for an unknown order.
    pub async fn update_status(
        &self,
        order_id: OrderId,
        next: OrderStatus,
    ) -> Result<StatusUpdate, RepositoryError> {
        let mut tx = self.pool.begin().await?;

        let current: Option<(OrderStatus,)> =
            sqlx::query_as("SELECT status FROM orders WHERE id = $1 FOR UPDATE")
                .bind(order_id)
                .fetch_optional(&mut *tx)
                .await?;

        let Some((current,)) = current else {
            return Err(RepositoryError::NotFound);
        };

        if !current.can_transition(next) {
            return Ok(StatusUpdate::Rejected(current));
        }

        sqlx::query("UPDATE orders SET status = $2, updated_at = now() WHERE id = $1")
            .bind(order_id)
            .bind(next)
            .execute(&mut *tx)
            .await?;
        tx.commit().await?;

        // The row was just updated under lock; its absence now means
        // something outside this repository deleted it mid-flight.
        let order: Option<AdminOrder> = sqlx::query_as(&format!(
            "SELECT {ORDER_COLUMNS} FROM orders o \
             LEFT JOIN users u ON u.id = o.user_id \
             WHERE o.id = $1"
        ))
        .bind(order_id)
        .fetch_optional(self.pool)
        .await?;

        order.map(StatusUpdate::Updated).ok_or_else(|| {
            RepositoryError::DataCorruption(format!("order {order_id} missing after status update"))
        })
    }
}
