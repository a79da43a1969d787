//! Checkout orchestrator.
//!
//! Converts a non-empty authenticated cart into a `pending` order:
//!
//! 1. quote subtotal/shipping/tax/total from the current cart;
//! 2. insert the order header and its snapshot line items in one
//!    transaction (an order can never exist without its items);
//! 3. clear the cart - a clearing failure is logged, not surfaced, because
//!    the order is already placed;
//! 4. hand the order back so the caller can navigate to it.
//!
//! There is no retry and no resumability: a failed attempt leaves nothing
//! behind and the shopper submits again.

use sqlx::PgPool;
use thiserror::Error;
use tracing::instrument;

use clover_core::pricing;
use clover_core::types::address::MissingField;
use clover_core::ShippingAddress;
use rust_decimal::Decimal;

use crate::db::cart::PersistedCartLine;
use crate::db::orders::OrderLineSnapshot;
use crate::db::{CartRepository, OrderRepository, RepositoryError};
use crate::models::{CurrentUser, Order};

/// Name snapshotted for a cart line whose product vanished between carting
/// and checkout.
const UNKNOWN_PRODUCT_NAME: &str = "Unknown Product";

/// Checkout failure.
#[derive(Debug, Error)]
pub enum CheckoutError {
    /// Submitting an empty cart. Caught before any write.
    #[error("cart is empty")]
    EmptyCart,

    /// A required address field was blank. Caught before any write.
    #[error("invalid shipping address: {0}")]
    InvalidAddress(#[from] MissingField),

    /// A storage operation failed; nothing was persisted.
    #[error("order creation failed: {0}")]
    Repository(#[from] RepositoryError),
}

/// The checkout orchestrator. Stateless; created per request.
pub struct CheckoutService<'a> {
    pool: &'a PgPool,
}

impl<'a> CheckoutService<'a> {
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Place an order from the user's persisted cart.
    ///
    /// # Errors
    ///
    /// - [`CheckoutError::InvalidAddress`] / [`CheckoutError::EmptyCart`]
    ///   before any write;
    /// - [`CheckoutError::Repository`] if the order transaction fails - the
    ///   rollback guarantees no partial order exists.
    #[instrument(skip(self, user, shipping_address), fields(user_id = %user.id))]
    pub async fn place_order(
        &self,
        user: &CurrentUser,
        shipping_address: ShippingAddress,
    ) -> Result<Order, CheckoutError> {
        shipping_address.validate()?;

        let cart = CartRepository::new(self.pool);
        let rows = cart.fetch(user.id).await?;
        if rows.is_empty() {
            return Err(CheckoutError::EmptyCart);
        }

        let (lines, subtotal) = snapshot_lines(&rows);
        let quote = pricing::quote(subtotal);

        let order = OrderRepository::new(self.pool)
            .create_with_items(user.id, &quote, &shipping_address, &lines)
            .await?;

        // The order is placed; a failed clear only leaves stale cart rows
        // visible until the next fetch.
        if let Err(e) = cart.clear(user.id).await {
            tracing::warn!(order_id = %order.id, error = %e, "Failed to clear cart after checkout");
        }

        tracing::info!(order_id = %order.id, total = %order.total, "Order placed");
        Ok(order)
    }
}

/// Freeze cart rows into order line snapshots and compute the subtotal.
///
/// Lines whose product no longer resolves are kept (the shopper carted
/// them) but snapshot `"Unknown Product"` at price zero and carry no
/// product reference, so later catalog changes cannot touch the order.
fn snapshot_lines(rows: &[PersistedCartLine]) -> (Vec<OrderLineSnapshot>, Decimal) {
    let mut subtotal = Decimal::ZERO;
    let lines = rows
        .iter()
        .map(|row| {
            let quantity = u32::try_from(row.quantity).unwrap_or(0);
            let resolved = row.price.is_some() && row.product_name.is_some();
            let price = row.price.unwrap_or(Decimal::ZERO);
            subtotal += price * Decimal::from(quantity);
            OrderLineSnapshot {
                product_id: resolved.then_some(row.product_id),
                product_name: row
                    .product_name
                    .clone()
                    .unwrap_or_else(|| UNKNOWN_PRODUCT_NAME.to_owned()),
                product_price: price,
                quantity,
            }
        })
        .collect();
    (lines, subtotal)
}

#[cfg(test)]
mod tests {
    use clover_core::ProductId;
    use rust_decimal_macros::dec;

    use super::*;

    fn row(name: Option<&str>, price: Option<Decimal>, quantity: i32) -> PersistedCartLine {
        PersistedCartLine {
            product_id: ProductId::generate(),
            quantity,
            product_name: name.map(ToOwned::to_owned),
            product_slug: name.map(clover_core::slug::slugify),
            price,
            image_url: None,
        }
    }

    #[test]
    fn snapshots_freeze_name_price_and_quantity() {
        let rows = vec![
            row(Some("Linen Shirt"), Some(dec!(45.00)), 2),
            row(Some("Mug"), Some(dec!(30.00)), 1),
        ];
        let (lines, subtotal) = snapshot_lines(&rows);

        assert_eq!(subtotal, dec!(120.00));
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].product_name, "Linen Shirt");
        assert_eq!(lines[0].product_price, dec!(45.00));
        assert_eq!(lines[0].quantity, 2);
        assert!(lines[0].product_id.is_some());
    }

    #[test]
    fn vanished_products_snapshot_unknown_at_zero() {
        let rows = vec![row(None, None, 3)];
        let (lines, subtotal) = snapshot_lines(&rows);

        assert_eq!(subtotal, Decimal::ZERO);
        assert_eq!(lines[0].product_name, "Unknown Product");
        assert_eq!(lines[0].product_price, Decimal::ZERO);
        assert!(lines[0].product_id.is_none());
    }

    #[test]
    fn one_snapshot_per_distinct_cart_line() {
        let rows = vec![
            row(Some("A"), Some(dec!(10.00)), 1),
            row(Some("B"), Some(dec!(20.00)), 2),
            row(Some("C"), Some(dec!(30.00)), 3),
        ];
        let (lines, subtotal) = snapshot_lines(&rows);
        assert_eq!(lines.len(), 3);
        assert_eq!(subtotal, dec!(140.00));
    }

    #[test]
    fn quote_for_a_120_dollar_cart() {
        // Matches the checkout expectation: free shipping, 8% tax.
        let rows = vec![row(Some("Bundle"), Some(dec!(120.00)), 1)];
        let (_, subtotal) = snapshot_lines(&rows);
        let quote = pricing::quote(subtotal);
        assert_eq!(quote.shipping, Decimal::ZERO);
        assert_eq!(quote.tax, dec!(9.60));
        assert_eq!(quote.total, dec!(129.60));
    }
}
