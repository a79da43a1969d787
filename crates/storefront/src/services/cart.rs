//! Cart reconciliation engine.
//!
//! Presents a single logical cart regardless of authentication state.
//! Exactly one representation is authoritative at any instant:
//!
//! - anonymous: a [`CartLines`] value serialized in the session under
//!   [`keys::LOCAL_CART`] (the device-local cart);
//! - authenticated: `cart_items` rows keyed `(user, product)`.
//!
//! On login the local cart is migrated into the persisted one exactly once
//! (`merge_local_into_user`), item by item, best-effort; afterwards the
//! session entry is cleared and the persisted cart is authoritative.

use rust_decimal::Decimal;
use serde::Serialize;
use sqlx::PgPool;
use thiserror::Error;
use tower_sessions::Session;
use tracing::instrument;

use clover_core::cart::{CartLines, MergeStrategy};
use clover_core::ProductId;

use crate::db::cart::PersistedCartLine;
use crate::db::products::ProductSummary;
use crate::db::{CartRepository, ProductRepository, RepositoryError};
use crate::models::CurrentUser;
use crate::models::session::keys;

/// Cart operation failure.
#[derive(Debug, Error)]
pub enum CartError {
    #[error("cart storage error: {0}")]
    Repository(#[from] RepositoryError),

    /// Session read/write failed. Only plausible on the anonymous path;
    /// the local cart is otherwise synchronous-and-local.
    #[error("session error: {0}")]
    Session(#[from] tower_sessions::session::Error),
}

/// One cart line resolved for display. A line whose product no longer
/// exists keeps its quantity but has no name/price and a zero line total.
#[derive(Debug, Clone, Serialize)]
pub struct CartItemView {
    pub product_id: ProductId,
    pub name: Option<String>,
    pub slug: Option<String>,
    pub unit_price: Option<Decimal>,
    pub quantity: u32,
    pub line_total: Decimal,
    pub image_url: Option<String>,
}

/// The whole cart plus its derived aggregates.
#[derive(Debug, Clone, Serialize)]
pub struct CartView {
    pub items: Vec<CartItemView>,
    pub item_count: u64,
    pub subtotal: Decimal,
}

impl CartView {
    /// Empty cart.
    #[must_use]
    pub const fn empty() -> Self {
        Self {
            items: Vec::new(),
            item_count: 0,
            subtotal: Decimal::ZERO,
        }
    }

    fn from_items(items: Vec<CartItemView>) -> Self {
        let item_count = items.iter().map(|i| u64::from(i.quantity)).sum();
        let subtotal = items.iter().map(|i| i.line_total).sum();
        Self {
            items,
            item_count,
            subtotal,
        }
    }
}

/// The cart reconciliation engine. Created per request from application
/// state; holds no cart state of its own.
pub struct CartService<'a> {
    pool: &'a PgPool,
    merge: MergeStrategy,
}

impl<'a> CartService<'a> {
    #[must_use]
    pub const fn new(pool: &'a PgPool, merge: MergeStrategy) -> Self {
        Self { pool, merge }
    }

    /// Resolve the current cart for display.
    ///
    /// # Errors
    ///
    /// Returns `CartError` if the backing store cannot be read.
    pub async fn view(
        &self,
        session: &Session,
        user: Option<&CurrentUser>,
    ) -> Result<CartView, CartError> {
        match user {
            Some(user) => {
                let rows = CartRepository::new(self.pool).fetch(user.id).await?;
                Ok(view_from_persisted(rows))
            }
            None => {
                let lines = load_local_cart(session).await?;
                if lines.is_empty() {
                    return Ok(CartView::empty());
                }
                let ids: Vec<ProductId> = lines.iter().map(|l| l.product_id).collect();
                let summaries = ProductRepository::new(self.pool).summaries(&ids).await?;
                Ok(view_from_local(&lines, &summaries))
            }
        }
    }

    /// Add `quantity` of a product (default call sites pass 1), merging
    /// into any existing line for the product rather than duplicating it.
    ///
    /// # Errors
    ///
    /// Returns `CartError` if the backing store cannot be written.
    #[instrument(skip(self, session, user))]
    pub async fn add_item(
        &self,
        session: &Session,
        user: Option<&CurrentUser>,
        product_id: ProductId,
        quantity: u32,
    ) -> Result<(), CartError> {
        match user {
            Some(user) => {
                CartRepository::new(self.pool)
                    .add_item(user.id, product_id, quantity)
                    .await?;
            }
            None => {
                let mut lines = load_local_cart(session).await?;
                lines.add(product_id, quantity);
                save_local_cart(session, &lines).await?;
            }
        }
        Ok(())
    }

    /// Set the absolute quantity for a product; zero removes the line.
    ///
    /// # Errors
    ///
    /// Returns `CartError` if the backing store cannot be written.
    #[instrument(skip(self, session, user))]
    pub async fn set_quantity(
        &self,
        session: &Session,
        user: Option<&CurrentUser>,
        product_id: ProductId,
        quantity: u32,
    ) -> Result<(), CartError> {
        match user {
            Some(user) => {
                CartRepository::new(self.pool)
                    .set_quantity(user.id, product_id, quantity)
                    .await?;
            }
            None => {
                let mut lines = load_local_cart(session).await?;
                lines.set_quantity(product_id, quantity);
                save_local_cart(session, &lines).await?;
            }
        }
        Ok(())
    }

    /// Remove a product's line entirely.
    ///
    /// # Errors
    ///
    /// Returns `CartError` if the backing store cannot be written.
    #[instrument(skip(self, session, user))]
    pub async fn remove_item(
        &self,
        session: &Session,
        user: Option<&CurrentUser>,
        product_id: ProductId,
    ) -> Result<(), CartError> {
        match user {
            Some(user) => {
                CartRepository::new(self.pool)
                    .remove_item(user.id, product_id)
                    .await?;
            }
            None => {
                let mut lines = load_local_cart(session).await?;
                lines.remove(product_id);
                save_local_cart(session, &lines).await?;
            }
        }
        Ok(())
    }

    /// Empty the cart (post-checkout, or explicit clear).
    ///
    /// # Errors
    ///
    /// Returns `CartError` if the backing store cannot be written.
    #[instrument(skip(self, session, user))]
    pub async fn clear(
        &self,
        session: &Session,
        user: Option<&CurrentUser>,
    ) -> Result<(), CartError> {
        match user {
            Some(user) => {
                CartRepository::new(self.pool).clear(user.id).await?;
            }
            None => {
                session.remove::<CartLines>(keys::LOCAL_CART).await?;
            }
        }
        Ok(())
    }

    /// Migrate the anonymous cart into the user's persisted cart. Called
    /// exactly once, when identity transitions from absent to present.
    ///
    /// Each line is upserted independently using the configured
    /// [`MergeStrategy`]; a failing line is logged and skipped so one bad
    /// row cannot strand the rest of the cart. The session entry is cleared
    /// afterwards regardless of per-line outcomes - the persisted cart is
    /// authoritative from here on.
    ///
    /// # Errors
    ///
    /// Returns `CartError::Session` only if the session itself cannot be
    /// read or written.
    #[instrument(skip(self, session, user), fields(user_id = %user.id))]
    pub async fn merge_local_into_user(
        &self,
        session: &Session,
        user: &CurrentUser,
    ) -> Result<(), CartError> {
        let lines = load_local_cart(session).await?;
        if lines.is_empty() {
            return Ok(());
        }

        let repo = CartRepository::new(self.pool);
        for line in &lines {
            if let Err(e) = repo
                .upsert_merged(user.id, line.product_id, line.quantity, self.merge)
                .await
            {
                tracing::warn!(
                    product_id = %line.product_id,
                    error = %e,
                    "Failed to merge cart line; continuing with remaining items"
                );
            }
        }

        session.remove::<CartLines>(keys::LOCAL_CART).await?;
        tracing::info!(lines = lines.len(), "Merged local cart into user cart");
        Ok(())
    }
}

/// Load the anonymous cart from the session, defaulting to empty.
async fn load_local_cart(session: &Session) -> Result<CartLines, tower_sessions::session::Error> {
    Ok(session
        .get::<CartLines>(keys::LOCAL_CART)
        .await?
        .unwrap_or_default())
}

/// Persist the anonymous cart back to the session.
async fn save_local_cart(
    session: &Session,
    lines: &CartLines,
) -> Result<(), tower_sessions::session::Error> {
    session.insert(keys::LOCAL_CART, lines).await
}

/// Assemble the display view from persisted cart rows.
fn view_from_persisted(rows: Vec<PersistedCartLine>) -> CartView {
    let items = rows
        .into_iter()
        .map(|row| {
            let quantity = u32::try_from(row.quantity).unwrap_or(0);
            let line_total = row
                .price
                .map_or(Decimal::ZERO, |p| p * Decimal::from(quantity));
            CartItemView {
                product_id: row.product_id,
                name: row.product_name,
                slug: row.product_slug,
                unit_price: row.price,
                quantity,
                line_total,
                image_url: row.image_url,
            }
        })
        .collect();
    CartView::from_items(items)
}

/// Assemble the display view from local lines plus resolved summaries.
fn view_from_local(
    lines: &CartLines,
    summaries: &std::collections::HashMap<ProductId, ProductSummary>,
) -> CartView {
    let items = lines
        .iter()
        .map(|line| {
            let summary = summaries.get(&line.product_id);
            let line_total = summary
                .map_or(Decimal::ZERO, |s| s.price * Decimal::from(line.quantity));
            CartItemView {
                product_id: line.product_id,
                name: summary.map(|s| s.name.clone()),
                slug: summary.map(|s| s.slug.clone()),
                unit_price: summary.map(|s| s.price),
                quantity: line.quantity,
                line_total,
                image_url: summary.and_then(|s| s.image_url.clone()),
            }
        })
        .collect();
    CartView::from_items(items)
}

#[cfg(test)]
mod tests {
    use rust_decimal_macros::dec;

    use super::*;

    fn summary(id: ProductId, name: &str, price: Decimal) -> ProductSummary {
        ProductSummary {
            id,
            name: name.to_owned(),
            slug: clover_core::slug::slugify(name),
            price,
            image_url: None,
        }
    }

    #[test]
    fn local_view_aggregates_count_and_subtotal() {
        let p1 = ProductId::generate();
        let p2 = ProductId::generate();
        let mut lines = CartLines::new();
        lines.add(p1, 2);
        lines.add(p2, 1);

        let summaries = [
            (p1, summary(p1, "Linen Shirt", dec!(40.00))),
            (p2, summary(p2, "Mug", dec!(12.50))),
        ]
        .into_iter()
        .collect();

        let view = view_from_local(&lines, &summaries);
        assert_eq!(view.item_count, 3);
        assert_eq!(view.subtotal, dec!(92.50));
        assert_eq!(view.items.len(), 2);
    }

    #[test]
    fn unresolved_local_products_contribute_zero() {
        let known = ProductId::generate();
        let gone = ProductId::generate();
        let mut lines = CartLines::new();
        lines.add(known, 1);
        lines.add(gone, 5);

        let summaries = [(known, summary(known, "Candle", dec!(18.00)))]
            .into_iter()
            .collect();

        let view = view_from_local(&lines, &summaries);
        // Quantity still counts; price does not.
        assert_eq!(view.item_count, 6);
        assert_eq!(view.subtotal, dec!(18.00));
        let gone_item = view
            .items
            .iter()
            .find(|i| i.product_id == gone)
            .expect("line kept");
        assert!(gone_item.name.is_none());
        assert_eq!(gone_item.line_total, Decimal::ZERO);
    }

    #[test]
    fn persisted_view_matches_local_semantics() {
        let p = ProductId::generate();
        let rows = vec![
            PersistedCartLine {
                product_id: p,
                quantity: 3,
                product_name: Some("Throw Blanket".into()),
                product_slug: Some("throw-blanket".into()),
                price: Some(dec!(59.99)),
                image_url: None,
            },
            PersistedCartLine {
                product_id: ProductId::generate(),
                quantity: 2,
                product_name: None,
                product_slug: None,
                price: None,
                image_url: None,
            },
        ];

        let view = view_from_persisted(rows);
        assert_eq!(view.item_count, 5);
        assert_eq!(view.subtotal, dec!(179.97));
    }

    #[test]
    fn empty_view_is_all_zeroes() {
        let view = CartView::empty();
        assert_eq!(view.item_count, 0);
        assert_eq!(view.subtotal, Decimal::ZERO);
        assert!(view.items.is_empty());
    }
}
