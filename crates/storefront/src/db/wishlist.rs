//! Wishlist repository. Unique on `(user, product)`.

use sqlx::PgPool;

use clover_core::{ProductId, UserId};

use super::RepositoryError;
use crate::models::WishlistEntry;

/// Repository for wishlist entries.
pub struct WishlistRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> WishlistRepository<'a> {
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// All wishlist entries for a user with resolved products, newest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list(&self, user_id: UserId) -> Result<Vec<WishlistEntry>, RepositoryError> {
        let rows = sqlx::query_as(
            "SELECT wi.id, wi.product_id, wi.created_at, \
                    p.name AS product_name, p.slug AS product_slug, p.price, \
                    (SELECT url FROM product_images pi \
                     WHERE pi.product_id = p.id ORDER BY pi.position LIMIT 1) AS image_url \
             FROM wishlist_items wi \
             LEFT JOIN products p ON p.id = wi.product_id \
             WHERE wi.user_id = $1 \
             ORDER BY wi.created_at DESC",
        )
        .bind(user_id)
        .fetch_all(self.pool)
        .await?;
        Ok(rows)
    }

    /// Add a product to the wishlist. Adding an already-wishlisted product
    /// is a no-op, not an error.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the write fails.
    pub async fn add(&self, user_id: UserId, product_id: ProductId) -> Result<(), RepositoryError> {
        sqlx::query(
            "INSERT INTO wishlist_items (user_id, product_id) VALUES ($1, $2) \
             ON CONFLICT (user_id, product_id) DO NOTHING",
        )
        .bind(user_id)
        .bind(product_id)
        .execute(self.pool)
        .await?;
        Ok(())
    }

    /// Remove a product from the wishlist, if present.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the write fails.
    pub async fn remove(
        &self,
        user_id: UserId,
        product_id: ProductId,
    ) -> Result<(), RepositoryError> {
        sqlx::query("DELETE FROM wishlist_items WHERE user_id = $1 AND product_id = $2")
            .bind(user_id)
            .bind(product_id)
            .execute(self.pool)
            .await?;
        Ok(())
    }
}
